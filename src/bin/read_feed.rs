use std::{
    fmt::Write as _,
    fs::File,
    io::{stdin, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use clap::Parser;
use itertools::Itertools;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ics_day_feed::{extract_events, group_by_day, upcoming, Event, DEFAULT_AGENDA_LIMIT};

const DEFAULT_LOG_FILTER: &str = "warn";

/// List the events of an ICS feed that has already been downloaded.
#[derive(Parser)]
#[command(name = "read_feed")]
#[command(version)]
struct Args {
    /// ICS file to read, or `-` for stdin
    path: Option<PathBuf>,

    /// Number of events in the upcoming list
    #[arg(short, long, default_value_t = DEFAULT_AGENDA_LIMIT)]
    limit: usize,

    /// Group all events by the day they start on
    #[arg(long)]
    by_day: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(EnvFilter::try_from_default_env()))
        .init();

    let args = Args::parse();

    let data = read_input(args.path.as_deref(), stdin())?;

    let events = extract_events(&data);
    debug!(count = events.len(), "Extracted events");

    print!("{}", render(&events, &args)?);

    Ok(())
}

/// Use the `RUST_LOG` filter if there is a valid one, otherwise only warnings.
fn log_filter<E>(from_env: Result<EnvFilter, E>) -> EnvFilter {
    from_env.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Read the whole feed from `path`, or from `stdin` if there is no path or it
/// is `-`.
fn read_input<R: Read>(path: Option<&Path>, mut stdin: R) -> Result<String, Error> {
    let mut data = String::new();

    match path {
        Some(path) if path.as_os_str() != "-" => {
            File::open(path)
                .with_context(|| format!("opening {}", path.display()))?
                .read_to_string(&mut data)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        _ => {
            stdin
                .read_to_string(&mut data)
                .context("reading stdin")?;
        }
    }

    Ok(data)
}

fn render(events: &[Event], args: &Args) -> Result<String, Error> {
    let mut out = String::new();

    if args.by_day {
        let days = group_by_day(events);

        if args.json {
            out = serde_json::to_string_pretty(&days).context("serializing days")?;
            out.push('\n');
        } else {
            for (day, events) in days.iter() {
                writeln!(out, "{}", day)?;
                writeln!(
                    out,
                    "    {}",
                    events.iter().map(|e| &e.summary).join("\n    ")
                )?;
            }
        }
    } else {
        let lines = upcoming(events, args.limit);

        if args.json {
            out = serde_json::to_string_pretty(&lines).context("serializing events")?;
            out.push('\n');
        } else {
            writeln!(out, "Upcoming Events")?;
            for line in lines {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    const FEED: &str = "BEGIN:VEVENT\nSUMMARY:Meet\nDTSTART:20240102T090000Z\nEND:VEVENT\n\
BEGIN:VEVENT\nSUMMARY:Lunch\nDTSTART:20240102T120000Z\nEND:VEVENT\n\
BEGIN:VEVENT\nSUMMARY:Party\nDTSTART:20240103\nEND:VEVENT\n\
BEGIN:VEVENT\nSUMMARY:Someday\nDTSTART:TBD\nEND:VEVENT\n";

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("read_feed").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn log_filter_uses_rust_log() {
        let filter = log_filter::<()>(Ok(EnvFilter::new("debug")));

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn log_filter_defaults_to_warn() {
        let filter = log_filter(Err(()));

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn dash_and_no_path_read_stdin() {
        let from_dash = read_input(Some(Path::new("-")), FEED.as_bytes()).unwrap();
        let from_none = read_input(None, FEED.as_bytes()).unwrap();

        assert_eq!(from_dash, FEED);
        assert_eq!(from_none, FEED);
    }

    #[test]
    fn path_is_read_instead_of_stdin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

        let data = read_input(Some(&path), FEED.as_bytes()).unwrap();

        assert!(data.contains("[package]"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("no-such-feed.ics");

        assert!(read_input(Some(&path), FEED.as_bytes()).is_err());
    }

    #[test]
    fn upcoming_text() {
        let events = extract_events(FEED);

        let out = render(&events, &args(&["--limit", "2"])).unwrap();

        assert_eq!(
            out,
            "Upcoming Events\n20240102T090000Z - Meet\n20240102T120000Z - Lunch\n"
        );
    }

    #[test]
    fn upcoming_default_limit() {
        let args = args(&[]);

        assert_eq!(args.limit, DEFAULT_AGENDA_LIMIT);
        assert_eq!(args.path, None);
    }

    #[test]
    fn by_day_text() {
        let events = extract_events(FEED);

        let out = render(&events, &args(&["--by-day"])).unwrap();

        assert_eq!(
            out,
            "2024-01-02\n    Meet\n    Lunch\n2024-01-03\n    Party\n"
        );
    }

    #[test]
    fn upcoming_json() {
        let events = extract_events(FEED);

        let out = render(&events, &args(&["--json", "-l", "1"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{ "start": "20240102T090000Z", "summary": "Meet" }])
        );
        assert!(out.contains("\n  "));
    }

    #[test]
    fn by_day_json() {
        let events = extract_events(FEED);

        let out = render(&events, &args(&["--by-day", "--json", "-"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        let days = value.as_object().unwrap();
        assert_eq!(
            days.keys().collect::<Vec<_>>(),
            vec!["2024-01-02", "2024-01-03"]
        );
        assert_eq!(days["2024-01-02"].as_array().unwrap().len(), 2);
        assert_eq!(days["2024-01-03"][0]["start_date"], "2024-01-03T00:00:00Z");
    }
}
