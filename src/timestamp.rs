use std::convert::TryFrom;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches an ICS `DATE` (`YYYYMMDD`) or `DATE-TIME` (`YYYYMMDDTHHMMSS[Z]`)
/// value anywhere in the input.
static ICS_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})(?:T([0-9]{2})([0-9]{2})([0-9]{2})Z?)?")
        .expect("timestamp pattern is valid")
});

/// Convert an ICS date or date-time value into a UTC instant.
///
/// The time of day defaults to midnight for plain dates. Times are always
/// read as UTC, whether or not they carry the `Z` suffix, so floating times
/// are pinned to UTC.
///
/// Field ranges are not checked. Out of range values roll over into the
/// neighbouring unit, e.g. month `13` is January of the following year and
/// day `32` of January is the 1st of February.
///
/// Years are taken literally, `0099` is the year 99 and not 1999.
///
/// Returns `None` for missing or empty input, or if nothing in the input looks
/// like an ICS timestamp.
pub fn normalize_timestamp(text: Option<&str>) -> Option<DateTime<Utc>> {
    let text = text.filter(|t| !t.is_empty())?;

    let captures = ICS_TIMESTAMP.captures(text)?;

    let year = field(&captures, 1)?;
    let month = field(&captures, 2)?;
    let day = field(&captures, 3)?;
    let hour = field(&captures, 4).unwrap_or(0);
    let minute = field(&captures, 5).unwrap_or(0);
    let second = field(&captures, 6).unwrap_or(0);

    utc_instant(year, month, day, hour, minute, second)
}

fn field(captures: &Captures, idx: usize) -> Option<i64> {
    captures.get(idx)?.as_str().parse().ok()
}

/// Build an instant from possibly out of range components, carrying overflow
/// upwards. `month` is 1-indexed.
fn utc_instant(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<DateTime<Utc>> {
    let month0 = month - 1;
    let year = i32::try_from(year + month0.div_euclid(12)).ok()?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;

    let offset = Duration::seconds(((day - 1) * 24 + hour) * 3600 + minute * 60 + second);

    let naive = first_of_month.checked_add_signed(offset)?;

    Some(Utc.from_utc_datetime(&naive))
}
