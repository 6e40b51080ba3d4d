//! EXIF timestamp parsing.
//!
//! EXIF stores timestamps as `YYYY:MM:DD HH:MM:SS`, usually followed by a NUL.
//! Only the last two digits of the year are kept: `69`-`99` fall in the 1900s
//! and `00`-`68` in the 2000s. The string is rebuilt as `DD Mon YYYY HH:MM`
//! with that century and parsed with chrono, so the result has minute
//! precision.

use chrono::NaiveDateTime;

use crate::error::DateTimeError;

/// Layout of the reassembled timestamp.
const REASSEMBLED_LAYOUT: &str = "%d %b %Y %H:%M";

/// Two-digit years from here up belong to the 1900s.
const CENTURY_PIVOT: u8 = 69;

/// Map a two-digit month token to its English abbreviation.
///
/// Only the exact tokens `"01"` through `"12"` are accepted.
pub fn month_abbrev(month: &str) -> Result<&'static str, DateTimeError> {
    let abbrev = match month {
        "01" => "Jan",
        "02" => "Feb",
        "03" => "Mar",
        "04" => "Apr",
        "05" => "May",
        "06" => "Jun",
        "07" => "Jul",
        "08" => "Aug",
        "09" => "Sep",
        "10" => "Oct",
        "11" => "Nov",
        "12" => "Dec",
        other => return Err(DateTimeError::InvalidMonth(other.to_string())),
    };
    Ok(abbrev)
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` string.
///
/// Seconds are dropped. Anything after the minutes token, such as a trailing
/// NUL on the seconds, is ignored.
///
/// # Errors
/// - `InvalidFormat` if the string is not two space-separated tokens of three
///   `:`-separated fields each, the year is shorter than four characters, or
///   the day, hour or minute is not exactly two characters
/// - `InvalidMonth` if the month is not `01`-`12`
/// - `Parse` if the reassembled string is not a valid timestamp
pub fn parse_exif_datetime(value: &str) -> Result<NaiveDateTime, DateTimeError> {
    let invalid = || DateTimeError::InvalidFormat(value.to_string());

    let tokens: Vec<&str> = value.split(' ').collect();
    let [date, time] = tokens.as_slice() else {
        return Err(invalid());
    };

    let date_fields: Vec<&str> = date.split(':').collect();
    let time_fields: Vec<&str> = time.split(':').collect();
    let ([year, month, day], [hour, minute, _seconds]) = (&date_fields[..], &time_fields[..])
    else {
        return Err(invalid());
    };

    let short_year = year.get(2..).filter(|_| year.len() >= 4).ok_or_else(invalid)?;
    if [day, hour, minute].iter().any(|field| field.len() != 2) {
        return Err(invalid());
    }
    let month = month_abbrev(month)?;

    let century = match short_year.parse::<u8>() {
        Ok(yy) if yy >= CENTURY_PIVOT => "19",
        _ => "20",
    };

    let reassembled = format!("{day} {month} {century}{short_year} {hour}:{minute}");
    NaiveDateTime::parse_from_str(&reassembled, REASSEMBLED_LAYOUT)
        .map_err(|_| DateTimeError::Parse(reassembled))
}
