//! Text codecs for the sitemap wire format.
//!
//! Reading is deliberately permissive (loosely formatted third-party input is
//! common); writing always emits the most compact spec-compliant form. URL
//! locations keep their original, possibly non-ASCII text in memory and are
//! only percent-encoded at serialization time.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{Error, Result};

/// ASCII characters that must be escaped in an emitted `<loc>` besides all
/// non-ASCII bytes (which `percent-encoding` always escapes).
const LOC_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>');

/// Validate a location string as an absolute URL, keeping the original text.
pub fn parse_loc(location: &str) -> Result<String> {
    match url::Url::parse(location) {
        Ok(_) => Ok(location.to_string()),
        Err(source) => Err(Error::MalformedUrl {
            url: location.to_string(),
            source,
        }),
    }
}

/// Percent-encode a location to pure ASCII for serialization.
///
/// This never fails; the 2048-character ceiling on the encoded form is a
/// write-validation concern, not a codec one.
pub fn encode_loc(location: &str) -> String {
    utf8_percent_encode(location, LOC_ESCAPE).to_string()
}

/// Parse a W3C Datetime at any of its four truncation levels.
///
/// Accepted: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and
/// `YYYY-MM-DD'T'HH[:MM[:SS[.fff]]][Z|±HH:MM]`. Omitted month/day default to
/// 1, omitted time-of-day fields to 0, an omitted offset to UTC.
pub fn parse_w3c_datetime(text: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::invalid_format("datetime", text);

    let (date_part, time_part) = match text.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (text, None),
    };

    let date = parse_date_part(date_part).ok_or_else(invalid)?;
    let (time, offset) = match time_part {
        Some(t) => parse_time_part(t).ok_or_else(invalid)?,
        None => (NaiveTime::MIN, FixedOffset::east_opt(0).unwrap()),
    };

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
        .ok_or_else(invalid)
}

fn parse_date_part(s: &str) -> Option<NaiveDate> {
    match s.len() {
        4 => {
            let year: i32 = s.parse().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        7 => {
            let (y, m) = s.split_once('-')?;
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)
        }
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// Split a time-of-day string into its clock and offset components.
fn parse_time_part(s: &str) -> Option<(NaiveTime, FixedOffset)> {
    let (clock, offset) = if let Some(stripped) = s.strip_suffix('Z') {
        (stripped, FixedOffset::east_opt(0).unwrap())
    } else if let Some(pos) = s.rfind(['+', '-']) {
        (&s[..pos], parse_offset(&s[pos..])?)
    } else {
        (s, FixedOffset::east_opt(0).unwrap())
    };

    let time = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H"))
        .ok()?;
    Some((time, offset))
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hh, mm) = rest.split_once(':')?;
    let secs = sign * (hh.parse::<i32>().ok()? * 3600 + mm.parse::<i32>().ok()? * 60);
    FixedOffset::east_opt(secs)
}

/// Format a datetime in the most compact representation that round-trips it.
///
/// Milliseconds are emitted only when non-zero, then seconds, then
/// hour/minute, otherwise just the bare date. A zero offset prints as `Z`.
pub fn format_w3c_datetime(dt: &DateTime<FixedOffset>) -> String {
    let millis = dt.nanosecond() / 1_000_000;
    let offset = format_offset(dt.offset());
    if millis > 0 {
        format!("{}.{millis:03}{offset}", dt.format("%Y-%m-%dT%H:%M:%S"))
    } else if dt.second() > 0 {
        format!("{}{offset}", dt.format("%Y-%m-%dT%H:%M:%S"))
    } else if dt.hour() + dt.minute() > 0 {
        format!("{}{offset}", dt.format("%Y-%m-%dT%H:%M"))
    } else {
        format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day())
    }
}

fn format_offset(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "Z".to_string();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}

/// Decode a ternary yes/no token, case-insensitively.
pub fn parse_yes_no(token: &str) -> Result<bool> {
    if token.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(Error::invalid_format("boolean", token))
    }
}

pub fn format_yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Split a space-delimited token list. Empty input yields an empty list.
pub fn split_tokens(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(' ').map(str::to_string).collect()
}

/// Join tokens with single spaces.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a priority the way the protocol examples do: `0.5`, not `0.500`.
pub fn format_priority(priority: f64) -> String {
    if priority.fract() == 0.0 {
        format!("{priority:.1}")
    } else {
        format!("{priority}")
    }
}
