//! Raw date-time inputs and the ISO-8601 wire format.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::Result;

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A date-time as handed back by storage, before it is wrapped into a flavor value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp<'a> {
    /// A date-time without offset, read as UTC.
    Naive(NaiveDateTime),
    /// A date-time with an explicit offset.
    Aware(DateTime<FixedOffset>),
    /// A date, read as midnight UTC.
    Date(NaiveDate),
    /// An ISO-8601 string.
    Text(Cow<'a, str>),
}

impl RawTimestamp<'_> {
    /// Normalizes the input into a date-time with an explicit offset.
    ///
    /// # Errors
    ///
    /// Returns an error if a textual input is not a valid ISO-8601 date-time or date.
    pub fn normalize(self) -> Result<DateTime<FixedOffset>> {
        match self {
            RawTimestamp::Naive(naive) => Ok(naive.and_utc().fixed_offset()),
            RawTimestamp::Aware(datetime) => Ok(datetime),
            RawTimestamp::Date(date) => Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            RawTimestamp::Text(text) => parse_stored(&text),
        }
    }
}

impl From<NaiveDateTime> for RawTimestamp<'_> {
    fn from(naive: NaiveDateTime) -> Self {
        RawTimestamp::Naive(naive)
    }
}

impl From<DateTime<FixedOffset>> for RawTimestamp<'_> {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        RawTimestamp::Aware(datetime)
    }
}

impl From<DateTime<Utc>> for RawTimestamp<'_> {
    fn from(datetime: DateTime<Utc>) -> Self {
        RawTimestamp::Aware(datetime.fixed_offset())
    }
}

impl From<NaiveDate> for RawTimestamp<'_> {
    fn from(date: NaiveDate) -> Self {
        RawTimestamp::Date(date)
    }
}

impl<'a> From<&'a str> for RawTimestamp<'a> {
    fn from(text: &'a str) -> Self {
        RawTimestamp::Text(Cow::Borrowed(text))
    }
}

impl From<String> for RawTimestamp<'_> {
    fn from(text: String) -> Self {
        RawTimestamp::Text(Cow::Owned(text))
    }
}

/// Parses an ISO-8601 date-time.
///
/// Offsets are honored when present; date-times without an offset are read as UTC. Seconds
/// may be omitted, and both `T` and a space are accepted as the date/time separator.
///
/// # Errors
///
/// Returns an error if `s` is not a date-time. Bare dates are rejected.
pub fn parse_iso8601(s: &str) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime);
    }

    if let Some(datetime) =
        AWARE_FORMATS.iter().find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(datetime);
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    match NAIVE_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok()) {
        Some(naive) => Ok(naive.and_utc().fixed_offset()),
        // reports the error against the full format
        None => NaiveDateTime::parse_from_str(naive, NAIVE_FORMATS[0])
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(From::from),
    }
}

/// Parses a stored ISO-8601 value: a date-time as [`parse_iso8601`] does, or a bare date
/// read as midnight UTC.
fn parse_stored(s: &str) -> Result<DateTime<FixedOffset>> {
    parse_iso8601(s).or_else(|err| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
            .map_err(|_| err)
    })
}

/// Formats a date-time the way a plain date-time field does: RFC 3339 with as many
/// fractional digits as needed and a numeric offset (`+00:00` for UTC).
pub fn format_iso8601(datetime: &DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
