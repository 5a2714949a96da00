//! Timezones accepted by zone conversion and timezone checks.

use core::{fmt, str::FromStr};

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::error::ConversionError;

/// A target zone: either an IANA zone from the tz database or a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A named zone such as `Europe/Paris` or `UTC`.
    Named(Tz),
    /// A fixed offset such as `+05:30`.
    Fixed(FixedOffset),
}

impl Zone {
    /// The UTC zone.
    pub const UTC: Zone = Zone::Named(Tz::UTC);

    /// Returns the offset this zone observes at the given UTC instant.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Zone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
            Zone::Fixed(offset) => *offset,
        }
    }
}

impl FromStr for Zone {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s == "Z" || s.eq_ignore_ascii_case("utc") {
            return Ok(Zone::UTC);
        }

        if let Some(offset) = parse_fixed_offset(s) {
            return Ok(Zone::Fixed(offset));
        }

        s.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| ConversionError::UnknownZone(s.to_owned().into()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Named(tz) => f.write_str(tz.name()),
            Zone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Parses `+HH:MM`, `+HHMM` and `+HH` (and their negative forms).
fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    if !rest.is_ascii() {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => rest.split_at(2),
        None if rest.len() == 2 => (rest, "00"),
        None => return None,
    };

    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }

    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;

    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
