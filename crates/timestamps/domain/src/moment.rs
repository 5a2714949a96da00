use core::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::{raw::format_iso8601, zone::Zone};

/// An enriched date-time: an instant together with the offset it was observed in.
///
/// Equality and ordering compare instants, so two moments rendered in different
/// zones are equal when they denote the same point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moment(DateTime<FixedOffset>);

impl Moment {
    /// Creates a moment from a date-time carrying an explicit offset.
    pub fn new(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }

    /// The current instant, in UTC.
    pub fn now() -> Self {
        Self(Utc::now().fixed_offset())
    }

    /// Returns the same instant expressed in `zone`.
    pub fn to_zone(&self, zone: &Zone) -> Self {
        let offset = zone.offset_at(&self.0.naive_utc());
        Self(self.0.with_timezone(&offset))
    }

    /// Returns the same instant expressed in UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// The offset this moment is expressed in.
    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// The underlying date-time.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Consumes the moment, returning the underlying date-time.
    pub fn into_inner(self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Renders the moment as RFC 3339, keeping its own offset.
    pub fn to_rfc3339(&self) -> String {
        format_iso8601(&self.0)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<DateTime<FixedOffset>> for Moment {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime.fixed_offset())
    }
}

impl From<Moment> for DateTime<FixedOffset> {
    fn from(Moment(datetime): Moment) -> Self {
        datetime
    }
}

impl<Tz: TimeZone> PartialEq<DateTime<Tz>> for Moment {
    fn eq(&self, other: &DateTime<Tz>) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(s: &str) -> Moment {
        DateTime::parse_from_rfc3339(s).map(Moment::from).unwrap()
    }

    #[test]
    fn to_zone_keeps_the_instant() {
        let original = moment("2016-12-13T02:09:48.075736+00:00");
        let converted = original.to_zone(&"Asia/Kolkata".parse().unwrap());

        assert_eq!(converted, original);
        assert_eq!(converted.to_rfc3339(), "2016-12-13T07:39:48.075736+05:30");
    }

    #[test]
    fn rendering_is_offset_sensitive() {
        let utc = moment("2020-01-01T00:00:00+00:00");
        let paris = utc.to_zone(&"Europe/Paris".parse().unwrap());

        assert_eq!(utc.to_string(), "2020-01-01T00:00:00+00:00");
        assert_eq!(paris.to_string(), "2020-01-01T01:00:00+01:00");
        assert_ne!(utc.to_string(), paris.to_string());
    }

    #[test]
    fn renders_like_the_wire_format() {
        let m = moment("2016-12-13T02:09:48.5-03:30");

        assert_eq!(m.to_rfc3339(), format_iso8601(m.as_datetime()));
        assert_eq!(m.into_inner().to_rfc3339(), "2016-12-13T02:09:48.500-03:30");
    }

    #[test]
    fn compares_with_plain_datetimes() {
        let m = moment("2020-06-01T12:00:00+02:00");

        assert_eq!(m, Utc.with_ymd_and_hms(2020, 6, 1, 10, 0, 0).unwrap());
        assert!(m < moment("2020-06-01T12:00:01+02:00"));
    }
}
