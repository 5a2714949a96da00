//! Conversion strategies between raw date-times and flavor values.

use core::fmt::Debug;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use strum::{Display, EnumString, IntoStaticStr};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{
    error::{ConversionError, Result},
    moment::Moment,
    raw::{RawTimestamp, format_iso8601},
    zone::Zone,
};

/// A conversion strategy between the raw [`DateTime<FixedOffset>`] and a value type.
///
/// Storage keeps the UTC [`NaiveDateTime`] of a value; the wire keeps its ISO-8601
/// rendering. Both go through [`Flavor::unwrap`], so a raw value survives a round
/// trip through any flavor without losing the instant it denotes.
pub trait Flavor: Debug + Clone + Copy + Default + PartialEq + Eq + Send + Sync + 'static {
    /// The value type produced by this flavor.
    type Value: Debug + Clone + PartialEq + Send + Sync;

    /// A short name identifying the flavor.
    const NAME: &'static str;

    /// Wraps a raw date-time into the flavor value.
    ///
    /// # Errors
    ///
    /// Returns an error if the date-time is outside the range of the value type.
    fn wrap(raw: DateTime<FixedOffset>) -> Result<Self::Value>;

    /// Unwraps a flavor value into the raw date-time.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside the range of the raw type.
    fn unwrap(value: &Self::Value) -> Result<DateTime<FixedOffset>>;

    /// The current instant, in UTC.
    fn now() -> Result<Self::Value> {
        Self::wrap(Utc::now().fixed_offset())
    }

    /// Converts a value handed back by storage into the flavor value.
    ///
    /// Accepts naive date-times (read as UTC), aware date-times, dates (read as midnight
    /// UTC) and ISO-8601 strings.
    fn from_stored<'a, R>(raw: R) -> Result<Self::Value>
    where
        R: Into<RawTimestamp<'a>>,
    {
        raw.into().normalize().and_then(Self::wrap)
    }

    /// The UTC naive date-time written to storage.
    fn to_stored(value: &Self::Value) -> Result<NaiveDateTime> {
        Self::unwrap(value).map(|datetime| datetime.naive_utc())
    }
}

/// A flavor whose values carry an offset and can be converted between zones.
pub trait Zoned: Flavor {
    /// Expresses the same instant in `zone`.
    fn to_zone(value: &Self::Value, zone: &Zone) -> Result<Self::Value>;

    /// Renders the value with its offset, using the value library's own formatting.
    fn render(value: &Self::Value) -> Result<String>;
}

/// Keeps values as UTC [`NaiveDateTime`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainFlavor;

/// Wraps values into [`Moment`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChronoFlavor;

/// Wraps values into [`OffsetDateTime`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFlavor;

impl Flavor for PlainFlavor {
    type Value = NaiveDateTime;

    const NAME: &'static str = "plain";

    fn wrap(raw: DateTime<FixedOffset>) -> Result<Self::Value> {
        Ok(raw.naive_utc())
    }

    fn unwrap(value: &Self::Value) -> Result<DateTime<FixedOffset>> {
        Ok(value.and_utc().fixed_offset())
    }
}

impl Flavor for ChronoFlavor {
    type Value = Moment;

    const NAME: &'static str = "chrono";

    fn wrap(raw: DateTime<FixedOffset>) -> Result<Self::Value> {
        Ok(Moment::new(raw))
    }

    fn unwrap(value: &Self::Value) -> Result<DateTime<FixedOffset>> {
        Ok(value.into_inner())
    }
}

impl Zoned for ChronoFlavor {
    fn to_zone(value: &Self::Value, zone: &Zone) -> Result<Self::Value> {
        Ok(value.to_zone(zone))
    }

    fn render(value: &Self::Value) -> Result<String> {
        Ok(value.to_rfc3339())
    }
}

impl Flavor for TimeFlavor {
    type Value = OffsetDateTime;

    const NAME: &'static str = "time";

    fn wrap(raw: DateTime<FixedOffset>) -> Result<Self::Value> {
        let offset = UtcOffset::from_whole_seconds(raw.offset().local_minus_utc())?;

        OffsetDateTime::from_unix_timestamp(raw.timestamp())?
            .replace_nanosecond(raw.timestamp_subsec_nanos())?
            .checked_to_offset(offset)
            .ok_or_else(|| ConversionError::out_of_range(format_iso8601(&raw)))
    }

    fn unwrap(value: &Self::Value) -> Result<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(value.offset().whole_seconds())
            .ok_or_else(|| ConversionError::out_of_range(format!("{:?}", value.offset())))?;

        DateTime::from_timestamp(value.unix_timestamp(), value.nanosecond())
            .map(|utc| utc.with_timezone(&offset))
            .ok_or_else(|| ConversionError::out_of_range(format!("{value:?}")))
    }
}

impl Zoned for TimeFlavor {
    fn to_zone(value: &Self::Value, zone: &Zone) -> Result<Self::Value> {
        let utc = Self::unwrap(value)?.naive_utc();
        let offset = UtcOffset::from_whole_seconds(zone.offset_at(&utc).local_minus_utc())?;

        value
            .checked_to_offset(offset)
            .ok_or_else(|| ConversionError::out_of_range(format!("{value:?}")))
    }

    fn render(value: &Self::Value) -> Result<String> {
        value.format(&Rfc3339).map_err(From::from)
    }
}

/// Selects a flavor at run time, e.g. from a string naming it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FlavorKind {
    /// [`PlainFlavor`]
    Plain,
    /// [`ChronoFlavor`]
    #[default]
    Chrono,
    /// [`TimeFlavor`]
    Time,
}

/// A value of whichever flavor a [`FlavorKind`] selected.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTimestamp {
    /// A [`PlainFlavor`] value.
    Plain(NaiveDateTime),
    /// A [`ChronoFlavor`] value.
    Chrono(Moment),
    /// A [`TimeFlavor`] value.
    Time(OffsetDateTime),
}

impl FlavorKind {
    /// Wraps a raw date-time into a value of the selected flavor.
    ///
    /// # Errors
    ///
    /// Returns an error if the date-time is outside the range of the value type.
    pub fn wrap(self, raw: DateTime<FixedOffset>) -> Result<AnyTimestamp> {
        match self {
            FlavorKind::Plain => PlainFlavor::wrap(raw).map(AnyTimestamp::Plain),
            FlavorKind::Chrono => ChronoFlavor::wrap(raw).map(AnyTimestamp::Chrono),
            FlavorKind::Time => TimeFlavor::wrap(raw).map(AnyTimestamp::Time),
        }
    }

    /// Converts a value handed back by storage into a value of the selected flavor.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be normalized or wrapped.
    pub fn from_stored<'a, R>(self, raw: R) -> Result<AnyTimestamp>
    where
        R: Into<RawTimestamp<'a>>,
    {
        raw.into().normalize().and_then(|raw| self.wrap(raw))
    }

    /// The current instant as a value of the selected flavor.
    ///
    /// # Errors
    ///
    /// Returns an error if the current instant cannot be wrapped.
    pub fn now(self) -> Result<AnyTimestamp> {
        self.wrap(Utc::now().fixed_offset())
    }

    /// Whether values of this flavor carry an offset.
    pub fn is_enriched(self) -> bool {
        !matches!(self, FlavorKind::Plain)
    }
}

impl AnyTimestamp {
    /// The flavor this value belongs to.
    pub fn kind(&self) -> FlavorKind {
        match self {
            AnyTimestamp::Plain(_) => FlavorKind::Plain,
            AnyTimestamp::Chrono(_) => FlavorKind::Chrono,
            AnyTimestamp::Time(_) => FlavorKind::Time,
        }
    }

    /// Unwraps the value into the raw date-time.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside the range of the raw type.
    pub fn unwrap(&self) -> Result<DateTime<FixedOffset>> {
        match self {
            AnyTimestamp::Plain(value) => PlainFlavor::unwrap(value),
            AnyTimestamp::Chrono(value) => ChronoFlavor::unwrap(value),
            AnyTimestamp::Time(value) => TimeFlavor::unwrap(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const STORED: &str = "2016-12-13T02:09:48.075736+00:00";

    fn raw(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn assert_lossless<F: Flavor>(s: &str) {
        let raw = raw(s);
        let back = F::wrap(raw).and_then(|value| F::unwrap(&value)).unwrap();

        assert_eq!(back, raw, "{} lost the instant of {s}", F::NAME);
    }

    #[test]
    fn raw_survives_every_flavor() {
        for s in [STORED, "1999-12-31T23:59:59.999999999-07:00", "2040-02-29T12:00:00+13:45"] {
            assert_lossless::<PlainFlavor>(s);
            assert_lossless::<ChronoFlavor>(s);
            assert_lossless::<TimeFlavor>(s);
        }
    }

    #[test]
    fn enriched_flavors_keep_the_offset() {
        let raw = raw("2024-03-01T09:30:00+05:30");

        assert_eq!(ChronoFlavor::wrap(raw).unwrap().offset(), *raw.offset());
        assert_eq!(TimeFlavor::wrap(raw).unwrap().offset().whole_seconds(), 5 * 3600 + 30 * 60);
        assert_eq!(PlainFlavor::wrap(raw).unwrap(), raw.naive_utc());
    }

    #[test]
    fn stored_values_normalize_for_every_input_shape() {
        let naive = Utc::now().naive_utc();
        let date = NaiveDate::from_ymd_opt(2016, 12, 13).unwrap();

        let from_text = ChronoFlavor::from_stored(STORED).unwrap();
        assert_eq!(from_text.to_rfc3339(), STORED);
        assert_eq!(ChronoFlavor::from_stored(naive).unwrap().to_utc().naive_utc(), naive);
        assert_eq!(ChronoFlavor::from_stored(date).unwrap().to_rfc3339(), "2016-12-13T00:00:00+00:00");

        let from_text = TimeFlavor::from_stored(STORED).unwrap();
        assert_eq!(from_text.nanosecond(), 75_736_000);
        assert_eq!(TimeFlavor::from_stored(date).unwrap().unix_timestamp(), 1_481_587_200);
        assert!(TimeFlavor::from_stored("not a date").is_err());
    }

    #[test]
    fn to_stored_is_utc() {
        let value = ChronoFlavor::wrap(raw("2024-03-01T09:30:00+05:30")).unwrap();

        assert_eq!(ChronoFlavor::to_stored(&value).unwrap().to_string(), "2024-03-01 04:00:00");
    }

    #[test]
    fn zone_conversion_is_visible_in_rendering() {
        let zone: Zone = "America/New_York".parse().unwrap();

        let moment = ChronoFlavor::wrap(raw(STORED)).unwrap();
        let converted = ChronoFlavor::to_zone(&moment, &zone).unwrap();
        assert_eq!(converted, moment);
        assert_ne!(ChronoFlavor::render(&converted).unwrap(), ChronoFlavor::render(&moment).unwrap());

        let odt = TimeFlavor::wrap(raw(STORED)).unwrap();
        let converted = TimeFlavor::to_zone(&odt, &zone).unwrap();
        assert_eq!(converted, odt);
        assert_eq!(TimeFlavor::render(&converted).unwrap(), "2016-12-12T21:09:48.075736-05:00");
    }

    #[test]
    fn kind_selects_the_flavor() {
        assert_eq!("time".parse::<FlavorKind>().unwrap(), FlavorKind::Time);
        assert_eq!(FlavorKind::default().to_string(), "chrono");

        for kind in [FlavorKind::Plain, FlavorKind::Chrono, FlavorKind::Time] {
            let value = kind.from_stored(STORED).unwrap();

            assert_eq!(value.kind(), kind);
            assert_eq!(value.unwrap().unwrap(), raw(STORED));
        }

        assert!(!FlavorKind::Plain.is_enriched());
        assert!(matches!(FlavorKind::Time.now().unwrap(), AnyTimestamp::Time(_)));
    }
}
