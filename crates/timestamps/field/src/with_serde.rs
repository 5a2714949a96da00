//! `serde` adapters writing flavor values in the wire format of [`DateTimeField`].
//!
//! Values are dumped as ISO-8601 strings and loaded with the default
//! [`FieldContext`](crate::FieldContext): always converted, with no timezone check.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "with_serde::moment")]
//!     at: Moment,
//! }
//! ```
//!
//! [`DateTimeField`]: crate::DateTimeField

use serde::{Deserialize, Deserializer, Serializer, de, ser};
use timestamps_domain::{flavor::Flavor, format_iso8601, parse_iso8601};

fn serialize_flavored<F, S>(value: &F::Value, serializer: S) -> Result<S::Ok, S::Error>
where
    F: Flavor,
    S: Serializer,
{
    let raw = F::unwrap(value).map_err(ser::Error::custom)?;
    serializer.serialize_str(&format_iso8601(&raw))
}

fn deserialize_flavored<'de, F, D>(deserializer: D) -> Result<F::Value, D::Error>
where
    F: Flavor,
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)
        .map(|s| parse_iso8601(&s).and_then(F::wrap))?
        .map_err(de::Error::custom)
}

/// [`Moment`](timestamps_domain::Moment) values.
pub mod moment {
    use serde::{Deserializer, Serializer};
    use timestamps_domain::{Moment, flavor::ChronoFlavor};

    /// Writes the moment with its own offset.
    pub fn serialize<S>(moment: &Moment, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize_flavored::<ChronoFlavor, _>(moment, serializer)
    }

    /// Reads an ISO-8601 date-time, keeping its offset.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Moment, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::deserialize_flavored::<ChronoFlavor, _>(deserializer)
    }
}

/// Optional [`Moment`](timestamps_domain::Moment) values, written as `null` when absent.
pub mod option_moment {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use timestamps_domain::{Moment, parse_iso8601};

    /// Writes the moment, or `null`.
    pub fn serialize<S>(moment: &Option<Moment>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match moment {
            Some(moment) => super::moment::serialize(moment, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Reads an ISO-8601 date-time or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Moment>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_iso8601(&s).map(Moment::from))
            .transpose()
            .map_err(D::Error::custom)
    }
}

/// [`OffsetDateTime`](time::OffsetDateTime) values.
pub mod offset_date_time {
    use serde::{Deserializer, Serializer};
    use time::OffsetDateTime;
    use timestamps_domain::flavor::TimeFlavor;

    /// Writes the date-time with its own offset.
    pub fn serialize<S>(odt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize_flavored::<TimeFlavor, _>(odt, serializer)
    }

    /// Reads an ISO-8601 date-time, keeping its offset.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::deserialize_flavored::<TimeFlavor, _>(deserializer)
    }
}

/// Naive UTC date-times. Offsets of loaded values are folded into UTC.
pub mod plain {
    use chrono::NaiveDateTime;
    use serde::{Deserializer, Serializer};
    use timestamps_domain::flavor::PlainFlavor;

    /// Writes the date-time at `+00:00`.
    pub fn serialize<S>(naive: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize_flavored::<PlainFlavor, _>(naive, serializer)
    }

    /// Reads an ISO-8601 date-time as its UTC naive date-time.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::deserialize_flavored::<PlainFlavor, _>(deserializer)
    }
}
