//! Domain types for timestamp handling.
//!
//! This crate provides the date-time value flavors used across the workspace, the
//! enriched [`Moment`] value, zone parsing, normalization of values read back from
//! storage, and the stamping policies that keep `created`, `modified` and `archived`
//! timestamps of a record up to date.
//!
//! # Flavors
//!
//! A [`Flavor`](flavor::Flavor) is a conversion strategy between the raw
//! [`DateTime<FixedOffset>`](chrono::DateTime) and a value type:
//!
//! - [`PlainFlavor`](flavor::PlainFlavor) keeps a [`NaiveDateTime`](chrono::NaiveDateTime) in UTC
//! - [`ChronoFlavor`](flavor::ChronoFlavor) produces a [`Moment`]
//! - [`TimeFlavor`](flavor::TimeFlavor) produces a [`time::OffsetDateTime`]
//!
//! The flavor is chosen either statically through a type parameter or at run
//! time through [`FlavorKind`](flavor::FlavorKind).

pub mod flavor;
pub mod stamp;

mod error;
mod moment;
mod raw;
mod zone;

pub use self::{
    error::ConversionError,
    moment::Moment,
    raw::{RawTimestamp, format_iso8601, parse_iso8601},
    zone::Zone,
};
