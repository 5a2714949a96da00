//! A date-time field that reads wire-format strings into enriched date-time values.
//!
//! [`DateTimeField`] dumps values exactly like a plain date-time field would, so its
//! output is indistinguishable from one, and loads strings into a flavor value such as a
//! [`Moment`](timestamps_domain::Moment). Loading can enforce that the input is expressed
//! in a given timezone, and can be told through [`FieldContext`] to skip the enriched
//! wrapping altogether.
//!
//! # Usage
//!
//! ```ignore
//! let field = DateTimeField::<ChronoFlavor>::new(
//!     FieldOptions::builder().timezone(TimezoneOption::Fixed("UTC".into())).build(),
//! );
//!
//! let value = field.deserialize(&json!("2016-12-13T02:09:48+00:00"), "created", &ctx)?;
//! let dumped = field.serialize(Some(&value))?;
//! ```
//!
//! For types that derive `serde` traits, the [`with_serde`] modules apply the same wire
//! format with the default context.

mod context;
mod error;
mod field;
pub mod with_serde;

pub use self::{
    context::FieldContext,
    error::{ValidationError, ValidationErrors},
    field::{DateTimeField, FieldMetadata, FieldOptions, FieldValue, TimezoneOption},
};
