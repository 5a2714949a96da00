use serde::{Deserialize, Serialize};

/// Per-call options read by [`DateTimeField`](crate::DateTimeField).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldContext {
    /// Wrap loaded values into the flavor value. When `false`, loading returns the plain
    /// parsed date-time; used when the same value is deserialized twice in one request.
    pub convert_dates: bool,

    /// The timezone loaded values must be expressed in, unless the field names its own.
    pub timezone: Option<String>,
}

impl Default for FieldContext {
    fn default() -> Self {
        Self { convert_dates: true, timezone: None }
    }
}

impl FieldContext {
    /// A context that skips the enriched wrapping.
    pub fn without_conversion() -> Self {
        Self { convert_dates: false, ..Self::default() }
    }

    /// A context requiring values in `timezone`.
    pub fn with_timezone<T>(timezone: T) -> Self
    where
        String: From<T>,
    {
        Self { timezone: Some(From::from(timezone)), ..Self::default() }
    }
}
