use std::borrow::Cow;

pub type Result<T, E = ConversionError> = core::result::Result<T, E>;

/// Errors that can occur when converting between date-time representations.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The input could not be parsed as an ISO-8601 date-time or date.
    #[error("parse error: {0}")]
    Parse(#[from] chrono::ParseError),

    /// The zone name is neither a known IANA zone nor a fixed offset.
    #[error("unknown timezone: {0}")]
    UnknownZone(Cow<'static, str>),

    /// The value does not fit in the range of the target representation.
    #[error("out of range error: {0}")]
    OutOfRange(Cow<'static, str>),

    /// The value could not be rendered.
    #[error("format error: {0}")]
    Format(Cow<'static, str>),
}

impl ConversionError {
    pub(crate) fn out_of_range<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::OutOfRange(From::from(err))
    }
}

impl From<time::error::ComponentRange> for ConversionError {
    fn from(err: time::error::ComponentRange) -> Self {
        ConversionError::OutOfRange(err.to_string().into())
    }
}

impl From<time::error::Format> for ConversionError {
    fn from(err: time::error::Format) -> Self {
        ConversionError::Format(err.to_string().into())
    }
}
