use std::collections::BTreeMap;

pub(crate) const INVALID_MESSAGE: &str = "Not a valid datetime.";

pub(crate) const NULL_MESSAGE: &str = "Field may not be null.";

pub(crate) const MISSING_MESSAGE: &str = "Missing data for required field.";

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {}", .messages.join(" "))]
pub struct ValidationError {
    field: String,
    messages: Vec<String>,
}

impl ValidationError {
    pub(crate) fn new<F, M>(field: F, message: M) -> Self
    where
        String: From<F> + From<M>,
    {
        Self { field: From::from(field), messages: vec![From::from(message)] }
    }

    pub(crate) fn invalid(field: &str) -> Self {
        Self::new(field, INVALID_MESSAGE)
    }

    pub(crate) fn timezone_mismatch(field: &str, timezone: &str) -> Self {
        Self::new(field, format!("The provided datetime is not in the {timezone} timezone."))
    }

    pub(crate) fn unknown_timezone(field: &str, timezone: &str) -> Self {
        Self::new(field, format!("Unknown timezone {timezone}."))
    }

    /// The name of the field that failed.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The messages explaining the failure.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Validation failures of several fields, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Records a field failure, merging messages of the same field.
    pub fn push(&mut self, err: ValidationError) {
        let ValidationError { field, messages } = err;
        self.0.entry(field).or_default().extend(messages);
    }

    /// Keeps the value of `result`, recording its error if it failed.
    pub fn collect<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        result.map_err(|err| self.push(err)).ok()
    }

    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `Ok(value)` when no failure was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any failure was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}
