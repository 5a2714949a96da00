use std::borrow::Cow;

use timestamps_domain::ConversionError;

use crate::persistence::store::StoreError;

pub type Result<T, E = TimestampStoreError> = core::result::Result<T, E>;

/// Errors that can occur when interacting with the store
#[derive(Debug, thiserror::Error)]
pub enum TimestampStoreError {
    /// A database-level error occurred.
    ///
    /// This wraps errors from the underlying persistence layer, including
    /// query failures, constraint violations and failed transactions.
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    /// The requested record was not found in the database.
    ///
    /// This is returned for unknown ids, for updates of rows that no longer
    /// exist, and for filtered queries matching no row.
    #[error("not found error: {0}")]
    NotFound(Cow<'static, str>),

    /// A timestamp could not be converted between its flavor and the stored form.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Failed to acquire a database connection from the pool.
    #[error("pool error")]
    Pool,
}

impl From<diesel::result::Error> for TimestampStoreError {
    fn from(err: diesel::result::Error) -> Self {
        TimestampStoreError::Store(StoreError::Db(err))
    }
}
