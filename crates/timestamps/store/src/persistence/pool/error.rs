use diesel::r2d2;

/// Errors that can occur when establishing a connection pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool could not open its initial connections.
    #[error("build error: {0}")]
    Build(#[from] r2d2::PoolError),
}
