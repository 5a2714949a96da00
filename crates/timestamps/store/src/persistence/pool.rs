mod error;

pub use self::error::PoolError;

use core::num::NonZeroU32;

use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};

/// A pool of SQLite connections.
///
/// Connections are checked out for the duration of a single store operation and
/// returned to the pool when dropped.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A connection checked out of a [`DbPool`].
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Establishes a connection pool to the SQLite database at `url`.
///
/// Every connection of an in-memory database (`:memory:`) is a separate database, so
/// such pools should be built with a `max_size` of one.
///
/// # Errors
///
/// Returns an error if the pool cannot open its initial connections.
#[tracing::instrument(skip(url))]
pub fn establish_pool<U>(url: U, max_size: NonZeroU32) -> Result<DbPool, PoolError>
where
    String: From<U>,
{
    let manager = ConnectionManager::<SqliteConnection>::new(url);

    Pool::builder().max_size(max_size.get()).build(manager).map_err(From::from)
}
