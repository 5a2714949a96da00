//! Persistence layer for records carrying stamped timestamps.
//!
//! Each stamping policy of [`timestamps_domain::stamp`] has a table of its own, in which
//! timestamps are kept as UTC `TIMESTAMP` columns whatever the flavor used to stamp
//! them. Values read back are converted into the requested flavor. Records composing a
//! policy with fields of their own implement [`Persist`] over their own table and go
//! through the same stamping.
//!
//! # Main Components
//!
//! - [`TimestampStore`] - The primary interface for database operations
//! - [`Entity`] - A row id together with the record
//! - [`Persist`] - Maps a stamped record onto its table
//! - [`PersistArchived`] - Filters a table on its archival flag
//! - [`DbPool`] - Connection pool type for managing database connections
//!
//! # Usage
//!
//! ```ignore
//! let pool = establish_pool("timestamps.sqlite3", max_connections)?;
//! let store = TimestampStore::new(pool);
//! store.migrate()?;
//!
//! let mut entity = Entity::new(ArchivedStamps::<ChronoFlavor>::new());
//! store.save(&mut entity)?;
//! store.archive_instance(&mut entity)?;
//!
//! let archived = store.list_archived::<ArchivedStamps<ChronoFlavor>>(true)?;
//! ```

mod entity;
mod error;
mod persist;
mod persistence;

pub use self::{
    entity::Entity,
    error::TimestampStoreError,
    persist::{Persist, PersistArchived},
    persistence::pool::{DbConn, DbPool, PoolError, establish_pool},
};

use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use timestamps_domain::{
    flavor::Flavor,
    stamp::{Archivable, FlavorOf, SaveKind, Stamps, ValueOf},
};

use self::{error::Result, persistence::store::StoreError};

/// The migrations creating the tables of every stamping policy.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs the migrations that were not applied to the database yet.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|versions| tracing::info!(applied = versions.len(), "ran pending migrations"))
        .map_err(|err| StoreError::other(err.to_string()).into())
}

/// The main store interface for timestamped records.
///
/// Every write stamps a copy of the record, persists the copy inside a transaction, and
/// only then replaces the in-memory record; a failed write leaves the entity untouched.
pub struct TimestampStore {
    pool: DbPool,
}

impl TimestampStore {
    /// Creates a new `TimestampStore` instance with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        TimestampStore { pool }
    }

    /// Runs the pending migrations on a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or a migration fails.
    pub fn migrate(&self) -> Result<()> {
        run_migrations(&mut *self.get_conn()?)
    }
}

impl TimestampStore {
    /// Saves the entity, stamping it at the current instant.
    ///
    /// The first save inserts the row, later ones update it.
    ///
    /// # Errors
    ///
    /// Returns an error if the current instant cannot be represented, if the row of a
    /// persisted entity no longer exists, or if the write fails.
    pub fn save<R: Persist>(&self, entity: &mut Entity<R>) -> Result<()> {
        self.save_at(entity, &<FlavorOf<R> as Flavor>::now()?)
    }

    /// Saves the entity, stamping it at `now`.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn save_at<R: Persist>(&self, entity: &mut Entity<R>, now: &ValueOf<R>) -> Result<()> {
        self.persist_staged(entity, now, |_| ())
    }

    /// Archives the entity at the current instant and saves it.
    ///
    /// Archival sets `archived` and `modified` to the same instant.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn archive_instance<R>(&self, entity: &mut Entity<R>) -> Result<()>
    where
        R: Persist<Stamps: Archivable>,
    {
        self.archive_instance_at(entity, &<FlavorOf<R> as Flavor>::now()?)
    }

    /// Archives the entity at `now` and saves it.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn archive_instance_at<R>(&self, entity: &mut Entity<R>, now: &ValueOf<R>) -> Result<()>
    where
        R: Persist<Stamps: Archivable>,
    {
        self.persist_staged(entity, now, |stamps| stamps.archive(now))
    }

    /// Clears the archival of the entity and saves it at the current instant.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn unarchive_instance<R>(&self, entity: &mut Entity<R>) -> Result<()>
    where
        R: Persist<Stamps: Archivable>,
    {
        self.unarchive_instance_at(entity, &<FlavorOf<R> as Flavor>::now()?)
    }

    /// Clears the archival of the entity and saves it at `now`.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn unarchive_instance_at<R>(&self, entity: &mut Entity<R>, now: &ValueOf<R>) -> Result<()>
    where
        R: Persist<Stamps: Archivable>,
    {
        self.persist_staged(entity, now, |stamps| stamps.unarchive())
    }

    /// Returns the entity with the lowest id.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampStoreError::NotFound`] if the table is empty, or an error if the
    /// query or the conversion into the flavor of `R` fails.
    #[tracing::instrument(skip_all, fields(table = R::TABLE))]
    pub fn first<R: Persist>(&self) -> Result<Entity<R>> {
        R::fetch_first(&mut *self.get_conn()?)?
            .ok_or_else(|| TimestampStoreError::NotFound(R::TABLE.into()))
    }

    /// Returns the entity with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampStoreError::NotFound`] if there is no such row, or an error if
    /// the query or the conversion into the flavor of `R` fails.
    #[tracing::instrument(skip_all, fields(table = R::TABLE, id = id))]
    pub fn get<R: Persist>(&self, id: i32) -> Result<Entity<R>> {
        R::fetch(&mut *self.get_conn()?, id)?
            .ok_or_else(|| TimestampStoreError::NotFound(format!("{} id {id}", R::TABLE).into()))
    }

    /// Returns the first entity whose `is_archived` flag equals `is_archived`.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampStoreError::NotFound`] if no row matches, or an error if the
    /// query or the conversion into the flavor of `R` fails.
    #[tracing::instrument(skip(self), fields(table = R::TABLE))]
    pub fn get_archived<R: PersistArchived>(&self, is_archived: bool) -> Result<Entity<R>> {
        R::fetch_first_by_archived(&mut *self.get_conn()?, is_archived)?.ok_or_else(|| {
            TimestampStoreError::NotFound(format!("{} is_archived={is_archived}", R::TABLE).into())
        })
    }

    /// Returns every entity whose `is_archived` flag equals `is_archived`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or the conversion into the flavor of `R` fails.
    #[tracing::instrument(skip(self), fields(table = R::TABLE))]
    pub fn list_archived<R: PersistArchived>(&self, is_archived: bool) -> Result<Vec<Entity<R>>> {
        R::fetch_by_archived(&mut *self.get_conn()?, is_archived)
    }

    #[tracing::instrument(skip_all, fields(table = R::TABLE, id = entity.id(), kind = tracing::field::Empty))]
    fn persist_staged<R, G>(&self, entity: &mut Entity<R>, now: &ValueOf<R>, stage: G) -> Result<()>
    where
        R: Persist,
        G: FnOnce(&mut R::Stamps),
    {
        let id = entity.id();
        let kind = if id.is_some() { SaveKind::Update } else { SaveKind::Insert };
        tracing::Span::current().record("kind", tracing::field::display(kind));

        let mut staged = entity.record().clone();
        stage(staged.stamps_mut());
        staged.stamps_mut().before_save(kind, now);

        let mut pooled = self.get_conn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let id = conn.transaction(|conn| match id {
            Some(id) => match R::update(conn, id, &staged)? {
                0 => Err(TimestampStoreError::NotFound(format!("{} id {id}", R::TABLE).into())),
                _ => Ok(id),
            },
            None => R::insert(conn, &staged),
        })?;

        tracing::debug!(id, "saved");
        entity.commit(id, staged);

        Ok(())
    }

    fn get_conn(&self) -> Result<DbConn> {
        self.pool.get().map_err(|err| {
            tracing::warn!(%err, "failed to check out a connection");
            TimestampStoreError::Pool
        })
    }
}
