use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use timestamps_domain::{
    flavor::Flavor,
    stamp::{Archivable, ArchivedStamps, CreatedModifiedStamps, CreatedStamps, HasStamps},
};

use crate::{
    entity::Entity,
    error::Result,
    persistence::{
        record::{
            insert::{NewArchivedRecord, NewCreatedModifiedRecord, NewCreatedRecord},
            select::{
                ArchivedRecord, ArchivedRecordDissolved, CreatedModifiedRecord,
                CreatedModifiedRecordDissolved, CreatedRecord, CreatedRecordDissolved,
            },
        },
        store::{self, StoreError},
    },
};

/// A stamped record with a table of its own.
///
/// Implemented for every policy of [`timestamps_domain::stamp`], for any flavor, each kept
/// in a table holding nothing but its timestamps. Records composed from a policy and
/// fields of their own implement it over their own table.
pub trait Persist: HasStamps {
    /// The table rows of this record live in.
    const TABLE: &'static str;

    /// Inserts a new row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-null column is not stamped, or if the insert fails.
    fn insert(conn: &mut SqliteConnection, record: &Self) -> Result<i32>;

    /// Writes the record over the row `id`, returning the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-null column is not stamped, or if the update fails.
    fn update(conn: &mut SqliteConnection, id: i32, record: &Self) -> Result<usize>;

    /// Reads the row `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be converted.
    fn fetch(conn: &mut SqliteConnection, id: i32) -> Result<Option<Entity<Self>>>;

    /// Reads the row with the lowest id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be converted.
    fn fetch_first(conn: &mut SqliteConnection) -> Result<Option<Entity<Self>>>;
}

/// A persisted record whose table can be filtered on its archival flag.
pub trait PersistArchived: Persist<Stamps: Archivable> {
    /// Reads the row with the lowest id among those whose flag equals `is_archived`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be converted.
    fn fetch_first_by_archived(
        conn: &mut SqliteConnection,
        is_archived: bool,
    ) -> Result<Option<Entity<Self>>>;

    /// Reads every row whose flag equals `is_archived`, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be converted.
    fn fetch_by_archived(conn: &mut SqliteConnection, is_archived: bool) -> Result<Vec<Entity<Self>>>;
}

impl<F: Flavor> Persist for CreatedStamps<F> {
    const TABLE: &'static str = "created_record";

    fn insert(conn: &mut SqliteConnection, stamps: &Self) -> Result<i32> {
        let new_record =
            NewCreatedRecord::builder().created(required::<F>(stamps.created(), "created")?).build();

        store::save_new_created(conn, new_record).map_err(From::from)
    }

    fn update(conn: &mut SqliteConnection, id: i32, stamps: &Self) -> Result<usize> {
        store::update_created(conn, id, required::<F>(stamps.created(), "created")?)
            .map_err(From::from)
    }

    fn fetch(conn: &mut SqliteConnection, id: i32) -> Result<Option<Entity<Self>>> {
        store::fetch_created_by_id(conn, id)?.map(make_created).transpose()
    }

    fn fetch_first(conn: &mut SqliteConnection) -> Result<Option<Entity<Self>>> {
        store::fetch_first_created(conn)?.map(make_created).transpose()
    }
}

impl<F: Flavor> Persist for CreatedModifiedStamps<F> {
    const TABLE: &'static str = "created_modified_record";

    fn insert(conn: &mut SqliteConnection, stamps: &Self) -> Result<i32> {
        let new_record = NewCreatedModifiedRecord::builder()
            .created(required::<F>(stamps.created(), "created")?)
            .maybe_modified(stored::<F>(stamps.modified())?)
            .build();

        store::save_new_created_modified(conn, new_record).map_err(From::from)
    }

    fn update(conn: &mut SqliteConnection, id: i32, stamps: &Self) -> Result<usize> {
        store::update_created_modified(
            conn,
            id,
            required::<F>(stamps.created(), "created")?,
            stored::<F>(stamps.modified())?,
        )
        .map_err(From::from)
    }

    fn fetch(conn: &mut SqliteConnection, id: i32) -> Result<Option<Entity<Self>>> {
        store::fetch_created_modified_by_id(conn, id)?.map(make_created_modified).transpose()
    }

    fn fetch_first(conn: &mut SqliteConnection) -> Result<Option<Entity<Self>>> {
        store::fetch_first_created_modified(conn)?.map(make_created_modified).transpose()
    }
}

impl<F: Flavor> Persist for ArchivedStamps<F> {
    const TABLE: &'static str = "archived_record";

    fn insert(conn: &mut SqliteConnection, stamps: &Self) -> Result<i32> {
        let new_record = NewArchivedRecord::builder()
            .created(required::<F>(stamps.created(), "created")?)
            .maybe_modified(stored::<F>(stamps.modified())?)
            .maybe_archived(stored::<F>(stamps.archived())?)
            .is_archived(stamps.is_archived())
            .build();

        store::save_new_archived(conn, new_record).map_err(From::from)
    }

    fn update(conn: &mut SqliteConnection, id: i32, stamps: &Self) -> Result<usize> {
        store::update_archived(
            conn,
            id,
            required::<F>(stamps.created(), "created")?,
            stored::<F>(stamps.modified())?,
            stored::<F>(stamps.archived())?,
        )
        .map_err(From::from)
    }

    fn fetch(conn: &mut SqliteConnection, id: i32) -> Result<Option<Entity<Self>>> {
        store::fetch_archived_by_id(conn, id)?.map(make_archived).transpose()
    }

    fn fetch_first(conn: &mut SqliteConnection) -> Result<Option<Entity<Self>>> {
        store::fetch_first_archived(conn)?.map(make_archived).transpose()
    }
}

impl<F: Flavor> PersistArchived for ArchivedStamps<F> {
    fn fetch_first_by_archived(
        conn: &mut SqliteConnection,
        is_archived: bool,
    ) -> Result<Option<Entity<Self>>> {
        store::fetch_first_archived_by_status(conn, is_archived)?.map(make_archived).transpose()
    }

    fn fetch_by_archived(conn: &mut SqliteConnection, is_archived: bool) -> Result<Vec<Entity<Self>>> {
        store::fetch_archived_by_status(conn, is_archived)?.into_iter().map(make_archived).collect()
    }
}

fn make_created<F: Flavor>(record: CreatedRecord) -> Result<Entity<CreatedStamps<F>>> {
    let CreatedRecordDissolved { id, created } = record.dissolve();

    Ok(Entity::from_row(id, CreatedStamps::restore(Some(F::from_stored(created)?))))
}

fn make_created_modified<F: Flavor>(
    record: CreatedModifiedRecord,
) -> Result<Entity<CreatedModifiedStamps<F>>> {
    let CreatedModifiedRecordDissolved { id, created, modified } = record.dissolve();

    let stamps =
        CreatedModifiedStamps::restore(Some(F::from_stored(created)?), restored::<F>(modified)?);

    Ok(Entity::from_row(id, stamps))
}

fn make_archived<F: Flavor>(
    record: ArchivedRecord,
) -> Result<Entity<ArchivedStamps<F>>> {
    let ArchivedRecordDissolved { id, created, modified, archived, is_archived } =
        record.dissolve();

    if is_archived != archived.is_some() {
        tracing::warn!(id, is_archived, "archived flag disagrees with archived timestamp");
    }

    let stamps = ArchivedStamps::restore(
        Some(F::from_stored(created)?),
        restored::<F>(modified)?,
        restored::<F>(archived)?,
    );

    Ok(Entity::from_row(id, stamps))
}

fn stored<F: Flavor>(value: Option<&F::Value>) -> Result<Option<NaiveDateTime>> {
    value.map(F::to_stored).transpose().map_err(From::from)
}

fn required<F: Flavor>(value: Option<&F::Value>, column: &'static str) -> Result<NaiveDateTime> {
    stored::<F>(value)?
        .ok_or_else(|| StoreError::other(format!("{column} is not stamped")).into())
}

fn restored<F: Flavor>(value: Option<NaiveDateTime>) -> Result<Option<F::Value>> {
    value.map(|value| F::from_stored(value)).transpose().map_err(From::from)
}
