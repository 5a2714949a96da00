mod error;

pub use self::error::StoreError;

use chrono::NaiveDateTime;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection, result::OptionalExtension};

use super::{
    record::{
        insert::{NewArchivedRecord, NewCreatedModifiedRecord, NewCreatedRecord},
        select::{ArchivedRecord, CreatedModifiedRecord, CreatedRecord},
    },
    schema,
};

use self::error::Result;

pub fn save_new_created(conn: &mut SqliteConnection, record: NewCreatedRecord) -> Result<i32> {
    diesel::insert_into(schema::created_record::table)
        .values(record)
        .returning(schema::created_record::id)
        .get_result(conn)
        .map_err(From::from)
}

pub fn update_created(
    conn: &mut SqliteConnection,
    id: i32,
    created: NaiveDateTime,
) -> Result<usize> {
    diesel::update(schema::created_record::table.find(id))
        .set(schema::created_record::created.eq(created))
        .execute(conn)
        .map_err(From::from)
}

pub fn fetch_created_by_id(conn: &mut SqliteConnection, id: i32) -> Result<Option<CreatedRecord>> {
    schema::created_record::table
        .find(id)
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn fetch_first_created(conn: &mut SqliteConnection) -> Result<Option<CreatedRecord>> {
    schema::created_record::table
        .order_by(schema::created_record::id.asc())
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn save_new_created_modified(
    conn: &mut SqliteConnection,
    record: NewCreatedModifiedRecord,
) -> Result<i32> {
    diesel::insert_into(schema::created_modified_record::table)
        .values(record)
        .returning(schema::created_modified_record::id)
        .get_result(conn)
        .map_err(From::from)
}

pub fn update_created_modified(
    conn: &mut SqliteConnection,
    id: i32,
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
) -> Result<usize> {
    diesel::update(schema::created_modified_record::table.find(id))
        .set((
            schema::created_modified_record::created.eq(created),
            schema::created_modified_record::modified.eq(modified),
        ))
        .execute(conn)
        .map_err(From::from)
}

pub fn fetch_created_modified_by_id(
    conn: &mut SqliteConnection,
    id: i32,
) -> Result<Option<CreatedModifiedRecord>> {
    schema::created_modified_record::table
        .find(id)
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn fetch_first_created_modified(
    conn: &mut SqliteConnection,
) -> Result<Option<CreatedModifiedRecord>> {
    schema::created_modified_record::table
        .order_by(schema::created_modified_record::id.asc())
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn save_new_archived(conn: &mut SqliteConnection, record: NewArchivedRecord) -> Result<i32> {
    diesel::insert_into(schema::archived_record::table)
        .values(record)
        .returning(schema::archived_record::id)
        .get_result(conn)
        .map_err(From::from)
}

pub fn update_archived(
    conn: &mut SqliteConnection,
    id: i32,
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
    archived: Option<NaiveDateTime>,
) -> Result<usize> {
    diesel::update(schema::archived_record::table.find(id))
        .set((
            schema::archived_record::created.eq(created),
            schema::archived_record::modified.eq(modified),
            schema::archived_record::archived.eq(archived),
            schema::archived_record::is_archived.eq(archived.is_some()),
        ))
        .execute(conn)
        .map_err(From::from)
}

pub fn fetch_archived_by_id(
    conn: &mut SqliteConnection,
    id: i32,
) -> Result<Option<ArchivedRecord>> {
    schema::archived_record::table
        .find(id)
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn fetch_first_archived(conn: &mut SqliteConnection) -> Result<Option<ArchivedRecord>> {
    schema::archived_record::table
        .order_by(schema::archived_record::id.asc())
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn fetch_first_archived_by_status(
    conn: &mut SqliteConnection,
    is_archived: bool,
) -> Result<Option<ArchivedRecord>> {
    schema::archived_record::table
        .filter(schema::archived_record::is_archived.eq(is_archived))
        .order_by(schema::archived_record::id.asc())
        .first(conn)
        .optional()
        .map_err(From::from)
}

pub fn fetch_archived_by_status(
    conn: &mut SqliteConnection,
    is_archived: bool,
) -> Result<Vec<ArchivedRecord>> {
    schema::archived_record::table
        .filter(schema::archived_record::is_archived.eq(is_archived))
        .order_by(schema::archived_record::id.asc())
        .load(conn)
        .map_err(From::from)
}
