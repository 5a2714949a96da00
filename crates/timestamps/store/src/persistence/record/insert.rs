use bon::Builder;
use chrono::NaiveDateTime;
use diesel::prelude::Insertable;

use crate::persistence::schema;

#[derive(Debug, Builder, Insertable)]
#[diesel(table_name = schema::created_record)]
pub struct NewCreatedRecord {
    created: NaiveDateTime,
}

#[derive(Debug, Builder, Insertable)]
#[diesel(table_name = schema::created_modified_record)]
pub struct NewCreatedModifiedRecord {
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
}

#[derive(Debug, Builder, Insertable)]
#[diesel(table_name = schema::archived_record)]
pub struct NewArchivedRecord {
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
    archived: Option<NaiveDateTime>,
    is_archived: bool,
}
