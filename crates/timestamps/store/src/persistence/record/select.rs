use chrono::NaiveDateTime;
use diesel::prelude::Queryable;
use dissolve_derive::Dissolve;

#[derive(Debug, Dissolve, Queryable)]
pub struct CreatedRecord {
    id: i32,
    created: NaiveDateTime,
}

#[derive(Debug, Dissolve, Queryable)]
pub struct CreatedModifiedRecord {
    id: i32,
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
}

#[derive(Debug, Dissolve, Queryable)]
pub struct ArchivedRecord {
    id: i32,
    created: NaiveDateTime,
    modified: Option<NaiveDateTime>,
    archived: Option<NaiveDateTime>,
    is_archived: bool,
}
