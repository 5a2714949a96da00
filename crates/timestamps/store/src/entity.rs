use timestamps_domain::stamp::HasStamps;

/// A record together with the id of its row once persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity<R> {
    id: Option<i32>,
    record: R,
}

impl<R> Entity<R> {
    /// An entity that was never saved.
    pub fn new(record: R) -> Self {
        Self { id: None, record }
    }

    /// An entity read back from the row `id`.
    pub fn from_row(id: i32, record: R) -> Self {
        Self { id: Some(id), record }
    }

    /// The row id, `None` until the first save.
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// The record as last saved or read.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// The record, for changes to be written by the next save.
    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    /// Consumes the entity, returning the record.
    pub fn into_record(self) -> R {
        self.record
    }

    /// Whether the entity has a row.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn commit(&mut self, id: i32, record: R) {
        self.id = Some(id);
        self.record = record;
    }
}

impl<R: HasStamps> Entity<R> {
    /// The timestamps of the record.
    pub fn stamps(&self) -> &R::Stamps {
        self.record.stamps()
    }
}
