//! Stamping policies for the `created`, `modified` and `archived` timestamps of a record.
//!
//! A record is composed from the policy it needs instead of inheriting columns:
//! [`CreatedStamps`] stamps `created` once, [`CreatedModifiedStamps`] adds `modified`,
//! and [`ArchivedStamps`] adds `archived`. A record exposes its policy through [`HasStamps`],
//! and the persistence layer calls [`Stamps::before_save`] right before it writes it.

use strum::Display;

use crate::flavor::Flavor;

/// Whether a save inserts a new record or updates a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SaveKind {
    /// The record has no persisted state yet.
    Insert,
    /// The record already exists in storage.
    Update,
}

/// A stamping policy invoked by the persistence layer before every save.
pub trait Stamps: Clone {
    /// The flavor of the timestamp values.
    type Flavor: Flavor;

    /// Updates the timestamps for a save of the given kind happening at `now`.
    fn before_save(&mut self, kind: SaveKind, now: &<Self::Flavor as Flavor>::Value);
}

/// A stamping policy that can mark a record archived.
pub trait Archivable: Stamps {
    /// Marks the record archived at `now`.
    fn archive(&mut self, now: &<Self::Flavor as Flavor>::Value);

    /// Clears the archival mark.
    fn unarchive(&mut self);

    /// Whether the record is currently archived.
    fn is_archived(&self) -> bool;
}

/// A record carrying a stamping policy next to its own fields.
///
/// Every policy is a record of its own, holding nothing but its timestamps.
pub trait HasStamps: Clone {
    /// The policy stamping this record.
    type Stamps: Stamps;

    /// The timestamps of the record.
    fn stamps(&self) -> &Self::Stamps;

    /// The timestamps of the record, for stamping.
    fn stamps_mut(&mut self) -> &mut Self::Stamps;
}

/// The flavor of the timestamps of record `R`.
pub type FlavorOf<R> = <<R as HasStamps>::Stamps as Stamps>::Flavor;

/// The timestamp value type of record `R`.
pub type ValueOf<R> = <FlavorOf<R> as Flavor>::Value;

macro_rules! stamps_are_records {
    ($($policy:ident),*) => {$(
        impl<F: Flavor> HasStamps for $policy<F> {
            type Stamps = Self;

            fn stamps(&self) -> &Self {
                self
            }

            fn stamps_mut(&mut self) -> &mut Self {
                self
            }
        }
    )*};
}

stamps_are_records!(CreatedStamps, CreatedModifiedStamps, ArchivedStamps);

/// Stamps `created` on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedStamps<F: Flavor> {
    created: Option<F::Value>,
}

/// Stamps `created` on insert and `modified` on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedModifiedStamps<F: Flavor> {
    created: CreatedStamps<F>,
    modified: Option<F::Value>,
}

/// Stamps like [`CreatedModifiedStamps`] and tracks explicit archival.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivedStamps<F: Flavor> {
    created_modified: CreatedModifiedStamps<F>,
    archived: Option<F::Value>,
}

impl<F: Flavor> CreatedStamps<F> {
    /// Stamps for a record that was never saved.
    pub fn new() -> Self {
        Self { created: None }
    }

    /// Stamps as read back from storage.
    pub fn restore(created: Option<F::Value>) -> Self {
        Self { created }
    }

    /// The instant of the first save.
    pub fn created(&self) -> Option<&F::Value> {
        self.created.as_ref()
    }
}

impl<F: Flavor> Stamps for CreatedStamps<F> {
    type Flavor = F;

    fn before_save(&mut self, kind: SaveKind, now: &F::Value) {
        if kind == SaveKind::Insert && self.created.is_none() {
            self.created = Some(now.clone());
        }
    }
}

impl<F: Flavor> CreatedModifiedStamps<F> {
    /// Stamps for a record that was never saved.
    pub fn new() -> Self {
        Self { created: CreatedStamps::new(), modified: None }
    }

    /// Stamps as read back from storage.
    pub fn restore(created: Option<F::Value>, modified: Option<F::Value>) -> Self {
        Self { created: CreatedStamps::restore(created), modified }
    }

    /// The instant of the first save.
    pub fn created(&self) -> Option<&F::Value> {
        self.created.created()
    }

    /// The instant of the last update, `None` until the record is saved a second time.
    pub fn modified(&self) -> Option<&F::Value> {
        self.modified.as_ref()
    }

    fn touch(&mut self, now: &F::Value) {
        self.modified = Some(now.clone());
    }
}

impl<F: Flavor> Stamps for CreatedModifiedStamps<F> {
    type Flavor = F;

    fn before_save(&mut self, kind: SaveKind, now: &F::Value) {
        self.created.before_save(kind, now);

        if kind == SaveKind::Update {
            self.touch(now);
        }
    }
}

impl<F: Flavor> ArchivedStamps<F> {
    /// Stamps for a record that was never saved.
    pub fn new() -> Self {
        Self { created_modified: CreatedModifiedStamps::new(), archived: None }
    }

    /// Stamps as read back from storage.
    pub fn restore(
        created: Option<F::Value>,
        modified: Option<F::Value>,
        archived: Option<F::Value>,
    ) -> Self {
        Self { created_modified: CreatedModifiedStamps::restore(created, modified), archived }
    }

    /// The instant of the first save.
    pub fn created(&self) -> Option<&F::Value> {
        self.created_modified.created()
    }

    /// The instant of the last update or archival.
    pub fn modified(&self) -> Option<&F::Value> {
        self.created_modified.modified()
    }

    /// The instant the record was archived, `None` while it is active.
    pub fn archived(&self) -> Option<&F::Value> {
        self.archived.as_ref()
    }
}

impl<F: Flavor> Stamps for ArchivedStamps<F> {
    type Flavor = F;

    fn before_save(&mut self, kind: SaveKind, now: &F::Value) {
        self.created_modified.before_save(kind, now);
    }
}

impl<F: Flavor> Archivable for ArchivedStamps<F> {
    /// Archival counts as the latest modification, so `modified` moves to the same instant.
    fn archive(&mut self, now: &F::Value) {
        self.archived = Some(now.clone());
        self.created_modified.touch(now);
    }

    fn unarchive(&mut self) {
        self.archived = None;
    }

    fn is_archived(&self) -> bool {
        self.archived.is_some()
    }
}
