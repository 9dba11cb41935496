//! Entity store abstraction and the in-memory implementation.
//!
//! The projector only ever needs `load` by id and `save`. Stores are
//! passed into every handler by the caller; nothing in the projector
//! holds on to one between events.

use std::collections::BTreeMap;

use crate::domain::{Entity, EntityId, EntityKind, EntityRecord};

/// Key-value store of projected entities.
///
/// Loads and saves are synchronous from the projector's point of view.
pub trait EntityStore {
    /// Loads the record of `kind` with the given id, if present.
    fn load_record(&self, kind: EntityKind, id: &EntityId) -> Option<EntityRecord>;

    /// Inserts or overwrites a record under its kind and id.
    fn save_record(&mut self, record: EntityRecord);

    /// Typed load.
    fn load<T: Entity>(&self, id: &EntityId) -> Option<T>
    where
        Self: Sized,
    {
        self.load_record(T::KIND, id).and_then(T::from_record)
    }

    /// Typed save.
    fn save<T: Entity>(&mut self, entity: T)
    where
        Self: Sized,
    {
        self.save_record(entity.into_record());
    }
}

/// Loads the entity with `id`, or builds a fresh one with `defaults`.
///
/// The created entity is not saved; callers mutate it and save it.
pub fn get_or_create<T, S, F>(store: &S, id: &EntityId, defaults: F) -> T
where
    T: Entity,
    S: EntityStore,
    F: FnOnce(EntityId) -> T,
{
    store
        .load::<T>(id)
        .unwrap_or_else(|| defaults(id.clone()))
}

/// Ordered in-memory store.
///
/// Backed by a `BTreeMap` so iteration order, and therefore equality and
/// snapshots, depend only on the stored ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    records: BTreeMap<(EntityKind, EntityId), EntityRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no record has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.records.keys().filter(|(k, _)| *k == kind).count()
    }

    /// Iterates all records ordered by kind, then id.
    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }
}

impl EntityStore for MemoryStore {
    fn load_record(&self, kind: EntityKind, id: &EntityId) -> Option<EntityRecord> {
        self.records.get(&(kind, id.clone())).cloned()
    }

    fn save_record(&mut self, record: EntityRecord) {
        self.records
            .insert((record.kind(), record.id().clone()), record);
    }
}

/// Store wrapper that remembers every record saved through it.
///
/// Used by the service to turn one projected event into the list of
/// entity changes it caused.
#[derive(Debug)]
pub struct RecordingStore<'a, S> {
    inner: &'a mut S,
    saved: Vec<EntityRecord>,
}

impl<'a, S: EntityStore> RecordingStore<'a, S> {
    /// Wraps `inner`.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            saved: Vec::new(),
        }
    }

    /// Consumes the wrapper, returning the saved records in save order.
    #[must_use]
    pub fn into_saved(self) -> Vec<EntityRecord> {
        self.saved
    }
}

impl<S: EntityStore> EntityStore for RecordingStore<'_, S> {
    fn load_record(&self, kind: EntityKind, id: &EntityId) -> Option<EntityRecord> {
        self.inner.load_record(kind, id)
    }

    fn save_record(&mut self, record: EntityRecord) {
        self.saved.push(record.clone());
        self.inner.save_record(record);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::entity::{Drop, Restaurant};

    fn rid(n: u128) -> EntityId {
        EntityId::from_numeric(n)
    }

    #[test]
    fn save_then_load_by_kind() {
        let mut store = MemoryStore::new();
        store.save(Restaurant::shell(rid(1)));

        assert!(store.load::<Restaurant>(&rid(1)).is_some());
        // same id, other kind
        assert!(store.load::<Drop>(&rid(1)).is_none());
        assert_eq!(store.count(EntityKind::Restaurant), 1);
        assert_eq!(store.count(EntityKind::Drop), 0);
    }

    #[test]
    fn save_overwrites_same_key() {
        let mut store = MemoryStore::new();
        store.save(Restaurant::shell(rid(1)));
        let mut updated = Restaurant::shell(rid(1));
        updated.is_active = true;
        store.save(updated);

        assert_eq!(store.len(), 1);
        let Some(loaded) = store.load::<Restaurant>(&rid(1)) else {
            panic!("restaurant should exist");
        };
        assert!(loaded.is_active);
    }

    #[test]
    fn get_or_create_prefers_stored_record() {
        let mut store = MemoryStore::new();
        let created: Drop = get_or_create(&store, &rid(5), Drop::shell);
        assert_eq!(created.id, rid(5));
        // not persisted until saved
        assert!(store.is_empty());

        let mut stored = Drop::shell(rid(5));
        stored.is_active = true;
        store.save(stored);
        let loaded: Drop = get_or_create(&store, &rid(5), Drop::shell);
        assert!(loaded.is_active);
    }

    #[test]
    fn recording_store_collects_saves() {
        let mut store = MemoryStore::new();
        let mut recording = RecordingStore::new(&mut store);
        recording.save(Restaurant::shell(rid(1)));
        recording.save(Drop::shell(rid(2)));
        let saved = recording.into_saved();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved.first().map(EntityRecord::kind), Some(EntityKind::Restaurant));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn records_iterate_in_key_order() {
        let mut store = MemoryStore::new();
        store.save(Drop::shell(rid(2)));
        store.save(Restaurant::shell(rid(9)));
        store.save(Restaurant::shell(rid(3)));
        let ids: Vec<&str> = store.records().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["03", "09", "02"]);
    }
}
