//! Record store: the single concurrency primitive of the protocol.
//!
//! A [`RecordStore`] is a sharded map from a record's natural key to the
//! record. Every mutation runs under that key's exclusive entry guard, so
//! each record has at most one writer at a time. Two operations matter:
//!
//! - **create-if-absent** ([`RecordStore::create_with`]): the slot is
//!   claimed under its guard, so of any number of concurrent creators
//!   exactly one succeeds.
//! - **consume-once** ([`RecordStore::consume_if`]): removal under the
//!   guard, so of any number of concurrent consumers exactly one gets the
//!   record.
//!
//! Closures passed to these methods run while the guard is held. They may
//! take guards in *other* stores (following the engine's lock order) but
//! must never touch the same store again.

use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use skinvault_types::{RecordAddress, Result, SkinVaultError};
use tracing::debug;

pub struct RecordStore<K, V> {
    kind: &'static str,
    address_of: fn(&K) -> RecordAddress,
    records: DashMap<K, V>,
}

impl<K, V> RecordStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// An empty store for records of `kind`, addressed by `address_of`.
    #[must_use]
    pub fn new(kind: &'static str, address_of: fn(&K) -> RecordAddress) -> Self {
        Self {
            kind,
            address_of,
            records: DashMap::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Deterministic address of the record stored under `key`.
    #[must_use]
    pub fn address(&self, key: &K) -> RecordAddress {
        (self.address_of)(key)
    }

    /// Create the record at `key` if the slot is empty.
    ///
    /// `build` runs under the slot's guard and returns the record plus a
    /// result for the caller. Nothing is written unless it returns `Ok`.
    ///
    /// # Errors
    /// `on_occupied()` if a record already exists, otherwise whatever
    /// `build` returns.
    pub fn create_with<R>(
        &self,
        key: K,
        on_occupied: impl FnOnce() -> SkinVaultError,
        build: impl FnOnce() -> Result<(V, R)>,
    ) -> Result<R> {
        match self.records.entry(key) {
            Entry::Occupied(_) => Err(on_occupied()),
            Entry::Vacant(slot) => {
                let (record, out) = build()?;
                debug!(kind = self.kind, address = %(self.address_of)(slot.key()), "Record created");
                slot.insert(record);
                Ok(out)
            }
        }
    }

    /// Create `record` at `key` if the slot is empty.
    pub fn create(&self, key: K, record: V, on_occupied: impl FnOnce() -> SkinVaultError) -> Result<()> {
        self.create_with(key, on_occupied, || Ok((record, ())))
    }

    /// Mutate the record at `key` under its exclusive guard.
    ///
    /// `f` must finish validating before it writes: an `Err` after a
    /// partial write is not rolled back.
    ///
    /// # Errors
    /// `on_missing()` if there is no record, otherwise whatever `f` returns.
    pub fn update<R>(
        &self,
        key: &K,
        on_missing: impl FnOnce() -> SkinVaultError,
        f: impl FnOnce(&mut V) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.records.get_mut(key).ok_or_else(on_missing)?;
        f(guard.value_mut())
    }

    /// Create or replace the record at `key` under its guard.
    ///
    /// `f` sees the current record (if any) and returns the replacement.
    /// Returns a copy of what was stored.
    pub fn upsert(&self, key: K, f: impl FnOnce(Option<&V>) -> Result<V>) -> Result<V> {
        match self.records.entry(key) {
            Entry::Occupied(mut slot) => {
                let next = f(Some(slot.get()))?;
                slot.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(slot) => {
                let next = f(None)?;
                debug!(kind = self.kind, address = %(self.address_of)(slot.key()), "Record created");
                slot.insert(next.clone());
                Ok(next)
            }
        }
    }

    /// Remove and return the record at `key` if `predicate` accepts it.
    ///
    /// At most one caller ever receives a given record.
    pub fn consume_if(&self, key: &K, predicate: impl FnOnce(&V) -> bool) -> Option<V> {
        self.records
            .remove_if(key, |_, record| predicate(record))
            .map(|(_, record)| record)
    }

    /// A copy of the record at `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.records.get(key).map(|r| r.value().clone())
    }

    /// Read the record at `key` without copying it out.
    pub fn inspect<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.records.get(key).map(|r| f(r.value()))
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold over all records. Not a consistent snapshot under concurrent writes.
    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &V) -> A) -> A {
        self.records
            .iter()
            .fold(init, |acc, entry| f(acc, entry.value()))
    }
}
