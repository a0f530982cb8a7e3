//! In-memory EventStore implementation.
//!
//! This module provides a thread-safe in-memory implementation of the
//! [`EventStore`] trait suitable for unit tests, development scenarios, and
//! embedded use. The durable PostgreSQL implementation lives in pulse-api.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use pulse_core::{
    Attributes, EventId, EventRecord, IngestOutcome, StoreError, TenantId, TimeWindow, Timestamp,
};

use crate::{validate_event_identity, validate_series_identity, EventStore};

/// Primary key of the record map - the idempotency key.
type DedupKey = (TenantId, EventId);

/// Key of the secondary index: one ordered series per tenant and event name.
type SeriesKey = (TenantId, String);

#[derive(Default)]
struct Inner {
    /// Authoritative records, keyed by `(tenant_id, event_id)`.
    records: HashMap<DedupKey, EventRecord>,
    /// Ordered occurrence counts per `(tenant_id, event_name)`. Mirrors the
    /// `(tenant_id, event_name, occurred_at)` index the durable store keeps
    /// for efficient window scans.
    series: HashMap<SeriesKey, BTreeMap<Timestamp, i64>>,
}

/// In-memory EventStore implementation.
///
/// Records live in maps protected by a single `RwLock`; holding the write
/// lock across the vacancy check and the insert makes insert-if-absent
/// atomic, the in-memory analogue of the durable store's uniqueness
/// constraint. Both maps are updated under the same guard, so a count never
/// observes a record that is present in one map and absent from the other.
///
/// # Example
///
/// ```rust,ignore
/// use pulse_store::{EventStore, InMemoryEventStore};
///
/// let store = InMemoryEventStore::new();
/// let outcome = store.ingest("tenant1", "e1", "login", now, None).await?;
/// ```
pub struct InMemoryEventStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryEventStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Get the number of stored records across all tenants.
    pub fn len(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.is_empty())
    }

    /// Fetch a stored record by its idempotency key.
    pub fn get(&self, tenant_id: &str, event_id: &str) -> Result<Option<EventRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let key = (tenant_id.to_string(), event_id.to_string());
        Ok(inner.records.get(&key).cloned())
    }

    /// Clear all records and indexes.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        inner.records.clear();
        inner.series.clear();
        Ok(())
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryEventStore {
    /// Clones share the underlying storage.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn ingest(
        &self,
        tenant_id: &str,
        event_id: &str,
        event_name: &str,
        occurred_at: Timestamp,
        attributes: Option<Attributes>,
    ) -> Result<IngestOutcome, StoreError> {
        validate_event_identity(tenant_id, event_id, event_name)?;

        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let key = (tenant_id.to_string(), event_id.to_string());

        match inner.records.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => {
                // The stored record wins: the new payload is not compared
                // or merged, even when it differs.
                return Ok(IngestOutcome::Duplicate);
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(EventRecord {
                    tenant_id: tenant_id.to_string(),
                    event_id: event_id.to_string(),
                    event_name: event_name.to_string(),
                    occurred_at,
                    attributes: attributes.unwrap_or_default(),
                    ingested_at: Utc::now(),
                });
            }
        }

        let series_key = (tenant_id.to_string(), event_name.to_string());
        *inner
            .series
            .entry(series_key)
            .or_default()
            .entry(occurred_at)
            .or_insert(0) += 1;

        Ok(IngestOutcome::Created)
    }

    async fn count(
        &self,
        tenant_id: &str,
        event_name: &str,
        window: TimeWindow,
    ) -> Result<i64, StoreError> {
        validate_series_identity(tenant_id, event_name)?;

        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let key = (tenant_id.to_string(), event_name.to_string());

        // BTreeMap range over `from..to` is exactly the half-open window.
        let count = inner
            .series
            .get(&key)
            .map(|by_time| by_time.range(window.from..window.to).map(|(_, n)| n).sum())
            .unwrap_or(0);

        Ok(count)
    }
}
