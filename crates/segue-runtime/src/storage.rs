#![forbid(unsafe_code)]

//! Typed session-scoped storage.
//!
//! Session storage is the only channel that survives a full page load
//! within a browsing session. It carries the "seen" flag of the entrance
//! sequence, detail-header snapshots, and reverse-navigation signals.
//!
//! Everything stored here is a cache, never a source of truth:
//!
//! - **Missing key** reads as `None`.
//! - **Unavailable storage** reads as `None` and drops writes, with a `warn` log.
//! - **Corrupted value** reads as `None` with a `warn` log.
//!
//! Values are JSON, one schema per key via [`StorageKey`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use segue_core::content::ContentKind;
use segue_core::geometry::GeometrySnapshot;

use crate::error::StorageError;

/// Raw string key-value storage scoped to a browsing session.
pub trait SessionStorage {
    /// Read a raw value.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write a raw value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete a value. Deleting a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
    /// Delete everything (session end).
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory session storage.
///
/// Clones share the same underlying map, the way two views of one tab share
/// its session. A fresh `MemoryStorage::new()` is a new session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session that rejects writes beyond `bytes` total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota_bytes: Some(bytes),
            ..Self::default()
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the session holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes
            && self.used_bytes_without(key) + key.len() + value.len() > quota
        {
            return Err(StorageError::QuotaExceeded);
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

/// Storage that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl SessionStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Typed keys
// ---------------------------------------------------------------------------

/// A storage key with a fixed value schema.
pub trait StorageKey {
    /// Value stored under this key.
    type Value: Serialize + DeserializeOwned;

    /// Raw key string.
    fn name(&self) -> &'static str;
}

/// Set once the entrance sequence has played in this session.
#[derive(Debug, Clone, Copy)]
pub struct AnimationSeen;

impl StorageKey for AnimationSeen {
    type Value = bool;

    fn name(&self) -> &'static str {
        "animationSeen"
    }
}

/// Detail-header snapshots for one content kind, keyed by slug.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPositions(pub ContentKind);

impl StorageKey for HeaderPositions {
    type Value = BTreeMap<String, GeometrySnapshot>;

    fn name(&self) -> &'static str {
        self.0.header_position_key()
    }
}

/// A reverse (back) navigation is in flight across a page load.
#[derive(Debug, Clone, Copy)]
pub struct ReverseAnimationActive;

impl StorageKey for ReverseAnimationActive {
    type Value = bool;

    fn name(&self) -> &'static str {
        "reverse-animation-active"
    }
}

/// Slug of the item the reverse navigation is returning from.
#[derive(Debug, Clone, Copy)]
pub struct ReverseAnimationSlug;

impl StorageKey for ReverseAnimationSlug {
    type Value = String;

    fn name(&self) -> &'static str {
        "reverse-animation-slug"
    }
}

// ---------------------------------------------------------------------------
// Typed store
// ---------------------------------------------------------------------------

/// Typed, failure-tolerant wrapper over a [`SessionStorage`] backend.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    backend: S,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read and decode a value, surfacing errors.
    pub fn try_get<K: StorageKey>(&self, key: &K) -> Result<Option<K::Value>, StorageError> {
        let Some(raw) = self.backend.get_item(key.name())? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization {
                key: key.name().to_string(),
                message: e.to_string(),
            })
    }

    /// Encode and write a value, surfacing errors.
    pub fn try_set<K: StorageKey>(&mut self, key: &K, value: &K::Value) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
            key: key.name().to_string(),
            message: e.to_string(),
        })?;
        self.backend.set_item(key.name(), &raw)
    }

    /// Read a value; any failure is a miss.
    pub fn get<K: StorageKey>(&self, key: &K) -> Option<K::Value> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(target: "segue.storage", key = key.name(), error = %err, "storage read degraded to miss");
                None
            }
        }
    }

    /// Write a value; returns `false` if the write was dropped.
    pub fn set<K: StorageKey>(&mut self, key: &K, value: &K::Value) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "segue.storage", key = key.name(), error = %err, "storage write dropped");
                false
            }
        }
    }

    /// Delete a value; failures are logged and ignored.
    pub fn remove<K: StorageKey>(&mut self, key: &K) {
        if let Err(err) = self.backend.remove_item(key.name()) {
            tracing::warn!(target: "segue.storage", key = key.name(), error = %err, "storage remove failed");
        }
    }

    /// Whether a readable value exists under `key`.
    pub fn contains<K: StorageKey>(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Mutably borrow the backend.
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }
}
