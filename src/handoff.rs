//! Staged Handoff Channel - Session-Scoped Record Relay
//!
//! Carries one `SubmissionRecord` from the intake stage to the review stage.
//! The backing store is injected so tests can swap in an in-memory map.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::hashing::submission_digest;
use crate::submission::SubmissionRecord;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Process-local string key-value storage that lives for one client session.
pub trait SessionStore {
    fn session_id(&self) -> Uuid;
    fn set_item(&mut self, key: &str, value: String);
    fn get_item(&self, key: &str) -> Option<String>;
    fn clear(&mut self);
}

#[derive(Debug)]
pub struct MemorySessionStore {
    id: Uuid,
    items: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            items: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn session_id(&self) -> Uuid {
        self.id
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

pub struct HandoffChannel<S: SessionStore = MemorySessionStore> {
    store: S,
}

impl<S: SessionStore> HandoffChannel<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serialize and store `record` under `key`, replacing any prior value.
    pub fn put(&mut self, key: &str, record: &SubmissionRecord) -> Result<(), HandoffError> {
        let raw = serde_json::to_string(record)?;
        let digest = submission_digest(record)?;
        self.store.set_item(key, raw);
        info!(session = %self.store.session_id(), key, %digest, "submission handed off");
        Ok(())
    }

    /// Read back the record under `key`. Absent and corrupt both yield `None`.
    ///
    /// Reading does not consume the value.
    pub fn get(&self, key: &str) -> Option<SubmissionRecord> {
        let session = self.store.session_id();
        let Some(raw) = self.store.get_item(key) else {
            info!(%session, key, "no payload in handoff channel");
            return None;
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%session, key, error = %e, "discarding malformed handoff payload");
                None
            }
        }
    }

    /// Session teardown: drop everything the channel holds.
    pub fn end_session(&mut self) {
        debug!(session = %self.store.session_id(), "handoff session ended");
        self.store.clear();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl Default for HandoffChannel<MemorySessionStore> {
    fn default() -> Self {
        Self::new(MemorySessionStore::new())
    }
}
