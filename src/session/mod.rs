//! Vendor session caching.
//!
//! This module holds the resolved vendor identity for the lifetime of the
//! process, with an optional durable tier so a restart can pick up where the
//! last run left off.

mod storage;

pub use storage::{DurableStore, FileStore, MemoryStore, StoreError};

use log::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Durable storage key for the serialized session.
pub const SESSION_KEY: &str = "vendorSession";

/// The cached vendor identity. Also used as a merge patch, where `None`
/// fields leave the current value untouched.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl VendorSession {
    /// True when no field holds a non-empty string.
    ///
    pub fn is_empty(&self) -> bool {
        let blank = |field: &Option<String>| field.as_deref().map_or(true, str::is_empty);
        blank(&self.vendor_id) && blank(&self.email)
    }

    fn merged_with(mut self, patch: VendorSession) -> VendorSession {
        if patch.vendor_id.is_some() {
            self.vendor_id = patch.vendor_id;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        self
    }
}

/// Two-tier holder for the `VendorSession`: memory first, durable storage
/// second. None of its operations fail; storage errors are logged and read as
/// "no data".
///
pub struct SessionStore {
    memory: Mutex<VendorSession>,
    durable: Option<Box<dyn DurableStore>>,
}

impl SessionStore {
    pub fn new(durable: Option<Box<dyn DurableStore>>) -> Self {
        SessionStore {
            memory: Mutex::new(VendorSession::default()),
            durable,
        }
    }

    /// Memory-only store.
    ///
    pub fn in_memory() -> Self {
        SessionStore::new(None)
    }

    /// Returns the cached session, rehydrating from durable storage when the
    /// in-memory copy is empty.
    ///
    pub fn read(&self) -> VendorSession {
        let cached = self.memory_snapshot();
        if !cached.is_empty() {
            return cached;
        }
        match self.load_durable() {
            Some(stored) if !stored.is_empty() => {
                debug!("Rehydrated vendor session from durable storage");
                self.set_memory(stored.clone());
                stored
            }
            _ => VendorSession::default(),
        }
    }

    /// Shallow-merge the patch over the current session and return the result.
    ///
    pub fn merge(&self, patch: VendorSession) -> VendorSession {
        let merged = self.read().merged_with(patch);
        self.set_memory(merged.clone());
        if let Some(durable) = &self.durable {
            let result = serde_json::to_string(&merged)
                .map_err(|e| e.to_string())
                .and_then(|json| durable.save(SESSION_KEY, &json).map_err(|e| e.to_string()));
            if let Err(e) = result {
                warn!("Failed to persist vendor session: {}", e);
            }
        }
        merged
    }

    /// Forget the session in memory and in durable storage.
    ///
    pub fn clear(&self) {
        self.set_memory(VendorSession::default());
        if let Some(durable) = &self.durable {
            if let Err(e) = durable.remove(SESSION_KEY) {
                warn!("Failed to remove persisted vendor session: {}", e);
            }
        }
    }

    fn memory_snapshot(&self) -> VendorSession {
        match self.memory.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_memory(&self, session: VendorSession) {
        match self.memory.lock() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn load_durable(&self) -> Option<VendorSession> {
        let durable = self.durable.as_ref()?;
        let raw = match durable.load(SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read persisted vendor session: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unreadable persisted vendor session: {}", e);
                None
            }
        }
    }
}
