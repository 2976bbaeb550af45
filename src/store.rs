//! Local key-value store and typed preferences.
//!
//! DESIGN
//! ======
//! Preferences live in a flat key-value store of JSON values. `MemoryStore`
//! backs tests and ephemeral runs; `JsonFileStore` keeps one JSON object on
//! disk and writes through on every mutation (temp file + rename).
//! Durability is best-effort: a missing file is an empty store.
//!
//! `Preferences` is the only code that knows the key names and value types.
//! It also serves as the entitlement provider, reading `hasPaid`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::entitlement::{Entitlement, is_valid_promo_code};

/// Key contract of the local store.
pub mod keys {
    pub const HAS_PAID: &str = "hasPaid";
    pub const USER_NAME: &str = "userName";
    pub const TRANSITION_SOUND_ENABLED: &str = "transitionSoundEnabled";
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store file must contain a JSON object")]
    NotAnObject,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the removal could not be persisted.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the cleared store could not be persisted.
    fn clear(&mut self) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        Ok(())
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(map) => map.into_iter().collect(),
                _ => return Err(StoreError::NotAnObject),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "opened store");
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        self.flush()
    }
}

// =============================================================================
// PREFERENCES
// =============================================================================

/// Typed view over the store's key contract.
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KvStore> Preferences<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Missing or non-boolean values read as `false`.
    #[must_use]
    pub fn has_paid(&self) -> bool {
        match self.store.get(keys::HAS_PAID) {
            None => false,
            Some(Value::Bool(paid)) => paid,
            Some(other) => {
                debug!(key = keys::HAS_PAID, value = %other, "ignoring non-boolean entitlement");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the store could not persist the value.
    pub fn set_has_paid(&mut self, paid: bool) -> Result<(), StoreError> {
        self.store.set(keys::HAS_PAID, Value::Bool(paid))
    }

    #[must_use]
    pub fn user_name(&self) -> String {
        self.store
            .get(keys::USER_NAME)
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the store could not persist the value.
    pub fn set_user_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.set(keys::USER_NAME, Value::String(name.to_owned()))
    }

    /// Off unless explicitly enabled.
    #[must_use]
    pub fn transition_sound_enabled(&self) -> bool {
        self.store
            .get(keys::TRANSITION_SOUND_ENABLED)
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns an error if the store could not persist the value.
    pub fn set_transition_sound_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.store
            .set(keys::TRANSITION_SOUND_ENABLED, Value::Bool(enabled))
    }

    /// Unlock full access if `code` is a valid promo code. Returns whether
    /// the code was accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the unlock could not be persisted.
    pub fn redeem_promo_code(&mut self, code: &str) -> Result<bool, StoreError> {
        if !is_valid_promo_code(code) {
            debug!("promo code rejected");
            return Ok(false);
        }
        self.set_has_paid(true)?;
        info!("promo code redeemed; full access unlocked");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns an error if the cleared store could not be persisted.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }
}

impl<S: KvStore> Entitlement for Preferences<S> {
    fn has_full_access(&self) -> bool {
        self.has_paid()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
