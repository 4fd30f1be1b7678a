//! Service container shared with container-aware controllers.
//!
//! The [`App`](crate::app::App) owns the container behind an `Arc`;
//! controllers only ever get a `Weak` handle, so they can read and write
//! entries during a request without extending the container's lifetime.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// String-keyed store of JSON values with interior mutability.
#[derive(Debug, Default)]
pub struct Container {
    entries: RwLock<HashMap<String, Value>>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.write().insert(key.into(), value.into())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
