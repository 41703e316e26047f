//! Metadata storage with explicit missing-key signalling.
//!
//! Handlers carry free-form metadata as string-keyed JSON values. A lookup
//! miss is always an error, never a sentinel: callers rely on
//! distinguishing "not set" from "set to an empty or null value". Lookup
//! precedence across levels (a handler's own store before any richer
//! fallback) is expressed by explicit chaining:
//!
//! ```
//! use rafter_handlers::metadata::MetaStore;
//! use serde_json::json;
//!
//! let own = MetaStore::new();
//! let mut fallback = MetaStore::new();
//! fallback.insert("instrument", json!("TOMCAT"));
//!
//! let value = own
//!     .lookup("instrument")
//!     .or_else(|_| fallback.lookup("instrument"));
//! assert_eq!(value.expect("fallback defines the key"), json!("TOMCAT"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HandlerError;

#[cfg(test)]
mod tests;

/// Ordered string-to-JSON metadata map.
///
/// # Example
///
/// ```
/// use rafter_handlers::metadata::MetaStore;
/// use rafter_handlers::HandlerError;
/// use serde_json::json;
///
/// let mut store = MetaStore::new();
/// store.insert("exposure_time", json!(0.25));
///
/// assert_eq!(store.lookup("exposure_time").expect("set above"), json!(0.25));
/// assert!(matches!(
///     store.lookup("wavelength"),
///     Err(HandlerError::KeyNotFound { .. })
/// ));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaStore {
    entries: serde_json::Map<String, Value>,
}

impl MetaStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Looks up a key, failing on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::KeyNotFound`] when the key is absent. A key
    /// explicitly set to `Value::Null` is present and returned as such.
    pub fn lookup(&self, key: &str) -> Result<Value, HandlerError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| HandlerError::KeyNotFound {
                key: key.to_owned(),
            })
    }

    /// Returns `true` when the key is present, even if set to null.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for MetaStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
