//! Key/value storage trait.
//!
//! The client keeps exactly one durable entry (the auth session), but the
//! store is modelled after browser local storage so the session service can
//! be tested against an in-memory substitute.

use crate::error::Result;

/// String key/value store with local-storage semantics.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never set.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
