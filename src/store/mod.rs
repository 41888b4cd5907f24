//! Key-value backing stores
//!
//! The backing store is the durability layer under every cell: a synchronous
//! key-value surface with one typed slot (int, float or string) per key.
//! Implementations:
//! - `MemoryStore`: in-process map, used by tests and as a scratch store
//! - `FileStore`: JSON file image, rewritten on every mutation (native)
//! - `LocalStore`: browser LocalStorage (wasm32)
//!
//! Stores are treated as always-available local storage, so the trait is
//! infallible; file-store write errors are logged and swallowed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

/// Synchronous key-value persistence contract.
///
/// Reading a key through the wrong accessor (e.g. `get_int` on a key holding
/// a string) yields the caller's default, matching platform-prefs behavior.
pub trait PrefStore {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32);

    fn get_float(&self, key: &str, default: f32) -> f32;
    fn set_float(&mut self, key: &str, value: f32);

    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_string(&mut self, key: &str, value: &str);

    fn has_key(&self, key: &str) -> bool;
    fn delete_key(&mut self, key: &str);
    /// Remove every entry in the store.
    fn delete_all(&mut self);
}

/// Shared handle through which cells reach their store.
///
/// Single-threaded by design; concurrent access is out of scope and callers
/// must serialize externally if they need it.
pub type StoreHandle = Rc<RefCell<dyn PrefStore>>;

/// Wrap a store in a shareable handle.
pub fn handle<S: PrefStore + 'static>(store: S) -> StoreHandle {
    Rc::new(RefCell::new(store))
}

/// One typed storage slot. A key holds exactly one kind at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Slot {
    Int(i32),
    Float(f32),
    Text(String),
}

/// In-process backing store with no durability. The reference implementation
/// of the slot semantics; also what the test suite runs against.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, Slot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl PrefStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.slots.get(key) {
            Some(Slot::Int(v)) => *v,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.slots.insert(key.to_owned(), Slot::Int(value));
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.slots.get(key) {
            Some(Slot::Float(v)) => *v,
            _ => default,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.slots.insert(key.to_owned(), Slot::Float(value));
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.slots.get(key) {
            Some(Slot::Text(v)) => v.clone(),
            _ => default.to_owned(),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_owned(), Slot::Text(value.to_owned()));
    }

    fn has_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.slots.remove(key);
    }

    fn delete_all(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_yields_default() {
        let store = MemoryStore::new();
        assert_eq!(store.get_int("missing", 42), 42);
        assert_eq!(store.get_string("missing", "fallback"), "fallback");
        assert!(!store.has_key("missing"));
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut store = MemoryStore::new();
        store.set_int("lives", 3);
        store.set_float("volume", 0.8);
        store.set_string("name", "player one");

        assert_eq!(store.get_int("lives", 0), 3);
        assert_eq!(store.get_float("volume", 0.0), 0.8);
        assert_eq!(store.get_string("name", ""), "player one");
        assert!(store.has_key("lives"));
    }

    #[test]
    fn test_wrong_slot_kind_yields_default() {
        let mut store = MemoryStore::new();
        store.set_string("lives", "three");
        // Key exists but holds a string slot
        assert!(store.has_key("lives"));
        assert_eq!(store.get_int("lives", 9), 9);
        assert_eq!(store.get_float("lives", 1.5), 1.5);
    }

    #[test]
    fn test_set_replaces_slot_kind() {
        let mut store = MemoryStore::new();
        store.set_int("k", 1);
        store.set_string("k", "one");
        assert_eq!(store.get_int("k", 0), 0);
        assert_eq!(store.get_string("k", ""), "one");
    }

    #[test]
    fn test_delete_key_and_delete_all() {
        let mut store = MemoryStore::new();
        store.set_int("a", 1);
        store.set_int("b", 2);

        store.delete_key("a");
        assert!(!store.has_key("a"));
        assert!(store.has_key("b"));

        store.delete_all();
        assert!(store.is_empty());
    }
}
