//! LocalStorage-backed store for wasm32
//!
//! LocalStorage only holds strings, so numeric slots are stored as decimal
//! text. A key prefix namespaces this store's entries away from the rest of
//! the origin's storage; `delete_all` only touches prefixed keys.
//!
//! Write errors (storage full, storage disabled) are logged and swallowed,
//! and a missing storage object degrades every read to its default.

use super::PrefStore;

/// Browser LocalStorage store.
#[derive(Debug)]
pub struct LocalStore {
    prefix: String,
}

impl LocalStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn read(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(&self.full_key(key)).ok().flatten())
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(&self.full_key(key), value).is_err() {
                log::warn!("LocalStorage write failed for key `{key}`");
            }
        }
    }
}

impl PrefStore for LocalStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.read(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.write(key, &value.to_string());
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.read(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.write(key, &value.to_string());
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.read(key).unwrap_or_else(|| default.to_owned())
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.write(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    fn delete_key(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.full_key(key));
        }
    }

    fn delete_all(&mut self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let len = storage.length().unwrap_or(0);
        let mut prefixed = Vec::new();
        for i in 0..len {
            if let Ok(Some(key)) = storage.key(i) {
                if key.starts_with(&self.prefix) {
                    prefixed.push(key);
                }
            }
        }
        for key in prefixed {
            let _ = storage.remove_item(&key);
        }
        log::info!("cleared LocalStorage entries under `{}`", self.prefix);
    }
}
