//! File-backed store for native targets
//!
//! The whole store is one JSON image, read once at open and rewritten
//! synchronously on every mutation. Durability matches the cell contract:
//! when a setter returns, the value is on disk.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::{PrefStore, Slot};

/// File name used by [`FileStore::in_config_dir`].
const PREFS_FILE: &str = "prefs.json";

/// Process-durable store persisted as a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slots: HashMap<String, Slot>,
}

impl FileStore {
    /// Open a store at an explicit path. A missing file starts empty; an
    /// unreadable image is logged and treated as empty rather than failing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(slots) => {
                    log::info!("loaded prefs from {}", path.display());
                    slots
                }
                Err(err) => {
                    log::warn!(
                        "unreadable prefs image at {}, starting empty: {err}",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(_) => {
                log::info!("no prefs file at {}, starting empty", path.display());
                HashMap::new()
            }
        };
        Self { path, slots }
    }

    /// Open the store at its default location under the platform config
    /// directory, e.g. `~/.config/<app>/prefs.json` on Linux.
    pub fn in_config_dir(app: &str) -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::open(base.join(app).join(PREFS_FILE))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("could not create {}: {err}", parent.display());
            }
        }
        match serde_json::to_string_pretty(&self.slots) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::warn!("could not write {}: {err}", self.path.display());
                }
            }
            Err(err) => log::warn!("could not serialize prefs image: {err}"),
        }
    }
}

impl PrefStore for FileStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.slots.get(key) {
            Some(Slot::Int(v)) => *v,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.slots.insert(key.to_owned(), Slot::Int(value));
        self.flush();
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.slots.get(key) {
            Some(Slot::Float(v)) => *v,
            _ => default,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.slots.insert(key.to_owned(), Slot::Float(value));
        self.flush();
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.slots.get(key) {
            Some(Slot::Text(v)) => v.clone(),
            _ => default.to_owned(),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_owned(), Slot::Text(value.to_owned()));
        self.flush();
    }

    fn has_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        if self.slots.remove(key).is_some() {
            self.flush();
        }
    }

    fn delete_all(&mut self) {
        self.slots.clear();
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("prefcell-test-{}-{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        {
            let mut store = FileStore::open(&path);
            store.set_int("wave", 12);
            store.set_string("name", "arcade");
        }

        let store = FileStore::open(&path);
        assert_eq!(store.get_int("wave", 0), 12);
        assert_eq!(store.get_string("name", ""), "arcade");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let path = temp_path("missing");
        let store = FileStore::open(&path);
        assert!(!store.has_key("anything"));
        assert_eq!(store.get_float("anything", 2.5), 2.5);
    }

    #[test]
    fn test_corrupt_image_starts_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path);
        assert!(!store.has_key("anything"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_delete_all_persists() {
        let path = temp_path("delete-all");
        {
            let mut store = FileStore::open(&path);
            store.set_int("a", 1);
            store.set_int("b", 2);
            store.delete_all();
        }

        let store = FileStore::open(&path);
        assert!(!store.has_key("a"));
        assert!(!store.has_key("b"));
        let _ = fs::remove_file(&path);
    }
}
