//! Call-site-owned front end over one backing store
//!
//! `Prefs` binds a store handle once and hands out cells keyed by string
//! identifier. There is deliberately no process-wide singleton: whoever owns
//! the `Prefs` decides which store backs it and passes cells where needed.

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cell::{
    Saved, SavedBool, SavedColor, SavedEnum, SavedFloat, SavedInt, SavedJson, SavedString,
};
use crate::codec::{Color, PrefEnum};
use crate::store::{MemoryStore, StoreHandle, handle};

/// Cell factory bound to one shared store.
pub struct Prefs {
    store: StoreHandle,
}

impl Prefs {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Prefs over a fresh in-process store; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(handle(MemoryStore::new()))
    }

    /// Another handle to the underlying store.
    pub fn store(&self) -> StoreHandle {
        Rc::clone(&self.store)
    }

    pub fn bool(&self, key: impl Into<String>, default: bool) -> SavedBool {
        Saved::new(self.store(), key, default)
    }

    pub fn int(&self, key: impl Into<String>, default: i32) -> SavedInt {
        Saved::new(self.store(), key, default)
    }

    pub fn float(&self, key: impl Into<String>, default: f32) -> SavedFloat {
        Saved::new(self.store(), key, default)
    }

    pub fn string(&self, key: impl Into<String>, default: impl Into<String>) -> SavedString {
        Saved::new(self.store(), key, default.into())
    }

    pub fn color(&self, key: impl Into<String>, default: Color) -> SavedColor {
        Saved::new(self.store(), key, default)
    }

    pub fn enumeration<T>(&self, key: impl Into<String>, default: T) -> SavedEnum<T>
    where
        T: PrefEnum + Default + Clone,
    {
        Saved::new(self.store(), key, default)
    }

    pub fn json<T>(&self, key: impl Into<String>, default: T) -> SavedJson<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        Saved::new(self.store(), key, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_from_one_prefs_share_the_store() {
        let prefs = Prefs::in_memory();

        let a = prefs.int("wave", 1);
        a.set(12).unwrap();

        let b = prefs.int("wave", 1);
        assert_eq!(b.get().unwrap(), 12);
    }

    #[test]
    fn test_separate_prefs_are_isolated() {
        let one = Prefs::in_memory();
        let two = Prefs::in_memory();

        one.int("wave", 0).set(5).unwrap();
        assert_eq!(two.int("wave", 0).get().unwrap(), 0);
    }

    #[test]
    fn test_typed_constructors() {
        let prefs = Prefs::in_memory();

        assert!(!prefs.bool("muted", false).get().unwrap());
        assert_eq!(prefs.float("volume", 0.7).get().unwrap(), 0.7);
        assert_eq!(prefs.string("name", "anon").get().unwrap(), "anon");
        assert_eq!(
            prefs.color("tint", Color::WHITE).get().unwrap(),
            Color::WHITE
        );
    }
}
