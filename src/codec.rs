//! Per-variant encodings over the store's primitive slots
//!
//! Each cell variant pairs a load with a save:
//! - bool as int (1 = true, 0 = false)
//! - int, float, string as native slots
//! - enum as int, validated against defined members on load
//! - color as four float slots keyed `key+"R"` … `key+"A"`
//! - arbitrary structured values as JSON text
//!
//! The trait is sealed: the variant set is closed and each codec is picked at
//! compile time through the cell's type parameter.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PrefError, Result};
use crate::store::PrefStore;

/// Outcome of decoding a stored entry during cell initialization.
///
/// Every variant carries the value the cell adopts; they differ in what
/// happens to the store afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// A stored entry existed and decoded. No write-back.
    Present(T),
    /// No stored entry. The carried default is written back so presence
    /// becomes true for subsequent reads.
    Absent(T),
    /// A stored entry existed but is unusable (e.g. an integer outside the
    /// enum's defined members). The carried fallback is adopted in memory
    /// and nothing is written back.
    Invalid(T),
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::BoolCodec {}
    impl Sealed for super::IntCodec {}
    impl Sealed for super::FloatCodec {}
    impl Sealed for super::StringCodec {}
    impl Sealed for super::ColorCodec {}
    impl<T> Sealed for super::EnumCodec<T> {}
    impl<T> Sealed for super::JsonCodec<T> {}
}

/// Encode/decode pair for one cell variant.
pub trait Codec<T>: sealed::Sealed {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &T) -> Result<Loaded<T>>;

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &T) -> Result<()>;

    /// Remove the stored entry for `key`. Variants spanning several store
    /// keys override this to remove all of them.
    fn delete(&self, store: &mut dyn PrefStore, key: &str) {
        store.delete_key(key);
    }
}

/// Boolean stored as an int slot, 1 = true.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolCodec;

impl Codec<bool> for BoolCodec {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &bool) -> Result<Loaded<bool>> {
        let value = store.get_int(key, i32::from(*default)) == 1;
        Ok(if store.has_key(key) {
            Loaded::Present(value)
        } else {
            Loaded::Absent(value)
        })
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &bool) -> Result<()> {
        store.set_int(key, i32::from(*value));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntCodec;

impl Codec<i32> for IntCodec {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &i32) -> Result<Loaded<i32>> {
        let value = store.get_int(key, *default);
        Ok(if store.has_key(key) {
            Loaded::Present(value)
        } else {
            Loaded::Absent(value)
        })
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &i32) -> Result<()> {
        store.set_int(key, *value);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FloatCodec;

impl Codec<f32> for FloatCodec {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &f32) -> Result<Loaded<f32>> {
        let value = store.get_float(key, *default);
        Ok(if store.has_key(key) {
            Loaded::Present(value)
        } else {
            Loaded::Absent(value)
        })
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &f32) -> Result<()> {
        store.set_float(key, *value);
        Ok(())
    }
}

/// String stored natively. An empty stored string and an absent key read the
/// same through the getter; only the store's presence check tells them apart.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringCodec;

impl Codec<String> for StringCodec {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &String) -> Result<Loaded<String>> {
        let value = store.get_string(key, default);
        Ok(if store.has_key(key) {
            Loaded::Present(value)
        } else {
            Loaded::Absent(value)
        })
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &String) -> Result<()> {
        store.set_string(key, value);
        Ok(())
    }
}

/// RGBA color, one float per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
}

const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// Color stored as four float slots, keyed `key+"R"` … `key+"A"`.
/// Presence is judged by the `R` channel key.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorCodec;

impl Codec<Color> for ColorCodec {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &Color) -> Result<Loaded<Color>> {
        let value = Color {
            r: store.get_float(&format!("{key}R"), default.r),
            g: store.get_float(&format!("{key}G"), default.g),
            b: store.get_float(&format!("{key}B"), default.b),
            a: store.get_float(&format!("{key}A"), default.a),
        };
        Ok(if store.has_key(&format!("{key}R")) {
            Loaded::Present(value)
        } else {
            Loaded::Absent(value)
        })
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &Color) -> Result<()> {
        store.set_float(&format!("{key}R"), value.r);
        store.set_float(&format!("{key}G"), value.g);
        store.set_float(&format!("{key}B"), value.b);
        store.set_float(&format!("{key}A"), value.a);
        Ok(())
    }

    fn delete(&self, store: &mut dyn PrefStore, key: &str) {
        for channel in CHANNELS {
            store.delete_key(&format!("{key}{channel}"));
        }
    }
}

/// Mapping between an enum and its stored integer representation.
///
/// `from_stored` returns `None` for integers outside the defined members,
/// which makes the cell skip the load entirely (no default write-back) and
/// keep the enum's `Default` in memory.
pub trait PrefEnum: Sized {
    fn to_stored(&self) -> i32;
    fn from_stored(raw: i32) -> Option<Self>;
}

/// Enum stored as an int slot, validated on load.
#[derive(Debug, Clone, Copy)]
pub struct EnumCodec<T>(PhantomData<T>);

impl<T> Default for EnumCodec<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: PrefEnum + Default> Codec<T> for EnumCodec<T> {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &T) -> Result<Loaded<T>> {
        let raw = store.get_int(key, default.to_stored());
        match T::from_stored(raw) {
            Some(value) => Ok(if store.has_key(key) {
                Loaded::Present(value)
            } else {
                Loaded::Absent(value)
            }),
            None => Ok(Loaded::Invalid(T::default())),
        }
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &T) -> Result<()> {
        store.set_int(key, value.to_stored());
        Ok(())
    }
}

/// Arbitrary structured value stored as JSON text in a string slot.
///
/// The only fallible codec: corrupted stored text surfaces as
/// [`PrefError::Decode`] instead of falling back to the default.
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec<T>(PhantomData<T>);

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Serialize + DeserializeOwned + Clone> Codec<T> for JsonCodec<T> {
    fn load(&self, store: &dyn PrefStore, key: &str, default: &T) -> Result<Loaded<T>> {
        let json = store.get_string(key, "");
        if json.is_empty() {
            // An empty stored string reads like absence, but only true
            // absence triggers the default write-back.
            return Ok(if store.has_key(key) {
                Loaded::Invalid(default.clone())
            } else {
                Loaded::Absent(default.clone())
            });
        }
        let value = serde_json::from_str(&json).map_err(|source| PrefError::Decode {
            key: key.to_owned(),
            source,
        })?;
        Ok(Loaded::Present(value))
    }

    fn save(&self, store: &mut dyn PrefStore, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|source| PrefError::Encode {
            key: key.to_owned(),
            source,
        })?;
        store.set_string(key, &json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::store::MemoryStore;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Quality {
        Low,
        #[default]
        Medium,
        High,
    }

    impl PrefEnum for Quality {
        fn to_stored(&self) -> i32 {
            match self {
                Quality::Low => 0,
                Quality::Medium => 1,
                Quality::High => 2,
            }
        }

        fn from_stored(raw: i32) -> Option<Self> {
            match raw {
                0 => Some(Quality::Low),
                1 => Some(Quality::Medium),
                2 => Some(Quality::High),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        count: i32,
        name: String,
    }

    #[test]
    fn test_bool_stored_as_int() {
        let mut store = MemoryStore::new();
        BoolCodec.save(&mut store, "flag", &true).unwrap();
        assert_eq!(store.get_int("flag", 0), 1);

        let loaded = BoolCodec.load(&store, "flag", &false).unwrap();
        assert_eq!(loaded, Loaded::Present(true));
    }

    #[test]
    fn test_absent_key_reports_absent_with_default() {
        let store = MemoryStore::new();
        let loaded = IntCodec.load(&store, "score", &7).unwrap();
        assert_eq!(loaded, Loaded::Absent(7));
    }

    #[test]
    fn test_enum_invalid_stored_value_is_skipped() {
        let mut store = MemoryStore::new();
        store.set_int("quality", 99);

        let loaded = EnumCodec::<Quality>::default()
            .load(&store, "quality", &Quality::High)
            .unwrap();
        assert_eq!(loaded, Loaded::Invalid(Quality::Medium));
        // No write-back: the bogus entry stays as-is
        assert_eq!(store.get_int("quality", -1), 99);
    }

    #[test]
    fn test_enum_defined_value_roundtrips() {
        let mut store = MemoryStore::new();
        let codec = EnumCodec::<Quality>::default();
        codec.save(&mut store, "quality", &Quality::High).unwrap();

        let loaded = codec.load(&store, "quality", &Quality::Low).unwrap();
        assert_eq!(loaded, Loaded::Present(Quality::High));
    }

    #[test]
    fn test_color_uses_channel_keys() {
        let mut store = MemoryStore::new();
        let color = Color::new(0.1, 0.2, 0.3, 1.0);
        ColorCodec.save(&mut store, "tint", &color).unwrap();

        assert_eq!(store.get_float("tintR", 0.0), 0.1);
        assert_eq!(store.get_float("tintG", 0.0), 0.2);
        assert_eq!(store.get_float("tintB", 0.0), 0.3);
        assert_eq!(store.get_float("tintA", 0.0), 1.0);
        assert!(!store.has_key("tint"));

        let loaded = ColorCodec.load(&store, "tint", &Color::BLACK).unwrap();
        assert_eq!(loaded, Loaded::Present(color));
    }

    #[test]
    fn test_color_delete_removes_all_channels() {
        let mut store = MemoryStore::new();
        ColorCodec.save(&mut store, "tint", &Color::WHITE).unwrap();
        ColorCodec.delete(&mut store, "tint");

        for channel in CHANNELS {
            assert!(!store.has_key(&format!("tint{channel}")));
        }
    }

    #[test]
    fn test_json_decode_failure_propagates() {
        let mut store = MemoryStore::new();
        store.set_string("profile", "{not valid json");

        let err = JsonCodec::<Profile>::default()
            .load(
                &store,
                "profile",
                &Profile {
                    count: 0,
                    name: String::new(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, crate::error::PrefError::Decode { .. }));
    }

    #[test]
    fn test_json_empty_string_reads_as_default_without_writeback() {
        let mut store = MemoryStore::new();
        store.set_string("profile", "");

        let default = Profile {
            count: 1,
            name: "def".to_owned(),
        };
        let loaded = JsonCodec::<Profile>::default()
            .load(&store, "profile", &default)
            .unwrap();
        assert_eq!(loaded, Loaded::Invalid(default));
        // The empty entry is left alone
        assert_eq!(store.get_string("profile", "x"), "");
    }

    proptest! {
        #[test]
        fn test_json_roundtrip(count in proptest::num::i32::ANY, name in ".*") {
            let mut store = MemoryStore::new();
            let codec = JsonCodec::<Profile>::default();
            let value = Profile { count, name };

            codec.save(&mut store, "profile", &value).unwrap();
            let loaded = codec
                .load(&store, "profile", &Profile { count: 0, name: String::new() })
                .unwrap();
            prop_assert_eq!(loaded, Loaded::Present(value));
        }
    }
}
