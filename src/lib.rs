//! prefcell - typed, lazily-initialized, auto-persisting preference cells
//!
//! Core modules:
//! - `store`: key-value backing-store contract and its implementations
//! - `codec`: per-variant encodings over the store's primitive slots
//! - `cell`: the `Saved` cell (lazy init, change observers, delete)
//! - `prefs`: call-site-owned front end constructing cells over one store
//!
//! A cell is bound to a string key on a shared store, costs nothing to
//! construct, and loads lazily on first access. When nothing is stored yet
//! the default is adopted and immediately written back; every set persists
//! synchronously and notifies observers.
//!
//! ```
//! use prefcell::Prefs;
//!
//! let prefs = Prefs::in_memory();
//! let score = prefs.int("score", 7);
//! assert_eq!(score.get().unwrap(), 7);
//! score.set(10).unwrap();
//! assert_eq!(prefs.int("score", 3).get().unwrap(), 10);
//! ```

pub mod cell;
pub mod codec;
pub mod error;
pub mod prefs;
pub mod store;

pub use cell::{
    INSTANCE_ID_ARG, Saved, SavedBool, SavedColor, SavedEnum, SavedFloat, SavedInt, SavedJson,
    SavedString, suffix_from_args,
};
pub use codec::{Codec, Color, Loaded, PrefEnum};
pub use error::PrefError;
pub use prefs::Prefs;
pub use store::{MemoryStore, PrefStore, StoreHandle, handle};

#[cfg(not(target_arch = "wasm32"))]
pub use store::file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::local::LocalStore;
