//! The `Saved` cell: a typed variable that transparently survives restarts
//!
//! Construction is cheap and does no I/O. The first get or set lazily loads
//! the stored value (or adopts and persists the default when nothing is
//! stored); every set writes through synchronously and notifies observers.
//! `delete` removes the stored entry but deliberately leaves the in-memory
//! cache alone: re-deriving default state takes a fresh cell instance.

use std::cell::{OnceCell, RefCell};

use crate::codec::{
    BoolCodec, Codec, Color, ColorCodec, EnumCodec, FloatCodec, IntCodec, JsonCodec, Loaded,
    StringCodec,
};
use crate::error::Result;
use crate::store::StoreHandle;

/// Command-line flag carrying an instance id. When several processes of the
/// same program share one backing store (e.g. parallel test runners), each is
/// launched with `-prefsId=<id>` and its cells resolve to suffixed keys.
pub const INSTANCE_ID_ARG: &str = "-prefsId";

/// Key suffix derived from an argument list: `"-<id>"` when the instance-id
/// flag is present, empty otherwise.
pub fn suffix_from_args<I>(args: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let flag = format!("{INSTANCE_ID_ARG}=");
    for arg in args {
        if let Some(id) = arg.as_ref().strip_prefix(&flag) {
            return format!("-{id}");
        }
    }
    String::new()
}

type Observer<T> = Box<dyn FnMut(&T)>;

/// Lazily-initialized, auto-persisting value cell.
///
/// `C` selects the variant encoding; use the typed aliases ([`SavedBool`],
/// [`SavedInt`], …) rather than naming codecs directly.
pub struct Saved<T, C> {
    store: StoreHandle,
    key: String,
    default: T,
    codec: C,
    resolved_key: OnceCell<String>,
    value: RefCell<Option<T>>,
    observers: RefCell<Vec<Observer<T>>>,
}

pub type SavedBool = Saved<bool, BoolCodec>;
pub type SavedInt = Saved<i32, IntCodec>;
pub type SavedFloat = Saved<f32, FloatCodec>;
pub type SavedString = Saved<String, StringCodec>;
pub type SavedColor = Saved<Color, ColorCodec>;
pub type SavedEnum<T> = Saved<T, EnumCodec<T>>;
pub type SavedJson<T> = Saved<T, JsonCodec<T>>;

impl<T, C> Saved<T, C>
where
    T: Clone,
    C: Codec<T> + Default,
{
    /// Bind a cell to `key` on `store`. Does no I/O.
    pub fn new(store: StoreHandle, key: impl Into<String>, default: T) -> Self {
        Self::with_codec(store, key, default, C::default())
    }
}

impl<T, C> Saved<T, C>
where
    T: Clone,
    C: Codec<T>,
{
    pub fn with_codec(store: StoreHandle, key: impl Into<String>, default: T, codec: C) -> Self {
        Self {
            store,
            key: key.into(),
            default,
            codec,
            resolved_key: OnceCell::new(),
            value: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// The base key this cell was constructed with.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Current value, lazily loading from the store on first access.
    ///
    /// Infallible in practice for primitive variants; the structured variant
    /// propagates decode failures of corrupted stored text.
    pub fn get(&self) -> Result<T> {
        self.ensure_init()
    }

    /// Set and synchronously persist a new value, then notify observers in
    /// registration order.
    ///
    /// A blind set before any read still runs the lazy load first, so the
    /// pre-existing stored value goes through the same init path before being
    /// overwritten.
    pub fn set(&self, value: T) -> Result<()> {
        self.ensure_init()?;
        let key = self.resolved_key().to_owned();
        self.codec
            .save(&mut *self.store.borrow_mut(), &key, &value)?;
        *self.value.borrow_mut() = Some(value.clone());
        log::debug!("saved key `{key}`");
        for observer in self.observers.borrow_mut().iter_mut() {
            observer(&value);
        }
        Ok(())
    }

    /// Register an observer invoked on every explicit [`set`](Self::set)
    /// with the new value. Observers never fire on the implicit first load.
    pub fn on_changed(&self, observer: impl FnMut(&T) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    /// Remove the stored entry for the resolved key.
    ///
    /// The in-memory cache is not reset: an already-initialized cell keeps
    /// returning its cached value. A fresh cell instance with the same key
    /// re-derives the default.
    pub fn delete(&self) {
        let key = self.resolved_key().to_owned();
        self.codec.delete(&mut *self.store.borrow_mut(), &key);
        log::debug!("deleted stored entry for key `{key}`");
    }

    /// Whether the store currently holds an entry for the resolved key.
    /// The only way to tell an empty stored string apart from absence.
    pub fn is_stored(&self) -> bool {
        self.store.borrow().has_key(self.resolved_key())
    }

    /// Base key plus instance suffix. The suffix is resolved from the process
    /// arguments exactly once, before the first load.
    fn resolved_key(&self) -> &str {
        self.resolved_key
            .get_or_init(|| format!("{}{}", self.key, suffix_from_args(std::env::args())))
    }

    fn ensure_init(&self) -> Result<T> {
        if let Some(value) = self.value.borrow().as_ref() {
            return Ok(value.clone());
        }

        let key = self.resolved_key().to_owned();
        let loaded = self
            .codec
            .load(&*self.store.borrow(), &key, &self.default)?;
        let value = match loaded {
            Loaded::Present(v) => v,
            Loaded::Absent(v) => {
                // First sighting of this key: make the default durable
                self.codec.save(&mut *self.store.borrow_mut(), &key, &v)?;
                log::debug!("initialized key `{key}` to its default");
                v
            }
            Loaded::Invalid(v) => {
                log::warn!("unusable stored value for key `{key}`, keeping fallback");
                v
            }
        };
        *self.value.borrow_mut() = Some(value.clone());
        Ok(value)
    }
}
