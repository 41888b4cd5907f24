//! Error types for the preference layer
//!
//! Absence of a stored entry is never an error (cells fall back to their
//! default and write it back). Errors only arise from the structured codec:
//! stored text that cannot be decoded, or a value that cannot be encoded.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrefError>;

#[derive(Debug, Error)]
pub enum PrefError {
    #[error("failed to decode stored value for key `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
