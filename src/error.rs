//! Error types.

use crate::spot::SpotId;
use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing, mutating or reloading spots.
///
/// None of these are fatal: parse errors skip the offending node, index errors leave the spot
/// untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// No spot variant or view is registered for this kind.
    #[error("no spot or view registered for kind `{kind}`")]
    UnknownKind { kind: String },

    /// A mutation or lookup addressed an index outside the spot's items.
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    /// A reload was issued while another one was still waiting for its layout pass.
    #[error("reload issued while a previous reload is still in flight")]
    ReentrantReload,

    /// The spot does not exist (anymore).
    #[error("no such spot: {0}")]
    NoSuchSpot(SpotId),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind { kind: kind.into() }
    }
}

/// Errors that may occur when applying a patch to the physical view hierarchy.
#[derive(Debug, Error)]
pub enum PatchError<E> {
    #[error("no such view: {0}")]
    NoSuchView(SpotId),

    #[error("backend error: {0}")]
    Backend(E),
}
