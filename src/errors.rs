//! Error types.
//!
//! Queries never fail for "unknown" answers: an unresolved type is
//! `mixed`, a missing identifier yields no reference.  The only hard
//! failures are broken external collaborators:
//! - [`IndexError`] when the symbol index itself fails a lookup,
//! - [`SettingsError`] when a settings file exists but cannot be read,
//! - [`LatteError::IndexJson`] when a JSON class list cannot be decoded.
//!
//! [`LatteError`] unifies them so callers can use a single `Result`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a [`crate::SymbolIndex`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The index is not ready (e.g. still being built by the host).
    #[error("symbol index is not available: {0}")]
    Unavailable(String),

    /// A single lookup failed.
    #[error("lookup of `{name}` failed: {reason}")]
    LookupFailed { name: String, reason: String },
}

/// Errors arising while loading [`crate::LatteSettings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum LatteError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A JSON class list handed to [`crate::InMemoryIndex::from_json_str`]
    /// is malformed.
    #[error("invalid symbol index JSON: {0}")]
    IndexJson(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LatteError>;
