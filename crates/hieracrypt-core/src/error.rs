//! Lookup error types

use std::path::PathBuf;
use thiserror::Error;

/// Hint attached to every decryption failure
pub const DECRYPTION_HINT: &str =
    "Unable to decrypt hiera data. Do the keys match and are they the same as those used to encrypt?";

/// Errors that can abort a lookup
///
/// Every variant is fatal to the current lookup call. Missing documents and
/// missing keys are not errors and never show up here.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The text inside `ENC[...]` is not valid base64
    #[error("Malformed encrypted value: {0}")]
    MalformedEnvelope(String),

    /// The private key or certificate file could not be read
    #[error("Key material unavailable at {}: {source}", path.display())]
    KeyMaterialUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any parse or cryptographic failure while decrypting
    #[error("Hiera eyaml backend: {}", DECRYPTION_HINT)]
    DecryptionFailed,

    /// The resolved value's shape does not fit the resolution strategy
    #[error("Hiera type mismatch: {0}")]
    TypeMismatch(String),

    /// A data document exists but could not be read or parsed
    #[error("Unable to read data document {}: {message}", path.display())]
    DocumentUnreadable { path: PathBuf, message: String },
}

impl LookupError {
    /// Create a key material error for a path
    pub fn key_material(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::KeyMaterialUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a document error for a path
    pub fn document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DocumentUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
