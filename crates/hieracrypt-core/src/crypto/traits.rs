//! Decryptor trait definition

use std::sync::Arc;

use crate::error::LookupResult;
use crate::types::Scope;

/// Turns an `ENC[...]` envelope into plaintext
///
/// Implementations:
/// - `Pkcs7Decryptor`: PKCS7 enveloped data with an RSA key on disk
/// - Custom implementations (hardware tokens, remote key services, etc.)
pub trait Decryptor: Send + Sync {
    /// Human-readable name of this decryptor
    fn name(&self) -> &str;

    /// Decrypt a full envelope string for the given scope
    ///
    /// The caller has already checked that `envelope` is an envelope.
    fn decrypt_envelope(&self, envelope: &str, scope: &Scope) -> LookupResult<String>;
}

/// Type alias for an Arc-wrapped decryptor
pub type SharedDecryptor = Arc<dyn Decryptor>;
