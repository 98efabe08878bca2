//! PKCS7 envelope decryption

use std::path::Path;
use std::sync::Arc;

use openssl::pkcs7::{Pkcs7, Pkcs7Flags};

use super::envelope;
use super::keys::{KeyMaterial, KeyPaths};
use super::traits::Decryptor;
use crate::error::{LookupError, LookupResult};
use crate::interpolation::{PassthroughInterpolator, SharedInterpolator};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::Scope;

/// Decrypts PKCS7 enveloped data with an RSA private key and certificate
///
/// Key material is read from disk on every call; nothing is cached between
/// lookups.
///
/// # Example
///
/// ```no_run
/// use hieracrypt_core::crypto::{Decryptor, KeyPaths, Pkcs7Decryptor};
/// use hieracrypt_core::types::Scope;
///
/// let decryptor = Pkcs7Decryptor::new(
///     KeyPaths::new()
///         .with_private_key("/etc/puppet/keys/private_key.pem")
///         .with_public_key("/etc/puppet/keys/public_key.pem"),
/// );
/// let plaintext = decryptor.decrypt_envelope("ENC[MIIBiQYJKoZIhvcNAQcDoII...]", &Scope::new());
/// ```
pub struct Pkcs7Decryptor {
    key_paths: KeyPaths,
    interpolator: SharedInterpolator,
    logger: SharedLogger,
}

impl Pkcs7Decryptor {
    /// Create a decryptor with a passthrough interpolator and no logging
    pub fn new(key_paths: KeyPaths) -> Self {
        Self {
            key_paths,
            interpolator: Arc::new(PassthroughInterpolator),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Set the interpolator used to expand key path templates
    pub fn with_interpolator(mut self, interpolator: SharedInterpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Set the diagnostics sink
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Get the configured key path templates
    pub fn key_paths(&self) -> &KeyPaths {
        &self.key_paths
    }

    /// Decrypt PKCS7 DER ciphertext with the key and certificate at the given paths
    ///
    /// Any failure past reading the files is reported as `DecryptionFailed`
    /// without further detail.
    pub fn decrypt(
        ciphertext: &[u8],
        private_key_path: &Path,
        public_cert_path: &Path,
    ) -> LookupResult<Vec<u8>> {
        let material = KeyMaterial::load(private_key_path, public_cert_path)?;
        let pkcs7 = Pkcs7::from_der(ciphertext).map_err(|_| LookupError::DecryptionFailed)?;
        pkcs7
            .decrypt(
                material.private_key(),
                material.certificate(),
                Pkcs7Flags::empty(),
            )
            .map_err(|_| LookupError::DecryptionFailed)
    }
}

impl Decryptor for Pkcs7Decryptor {
    fn name(&self) -> &str {
        "pkcs7"
    }

    fn decrypt_envelope(&self, envelope_text: &str, scope: &Scope) -> LookupResult<String> {
        let ciphertext = envelope::strip_and_decode(envelope_text)?;

        crate::log_debug!(self.logger, "[eyaml_backend]: Decrypting value");

        let (private_key_path, public_cert_path) =
            self.key_paths.resolve(self.interpolator.as_ref(), scope);
        let plaintext = Self::decrypt(&ciphertext, &private_key_path, &public_cert_path)?;

        String::from_utf8(plaintext).map_err(|_| LookupError::DecryptionFailed)
    }
}

impl std::fmt::Debug for Pkcs7Decryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pkcs7Decryptor")
            .field("key_paths", &self.key_paths)
            .finish()
    }
}
