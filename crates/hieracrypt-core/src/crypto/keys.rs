//! Key material loading

use std::fs;
use std::path::{Path, PathBuf};

use openssl::pkey::{Id, PKey, Private};
use openssl::x509::X509;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};
use crate::interpolation::Interpolator;
use crate::types::Scope;

/// Private key used when none is configured
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "/etc/hiera/keys/private_key.pem";

/// Certificate used when none is configured
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "/etc/hiera/keys/public_key.pem";

/// Configured locations of the private key and certificate
///
/// Both entries are templates: they are interpolated against the lookup
/// scope before use, so a path may depend on scope variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPaths {
    /// PEM RSA private key path template
    #[serde(default, alias = ":private_key", skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// PEM X.509 certificate path template
    #[serde(default, alias = ":public_key", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl KeyPaths {
    /// Create key paths that fall back to the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the private key path template
    pub fn with_private_key(mut self, path: impl Into<String>) -> Self {
        self.private_key = Some(path.into());
        self
    }

    /// Set the certificate path template
    pub fn with_public_key(mut self, path: impl Into<String>) -> Self {
        self.public_key = Some(path.into());
        self
    }

    /// Resolve both paths for a scope
    ///
    /// Returns `(private_key_path, certificate_path)`.
    pub fn resolve(&self, interpolator: &dyn Interpolator, scope: &Scope) -> (PathBuf, PathBuf) {
        let resolve_one = |configured: &Option<String>, default: &str| match configured {
            Some(template) => PathBuf::from(interpolator.interpolate(template, scope)),
            None => PathBuf::from(default),
        };

        (
            resolve_one(&self.private_key, DEFAULT_PRIVATE_KEY_PATH),
            resolve_one(&self.public_key, DEFAULT_PUBLIC_KEY_PATH),
        )
    }
}

/// A private key and the certificate it pairs with
///
/// Loaded from disk on every decryption so that key files replaced on disk
/// take effect on the next lookup.
pub struct KeyMaterial {
    private_key: PKey<Private>,
    certificate: X509,
}

impl KeyMaterial {
    /// Read and parse the key and certificate files
    ///
    /// Unreadable files are `KeyMaterialUnavailable`. Contents that do not
    /// parse as a PEM RSA key or PEM certificate are `DecryptionFailed`.
    pub fn load(private_key_path: &Path, certificate_path: &Path) -> LookupResult<Self> {
        let key_pem = fs::read(private_key_path)
            .map_err(|e| LookupError::key_material(private_key_path, e))?;
        let cert_pem = fs::read(certificate_path)
            .map_err(|e| LookupError::key_material(certificate_path, e))?;

        let private_key =
            PKey::private_key_from_pem(&key_pem).map_err(|_| LookupError::DecryptionFailed)?;
        if private_key.id() != Id::RSA {
            return Err(LookupError::DecryptionFailed);
        }
        let certificate = X509::from_pem(&cert_pem).map_err(|_| LookupError::DecryptionFailed)?;

        Ok(Self {
            private_key,
            certificate,
        })
    }

    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }

    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
