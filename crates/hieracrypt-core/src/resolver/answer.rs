//! Recursive answer resolution
//!
//! Walks a value taken from a data document and returns a value of the same
//! shape in which every string has been interpolated and, when it is an
//! `ENC[...]` envelope, decrypted.

use crate::crypto::envelope;
use crate::crypto::SharedDecryptor;
use crate::error::LookupResult;
use crate::interpolation::SharedInterpolator;
use crate::types::{ConfigMap, ConfigValue, Scope};

/// Resolves document values into plaintext answers
///
/// Holds no state between calls. Decryption happens per string, only for
/// the values actually being resolved.
pub struct AnswerResolver {
    interpolator: SharedInterpolator,
    decryptor: SharedDecryptor,
}

impl AnswerResolver {
    /// Create a resolver from an interpolator and a decryptor
    pub fn new(interpolator: SharedInterpolator, decryptor: SharedDecryptor) -> Self {
        Self {
            interpolator,
            decryptor,
        }
    }

    /// Get the decryptor used for envelopes
    pub fn decryptor(&self) -> &SharedDecryptor {
        &self.decryptor
    }

    /// Resolve a value
    ///
    /// - Booleans and numbers are returned untouched (no interpolation)
    /// - Strings are interpolated, then decrypted if they are envelopes
    /// - Mappings and sequences are rebuilt with every child resolved
    /// - Null is returned as is
    pub fn resolve(&self, value: &ConfigValue, scope: &Scope) -> LookupResult<ConfigValue> {
        Ok(match value {
            ConfigValue::Null
            | ConfigValue::Bool(_)
            | ConfigValue::Integer(_)
            | ConfigValue::Float(_) => value.clone(),
            ConfigValue::String(text) => ConfigValue::String(self.resolve_string(text, scope)?),
            ConfigValue::Mapping(map) => {
                let mut resolved = ConfigMap::with_capacity(map.len());
                for (key, child) in map {
                    resolved.insert(key.clone(), self.resolve(child, scope)?);
                }
                ConfigValue::Mapping(resolved)
            }
            ConfigValue::Sequence(items) => ConfigValue::Sequence(
                items
                    .iter()
                    .map(|item| self.resolve(item, scope))
                    .collect::<LookupResult<_>>()?,
            ),
        })
    }

    /// Resolve a single string
    pub fn resolve_string(&self, text: &str, scope: &Scope) -> LookupResult<String> {
        let interpolated = self.interpolator.interpolate(text, scope);
        if envelope::is_envelope(&interpolated) {
            self.decryptor.decrypt_envelope(&interpolated, scope)
        } else {
            Ok(interpolated)
        }
    }
}

impl std::fmt::Debug for AnswerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerResolver")
            .field("decryptor", &self.decryptor.name())
            .finish()
    }
}
