//! Envelope decoding and asymmetric decryption
//!
//! - `envelope`: detects `ENC[...]` values and decodes their payload
//! - `keys`: key path configuration and key material loading
//! - `Pkcs7Decryptor`: PKCS7 enveloped-data decryption

pub mod envelope;
mod keys;
mod traits;
mod decryptor;

#[cfg(test)]
pub(crate) mod test_support;

pub use keys::{KeyMaterial, KeyPaths, DEFAULT_PRIVATE_KEY_PATH, DEFAULT_PUBLIC_KEY_PATH};
pub use traits::{Decryptor, SharedDecryptor};
pub use decryptor::Pkcs7Decryptor;
