//! Throwaway keys and envelopes for tests

use std::fs;
use std::path::PathBuf;

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::stack::Stack;
use openssl::symm::Cipher;
use openssl::x509::{X509, X509NameBuilder};
use tempfile::TempDir;

use super::envelope;
use super::keys::KeyPaths;

/// An RSA key pair with a self-signed certificate written to a temp dir
pub(crate) struct TestKeys {
    pub dir: TempDir,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub certificate: X509,
}

impl TestKeys {
    pub fn generate() -> Self {
        Self::generate_named("hiera-test")
    }

    pub fn generate_named(common_name: &str) -> Self {
        let rsa = Rsa::generate(2048).unwrap();
        let private_key_pem = rsa.private_key_to_pem().unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();
        let certificate = self_signed(&pkey, common_name);

        let dir = tempfile::tempdir().unwrap();
        let private_key_path = dir.path().join("private_key.pem");
        let public_key_path = dir.path().join("public_key.pem");
        fs::write(&private_key_path, private_key_pem).unwrap();
        fs::write(&public_key_path, certificate.to_pem().unwrap()).unwrap();

        Self {
            dir,
            private_key_path,
            public_key_path,
            certificate,
        }
    }

    /// Key paths pointing at these files
    pub fn key_paths(&self) -> KeyPaths {
        KeyPaths::new()
            .with_private_key(self.private_key_path.to_string_lossy())
            .with_public_key(self.public_key_path.to_string_lossy())
    }

    /// PKCS7 DER ciphertext for this certificate
    pub fn encrypt_der(&self, plaintext: &str) -> Vec<u8> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// PKCS7 DER ciphertext of arbitrary bytes
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut certs = Stack::new().unwrap();
        certs.push(self.certificate.clone()).unwrap();
        Pkcs7::encrypt(&certs, plaintext, Cipher::aes_256_cbc(), Pkcs7Flags::BINARY)
            .unwrap()
            .to_der()
            .unwrap()
    }

    /// `ENC[...]` envelope for this certificate
    pub fn encrypt(&self, plaintext: &str) -> String {
        envelope::encode(&self.encrypt_der(plaintext))
    }
}

fn self_signed(pkey: &PKey<Private>, common_name: &str) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(1).unwrap().to_asn1_integer().unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();
    builder.sign(pkey, MessageDigest::sha256()).unwrap();
    builder.build()
}
