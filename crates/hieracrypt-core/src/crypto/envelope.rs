//! `ENC[...]` envelope detection and decoding

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{LookupError, LookupResult};

/// Marker that opens an encrypted value
pub const ENVELOPE_PREFIX: &str = "ENC[";

/// Marker that closes an encrypted value
pub const ENVELOPE_SUFFIX: &str = "]";

/// Whether a string is an encrypted envelope
///
/// Only the opening marker is checked; the payload is not validated here.
pub fn is_envelope(value: &str) -> bool {
    value.starts_with(ENVELOPE_PREFIX)
}

/// Strip the envelope markers and base64-decode the payload
///
/// The last character is dropped as the closing marker without being
/// inspected. Whitespace inside the payload (values folded over several
/// YAML lines) is ignored.
pub fn strip_and_decode(value: &str) -> LookupResult<Vec<u8>> {
    let inner = value
        .strip_prefix(ENVELOPE_PREFIX)
        .ok_or_else(|| LookupError::MalformedEnvelope("missing ENC[ marker".to_string()))?;

    let mut chars = inner.chars();
    if chars.next_back().is_none() {
        return Err(LookupError::MalformedEnvelope(
            "missing closing marker".to_string(),
        ));
    }

    let payload: String = chars
        .as_str()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| LookupError::MalformedEnvelope(format!("invalid base64 payload: {}", e)))
}

/// Wrap raw ciphertext bytes in an envelope
pub fn encode(ciphertext: &[u8]) -> String {
    format!("{}{}{}", ENVELOPE_PREFIX, STANDARD.encode(ciphertext), ENVELOPE_SUFFIX)
}
