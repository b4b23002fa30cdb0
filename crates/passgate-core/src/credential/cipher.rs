//! AES-256-GCM credential envelope.
//!
//! Wire format: `base64url(nonce[12] || ciphertext || tag[16])`, no associated
//! data. Padded URL-safe base64 is canonical; unpadded input is accepted too.
//!
//! Decoding order (each step fails as `MalformedCredential`):
//! 1. base64
//! 2. nonce split (input shorter than the nonce)
//! 3. authenticated open (wrong key, tampering)
//! 4. JSON payload shape, non-empty passkey

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::credential::payload::DecryptedPayload;
use crate::error::{PassgateError, Result};

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;
/// GCM standard nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Process-wide cipher handle, built once from configuration.
#[derive(Clone)]
pub struct CredentialCipher {
    aead: Aes256Gcm,
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher").finish_non_exhaustive()
    }
}

impl CredentialCipher {
    /// Build from raw key bytes. Anything but exactly 32 bytes is rejected.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(PassgateError::BadRequest(format!(
                "encryption_key must be {KEY_LEN} bytes (got {})",
                key.len()
            )));
        }
        let aead = Aes256Gcm::new_from_slice(key)
            .map_err(|e| PassgateError::BadRequest(format!("encryption_key rejected: {e}")))?;
        Ok(Self { aead })
    }

    /// Open an encrypted credential.
    pub fn open(&self, credential: &str) -> Result<DecryptedPayload> {
        let data = decode_base64(credential)?;

        if data.len() < NONCE_LEN {
            return Err(malformed("ciphertext too short"));
        }
        let (nonce, sealed) = data.split_at(NONCE_LEN);

        let plaintext = self
            .aead
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| malformed("authentication failed"))?;

        let payload: DecryptedPayload = serde_json::from_slice(&plaintext)
            .map_err(|e| PassgateError::MalformedCredential(format!("payload: {e}")))?;

        if payload.passkey.is_empty() {
            return Err(malformed("payload carries an empty passkey"));
        }
        Ok(payload)
    }

    /// Seal a payload into a credential string under a fresh random nonce.
    pub fn seal(&self, payload: &DecryptedPayload) -> Result<String> {
        let plaintext = serde_json::to_vec(payload)
            .map_err(|e| PassgateError::Internal(format!("payload encode failed: {e}")))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .aead
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| PassgateError::Internal("credential seal failed".into()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&sealed);
        Ok(URL_SAFE.encode(out))
    }
}

fn decode_base64(s: &str) -> Result<Vec<u8>> {
    URL_SAFE
        .decode(s)
        .or_else(|_| URL_SAFE_NO_PAD.decode(s))
        .map_err(|e| PassgateError::MalformedCredential(format!("base64: {e}")))
}

fn malformed(msg: &str) -> PassgateError {
    PassgateError::MalformedCredential(msg.to_string())
}
