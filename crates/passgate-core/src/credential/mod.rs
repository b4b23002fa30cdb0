//! Credential handling: where a credential is found in a request, and how an
//! encrypted credential envelope is opened.
//!
//! Two deployment modes exist and never mix:
//! - plaintext: the extracted string is the passkey itself.
//! - encrypted: the extracted string is `base64url(nonce || AES-256-GCM(json))`
//!   and the passkey lives inside the decrypted payload.
//!
//! All decoding paths are panic-free: malformed input is reported as
//! `PassgateError::MalformedCredential`.

pub mod cipher;
pub mod extract;
pub mod payload;

pub use cipher::{CredentialCipher, KEY_LEN, NONCE_LEN};
pub use extract::{extract_credential, CREDENTIAL_PARAM, LEGACY_PASSKEY_PARAM};
pub use payload::{AuxFlag, DecryptedPayload};
