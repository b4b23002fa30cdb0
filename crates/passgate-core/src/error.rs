//! Shared error type across passgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// No credential anywhere in the request.
    MissingCredential,
    /// Credential present but undecodable.
    MalformedCredential,
    /// Credential well-formed but not confirmed valid.
    Unapproved,
    /// Invalid input / configuration.
    BadRequest,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MissingCredential => "MISSING_CREDENTIAL",
            ClientCode::MalformedCredential => "MALFORMED_CREDENTIAL",
            ClientCode::Unapproved => "UNAPPROVED",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PassgateError>;

/// Unified error type used by core and gateway.
///
/// The first three variants are rejections a tracker client sees as a
/// failure reason; the display strings are part of the wire contract.
#[derive(Debug, Error)]
pub enum PassgateError {
    #[error("missing passkey")]
    MissingCredential,
    #[error("invalid passkey")]
    MalformedCredential(String),
    #[error("unapproved passkey")]
    Unapproved,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PassgateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PassgateError::MissingCredential => ClientCode::MissingCredential,
            PassgateError::MalformedCredential(_) => ClientCode::MalformedCredential,
            PassgateError::Unapproved => ClientCode::Unapproved,
            PassgateError::BadRequest(_) => ClientCode::BadRequest,
            PassgateError::Internal(_) => ClientCode::Internal,
        }
    }
}
