//! Authorization outcome returned by every hook.

use crate::error::{ClientCode, PassgateError};

/// Result of authorizing one tracker request.
///
/// Only `Approved` lets the host continue; every other variant maps to a
/// rejection with a stable reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    MissingCredential,
    MalformedCredential,
    Unapproved,
}

impl Outcome {
    pub fn is_approved(self) -> bool {
        matches!(self, Outcome::Approved)
    }

    /// Label used for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Approved => "approved",
            Outcome::MissingCredential => "missing_credential",
            Outcome::MalformedCredential => "malformed_credential",
            Outcome::Unapproved => "unapproved",
        }
    }

    /// Failure reason reported to the tracker client, `None` when approved.
    pub fn reason(self) -> Option<&'static str> {
        match self {
            Outcome::Approved => None,
            Outcome::MissingCredential => Some("missing passkey"),
            Outcome::MalformedCredential => Some("invalid passkey"),
            Outcome::Unapproved => Some("unapproved passkey"),
        }
    }

    pub fn client_code(self) -> Option<ClientCode> {
        match self {
            Outcome::Approved => None,
            Outcome::MissingCredential => Some(ClientCode::MissingCredential),
            Outcome::MalformedCredential => Some(ClientCode::MalformedCredential),
            Outcome::Unapproved => Some(ClientCode::Unapproved),
        }
    }
}

impl From<&PassgateError> for Outcome {
    /// Collapse an error into a rejection. Anything that is not a credential
    /// problem fails closed as `Unapproved`.
    fn from(err: &PassgateError) -> Self {
        match err {
            PassgateError::MissingCredential => Outcome::MissingCredential,
            PassgateError::MalformedCredential(_) => Outcome::MalformedCredential,
            _ => Outcome::Unapproved,
        }
    }
}
