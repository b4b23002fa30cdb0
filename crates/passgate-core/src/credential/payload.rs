use serde::{Deserialize, Serialize};

/// Auxiliary flag carried by issuers as either a JSON bool or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuxFlag {
    Bool(bool),
    Text(String),
}

/// Plaintext of an encrypted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedPayload {
    /// Underlying passkey; never empty once opened.
    #[serde(rename = "pk")]
    pub passkey: String,
    /// Issue time (unix seconds).
    #[serde(rename = "ts", default)]
    pub timestamp: i64,
    #[serde(rename = "fd", default, skip_serializing_if = "Option::is_none")]
    pub aux_flag: Option<AuxFlag>,
    #[serde(rename = "pd", default, skip_serializing_if = "Option::is_none")]
    pub aux_percent: Option<String>,
}

impl DecryptedPayload {
    pub fn new(passkey: impl Into<String>, timestamp: i64) -> Self {
        Self {
            passkey: passkey.into(),
            timestamp,
            aux_flag: None,
            aux_percent: None,
        }
    }
}
