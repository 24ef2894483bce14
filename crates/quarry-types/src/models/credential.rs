//! Credential data model.

use serde::{Deserialize, Serialize};

/// Where the active credential was found during resolution.
///
/// The store is authoritative; cache and redirect values are transitional
/// and migrated into the store exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// The host-provided secret store (authoritative).
    Store,
    /// The same-device fallback cache.
    Cache,
    /// A token parameter delivered by the external OAuth redirect.
    Redirect,
}

/// An access token together with its provenance.
///
/// At most one credential is active per session. The value is opaque to
/// this crate; it is attached verbatim as a bearer token by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Which source yielded the token
    pub source: CredentialSource,
    /// The opaque token value
    pub value: String,
    /// Unix timestamp (seconds) when the credential was resolved
    pub acquired_at: i64,
}

impl Credential {
    /// Create a credential resolved now from the given source.
    pub fn new(source: CredentialSource, value: impl Into<String>) -> Self {
        Self {
            source,
            value: value.into(),
            acquired_at: chrono::Utc::now().timestamp(),
        }
    }

    /// A usable credential carries a non-empty token value.
    pub fn is_usable(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_usability() {
        let cred = Credential::new(CredentialSource::Store, "tok-1");
        assert!(cred.is_usable());
        assert_eq!(cred.source, CredentialSource::Store);

        let blank = Credential::new(CredentialSource::Cache, "   ");
        assert!(!blank.is_usable());
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&CredentialSource::Redirect).unwrap();
        assert_eq!(json, "\"redirect\"");
    }
}
