//! Canonical secret slot names.

use serde::{Deserialize, Serialize};

/// Names of the three independent secret store slots.
///
/// Key naming is configuration rather than hard-coded literals: hosts
/// differ in what they allow, and renaming a slot must not require a
/// rebuild. The defaults match the environment-variable convention used
/// by the hosted extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecretKeys {
    /// Slot holding the access token
    pub token: String,
    /// Slot holding the chosen project id
    pub project_id: String,
    /// Slot holding the chosen dataset name
    pub dataset: String,
}

impl Default for SecretKeys {
    fn default() -> Self {
        Self {
            token: "QUARRY_AUTH_TOKEN".to_string(),
            project_id: "QUARRY_PROJECT_ID".to_string(),
            dataset: "QUARRY_DATASET".to_string(),
        }
    }
}
