use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport configuration for [`crate::ContentClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host serving authenticated API traffic.
    pub api_host: String,
    /// Host serving cached read traffic (`use_cdn` queries).
    pub cdn_host: String,
    /// API version path segment.
    pub api_version: String,
    /// Transport timeout; a hung call surfaces as a network error.
    pub timeout_secs: u64,
    /// Explicit base URL. When set, host derivation is bypassed entirely
    /// (self-hosted deployments, tests).
    pub base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: "api.quarry.dev".to_string(),
            cdn_host: "apicdn.quarry.dev".to_string(),
            api_version: "v1".to_string(),
            timeout_secs: 30,
            base_url: None,
        }
    }
}

/// One query invocation. Immutable once constructed; a second query from
/// the user produces a second independent request.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// Project the query runs against.
    pub project_id: String,
    /// Dataset within the project.
    pub dataset: String,
    /// Raw query text, passed through unmodified. Injection safety is the
    /// query language's parameter-binding concern, not this layer's.
    pub query: String,
    /// Named parameters, passed through verbatim and unordered.
    pub params: serde_json::Map<String, Value>,
    /// Route the read through the CDN host.
    pub use_cdn: bool,
    /// Bearer token for the primary attempt, if one was resolved.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

/// Raw provider response wrapper.
///
/// Deliberately not auto-unwrapped: some provider configurations embed an
/// authorization error in a 200-shaped body, so the envelope has to be
/// inspected before the result is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryEnvelope {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
    /// Server-side execution time, when reported.
    #[serde(default)]
    pub ms: Option<u64>,
}

/// Error payload embedded in a response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeError {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnvelopeError {
    /// Expired/invalid-permission responses carry this error type even
    /// under a 200 status on some provider configurations.
    pub fn is_credentials_error(&self) -> bool {
        self.kind.as_deref() == Some("credentialsError")
    }

    /// Best human-readable message available.
    pub fn message(&self) -> &str {
        self.description.as_deref().or(self.kind.as_deref()).unwrap_or("unknown provider error")
    }
}

/// Failure taxonomy surfaced to the embedding UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider rejected the credentials (after the anonymous retry).
    Unauthorized,
    /// Transport-level failure, surfaced verbatim without retry.
    NetworkError,
    /// Well-formed rejection from the API, surfaced verbatim without retry.
    ProviderError,
}

/// Final result of one query execution.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum QueryOutcome {
    /// The unwrapped envelope result.
    Success { result: Value },
    /// Typed failure; nothing in query execution aborts the process.
    Failure { kind: FailureKind, message: String },
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A project visible to the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// A dataset within a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_mode: Option<String>,
}
