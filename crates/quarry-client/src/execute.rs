//! Query execution engine.
//!
//! A rejected token must not block queries the user could make
//! anonymously (some datasets are public-readable), so an authorization
//! failure triggers exactly one token-less retry. One retry bounds
//! worst-case latency to two round trips.

use serde_json::Value;

use crate::client::ContentClient;
use crate::types::{QueryOutcome, QueryRequest};

/// Authorization posture of one attempt. The only transition is
/// `Authenticated -> Anonymous` on an authorization failure; both states
/// are otherwise terminal, which makes the exactly-one-retry invariant
/// structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Authenticated,
    Anonymous,
}

impl ContentClient {
    /// Run one query, degrading to anonymous access when the token is
    /// rejected. Never returns an error: every failure path becomes a
    /// typed [`QueryOutcome::Failure`].
    pub async fn execute(&self, request: QueryRequest) -> QueryOutcome {
        // Both postures are fixed before the first call; the fallback is
        // ready up front, not built reactively. A request with no usable
        // token starts (and ends) anonymous.
        let primary_token = request.token.as_deref().filter(|t| !t.trim().is_empty());
        let mut attempt = if primary_token.is_some() {
            Attempt::Authenticated
        } else {
            Attempt::Anonymous
        };

        loop {
            let token = match attempt {
                Attempt::Authenticated => primary_token,
                Attempt::Anonymous => None,
            };

            match self.fetch_envelope(&request, token).await {
                Ok(envelope) => {
                    return QueryOutcome::Success {
                        result: envelope.result.unwrap_or(Value::Null),
                    };
                }
                Err(err) if err.is_unauthorized() && attempt == Attempt::Authenticated => {
                    tracing::debug!(
                        project_id = %request.project_id,
                        dataset = %request.dataset,
                        "token rejected, retrying once without credentials"
                    );
                    attempt = Attempt::Anonymous;
                }
                Err(err) => {
                    return QueryOutcome::Failure {
                        kind: err.failure_kind(),
                        message: err.to_string(),
                    };
                }
            }
        }
    }
}
