//! Redirect parameter source.
//!
//! The external OAuth handoff deposits an optional `token` and an
//! optional `status` parameter into the page URL it redirects back to.
//! The parameters are consumed once per resolution pass, never polled.

/// Outcome reported by the external OAuth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Success,
    Error,
}

/// Token and status lifted from the active page's query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectParams {
    pub token: Option<String>,
    pub status: Option<AuthStatus>,
}

impl RedirectParams {
    /// Parse the active page URL. An unparseable URL carries no
    /// parameters.
    pub fn from_url(raw: &str) -> Self {
        let Ok(parsed) = url::Url::parse(raw) else {
            tracing::warn!("redirect URL did not parse, ignoring parameters");
            return Self { token: None, status: None };
        };

        let mut token = None;
        let mut status = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "token" if !value.trim().is_empty() => token = Some(value.into_owned()),
                "status" => {
                    status = match value.as_ref() {
                        "success" => Some(AuthStatus::Success),
                        "error" => Some(AuthStatus::Error),
                        _ => None,
                    };
                }
                _ => {}
            }
        }
        Self { token, status }
    }

    /// The token this redirect actually delivers, if any. An errored
    /// handoff is not a credential source even when a token parameter is
    /// present.
    pub fn usable_token(self) -> Option<String> {
        if self.status == Some(AuthStatus::Error) {
            return None;
        }
        self.token
    }
}
