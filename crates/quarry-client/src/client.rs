use crate::error::ClientError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Client for the content API.
///
/// Holds one transport; per-call authorization is decided by the caller
/// (the query engine runs an authenticated and an anonymous posture over
/// the same transport, listings always require a token).
pub struct ContentClient {
    http: Client,
    config: ClientConfig,
}

impl ContentClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST the query and return the raw envelope.
    ///
    /// The envelope is inspected here: a 401 status or a 200 body carrying
    /// a credentials error both surface as [`ClientError::Unauthorized`],
    /// so the engine's retry decision sees one signal.
    pub(crate) async fn fetch_envelope(
        &self,
        request: &QueryRequest,
        token: Option<&str>,
    ) -> Result<QueryEnvelope, ClientError> {
        let url = query_url(&self.config, &request.project_id, &request.dataset, request.use_cdn);
        let body = json!({ "query": request.query, "params": request.params });

        let mut builder = self.http.post(&url).json(&body);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        let resp = builder.send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unauthorized { message });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Provider { status: status.as_u16(), message });
        }

        let envelope: QueryEnvelope =
            resp.json().await.map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if let Some(err) = &envelope.error {
            if err.is_credentials_error() {
                return Err(ClientError::Unauthorized { message: err.message().to_string() });
            }
            return Err(ClientError::Provider {
                status: status.as_u16(),
                message: err.message().to_string(),
            });
        }

        Ok(envelope)
    }

    /// List the projects visible to the token's user.
    pub async fn list_projects(&self, token: &str) -> Result<Vec<Project>, ClientError> {
        self.get_json(&projects_url(&self.config), token).await
    }

    /// List the datasets of one project.
    pub async fn list_datasets(
        &self,
        token: &str,
        project_id: &str,
    ) -> Result<Vec<Dataset>, ClientError> {
        self.get_json(&datasets_url(&self.config, project_id), token).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let resp = self.http.get(url).bearer_auth(token).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Unauthorized { message });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Provider { status: status.as_u16(), message });
        }

        resp.json().await.map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Query endpoint for a project/dataset pair.
///
/// Queries ride a per-project host (CDN host when requested); an explicit
/// `base_url` bypasses host derivation entirely.
pub(crate) fn query_url(
    config: &ClientConfig,
    project_id: &str,
    dataset: &str,
    use_cdn: bool,
) -> String {
    if let Some(base) = &config.base_url {
        return format!("{}/{}/data/query/{}", base.trim_end_matches('/'), config.api_version, dataset);
    }
    let host = if use_cdn { &config.cdn_host } else { &config.api_host };
    format!("https://{}.{}/{}/data/query/{}", project_id, host, config.api_version, dataset)
}

/// Project listing endpoint. Management calls never ride the CDN.
pub(crate) fn projects_url(config: &ClientConfig) -> String {
    match &config.base_url {
        Some(base) => format!("{}/{}/projects", base.trim_end_matches('/'), config.api_version),
        None => format!("https://{}/{}/projects", config.api_host, config.api_version),
    }
}

/// Dataset listing endpoint for one project.
pub(crate) fn datasets_url(config: &ClientConfig, project_id: &str) -> String {
    match &config.base_url {
        Some(base) => {
            format!("{}/{}/projects/{}/datasets", base.trim_end_matches('/'), config.api_version, project_id)
        }
        None => format!(
            "https://{}/{}/projects/{}/datasets",
            config.api_host, config.api_version, project_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_uses_project_host() {
        let config = ClientConfig::default();

        let url = query_url(&config, "zp7mbokg", "production", false);
        assert_eq!(url, "https://zp7mbokg.api.quarry.dev/v1/data/query/production");

        let cdn = query_url(&config, "zp7mbokg", "production", true);
        assert_eq!(cdn, "https://zp7mbokg.apicdn.quarry.dev/v1/data/query/production");
    }

    #[test]
    fn test_base_url_override_bypasses_host_derivation() {
        let config = ClientConfig {
            base_url: Some("http://127.0.0.1:8045/".to_string()),
            ..Default::default()
        };

        assert_eq!(
            query_url(&config, "zp7mbokg", "staging", true),
            "http://127.0.0.1:8045/v1/data/query/staging"
        );
        assert_eq!(projects_url(&config), "http://127.0.0.1:8045/v1/projects");
        assert_eq!(
            datasets_url(&config, "zp7mbokg"),
            "http://127.0.0.1:8045/v1/projects/zp7mbokg/datasets"
        );
    }

    #[test]
    fn test_management_urls_never_use_cdn_host() {
        let config = ClientConfig::default();
        assert_eq!(projects_url(&config), "https://api.quarry.dev/v1/projects");
        assert_eq!(
            datasets_url(&config, "zp7mbokg"),
            "https://api.quarry.dev/v1/projects/zp7mbokg/datasets"
        );
    }
}
