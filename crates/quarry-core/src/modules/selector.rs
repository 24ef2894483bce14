//! Project/dataset selection.
//!
//! Listing is always an authenticated operation; with no token the
//! selector makes no call at all and exposes empty sequences. Selection
//! updates in-memory state first and persists best-effort; a failed
//! persist never rolls the selection back.

use std::sync::Arc;

use quarry_client::{ContentClient, Dataset, Project};
use quarry_types::{ProjectContext, SecretKeys};

use crate::modules::secret_store::SecretStore;

/// Sole writer of the session's [`ProjectContext`].
pub struct ProjectSelector {
    store: Arc<dyn SecretStore>,
    keys: SecretKeys,
    context: ProjectContext,
}

impl ProjectSelector {
    pub fn new(store: Arc<dyn SecretStore>, keys: SecretKeys) -> Self {
        Self { store, keys, context: ProjectContext::default() }
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    /// Adopt selections persisted in the store. Read failures leave the
    /// defaults in place; the session stays usable with no project
    /// selected.
    pub async fn hydrate(&mut self) {
        match self.store.get_secret(&self.keys.project_id).await {
            Ok(Some(id)) if !id.trim().is_empty() => self.context.project_id = Some(id),
            Ok(_) => {}
            Err(e) => tracing::warn!("could not read persisted project id: {}", e),
        }
        match self.store.get_secret(&self.keys.dataset).await {
            Ok(Some(dataset)) if !dataset.trim().is_empty() => self.context.dataset = dataset,
            Ok(_) => {}
            Err(e) => tracing::warn!("could not read persisted dataset: {}", e),
        }
    }

    /// List projects visible to the token's user. No token, no call.
    pub async fn list_projects(
        &self,
        client: &ContentClient,
        token: Option<&str>,
    ) -> Vec<Project> {
        let Some(token) = usable(token) else {
            return Vec::new();
        };
        match client.list_projects(token).await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::warn!("project listing failed: {}", e);
                Vec::new()
            }
        }
    }

    /// List one project's datasets. No token, no call.
    pub async fn list_datasets(
        &self,
        client: &ContentClient,
        token: Option<&str>,
        project_id: &str,
    ) -> Vec<Dataset> {
        let Some(token) = usable(token) else {
            return Vec::new();
        };
        match client.list_datasets(token, project_id).await {
            Ok(datasets) => datasets,
            Err(e) => {
                tracing::warn!("dataset listing failed for {}: {}", project_id, e);
                Vec::new()
            }
        }
    }

    /// Choose a project. The in-memory selection takes effect before the
    /// persist is attempted.
    pub async fn select_project(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.context.project_id = Some(id.clone());
        if let Err(e) = self.store.set_secret(&self.keys.project_id, &id).await {
            tracing::warn!("could not persist project selection: {}", e);
        }
    }

    /// Choose a dataset. Same discipline as [`Self::select_project`].
    pub async fn select_dataset(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.context.dataset = name.clone();
        if let Err(e) = self.store.set_secret(&self.keys.dataset, &name).await {
            tracing::warn!("could not persist dataset selection: {}", e);
        }
    }
}

fn usable(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}
