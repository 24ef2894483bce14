//! Session composition.
//!
//! One `Session` per process: it owns the active credential slot and the
//! project selector. Single-writer discipline is enforced by privacy —
//! the credential is written only on the resolution path, and
//! `ProjectContext` only through the selector.

use std::sync::Arc;

use quarry_client::QueryRequest;
use quarry_types::{Credential, ProjectContext, SecretKeys};

use crate::modules::fallback_cache::FallbackCache;
use crate::modules::redirect::RedirectParams;
use crate::modules::resolver::{Resolution, TokenResolver};
use crate::modules::secret_store::SecretStore;
use crate::modules::selector::ProjectSelector;

/// Process-session-scoped state and the components that own it.
pub struct Session {
    resolver: TokenResolver,
    selector: ProjectSelector,
    token: Option<Credential>,
}

impl Session {
    pub fn new(
        store: Arc<dyn SecretStore>,
        cache: Arc<dyn FallbackCache>,
        keys: SecretKeys,
    ) -> Self {
        Self {
            resolver: TokenResolver::new(Arc::clone(&store), cache, keys.clone()),
            selector: ProjectSelector::new(store, keys),
            token: None,
        }
    }

    /// Establish the session: resolve the token, then adopt persisted
    /// project/dataset selections. Returns the resolution so the caller
    /// can surface its notices; a `None` credential means the user must
    /// re-authenticate.
    pub async fn bootstrap(&mut self, redirect: Option<RedirectParams>) -> Resolution {
        let resolution = self.resolver.resolve(redirect).await;
        self.token = resolution.credential.clone();
        self.selector.hydrate().await;
        resolution
    }

    /// The active credential, if one was resolved.
    pub fn token(&self) -> Option<&Credential> {
        self.token.as_ref()
    }

    /// Bearer value for outbound calls.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_ref().filter(|c| c.is_usable()).map(|c| c.value.as_str())
    }

    /// Current project/dataset selection (read-only; writes go through
    /// [`Self::selector`]).
    pub fn context(&self) -> &ProjectContext {
        self.selector.context()
    }

    /// The one component allowed to mutate the selection.
    pub fn selector(&mut self) -> &mut ProjectSelector {
        &mut self.selector
    }

    /// Read access to the selector (listings).
    pub fn selector_ref(&self) -> &ProjectSelector {
        &self.selector
    }

    /// Assemble an immutable query request from the current session
    /// state.
    pub fn query_request(
        &self,
        query: impl Into<String>,
        params: serde_json::Map<String, serde_json::Value>,
        use_cdn: bool,
    ) -> QueryRequest {
        QueryRequest {
            project_id: self.context().project_id.clone().unwrap_or_default(),
            dataset: self.context().dataset.clone(),
            query: query.into(),
            params,
            use_cdn,
            token: self.bearer().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::fallback_cache::MemoryFallbackCache;
    use crate::modules::secret_store::{MemorySecretStore, SecretStore};

    fn session_with(store: Arc<MemorySecretStore>) -> Session {
        Session::new(store, Arc::new(MemoryFallbackCache::new()), SecretKeys::default())
    }

    #[tokio::test]
    async fn test_query_request_assembly() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        store.set_secret(&keys.token, "tok-1").await.unwrap();
        store.set_secret(&keys.project_id, "zp7mbokg").await.unwrap();

        let mut session = session_with(store);
        session.bootstrap(None).await;

        let request = session.query_request("*[_type == 'post']", serde_json::Map::new(), true);

        assert_eq!(request.project_id, "zp7mbokg");
        assert_eq!(request.dataset, "production");
        assert_eq!(request.token.as_deref(), Some("tok-1"));
        assert!(request.use_cdn);
    }

    #[tokio::test]
    async fn test_unauthenticated_session_builds_anonymous_request() {
        let mut session = session_with(Arc::new(MemorySecretStore::new()));
        let resolution = session.bootstrap(None).await;

        assert!(resolution.credential.is_none());
        assert_eq!(session.bearer(), None);

        let request = session.query_request("*", serde_json::Map::new(), false);
        assert_eq!(request.token, None);
        assert_eq!(request.project_id, "");
    }
}
