//! Token resolution.
//!
//! A token may exist in the secret store, in the fallback cache, in the
//! redirect parameters, in several of them at once, or nowhere. One
//! resolution pass picks exactly one source, in fixed precedence
//! (store, then redirect, then cache), and migrates transitional values
//! toward the store. Store failures degrade to the next source and are
//! reported as notices, never as errors that abort the session.

use std::sync::Arc;

use quarry_types::{Credential, CredentialSource, SecretKeys};

use crate::modules::fallback_cache::FallbackCache;
use crate::modules::redirect::RedirectParams;
use crate::modules::secret_store::SecretStore;

/// Non-fatal degradations observed during one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveNotice {
    StoreReadFailed(String),
    StoreWriteFailed(String),
    CacheReadFailed(String),
    CacheClearFailed(String),
}

/// Result of one resolution pass.
#[derive(Debug)]
pub struct Resolution {
    /// The single active credential, when any source yielded one.
    pub credential: Option<Credential>,
    /// Degradations the caller may surface as non-blocking notices.
    pub notices: Vec<ResolveNotice>,
    /// The spawned redirect-token store write, when one was attempted.
    /// The resolver never blocks on it; awaiting it is the caller's
    /// option (tests do, to observe the migrated value).
    pub pending_store_write: Option<tokio::task::JoinHandle<()>>,
}

/// Tagged per-source probe result, folded in precedence order.
enum SourceHit {
    Found(Credential),
    NotFound,
}

/// Deterministic precedence over the credential sources.
pub struct TokenResolver {
    store: Arc<dyn SecretStore>,
    cache: Arc<dyn FallbackCache>,
    keys: SecretKeys,
}

impl TokenResolver {
    pub fn new(
        store: Arc<dyn SecretStore>,
        cache: Arc<dyn FallbackCache>,
        keys: SecretKeys,
    ) -> Self {
        Self { store, cache, keys }
    }

    /// Resolve the active credential for this session.
    ///
    /// Sources are strictly sequential, never raced: a racing read could
    /// migrate a stale cache value over a freshly stored one. Re-running
    /// with no external change yields the same token and performs no
    /// further migration writes.
    pub async fn resolve(&self, redirect: Option<RedirectParams>) -> Resolution {
        let mut notices = Vec::new();
        let mut pending_store_write = None;

        if let SourceHit::Found(credential) = self.probe_store(&mut notices).await {
            return Resolution { credential: Some(credential), notices, pending_store_write };
        }
        if let SourceHit::Found(credential) =
            self.probe_redirect(redirect, &mut pending_store_write)
        {
            return Resolution { credential: Some(credential), notices, pending_store_write };
        }
        if let SourceHit::Found(credential) = self.probe_cache(&mut notices).await {
            return Resolution { credential: Some(credential), notices, pending_store_write };
        }

        // No source yielded a value; the caller prompts re-authentication.
        Resolution { credential: None, notices, pending_store_write }
    }

    /// Highest priority: the authoritative store. A hit here ends the
    /// pass with no migration of any kind.
    async fn probe_store(&self, notices: &mut Vec<ResolveNotice>) -> SourceHit {
        match self.store.get_secret(&self.keys.token).await {
            Ok(Some(value)) if !value.trim().is_empty() => {
                SourceHit::Found(Credential::new(CredentialSource::Store, value))
            }
            Ok(_) => SourceHit::NotFound,
            Err(e) => {
                tracing::warn!("store read failed, degrading to next source: {}", e);
                notices.push(ResolveNotice::StoreReadFailed(e.to_string()));
                SourceHit::NotFound
            }
        }
    }

    /// The redirect token is active immediately; its store write is
    /// spawned so the pass does not block on it, and attempted exactly
    /// once. The redirect itself holds no state to purge.
    fn probe_redirect(
        &self,
        redirect: Option<RedirectParams>,
        pending: &mut Option<tokio::task::JoinHandle<()>>,
    ) -> SourceHit {
        let Some(token) = redirect.and_then(RedirectParams::usable_token) else {
            return SourceHit::NotFound;
        };

        let store = Arc::clone(&self.store);
        let key = self.keys.token.clone();
        let value = token.clone();
        *pending = Some(tokio::spawn(async move {
            if let Err(e) = store.set_secret(&key, &value).await {
                tracing::warn!("failed to persist redirect token to store: {}", e);
            } else {
                tracing::debug!("redirect token persisted to store");
            }
        }));

        SourceHit::Found(Credential::new(CredentialSource::Redirect, token))
    }

    /// Lowest priority: the fallback cache. Migration is write-then-clear;
    /// a failed store write leaves the cache entry in place so the token
    /// survives for a later pass.
    async fn probe_cache(&self, notices: &mut Vec<ResolveNotice>) -> SourceHit {
        let value = match self.cache.get(&self.keys.token).await {
            Ok(Some(value)) if !value.trim().is_empty() => value,
            Ok(_) => return SourceHit::NotFound,
            Err(e) => {
                tracing::warn!("cache read failed: {}", e);
                notices.push(ResolveNotice::CacheReadFailed(e.to_string()));
                return SourceHit::NotFound;
            }
        };

        match self.store.set_secret(&self.keys.token, &value).await {
            Ok(()) => {
                if let Err(e) = self.cache.remove(&self.keys.token).await {
                    tracing::warn!("migrated token but could not clear cache: {}", e);
                    notices.push(ResolveNotice::CacheClearFailed(e.to_string()));
                } else {
                    tracing::debug!("cache token migrated into store");
                }
            }
            Err(e) => {
                tracing::warn!("store write failed, keeping cache entry: {}", e);
                notices.push(ResolveNotice::StoreWriteFailed(e.to_string()));
            }
        }

        SourceHit::Found(Credential::new(CredentialSource::Cache, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::modules::fallback_cache::MemoryFallbackCache;
    use crate::modules::redirect::AuthStatus;
    use crate::modules::secret_store::MemorySecretStore;
    use async_trait::async_trait;

    /// Store whose writes always fail; reads delegate to an inner map.
    struct ReadOnlyStore {
        inner: MemorySecretStore,
    }

    #[async_trait]
    impl SecretStore for ReadOnlyStore {
        async fn get_secret(&self, key: &str) -> AppResult<Option<String>> {
            self.inner.get_secret(key).await
        }

        async fn set_secret(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Store("secret service unreachable".to_string()))
        }

        async fn clear_secret(&self, _key: &str) -> AppResult<()> {
            Err(AppError::Store("secret service unreachable".to_string()))
        }
    }

    fn resolver(
        store: Arc<dyn SecretStore>,
        cache: Arc<dyn FallbackCache>,
    ) -> TokenResolver {
        TokenResolver::new(store, cache, SecretKeys::default())
    }

    fn redirect(token: &str, status: AuthStatus) -> Option<RedirectParams> {
        Some(RedirectParams { token: Some(token.to_string()), status: Some(status) })
    }

    #[tokio::test]
    async fn test_store_wins_and_cache_is_untouched() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        store.set_secret(&keys.token, "tok-store").await.unwrap();
        cache.set(&keys.token, "tok-cache").await.unwrap();

        let resolution =
            resolver(store.clone(), cache.clone()).resolve(None).await;

        let cred = resolution.credential.expect("store token expected");
        assert_eq!(cred.value, "tok-store");
        assert_eq!(cred.source, CredentialSource::Store);
        // A store hit never clears or overwrites the lower-priority source.
        assert_eq!(cache.get(&keys.token).await.unwrap(), Some("tok-cache".to_string()));
        assert!(resolution.pending_store_write.is_none());
    }

    #[tokio::test]
    async fn test_store_wins_over_redirect() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        store.set_secret(&keys.token, "tok-store").await.unwrap();

        let resolution = resolver(store.clone(), cache)
            .resolve(redirect("tok-redirect", AuthStatus::Success))
            .await;

        assert_eq!(resolution.credential.unwrap().value, "tok-store");
        // No redirect write was attempted on a store hit.
        assert!(resolution.pending_store_write.is_none());
        assert_eq!(store.get_secret(&keys.token).await.unwrap(), Some("tok-store".to_string()));
    }

    #[tokio::test]
    async fn test_blank_store_value_counts_as_absent() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        store.set_secret(&keys.token, "   ").await.unwrap();
        cache.set(&keys.token, "tok-cache").await.unwrap();

        let resolution = resolver(store, cache).resolve(None).await;

        let cred = resolution.credential.expect("cache token expected");
        assert_eq!(cred.source, CredentialSource::Cache);
    }

    #[tokio::test]
    async fn test_redirect_beats_cache_and_persists() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        cache.set(&keys.token, "tok-cache").await.unwrap();

        let resolution = resolver(store.clone(), cache.clone())
            .resolve(redirect("tok-redirect", AuthStatus::Success))
            .await;

        let cred = resolution.credential.expect("redirect token expected");
        assert_eq!(cred.value, "tok-redirect");
        assert_eq!(cred.source, CredentialSource::Redirect);

        // The write is fire-and-forget but observable once complete.
        resolution.pending_store_write.expect("write was spawned").await.unwrap();
        assert_eq!(
            store.get_secret(&keys.token).await.unwrap(),
            Some("tok-redirect".to_string())
        );
        // The redirect path does not touch the cache.
        assert_eq!(cache.get(&keys.token).await.unwrap(), Some("tok-cache".to_string()));
    }

    #[tokio::test]
    async fn test_errored_redirect_falls_through_to_cache() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        cache.set(&keys.token, "tok-cache").await.unwrap();

        let resolution = resolver(store, cache)
            .resolve(redirect("tok-redirect", AuthStatus::Error))
            .await;

        assert_eq!(resolution.credential.unwrap().value, "tok-cache");
    }

    #[tokio::test]
    async fn test_cache_migration_is_write_then_clear() {
        let keys = SecretKeys::default();
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());
        cache.set(&keys.token, "tok-abc").await.unwrap();

        let resolution = resolver(store.clone(), cache.clone()).resolve(None).await;

        assert_eq!(resolution.credential.unwrap().value, "tok-abc");
        assert_eq!(store.get_secret(&keys.token).await.unwrap(), Some("tok-abc".to_string()));
        assert_eq!(cache.get(&keys.token).await.unwrap(), None);
        assert!(resolution.notices.is_empty());
    }

    #[tokio::test]
    async fn test_failed_store_write_keeps_cache_entry() {
        let keys = SecretKeys::default();
        let store = Arc::new(ReadOnlyStore { inner: MemorySecretStore::new() });
        let cache = Arc::new(MemoryFallbackCache::new());
        cache.set(&keys.token, "tok-abc").await.unwrap();

        let resolution = resolver(store, cache.clone()).resolve(None).await;

        // The token is still usable this session...
        assert_eq!(resolution.credential.unwrap().value, "tok-abc");
        // ...and not lost for the next one.
        assert_eq!(cache.get(&keys.token).await.unwrap(), Some("tok-abc".to_string()));
        assert!(resolution
            .notices
            .iter()
            .any(|n| matches!(n, ResolveNotice::StoreWriteFailed(_))));
    }

    #[tokio::test]
    async fn test_no_sources_yields_none() {
        let store = Arc::new(MemorySecretStore::new());
        let cache = Arc::new(MemoryFallbackCache::new());

        let resolution = resolver(store, cache).resolve(None).await;

        assert!(resolution.credential.is_none());
        assert!(resolution.notices.is_empty());
    }

    #[tokio::test]
    async fn test_store_read_failure_degrades_with_notice() {
        struct BrokenStore;

        #[async_trait]
        impl SecretStore for BrokenStore {
            async fn get_secret(&self, _key: &str) -> AppResult<Option<String>> {
                Err(AppError::Store("secret service unreachable".to_string()))
            }
            async fn set_secret(&self, _key: &str, _value: &str) -> AppResult<()> {
                Err(AppError::Store("secret service unreachable".to_string()))
            }
            async fn clear_secret(&self, _key: &str) -> AppResult<()> {
                Err(AppError::Store("secret service unreachable".to_string()))
            }
        }

        let keys = SecretKeys::default();
        let cache = Arc::new(MemoryFallbackCache::new());
        cache.set(&keys.token, "tok-abc").await.unwrap();

        let resolution = resolver(Arc::new(BrokenStore), cache.clone()).resolve(None).await;

        // Resolution degraded to the cache instead of aborting.
        assert_eq!(resolution.credential.unwrap().value, "tok-abc");
        assert!(resolution
            .notices
            .iter()
            .any(|n| matches!(n, ResolveNotice::StoreReadFailed(_))));
        // Failed migration write: entry stays for a later retry.
        assert_eq!(cache.get(&keys.token).await.unwrap(), Some("tok-abc".to_string()));
    }
}
