//! # Quarry Core
//!
//! Credential resolution and authenticated session logic for the Quarry
//! content-API workbench.
//!
//! A token may live in zero, one, or several places at once: the
//! host-managed secret store, a same-device fallback cache, or a URL
//! parameter deposited by the external OAuth redirect. This crate picks
//! exactly one source deterministically (store first, always), migrates
//! transitional values into the store, and hands the winning credential
//! to [`quarry_client`] for query execution and listings.
//!
//! The embedding UI shell is not this crate's concern; [`Session`] is the
//! seam it drives.

pub mod error;
pub mod modules;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use modules::config::{load_config, save_config, update_config, ApiSettings, AppConfig};
pub use modules::fallback_cache::{FallbackCache, FileFallbackCache, MemoryFallbackCache};
pub use modules::redirect::{AuthStatus, RedirectParams};
pub use modules::resolver::{Resolution, ResolveNotice, TokenResolver};
pub use modules::secret_store::{FileSecretStore, MemorySecretStore, SecretStore};
pub use modules::selector::ProjectSelector;
pub use modules::session::Session;
