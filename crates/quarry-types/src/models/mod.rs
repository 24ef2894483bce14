//! Core domain models shared across the Quarry workspace.

mod credential;
mod keys;
mod project;

// Re-export all models
pub use credential::{Credential, CredentialSource};
pub use keys::SecretKeys;
pub use project::{ProjectContext, DEFAULT_DATASET};
