//! # Quarry Types
//!
//! Core domain models for the Quarry workspace.
//!
//! `quarry-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          quarry-types (this crate)
//!                  │
//!                  ▼
//!             quarry-core ──▶ quarry-client
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for persistence and IPC
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod models;

// Re-export core model types
pub use models::{Credential, CredentialSource, ProjectContext, SecretKeys, DEFAULT_DATASET};
