//! Project/dataset selection state.

use serde::{Deserialize, Serialize};

/// Dataset used when none has been chosen or persisted.
pub const DEFAULT_DATASET: &str = "production";

/// The session's current project and dataset selection.
///
/// `dataset` always has a value; `project_id` may be absent until the
/// store yields a persisted value or the user picks one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub dataset: String,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self { project_id: None, dataset: DEFAULT_DATASET.to_string() }
    }
}

impl ProjectContext {
    /// True once a project has been resolved or chosen.
    pub fn has_project(&self) -> bool {
        self.project_id.as_ref().is_some_and(|id| !id.trim().is_empty())
    }
}
