//! App data directory resolution.

use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Get (and create if needed) the app data directory.
pub fn get_data_dir() -> AppResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| AppError::Config("could not determine user data directory".to_string()))?;
    let dir = base.join("quarry");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
