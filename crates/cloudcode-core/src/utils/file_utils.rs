//! Atomic JSON persistence.

use serde::Serialize;
use std::path::Path;

use crate::error::AppResult;

/// Write `content` as pretty JSON via a sibling temp file and a rename.
pub async fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, content: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(content)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, json).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}
