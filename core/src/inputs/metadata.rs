use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The record the After Effects template reads its text layers from.
/// The serialized field names are part of the template's data link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "funcao")]
    pub role: String,
}

/// Overwrite `info.json` under the data dir with the given record.
pub fn write_metadata(data_dir: &Path, meta: &VideoMetadata) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data dir '{}'", data_dir.display()))?;

    let path = data_dir.join("info.json");
    let json = serde_json::to_string_pretty(meta)?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write metadata to '{}'", path.display()))?;

    tracing::info!(path = %path.display(), name = %meta.name, "metadata updated");
    Ok(path)
}
