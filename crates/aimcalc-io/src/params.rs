use aimcalc_model::SceneParams;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Writes the full parameter record as JSON.
pub fn save_params(params: &SceneParams, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(params).context("serialize parameters")?;
    std::fs::write(path, json)
        .with_context(|| format!("write parameter file {}", path.display()))?;
    info!(path = %path.display(), "parameters saved");
    Ok(())
}

/// Reads a parameter record. Missing fields take their defaults.
pub fn load_params(path: impl AsRef<Path>) -> Result<SceneParams> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read parameter file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse parameter file {}", path.display()))
}
