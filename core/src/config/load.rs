use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default parabens data directory: ~/.parabens
pub fn get_parabens_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".parabens"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.parabens/config.toml (highest)
    let parabens_dir = get_parabens_data_dir()?;
    let user_config = parabens_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if user_config.exists() {
        let s = std::fs::read_to_string(&user_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else if local_config.exists() {
        let s = std::fs::read_to_string(local_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    // Update logging directory to use the parabens data directory if not set
    if cfg.logging.directory.is_none()
        || cfg
            .logging
            .directory
            .as_ref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(false)
    {
        let logs_dir = parabens_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    if let Ok(v) = std::env::var("PARABENS_AERENDER") {
        if !v.trim().is_empty() {
            cfg.render.aerender_path = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("PARABENS_PROJECT") {
        if !v.trim().is_empty() {
            cfg.render.project_path = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("PARABENS_FFMPEG") {
        if !v.trim().is_empty() {
            cfg.encode.ffmpeg_path = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("PARABENS_OUTPUT_DIR") {
        if !v.trim().is_empty() {
            cfg.paths.output_dir = PathBuf::from(v);
        }
    }

    Ok(cfg)
}
