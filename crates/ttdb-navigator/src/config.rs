use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub database: PathBuf,
    pub poll_interval_ms: u64,
    pub tick_interval_ms: u64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("TerminologyDB.md"),
            poll_interval_ms: 1500,
            tick_interval_ms: 16,
            viewport_width: 800.0,
            viewport_height: 520.0,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "ttdb")?;
    Some(proj.config_dir().join("navigator.toml"))
}

pub fn load_or_default() -> NavigatorConfig {
    let Some(path) = config_file_path() else {
        return NavigatorConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> NavigatorConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return NavigatorConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| NavigatorConfig::default())
}

pub fn save(cfg: &NavigatorConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &NavigatorConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize navigator config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write navigator config {}", path.display()))?;
    Ok(())
}
