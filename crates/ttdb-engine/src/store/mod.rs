mod discovery;
mod prefs;

pub use discovery::DiscoveryStore;
pub use prefs::{Preferences, PreferencesStore};

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

pub const DISCOVERY_FILE: &str = ".ttdb_discovery.json";
pub const PREFERENCES_FILE: &str = ".ttdb_prefs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub discovery: PathBuf,
    pub preferences: PathBuf,
}

impl StorePaths {
    pub fn beside_database(db_path: &Path) -> Self {
        let dir = db_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            discovery: dir.join(DISCOVERY_FILE),
            preferences: dir.join(PREFERENCES_FILE),
        }
    }
}

// Write-then-rename so readers never observe a half-written store.
pub(crate) fn write_atomic(path: &Path, data: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create store directory {}", parent.display()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
