use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub guided_tour: bool,
    pub guided_tour_slow: bool,
    pub invert_drag_y: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            guided_tour: true,
            guided_tour_slow: false,
            invert_drag_y: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_default(&self) -> Preferences {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Preferences::default();
        };
        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn save(&self, prefs: &Preferences) {
        let Ok(data) = serde_json::to_string_pretty(prefs) else {
            return;
        };
        if let Err(err) = super::write_atomic(&self.path, &data) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist preferences");
        }
    }
}
