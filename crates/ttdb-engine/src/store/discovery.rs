use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use ttdb_core::RecordId;

// Ordered list of discovered identifiers as a JSON array. Absence or
// corruption reads as empty; writes are best-effort.
#[derive(Debug, Clone)]
pub struct DiscoveryStore {
    path: PathBuf,
}

impl DiscoveryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<String> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(id) => Some(id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn save(&self, ids: &[RecordId]) {
        let names: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        let Ok(data) = serde_json::to_string_pretty(&names) else {
            return;
        };
        if let Err(err) = super::write_atomic(&self.path, &data) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist discovery state");
        }
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to clear discovery state");
            }
        }
    }
}
