use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Loaded(String),
    Missing,
    Failed(String),
    Unchanged,
}

// Poll-based change detection on the backing file: re-read only when the
// modification time moved, re-parse only when the content differs.
#[derive(Debug)]
pub struct SourceWatcher {
    path: PathBuf,
    mtime: Option<SystemTime>,
    last_text: Option<String>,
    missing: bool,
}

impl SourceWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mtime: None,
            last_text: None,
            missing: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll(&mut self, force: bool) -> SourceEvent {
        if !self.path.exists() {
            let newly_missing = !self.missing;
            self.missing = true;
            self.mtime = None;
            self.last_text = None;
            return if newly_missing || force {
                SourceEvent::Missing
            } else {
                SourceEvent::Unchanged
            };
        }
        self.missing = false;

        let mtime = match fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(time) => time,
            Err(err) => {
                return SourceEvent::Failed(format!(
                    "unable to stat {}: {err}",
                    self.path.display()
                ));
            }
        };
        if !force && self.mtime == Some(mtime) {
            return SourceEvent::Unchanged;
        }

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                return SourceEvent::Failed(format!(
                    "unable to read {}: {err}",
                    self.path.display()
                ));
            }
        };
        self.mtime = Some(mtime);
        if !force && self.last_text.as_deref() == Some(text.as_str()) {
            return SourceEvent::Unchanged;
        }
        self.last_text = Some(text.clone());
        SourceEvent::Loaded(text)
    }
}
