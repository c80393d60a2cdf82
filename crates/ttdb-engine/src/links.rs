use std::path::{Path, PathBuf};

use ttdb_core::{Database, RecordId};

pub const INTERNAL_SCHEME: &str = "ttdb";

const INERT_SCHEME: &str = "javascript:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Internal(RecordId),
    External(String),
    Inert,
}

// `javascript:` is the reserved do-not-navigate pseudo-scheme.
pub fn is_inert(target: &str) -> bool {
    target.trim().to_ascii_lowercase().starts_with(INERT_SCHEME)
}

fn strip_angle_brackets(target: &str) -> &str {
    let trimmed = target.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('<') && trimmed.ends_with('>') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

// Internal forms: bare id, `#id`, `ttdb://id`, `ttdb:id`, optionally with a
// leading slash. The target must resolve in the current graph.
pub fn resolve_internal(db: &Database, target: &str) -> Option<RecordId> {
    let mut cleaned = strip_angle_brackets(target);
    if let Some(idx) = cleaned.rfind('#') {
        cleaned = cleaned[idx + 1..].trim();
    }
    if let Some(rest) = cleaned.strip_prefix("ttdb://") {
        cleaned = rest.trim();
    } else if let Some(rest) = cleaned.strip_prefix("ttdb:") {
        cleaned = rest.trim();
    }
    if cleaned.starts_with('/') {
        cleaned = cleaned.trim_start_matches('/').trim();
    }
    if cleaned.is_empty() {
        return None;
    }
    let id = RecordId::new(cleaned);
    db.contains(&id).then_some(id)
}

pub fn resolve(db: &Database, target: &str) -> LinkTarget {
    if let Some(id) = resolve_internal(db, target) {
        return LinkTarget::Internal(id);
    }
    let cleaned = strip_angle_brackets(target);
    if cleaned.is_empty() || is_inert(cleaned) {
        return LinkTarget::Inert;
    }
    if cleaned.starts_with("www.") {
        return LinkTarget::External(format!("https://{cleaned}"));
    }
    LinkTarget::External(cleaned.to_string())
}

fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

// Local asset lookup for special-config paths: absolute as-is, otherwise
// relative to the database directory, then to the working directory.
pub fn resolve_asset_path(base_dir: &Path, value: &str) -> Option<PathBuf> {
    let cleaned = value.trim();
    if cleaned.is_empty() || has_scheme(cleaned) {
        return None;
    }
    let candidate = PathBuf::from(cleaned);
    if candidate.is_absolute() {
        return candidate.exists().then_some(candidate);
    }
    let nested = base_dir.join(&candidate);
    if nested.exists() {
        return Some(nested);
    }
    candidate.exists().then_some(candidate)
}
