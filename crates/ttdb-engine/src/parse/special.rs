use std::collections::HashMap;
use ttdb_core::{Coordinate, RecordId, SpecialConfig};

use super::scanner;

pub const SPECIAL_BLOCK_LANG: &str = "ttdb-special";
pub const CURSOR_BLOCK_LANG: &str = "cursor";
pub const SOUTH_POLE_LAT: f64 = -90.0;

const SOUTH_POLE_EPSILON: f64 = 1e-6;

// South-pole records carry app configuration instead of graph content. The
// config must name a `kind`; without one the record stays in the graph.
pub fn parse_special(coord: Coordinate, body: &str) -> Option<(String, SpecialConfig)> {
    if (coord.lat - SOUTH_POLE_LAT).abs() > SOUTH_POLE_EPSILON {
        return None;
    }
    let lines = scanner::find_fenced_block(body, SPECIAL_BLOCK_LANG)?;

    let mut config: SpecialConfig = HashMap::new();
    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = split_entry(stripped) {
            config.insert(key, value);
        }
    }

    let kind = config
        .get("kind")
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if kind.is_empty() {
        return None;
    }
    Some((kind, config))
}

fn split_entry(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let key_ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !key_ok || value.is_empty() {
        return None;
    }
    let value = strip_quotes(value.trim());
    Some((key.to_ascii_lowercase(), value.to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// The cursor block remembers the previously selected record: the first list
// item after a `selected:` line, up to the first non-list non-blank line.
pub fn parse_cursor(text: &str) -> Option<RecordId> {
    let lines = scanner::find_fenced_block(text, CURSOR_BLOCK_LANG)?;
    let mut in_selected = false;
    for line in lines {
        let stripped = line.trim();
        if stripped.starts_with("selected:") {
            in_selected = true;
            continue;
        }
        if !in_selected {
            continue;
        }
        if let Some(rest) = stripped.strip_prefix('-') {
            if let Some(id) = rest.split_whitespace().next() {
                return Some(RecordId::new(id));
            }
            continue;
        }
        if !stripped.is_empty() {
            break;
        }
    }
    None
}
