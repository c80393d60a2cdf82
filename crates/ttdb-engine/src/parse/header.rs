use ttdb_core::{Coordinate, Edge, RecordId, DEFAULT_EDGE_KIND};

pub fn find_header(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| line.starts_with('@'))
}

pub fn record_id(header: &str) -> Option<&str> {
    header.split_whitespace().next()
}

// Consume a leading `-?digits[.digits]` float; a bare trailing dot stays
// unconsumed.
fn take_float(input: &str) -> Option<(f64, &str)> {
    let bytes = input.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            end = frac_end;
        }
    }
    let value: f64 = input[..end].parse().ok()?;
    Some((value, &input[end..]))
}

// Identifiers of the form `@LAT<float>LON<float>` carry globe coordinates.
pub fn coordinate_from_id(id: &str) -> Option<(f64, f64)> {
    let rest = id.strip_prefix("@LAT")?;
    let (lat, rest) = take_float(rest)?;
    let rest = rest.strip_prefix("LON")?;
    let (lon, rest) = take_float(rest)?;
    if !rest.is_empty() {
        return None;
    }
    Some((lat, lon))
}

pub fn coordinate_for(id: &str, header: &str) -> Option<Coordinate> {
    let (lat, lon) = coordinate_from_id(id)?;
    Some(Coordinate {
        lat,
        lon,
        depth: depth_attr(header),
    })
}

// `z:<float>` header attribute, word-boundary anchored; absent means depth 0.
pub fn depth_attr(header: &str) -> f64 {
    let bytes = header.as_bytes();
    for (idx, _) in header.match_indices("z:") {
        if idx > 0 {
            let prev = bytes[idx - 1];
            if prev.is_ascii_alphanumeric() || prev == b'_' {
                continue;
            }
        }
        let rest = header[idx + 2..].trim_start();
        if let Some((value, _)) = take_float(rest) {
            return value;
        }
    }
    0.0
}

// `relates:<list>` up to a `|` terminator; comma-separated tokens, each
// either `target` or `type>target`.
pub fn relates_edges(header: &str) -> Vec<Edge> {
    let Some(pos) = header.find("relates:") else {
        return Vec::new();
    };
    let list = &header[pos + "relates:".len()..];
    let list = list.split('|').next().unwrap_or("");
    let mut edges = Vec::new();
    for raw in list.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        let (kind, target) = match token.split_once('>') {
            Some((left, right)) => {
                let kind = left.trim();
                let kind = if kind.is_empty() { DEFAULT_EDGE_KIND } else { kind };
                (kind, right.trim())
            }
            None => (DEFAULT_EDGE_KIND, token),
        };
        edges.push(Edge {
            kind: kind.to_string(),
            target: RecordId::new(target),
        });
    }
    edges
}
