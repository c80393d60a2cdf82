mod header;
mod scanner;
mod special;

pub use header::coordinate_from_id;
pub use special::{CURSOR_BLOCK_LANG, SOUTH_POLE_LAT, SPECIAL_BLOCK_LANG};

use ttdb_core::{Database, Record, RecordId};

// Full-text parse. Never fails: blocks without a header line are skipped
// and an unstructured file yields an empty graph.
pub fn parse_database(text: &str) -> Database {
    let mut db = Database {
        cursor_selected: special::parse_cursor(text),
        ..Database::default()
    };

    for block in scanner::split_blocks(text) {
        let Some(header_index) = header::find_header(&block) else {
            continue;
        };
        let header_line = block[header_index].trim();
        let Some(raw_id) = header::record_id(header_line) else {
            continue;
        };
        let id = RecordId::new(raw_id);

        let mut title = None;
        let mut body_lines: Vec<&str> = Vec::new();
        for &line in &block[header_index + 1..] {
            if title.is_none() {
                if let Some(heading) = title_line(line) {
                    title = Some(heading.to_string());
                    continue;
                }
            }
            body_lines.push(line);
        }
        let body = body_lines.join("\n").trim().to_string();

        let coordinate = header::coordinate_for(raw_id, header_line);
        if let Some(coord) = coordinate {
            if let Some((kind, config)) = special::parse_special(coord, &body) {
                db.specials.insert(kind, config);
                continue;
            }
            db.coords.insert(id.clone(), coord);
        }

        let record = Record {
            id: id.clone(),
            header: header_line.to_string(),
            title,
            body,
            edges: header::relates_edges(header_line),
        };
        // a redeclared id overwrites content but keeps its first position
        if db.records.insert(id.clone(), record).is_none() {
            db.order.push(id);
        }
    }

    db
}

// `## <title>`: only the first such body line becomes the title.
fn title_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.chars().next()?.is_whitespace() {
        return None;
    }
    Some(rest.trim())
}
