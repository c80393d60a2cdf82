// Line-oriented scanning primitives for the database text format.

pub fn is_rule_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

pub fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if is_rule_line(line) {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    blocks.push(current);
    blocks
}

fn fence_tag(line: &str) -> Option<&str> {
    line.trim().strip_prefix("```").map(str::trim)
}

// First fenced block tagged `lang` (ASCII case-insensitive); the next fence
// line of any kind closes it. An unclosed fence yields nothing.
pub fn find_fenced_block<'a>(text: &'a str, lang: &str) -> Option<Vec<&'a str>> {
    let mut inside = false;
    let mut collected = Vec::new();
    for line in text.lines() {
        match fence_tag(line) {
            Some(_) if inside => return Some(collected),
            Some(tag) => {
                if tag.eq_ignore_ascii_case(lang) {
                    inside = true;
                }
            }
            None => {
                if inside {
                    collected.push(line);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_lines_need_three_dashes() {
        assert!(is_rule_line("---"));
        assert!(is_rule_line("  -----  "));
        assert!(!is_rule_line("--"));
        assert!(!is_rule_line("-- -"));
        assert!(!is_rule_line("*** "));
    }

    #[test]
    fn splits_on_rule_lines() {
        let blocks = split_blocks("a\nb\n---\nc\n----\nd");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], vec!["a", "b"]);
        assert_eq!(blocks[1], vec!["c"]);
        assert_eq!(blocks[2], vec!["d"]);
    }

    #[test]
    fn finds_tagged_fence_case_insensitive() {
        let text = "intro\n```Cursor\nselected:\n- x\n```\ntail";
        let lines = find_fenced_block(text, "cursor").expect("block found");
        assert_eq!(lines, vec!["selected:", "- x"]);
    }

    #[test]
    fn unclosed_fence_is_ignored() {
        assert!(find_fenced_block("```cursor\nselected:", "cursor").is_none());
    }

    #[test]
    fn other_fences_do_not_match() {
        assert!(find_fenced_block("```rust\nfn x() {}\n```", "cursor").is_none());
    }
}
