//! Summary combination.
//!
//! Merges per-chunk summaries into one combined summary according to the
//! style's policy. Input order is chunk order and is never changed here;
//! no part's contribution is dropped (bullet merging may collapse
//! consecutive duplicate lines, which is the one sanctioned exception).

use crate::style::{CombinePolicy, SummaryStyle};

/// Merge partial summaries, already in chunk-index order, into one text.
///
/// A single part is returned verbatim for every style, so combining is
/// idempotent.
pub fn combine(parts: &[String], style: SummaryStyle) -> String {
    match parts {
        [] => String::new(),
        [single] => single.clone(),
        _ => match style.combine_policy() {
            CombinePolicy::ProseJoin => parts.join("\n\n"),
            CombinePolicy::BulletMerge => merge_bullets(parts),
        },
    }
}

/// Normalize each part into bullet lines and concatenate, collapsing
/// consecutive duplicate bullets (case-insensitive exact match)
fn merge_bullets(parts: &[String]) -> String {
    let mut bullets: Vec<String> = Vec::new();
    let mut last_key: Option<String> = None;

    for part in parts {
        for line in part.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let content = strip_bullet_marker(line);
            let key = content.to_lowercase();

            if last_key.as_deref() == Some(key.as_str()) {
                continue;
            }

            bullets.push(format!("- {}", content));
            last_key = Some(key);
        }
    }

    bullets.join("\n")
}

/// Remove a leading bullet marker, if any, returning the line content
fn strip_bullet_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    // Bare markers without trailing space
    line.strip_prefix(['-', '*', '\u{2022}'])
        .map(str::trim_start)
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert_eq!(combine(&[], SummaryStyle::Concise), "");
    }

    #[test]
    fn test_single_part_is_verbatim_for_every_style() {
        let s = "A lone summary without bullets.";
        for style in SummaryStyle::ALL {
            assert_eq!(combine(&parts(&[s]), style), s);
        }
    }

    #[test]
    fn test_prose_join_uses_blank_line_and_keeps_order() {
        let combined = combine(&parts(&["First part.", "Second part."]), SummaryStyle::Detailed);
        assert_eq!(combined, "First part.\n\nSecond part.");
    }

    #[test]
    fn test_bullet_merge_collapses_consecutive_duplicates() {
        let combined = combine(
            &parts(&["- A\n- B", "- B\n- C"]),
            SummaryStyle::BulletPoints,
        );
        assert_eq!(combined, "- A\n- B\n- C");
    }

    #[test]
    fn test_bullet_merge_keeps_nonconsecutive_duplicates() {
        let combined = combine(
            &parts(&["- A\n- B", "- A"]),
            SummaryStyle::BulletPoints,
        );
        assert_eq!(combined, "- A\n- B\n- A");
    }

    #[test]
    fn test_bullet_merge_normalizes_markers_and_prose_lines() {
        let combined = combine(
            &parts(&["* First idea\nSecond idea", "\u{2022} Third idea"]),
            SummaryStyle::BulletPoints,
        );
        assert_eq!(combined, "- First idea\n- Second idea\n- Third idea");
    }

    #[test]
    fn test_bullet_duplicate_match_is_case_insensitive() {
        let combined = combine(
            &parts(&["- Key Point", "- key point\n- Another"]),
            SummaryStyle::BulletPoints,
        );
        assert_eq!(combined, "- Key Point\n- Another");
    }

    #[test]
    fn test_no_part_is_dropped() {
        let input = parts(&["one", "two", "three", "four"]);
        let combined = combine(&input, SummaryStyle::Concise);
        for part in &input {
            assert!(combined.contains(part));
        }
    }
}
