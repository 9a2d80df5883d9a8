//! Parsing primitives for text extraction and replacement.
//!
//! All pattern-driven operations in upkeep (version elements, build
//! metadata) are built on these helpers. Each pattern must contain exactly
//! one capture group for the value to extract or replace.

use regex::Regex;

/// Extract first match from content using regex pattern with capture group.
/// Content is trimmed before matching.
pub fn extract_first(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(content.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Replace all matches of the capture group with a new value, keeping the
/// surrounding text of each match. Returns (new_content, replacement_count).
pub fn replace_all(content: &str, pattern: &str, replacement: &str) -> Option<(String, usize)> {
    let re = Regex::new(pattern).ok()?;
    let mut count = 0usize;

    let replaced = re
        .replace_all(content, |caps: &regex::Captures| {
            count += 1;
            let full_match = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            let captured = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            full_match.replacen(captured, replacement, 1)
        })
        .to_string();

    Some((replaced, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_first_returns_capture() {
        let content = "<MajorVersion>2</MajorVersion>";
        let result = extract_first(content, r"<MajorVersion>(\d+)</MajorVersion>");
        assert_eq!(result, Some("2".to_string()));
    }

    #[test]
    fn extract_first_none_when_absent() {
        assert_eq!(extract_first("no match here", r"Version:\s*(\d+)"), None);
    }

    #[test]
    fn replace_all_keeps_surrounding_text() {
        let content = "<PatchVersion>3</PatchVersion>";
        let (replaced, count) =
            replace_all(content, r"<PatchVersion>(\d+)</PatchVersion>", "4").unwrap();
        assert_eq!(replaced, "<PatchVersion>4</PatchVersion>");
        assert_eq!(count, 1);
    }

    #[test]
    fn replace_all_counts_multiple() {
        let content = "Version: 1.2.3\nVersion: 1.2.3\n";
        let (replaced, count) = replace_all(content, r"Version:\s*(\d+\.\d+\.\d+)", "2.0.0").unwrap();
        assert_eq!(count, 2);
        assert!(!replaced.contains("1.2.3"));
    }

    #[test]
    fn invalid_pattern_is_none() {
        assert!(replace_all("x", r"([unclosed", "y").is_none());
    }
}
