//! Identifier case transforms.
//!
//! The conversion from mixed-case identifiers (`MaxRetryCount`, `fooBar`) to
//! UPPER_SNAKE_CASE follows a fixed three-step underscore-insertion algorithm.
//! The steps must stay in this order: word starts first, then camel joins,
//! then letter/digit boundaries.

use regex::Regex;
use std::sync::OnceLock;

/// The three underscore-insertion patterns, compiled once. A scan calls
/// the converter once per captured identifier.
fn conversion_patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"(.)([A-Z][a-z]+)").unwrap(),
            Regex::new(r"([a-z0-9])([A-Z])").unwrap(),
            Regex::new(r"([a-zA-Z])([0-9])").unwrap(),
        )
    })
}

/// Convert a PascalCase or camelCase identifier to UPPER_SNAKE_CASE.
///
/// Steps:
/// 1. `ABCFoo` → `ABC_Foo` (underscore before a capitalized word)
/// 2. `fooBar` → `foo_Bar` (underscore at camel-case joins)
/// 3. `Timeout30` → `Timeout_30` (underscore between letter and digit)
/// 4. uppercase everything.
///
/// Pure and deterministic; idempotent on input that is already
/// UPPER_SNAKE_CASE.
pub fn to_upper_snake(name: &str) -> String {
    let (word_start, camel_join, digit_boundary) = conversion_patterns();

    let s = word_start.replace_all(name, "${1}_${2}");
    let s = camel_join.replace_all(&s, "${1}_${2}");
    let s = digit_boundary.replace_all(&s, "${1}_${2}");
    s.to_uppercase()
}

/// True if the identifier is already fully uppercase with underscores and
/// digits (`^[A-Z_0-9]+$`). Such names are never remapped.
pub fn is_upper_snake(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_converts() {
        assert_eq!(to_upper_snake("MaxRetryCount"), "MAX_RETRY_COUNT");
        assert_eq!(to_upper_snake("DefaultChannelName"), "DEFAULT_CHANNEL_NAME");
    }

    #[test]
    fn camel_case_converts() {
        assert_eq!(to_upper_snake("fooBar"), "FOO_BAR");
        assert_eq!(to_upper_snake("maxValue"), "MAX_VALUE");
    }

    #[test]
    fn acronym_prefix_splits_before_word() {
        assert_eq!(to_upper_snake("ABCFoo"), "ABC_FOO");
        assert_eq!(to_upper_snake("HTTPTimeout"), "HTTP_TIMEOUT");
    }

    #[test]
    fn embedded_digits_get_separated() {
        assert_eq!(to_upper_snake("Timeout30Sec"), "TIMEOUT_30_SEC");
        assert_eq!(to_upper_snake("Sha256Digest"), "SHA_256_DIGEST");
    }

    #[test]
    fn idempotent_on_canonical_input() {
        for name in ["MAX_RETRY_COUNT", "TIMEOUT_30_SEC", "A", "X_1"] {
            assert_eq!(to_upper_snake(name), name);
            // applying twice changes nothing
            assert_eq!(to_upper_snake(&to_upper_snake(name)), name);
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let names = ["fooBar", "Timeout30Sec", "MaxRetryCount"];
        let first: Vec<String> = names.iter().map(|n| to_upper_snake(n)).collect();
        let again: Vec<String> = names.iter().rev().map(|n| to_upper_snake(n)).collect();
        assert_eq!(first[0], again[2]);
        assert_eq!(first[2], again[0]);
    }

    #[test]
    fn short_names_pass_through_uppercase() {
        assert_eq!(to_upper_snake("x"), "X");
        assert_eq!(to_upper_snake("pi"), "PI");
    }

    #[test]
    fn is_upper_snake_accepts_canonical() {
        assert!(is_upper_snake("MAX_RETRY_COUNT"));
        assert!(is_upper_snake("TIMEOUT_30"));
        assert!(is_upper_snake("X"));
    }

    #[test]
    fn is_upper_snake_rejects_mixed_case() {
        assert!(!is_upper_snake("MaxRetryCount"));
        assert!(!is_upper_snake("fooBar"));
        assert!(!is_upper_snake(""));
    }
}
