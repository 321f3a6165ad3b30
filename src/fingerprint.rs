//! Content fingerprints: hashing code spans and reading the hash a prior
//! generation run embedded in a comment.

use regex::Regex;
use sha2::{Digest as _, Sha256};

use crate::types::Fingerprint;

/// The documentation tag marking a comment as managed. Usable at most once
/// per comment; when it appears more than once the first occurrence wins.
pub const DOC_TAG: &str = "@autodocs";

/// Compute the fingerprint of a code span.
///
/// A pure function of the span bytes: same bytes in, same lowercase hex
/// digest out, on every platform and every run. Whitespace outside the span
/// never participates.
pub fn hash_span(span_text: &str) -> Fingerprint {
    let digest = Sha256::digest(span_text.as_bytes());
    return Fingerprint(format!("{digest:x}"));
}

/// Whether a comment body carries the documentation tag.
///
/// # Panics
///
/// Panics if the hardcoded tag regex is invalid (compile-time invariant).
pub fn contains_tag(raw_text: &str) -> bool {
    return tag_pattern().is_match(raw_text);
}

/// Extract the fingerprint stored after the tag, if any.
///
/// The stored value is whatever hex string follows the first `@autodocs`
/// marker; a tag with no argument (a freshly written comment) yields `None`.
///
/// # Panics
///
/// Panics if the hardcoded tag regex is invalid (compile-time invariant).
pub fn stored_fingerprint(raw_text: &str) -> Option<Fingerprint> {
    let captures = tag_pattern().captures(raw_text)?;
    let hex = captures.get(1)?.as_str();
    return Some(Fingerprint(hex.to_ascii_lowercase()));
}

/// The tag pattern: `@autodocs` on a word boundary, optionally followed by a
/// hex argument on the same line.
fn tag_pattern() -> Regex {
    return Regex::new(r"@autodocs\b[ \t]*([0-9a-fA-F]+)?").expect("valid regex");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let code = "function add(a,b){return a+b}";
        assert_eq!(hash_span(code), hash_span(code));
    }

    #[test]
    fn hash_matches_known_vector() {
        // sha256 of the empty string.
        assert_eq!(
            hash_span("").0,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn any_byte_change_flips_hash() {
        let a = hash_span("function add(a,b){return a+b}");
        let b = hash_span("function add(a,b){return a+b }");
        assert_ne!(a, b, "whitespace-only change must flip the fingerprint");
    }

    #[test]
    fn detects_tag_in_block_comment() {
        assert!(contains_tag("/** @autodocs */"));
        assert!(contains_tag("/**\n * Adds numbers.\n * @autodocs abc123\n */"));
        assert!(!contains_tag("/** plain comment */"));
    }

    #[test]
    fn tag_requires_word_boundary() {
        assert!(!contains_tag("/** @autodocstuff */"));
    }

    #[test]
    fn extracts_stored_hash() {
        let raw = "/**\n * Adds numbers.\n * @autodocs deadbeef\n */";
        assert_eq!(stored_fingerprint(raw), Some(Fingerprint("deadbeef".to_string())));
    }

    #[test]
    fn bare_tag_has_no_stored_hash() {
        assert_eq!(stored_fingerprint("/** @autodocs */"), None);
    }

    #[test]
    fn stored_hash_is_lowercased() {
        let raw = "/** @autodocs DEADBEEF */";
        assert_eq!(stored_fingerprint(raw), Some(Fingerprint("deadbeef".to_string())));
    }

    #[test]
    fn first_tag_wins_when_repeated() {
        let raw = "/** @autodocs aaaa\n @autodocs bbbb */";
        assert_eq!(stored_fingerprint(raw), Some(Fingerprint("aaaa".to_string())));
    }
}
