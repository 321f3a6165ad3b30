//! Offset-safe multi-edit patching of a document buffer.
//!
//! All replacements for one pass are applied in a single sweep over the
//! ordered comment list, carrying a running signed delta so that each splice
//! target is derived from the original offsets plus the length drift of
//! earlier edits only. Out-of-order application would corrupt every
//! not-yet-processed offset and must not occur.

use crate::types::DocComment;

/// Apply all replacements to the original text in one pass.
///
/// `replacements` is aligned index-for-index with `comments`; `None` means
/// the comment is left byte-identical and contributes nothing to the delta.
/// `comments` must be sorted by ascending original start offset with
/// non-overlapping ranges, which the parser guarantees.
pub fn apply_replacements(
    original: &str,
    comments: &[DocComment],
    replacements: &[Option<String>],
) -> String {
    let mut text = original.to_string();
    let mut delta: isize = 0;

    for (comment, replacement) in comments.iter().zip(replacements) {
        let Some(new_text) = replacement else {
            continue;
        };

        let start = comment.range.start.checked_add_signed(delta).unwrap_or(0);
        let end = comment.range.end.checked_add_signed(delta).unwrap_or(0);
        text.replace_range(start..end, new_text);

        let new_len: isize = new_text.len().try_into().unwrap_or(isize::MAX);
        let old_len: isize = comment.raw_text.len().try_into().unwrap_or(isize::MAX);
        delta = delta.saturating_add(new_len).saturating_sub(old_len);
    }

    return text;
}

/// Render generated lines into a block comment, appending the fingerprint
/// tag line after the generated content so the next parse reads it back
/// as the stored fingerprint.
pub fn render_docstring(lines: &[String], fingerprint_hex: &str) -> String {
    let mut out = vec!["/**".to_string()];
    for line in lines {
        out.push(format!(" * {line}"));
    }
    out.push(format!(" * @autodocs {fingerprint_hex}"));
    out.push(" */".to_string());
    return out.join("\n");
}
