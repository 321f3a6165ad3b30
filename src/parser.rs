//! Source parsing and managed-comment extraction.
//!
//! Parses one file's full text with tree-sitter, collects every block comment
//! carrying the `@autodocs` tag, and associates each with the syntactic node
//! immediately following it (the code it documents).

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::Error;
use crate::fingerprint;
use crate::types::{DocComment, Location};

/// Maximum source file size (16 MiB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Parse a source file and extract its managed comments, in ascending
/// start-offset order.
///
/// Each comment's `code_span` is the nearest named, non-comment node whose
/// start offset is at or past the comment's end offset; a comment that is
/// the last construct in the file gets no span. Fingerprints are computed
/// here so callers never re-read the tree.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// or `Error::ParseFailed` if tree-sitter cannot produce an error-free tree.
pub fn extract_comments(
    file_path: &Path,
    source: &str,
    language: &Language,
) -> Result<Vec<DocComment>, Error> {
    let source_len: u64 = source.len().try_into().unwrap_or(u64::MAX);
    if source_len > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            file: file_path.to_path_buf(),
            max_bytes: MAX_FILE_SIZE,
            size_bytes: source_len,
        });
    }

    let tree = parse_source(file_path, source, language)?;

    let mut comments = Vec::new();
    collect_managed_comments(tree.root_node(), source, &mut comments);

    for comment in &mut comments {
        let code_span = find_node_after(tree.root_node(), comment.range.end);
        comment.computed_fingerprint = code_span
            .as_ref()
            .and_then(|span| return source.get(span.clone()))
            .map(fingerprint::hash_span);
        comment.code_span = code_span;
    }

    return Ok(comments);
}

/// Parse source into a tree-sitter tree.
///
/// A tree containing error nodes is rejected: a misparsed file would
/// associate comments with garbage spans, so the whole file is refused.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_source(file_path: &Path, source: &str, language: &Language) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| Error::ParseFailed {
        file: file_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tree = parser.parse(source, None).ok_or_else(|| Error::ParseFailed {
        file: file_path.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    })?;

    if tree.root_node().has_error() {
        return Err(Error::ParseFailed {
            file: file_path.to_path_buf(),
            reason: "syntax errors in source".to_string(),
        });
    }

    Ok(tree)
}

/// Recursively collect block comments that carry the documentation tag.
/// Pre-order traversal keeps the result sorted by start offset.
fn collect_managed_comments(node: Node<'_>, source: &str, comments: &mut Vec<DocComment>) {
    if node.kind().contains("comment") {
        if let Some(comment) = managed_comment_from_node(node, source) {
            comments.push(comment);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_managed_comments(child, source, comments);
    }
}

/// Build a `DocComment` from a comment node, or `None` when the comment is
/// not a tagged block comment. Line comments never qualify.
fn managed_comment_from_node(node: Node<'_>, source: &str) -> Option<DocComment> {
    let raw_text = source.get(node.start_byte()..node.end_byte())?;
    if !raw_text.starts_with("/*") || !fingerprint::contains_tag(raw_text) {
        return None;
    }

    let start = node.start_position();
    let line = u32::try_from(start.row).unwrap_or(u32::MAX).saturating_add(1);
    let column = u32::try_from(start.column).unwrap_or(u32::MAX).saturating_add(1);

    Some(DocComment {
        code_span: None,
        computed_fingerprint: None,
        location: Location { column, line },
        range: node.start_byte()..node.end_byte(),
        raw_text: raw_text.to_string(),
        stored_fingerprint: fingerprint::stored_fingerprint(raw_text),
    })
}

/// Find the byte range of the node immediately after `pos`: the named,
/// non-extra node with the smallest start offset at or past `pos`, widest
/// match winning on ties so the whole declaration is covered.
fn find_node_after(root: Node<'_>, pos: usize) -> Option<std::ops::Range<usize>> {
    let mut best: Option<(usize, usize)> = None;
    search_node_after(root, pos, &mut best);
    best.map(|(start, end)| return start..end)
}

/// Recursive worker for `find_node_after`. Once a node qualifies its
/// descendants cannot improve on it (they start no earlier and end no
/// later), so the subtree is skipped. Comment subtrees are never entered:
/// some grammars give comments named children that would otherwise pose
/// as code.
fn search_node_after(node: Node<'_>, pos: usize, best: &mut Option<(usize, usize)>) {
    if node.is_extra() || node.kind().contains("comment") {
        return;
    }

    if node.is_named() && node.start_byte() >= pos {
        let candidate = (node.start_byte(), node.end_byte());
        let improves = match best {
            None => true,
            Some((start, end)) => {
                candidate.0 < *start || (candidate.0 == *start && candidate.1 > *end)
            },
        };
        if improves {
            *best = Some(candidate);
        }
        return;
    }

    if node.end_byte() <= pos {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        search_node_after(child, pos, best);
    }
}
