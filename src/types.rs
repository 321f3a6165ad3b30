/// Core domain types for managed comments, spans, and fingerprints.
use std::ops::Range;

/// One `@autodocs` comment extracted from a source file, together with the
/// code span it documents. All offsets refer to the original, unmodified
/// text at parse time; the patch engine corrects them with a cumulative
/// delta while splicing.
#[derive(Debug, Clone)]
pub struct DocComment {
    /// Byte range of the syntactic node immediately following the comment.
    /// `None` when the comment is the last construct in the file.
    pub code_span: Option<Range<usize>>,
    /// Fingerprint of the current code span text. `None` iff `code_span` is.
    pub computed_fingerprint: Option<Fingerprint>,
    /// One-based line/column of the comment start, for reporting.
    pub location: Location,
    /// Byte range of the comment itself, delimiters included.
    pub range: Range<usize>,
    /// The comment's literal source text, delimiters included.
    pub raw_text: String,
    /// Fingerprint embedded in the comment by a prior generation run.
    pub stored_fingerprint: Option<Fingerprint>,
}

impl DocComment {
    /// Derive the sync state. `Synced` iff both fingerprints are present
    /// and equal; a comment with no code span can never be synced.
    pub fn sync_state(&self) -> SyncState {
        return match (&self.stored_fingerprint, &self.computed_fingerprint) {
            (Some(stored), Some(computed)) if stored == computed => SyncState::Synced,
            _ => SyncState::Stale,
        };
    }
}

/// A content fingerprint — 64 hex chars, always lowercase.
/// Newtype prevents mixing with arbitrary strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(
    /// The hex-encoded SHA-256 digest string.
    pub String,
);

/// One-based position of a comment in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// One-based column number.
    pub column: u32,
    /// One-based line number.
    pub line: u32,
}

/// Per-comment outcome of one resync pass. Comments already synced do not
/// produce an outcome at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenOutcome {
    /// Generation was attempted and failed; the comment was left untouched.
    Failed(String),
    /// The comment was replaced with freshly generated text.
    Regenerated,
    /// The comment was never sent to the generator.
    Skipped(&'static str),
}

/// Whether a managed comment still matches the code it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Stored and computed fingerprints differ, or one is missing.
    Stale,
    /// Stored fingerprint matches the computed one.
    Synced,
}
