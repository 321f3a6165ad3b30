//! The per-file aggregate: owns the text and comment list, coordinates
//! parsing, fingerprinting, generation, and patching.

use std::path::PathBuf;

use tree_sitter::Language;

use crate::error::Error;
use crate::generator::{DocGenerator, GenJob, generate_all};
use crate::parser;
use crate::patch;
use crate::types::{DocComment, Location, RegenOutcome, SyncState};

/// One source file's text and its managed comments. Created fresh on every
/// parse; the only state that survives across runs is the fingerprint
/// embedded in the comment text itself.
pub struct Document {
    /// Managed comments in ascending original-start order. Never reshuffled.
    pub comments: Vec<DocComment>,
    /// Identifier of the backing file; opaque to the engine.
    pub path: PathBuf,
    /// The full current document content. Mutated only by `resync`.
    pub text: String,
}

/// Per-comment outcomes of one resync pass, in comment order.
pub struct ResyncReport {
    /// Location string and outcome for each non-synced comment.
    pub outcomes: Vec<(String, RegenOutcome)>,
}

impl ResyncReport {
    /// Number of comments whose generation failed.
    pub fn failed(&self) -> usize {
        return self.count(|o| return matches!(o, RegenOutcome::Failed(_)));
    }

    /// Number of comments successfully replaced.
    pub fn regenerated(&self) -> usize {
        return self.count(|o| return matches!(o, RegenOutcome::Regenerated));
    }

    /// Number of comments never sent to the generator.
    pub fn skipped(&self) -> usize {
        return self.count(|o| return matches!(o, RegenOutcome::Skipped(_)));
    }

    fn count(&self, pred: impl Fn(&RegenOutcome) -> bool) -> usize {
        return self.outcomes.iter().filter(|(_, o)| return pred(o)).count();
    }
}

impl Document {
    /// Parse a file's text into a document with its managed comments.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` or `Error::FileTooLarge` from the parser;
    /// either is fatal for this file only.
    pub fn parse(path: PathBuf, text: String, language: &Language) -> Result<Self, Error> {
        let comments = parser::extract_comments(&path, &text, language)?;
        return Ok(Self { comments, path, text });
    }

    /// Report every non-synced comment as `<path>:<line>:<column>`.
    /// No generation, no mutation.
    pub fn stale_locations(&self) -> Vec<String> {
        return self
            .comments
            .iter()
            .filter(|c| return c.sync_state() == SyncState::Stale)
            .map(|c| return self.location_string(c.location))
            .collect();
    }

    /// Regenerate every stale comment that has a code span and splice the
    /// results back in one patch pass.
    ///
    /// Generation is fanned out up to `concurrency` calls at a time; a
    /// failed call degrades that one comment and the rest proceed. The
    /// patch pass applies replacements strictly in original-position order
    /// no matter when responses arrived. Comments keep their original
    /// offsets afterwards — the next run re-parses from scratch.
    pub fn resync(&mut self, generator: &dyn DocGenerator, concurrency: usize) -> ResyncReport {
        let mut outcomes: Vec<(String, RegenOutcome)> = Vec::new();
        let mut jobs: Vec<GenJob> = Vec::new();

        for (index, comment) in self.comments.iter().enumerate() {
            if comment.sync_state() == SyncState::Synced {
                continue;
            }
            let Some(span) = &comment.code_span else {
                outcomes.push((
                    self.location_string(comment.location),
                    RegenOutcome::Skipped("no code follows the comment"),
                ));
                continue;
            };
            let Some(snippet) = self.text.get(span.clone()) else {
                outcomes.push((
                    self.location_string(comment.location),
                    RegenOutcome::Skipped("code span out of bounds"),
                ));
                continue;
            };
            jobs.push(GenJob { index, snippet: snippet.to_string() });
        }

        let results = generate_all(generator, jobs, concurrency);

        let mut replacements: Vec<Option<String>> = vec![None; self.comments.len()];
        for (index, result) in results {
            let Some(comment) = self.comments.get(index) else {
                continue;
            };
            let location = self.location_string(comment.location);
            match (result, &comment.computed_fingerprint) {
                (Ok(lines), Some(fingerprint)) => {
                    if let Some(slot) = replacements.get_mut(index) {
                        *slot = Some(patch::render_docstring(&lines, &fingerprint.0));
                    }
                    outcomes.push((location, RegenOutcome::Regenerated));
                },
                (Ok(_), None) => {
                    outcomes.push((location, RegenOutcome::Skipped("no fingerprint to embed")));
                },
                (Err(e), _) => {
                    outcomes.push((location, RegenOutcome::Failed(e.to_string())));
                },
            }
        }

        self.text = patch::apply_replacements(&self.text, &self.comments, &replacements);

        return ResyncReport { outcomes };
    }

    fn location_string(&self, location: Location) -> String {
        return format!("{}:{}:{}", self.path.display(), location.line, location.column);
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    struct MockGenerator {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl MockGenerator {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), fail_on: None }
        }

        fn failing_on(marker: &'static str) -> Self {
            Self { calls: AtomicUsize::new(0), fail_on: Some(marker) }
        }
    }

    impl DocGenerator for MockGenerator {
        fn generate(&self, snippet: &str, _stop: &[&str]) -> Result<Vec<String>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(marker) = self.fail_on
                && snippet.contains(marker)
            {
                return Err(Error::GenerationFailed { reason: "mock failure".to_string() });
            }
            Ok(vec!["Generated docs.".to_string()])
        }
    }

    fn ts_language() -> Language {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }

    fn parse_doc(source: &str) -> Document {
        Document::parse(PathBuf::from("src/lib.ts"), source.to_string(), &ts_language()).unwrap()
    }

    #[test]
    fn resync_output_reparses_as_synced() {
        let source = "/** @autodocs */\nfunction add(a: number, b: number) { return a + b; }\n";
        let mut doc = parse_doc(source);
        assert_eq!(doc.stale_locations(), vec!["src/lib.ts:1:1".to_string()]);

        let report = doc.resync(&MockGenerator::new(), 2);
        assert_eq!(report.regenerated(), 1);
        assert_eq!(report.failed(), 0);
        assert!(doc.text.contains(" * Generated docs.\n"));
        assert!(doc.text.contains(" * @autodocs "));

        let reparsed = parse_doc(&doc.text);
        assert!(reparsed.stale_locations().is_empty(), "round trip must be synced");
    }

    #[test]
    fn second_resync_makes_zero_generation_calls() {
        let source = "/** @autodocs */\nfunction add(a: number, b: number) { return a + b; }\n";
        let mut doc = parse_doc(source);
        doc.resync(&MockGenerator::new(), 2);

        let mut second = parse_doc(&doc.text);
        let counting = MockGenerator::new();
        let report = second.resync(&counting, 2);

        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
        assert!(report.outcomes.is_empty());
        assert_eq!(second.text, doc.text, "idempotent resync must not touch the text");
    }

    #[test]
    fn failed_comment_is_untouched_while_sibling_is_replaced() {
        let source = "/** @autodocs */\nfunction alpha() { return 1; }\n\
                      /** @autodocs */\nfunction beta() { return 2; }\n";
        let mut doc = parse_doc(source);

        let report = doc.resync(&MockGenerator::failing_on("alpha"), 2);

        assert_eq!(report.failed(), 1);
        assert_eq!(report.regenerated(), 1);
        assert!(
            doc.text.contains("/** @autodocs */\nfunction alpha"),
            "failed comment must stay byte-identical"
        );
        assert!(doc.text.contains(" * Generated docs.\n * @autodocs "));

        // The failed comment is still stale on the next parse; the sibling isn't.
        let reparsed = parse_doc(&doc.text);
        assert_eq!(reparsed.stale_locations().len(), 1);
    }

    #[test]
    fn second_comment_splices_at_shifted_offset() {
        let source = "/** @autodocs */\nfunction alpha() { return 1; }\n\
                      /** @autodocs */\nfunction beta() { return 2; }\n";
        let mut doc = parse_doc(source);
        let original_beta_line = doc.comments[1].location.line;

        doc.resync(&MockGenerator::new(), 1);

        // Both comments replaced; the functions themselves are untouched even
        // though the first replacement grew the buffer.
        assert!(doc.text.contains("function alpha() { return 1; }"));
        assert!(doc.text.contains("function beta() { return 2; }"));
        let reparsed = parse_doc(&doc.text);
        assert!(reparsed.stale_locations().is_empty());
        // Reported line numbers always derive from the parse-time source.
        assert_eq!(original_beta_line, 3);
    }

    #[test]
    fn trailing_comment_is_skipped_not_generated() {
        let source = "const x = 1;\n/** @autodocs */\n";
        let mut doc = parse_doc(source);
        let counting = MockGenerator::new();

        let report = doc.resync(&counting, 2);

        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.skipped(), 1);
        assert_eq!(doc.text, source);
        // Still reported stale by check.
        assert_eq!(doc.stale_locations().len(), 1);
    }

    #[test]
    fn synced_comment_produces_no_outcome() {
        let source = "/** @autodocs */\nfunction add(a: number, b: number) { return a + b; }\n";
        let mut doc = parse_doc(source);
        doc.resync(&MockGenerator::new(), 2);

        let reparsed = parse_doc(&doc.text);
        assert_eq!(reparsed.comments[0].sync_state(), crate::types::SyncState::Synced);
    }
}
