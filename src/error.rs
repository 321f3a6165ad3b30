/// Crate-level error types for autodocs diagnostics.
use std::path::PathBuf;

/// All errors in autodocs carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, model, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API key in config and none in the environment.
    #[error("no API key: set `api_key` in .autodocs.toml or export OPENAI_API_KEY")]
    ApiKeyMissing,

    /// A scanned source file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Source file exceeds the configured size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// The generation service call failed for one comment.
    #[error("generation failed: {reason}")]
    GenerationFailed {
        /// Description of the failure (network, HTTP status, empty response).
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Tree-sitter failed to parse a source file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No tree-sitter grammar registered for this file extension.
    #[error("no grammar for extension: .{ext}")]
    UnsupportedLanguage {
        /// File extension without the leading dot.
        ext: String,
    },

    /// Persisting a regenerated file failed.
    #[error("write failed: {}: {reason}", path.display())]
    WriteFailed {
        /// File that could not be written.
        path: PathBuf,
        /// Description of the write failure.
        reason: String,
    },
}
