use std::path::Path;

use crate::error::Error;

/// Default bound on concurrent generation calls.
const DEFAULT_CONCURRENCY: usize = 4;

/// Default system prompt sent ahead of each code snippet.
const DEFAULT_PROMPT: &str = "\
Generate TSDoc for the following code as raw content - no block decoration * \
using this template (do not include types):
{summary}
@returns {returns}
@throws {throws}
@description {description}
";

/// Project configuration loaded from `.autodocs.toml`.
/// Include/exclude patterns are path prefixes applied to scanned source files.
pub struct Config {
    /// Maximum number of in-flight generation calls.
    pub concurrency: usize,
    exclude: Vec<String>,
    include: Vec<String>,
    /// Settings for the generation service client.
    pub openai: OpenAiConfig,
}

/// The `[openai]` table: everything the generation client needs.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key; falls back to `OPENAI_API_KEY` when absent.
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API.
    pub endpoint: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Model name, also the key into the price table.
    pub model: String,
    /// System prompt sent ahead of each snippet.
    pub prompt: String,
}

/// Raw TOML structure for `.autodocs.toml`.
#[derive(serde::Deserialize)]
struct AutodocsTomlConfig {
    concurrency: Option<usize>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

/// Raw TOML structure for the `[openai]` table.
#[derive(Default, serde::Deserialize)]
struct RawOpenAiConfig {
    api_key: Option<String>,
    endpoint: Option<String>,
    max_tokens: Option<u32>,
    model: Option<String>,
    prompt: Option<String>,
}

impl Config {
    /// Load config from the given path.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed — never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: AutodocsTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            concurrency: raw.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
            exclude: raw.exclude,
            include: raw.include,
            openai: OpenAiConfig {
                api_key: raw.openai.api_key,
                endpoint: raw
                    .openai
                    .endpoint
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                max_tokens: raw.openai.max_tokens.unwrap_or(4000),
                model: raw.openai.model.unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
                prompt: raw.openai.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            },
        })
    }

    /// Default config: scan everything, stock OpenAI settings.
    pub fn defaults() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            exclude: Vec::new(),
            include: Vec::new(),
            openai: OpenAiConfig {
                api_key: None,
                endpoint: "https://api.openai.com/v1".to_string(),
                max_tokens: 4000,
                model: "gpt-3.5-turbo".to_string(),
                prompt: DEFAULT_PROMPT.to_string(),
            },
        }
    }

    /// Check whether a source file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}
