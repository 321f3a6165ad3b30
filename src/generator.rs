//! Generation client: OpenAI chat completions behind a narrow trait, plus a
//! bounded worker pool for fanning out per-comment requests.

use std::sync::Mutex;
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::Error;

/// Request timeout for one generation call.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// The narrow boundary into the external generation service: one code
/// snippet in, generated documentation lines out. Any failure (network,
/// HTTP status, empty or malformed response) is a `GenerationFailed` error
/// and is the caller's signal that no replacement is available.
pub trait DocGenerator: Sync {
    /// Generate documentation lines for a code snippet.
    ///
    /// # Errors
    ///
    /// Returns `Error::GenerationFailed` when the call cannot complete.
    fn generate(&self, snippet: &str, stop: &[&str]) -> Result<Vec<String>, Error>;
}

/// One generation request queued for the worker pool.
pub struct GenJob {
    /// Index of the comment in its document's comment list.
    pub index: usize,
    /// The code span text to document.
    pub snippet: String,
}

/// Fan generation jobs out over a bounded pool of worker threads.
///
/// `concurrency` caps in-flight calls so the external service's rate limits
/// are respected; one failed call never aborts its siblings. Results come
/// back keyed by comment index — completion order is deliberately discarded
/// so it can never leak into patch-application order.
pub fn generate_all(
    generator: &dyn DocGenerator,
    jobs: Vec<GenJob>,
    concurrency: usize,
) -> Vec<(usize, Result<Vec<String>, Error>)> {
    let worker_count = concurrency.max(1).min(jobs.len());
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<GenJob>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();

    for job in jobs {
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    let outcome = generator.generate(&job.snippet, &["*/"]);
                    let _ = result_tx.send((job.index, outcome));
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<(usize, Result<Vec<String>, Error>)> = result_rx.iter().collect();
    results.sort_by_key(|(index, _)| return *index);
    return results;
}

// ── OpenAI client ─────────────────────────────────────────────────────

/// Chat-completions client for the OpenAI API. Shares one pooled HTTP
/// connection across calls and records token usage for the final report.
pub struct OpenAiGenerator {
    api_key: String,
    client: reqwest::blocking::Client,
    endpoint: String,
    max_tokens: u32,
    model: String,
    prompt: String,
    usage: Mutex<Vec<TokenUsage>>,
}

impl OpenAiGenerator {
    /// Build a client from config, taking the API key from the config file
    /// or the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `Error::ApiKeyMissing` if neither source provides a key,
    /// or `Error::GenerationFailed` if the HTTP client cannot be built.
    pub fn new(config: &OpenAiConfig) -> Result<Self, Error> {
        let api_key = match &config.api_key {
            None => std::env::var("OPENAI_API_KEY").map_err(|_err| return Error::ApiKeyMissing)?,
            Some(key) => key.clone(),
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                return Error::GenerationFailed {
                    reason: format!("failed to create HTTP client: {e}"),
                };
            })?;

        return Ok(Self {
            api_key,
            client,
            endpoint: config.endpoint.clone(),
            max_tokens: config.max_tokens,
            model: config.model.clone(),
            prompt: config.prompt.clone(),
            usage: Mutex::new(Vec::new()),
        });
    }

    /// Aggregate token usage and dollar cost over every call made so far.
    pub fn consumption(&self) -> Consumption {
        let usage = self.usage.lock().map(|u| return u.clone()).unwrap_or_default();
        let (prompt_price, response_price) = price_per_1k_tokens(&self.model).unwrap_or((0.0, 0.0));

        let mut totals = Consumption {
            completion_tokens: 0,
            completions: usage.len(),
            cost: 0.0,
            prompt_tokens: 0,
        };
        for record in &usage {
            totals.prompt_tokens += record.prompt_tokens;
            totals.completion_tokens += record.completion_tokens;
            #[allow(
                clippy::as_conversions,
                clippy::cast_precision_loss,
                reason = "token counts stay far below 2^52"
            )]
            let call_cost = prompt_price * record.prompt_tokens as f64
                + response_price * record.completion_tokens as f64;
            totals.cost += call_cost / 1000.0;
        }
        return totals;
    }

    /// Record one call's token usage. A poisoned lock drops the record
    /// rather than failing the generation that already succeeded.
    fn record_usage(&self, usage: TokenUsage) {
        if let Ok(mut records) = self.usage.lock() {
            records.push(usage);
        }
        return;
    }
}

impl DocGenerator for OpenAiGenerator {
    fn generate(&self, snippet: &str, stop: &[&str]) -> Result<Vec<String>, Error> {
        let request = ChatRequest {
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage { content: &self.prompt, role: "system" },
                ChatMessage { content: snippet, role: "user" },
            ],
            model: &self.model,
            stop,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| return Error::GenerationFailed { reason: e.to_string() })?;

        let body = response
            .text()
            .map_err(|e| return Error::GenerationFailed { reason: e.to_string() })?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            return Error::GenerationFailed {
                reason: format!("malformed response: {e}"),
            };
        })?;

        self.record_usage(parsed.usage.unwrap_or_default());

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| return choice.message.content)
            .unwrap_or_default();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(Error::GenerationFailed {
                reason: "empty completion".to_string(),
            });
        }

        return Ok(trimmed.lines().map(|line| return line.to_string()).collect());
    }
}

// ── Wire types ────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    content: &'a str,
    role: &'a str,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
    stop: &'a [&'a str],
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Token counts reported by the API for one completion.
#[derive(Debug, Default, Clone, Copy, serde::Deserialize)]
struct TokenUsage {
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    prompt_tokens: u64,
}

/// Aggregate usage over one run, for the end-of-run report.
#[derive(Debug, Clone, Copy)]
pub struct Consumption {
    /// Total completion tokens across all calls.
    pub completion_tokens: u64,
    /// Number of completed generation calls.
    pub completions: usize,
    /// Estimated dollar cost from the per-model price table.
    pub cost: f64,
    /// Total prompt tokens across all calls.
    pub prompt_tokens: u64,
}

/// Per-1K-token (prompt, response) prices in dollars. Unknown models cost
/// nothing rather than failing the run after the tokens are already spent.
fn price_per_1k_tokens(model: &str) -> Option<(f64, f64)> {
    return match model {
        "gpt-3.5-turbo" => Some((0.001, 0.02)),
        "gpt-4" | "gpt-4-0314" => Some((0.03, 0.06)),
        "gpt-4-32k" | "gpt-4-32k-0314" => Some((0.06, 0.12)),
        _ => None,
    };
}
