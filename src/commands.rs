//! Core CLI commands for autodocs: check and generate.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::document::Document;
use crate::error::Error;
use crate::generator::OpenAiGenerator;
use crate::grammar;
use crate::scanner;
use crate::types::RegenOutcome;

/// Global flags shared by every subcommand.
pub struct CliOptions {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Print debug output to stderr.
    pub debug: bool,
    /// Skip config loading entirely and use defaults.
    pub no_config: bool,
}

impl CliOptions {
    fn load_config(&self) -> Result<Config, Error> {
        if self.no_config {
            return Ok(Config::defaults());
        }
        return Config::load(&self.config_path);
    }
}

/// Parse every scanned file, fingerprint its managed comments, and report
/// each stale one as `path:line:column`. No generation, no mutation.
///
/// Exit code priority: broken (2) > stale (1) > in-sync (0).
///
/// # Errors
///
/// Returns errors from config loading; per-file failures are reported and
/// never abort the batch.
pub fn check(opts: &CliOptions) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = opts.load_config()?;
    let files = scanner::scan(&root, &config);
    if opts.debug {
        eprintln!("debug: found {} files", files.len());
    }

    let mut stale_count = 0_usize;
    let mut broken_count = 0_u32;

    for file in &files {
        let doc = match load_document(&root, file) {
            Err(e) => {
                broken_count = broken_count.saturating_add(1);
                println!("BROKEN  {} ({e})", file.display());
                continue;
            },
            Ok(doc) => doc,
        };

        let stale = doc.stale_locations();
        if stale.is_empty() && opts.debug {
            eprintln!("debug: {} has no stale comments", file.display());
        }
        for location in &stale {
            println!("STALE   {location}");
        }
        stale_count = stale_count.saturating_add(stale.len());
    }

    if broken_count > 0 {
        println!();
        println!("{broken_count} broken, {stale_count} stale");
        return Ok(ExitCode::from(2));
    } else if stale_count > 0 {
        println!();
        println!("{stale_count} stale");
        return Ok(ExitCode::from(1));
    } else {
        let total = files.len();
        println!("All {total} files in sync");
        return Ok(ExitCode::SUCCESS);
    }
}

/// Regenerate every stale comment in every scanned file and write the
/// results back, then print an aggregate summary with token usage and cost.
///
/// # Errors
///
/// Returns errors from config loading or generator construction; per-file
/// and per-comment failures are reported and never abort the batch.
pub fn generate(opts: &CliOptions) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = opts.load_config()?;
    let generator = OpenAiGenerator::new(&config.openai)?;
    let files = scanner::scan(&root, &config);
    if opts.debug {
        eprintln!("debug: found {} files", files.len());
    }

    let mut regenerated = 0_usize;
    let mut failed = 0_usize;
    let mut skipped = 0_usize;
    let mut broken_count = 0_u32;

    for file in &files {
        let mut doc = match load_document(&root, file) {
            Err(e) => {
                broken_count = broken_count.saturating_add(1);
                eprintln!("BROKEN  {} ({e})", file.display());
                continue;
            },
            Ok(doc) => doc,
        };

        if doc.stale_locations().is_empty() {
            if opts.debug {
                eprintln!("debug: {} has no stale comments", file.display());
            }
            continue;
        }

        let report = doc.resync(&generator, config.concurrency);
        print_comment_outcomes(&report.outcomes);
        regenerated = regenerated.saturating_add(report.regenerated());
        failed = failed.saturating_add(report.failed());
        skipped = skipped.saturating_add(report.skipped());

        if report.regenerated() == 0 {
            continue;
        }
        match std::fs::write(root.join(file), &doc.text) {
            Err(e) => {
                broken_count = broken_count.saturating_add(1);
                let write_error = Error::WriteFailed {
                    path: file.clone(),
                    reason: e.to_string(),
                };
                eprintln!("error: {write_error}");
            },
            Ok(()) => {
                eprintln!("New docs have been generated for {}", file.display());
            },
        }
    }

    println!("{regenerated} regenerated, {failed} failed, {skipped} skipped");
    print_consumption(&generator);

    if broken_count > 0 {
        return Ok(ExitCode::from(2));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Read one file and parse it into a document.
///
/// # Errors
///
/// Returns `Error::FileNotFound`, `Error::UnsupportedLanguage`, or parser
/// errors — all fatal for this file only.
fn load_document(root: &Path, file: &Path) -> Result<Document, Error> {
    let full_path = root.join(file);
    let text = std::fs::read_to_string(&full_path)
        .map_err(|_err| return Error::FileNotFound { path: full_path })?;
    let language = grammar::language_for_path(file)?;
    return Document::parse(file.to_path_buf(), text, &language);
}

/// Print failed and skipped per-comment outcomes for one file.
fn print_comment_outcomes(outcomes: &[(String, RegenOutcome)]) {
    for (location, outcome) in outcomes {
        match outcome {
            RegenOutcome::Failed(reason) => eprintln!("FAILED  {location} ({reason})"),
            RegenOutcome::Regenerated => {},
            RegenOutcome::Skipped(reason) => eprintln!("SKIPPED {location} ({reason})"),
        }
    }
    return;
}

/// Print the token usage and cost summary for the whole run.
fn print_consumption(generator: &OpenAiGenerator) {
    let usage = generator.consumption();
    println!(
        "Total cost for {} completions ({} prompt tokens and {} completion tokens): ${:.4}",
        usage.completions, usage.prompt_tokens, usage.completion_tokens, usage.cost,
    );
    return;
}
