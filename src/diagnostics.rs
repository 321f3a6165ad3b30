use std::fmt::Write as _;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
/// Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::ApiKeyMissing => render_api_key_missing(),

        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::FileTooLarge { file, size_bytes, max_bytes } => format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).
", file.display()),

        Error::GenerationFailed { reason } => format!("\
# Error: Generation Failed

{reason}

## Fix

The comment was left untouched. Re-run once the service is reachable:

    autodocs generate
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}

Comments in this file were not checked. Fix the syntax error and re-run.
", file.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `.autodocs.toml`, or run with `--no-config` to use defaults.
"),

        Error::UnsupportedLanguage { ext } => render_unsupported_language(ext),

        Error::WriteFailed { path, reason } => format!("\
# Error: Write Failed

Could not write `{}`: {reason}

The regenerated text was discarded; the file on disk is unchanged.
", path.display()),
    }
}

fn render_api_key_missing() -> String {
    "\
# Error: API Key Missing

No API key for the generation service.

## Fix

Export the key:

    export OPENAI_API_KEY=sk-...

Or set it in `.autodocs.toml`:

    [openai]
    api_key = \"sk-...\"
"
    .to_string()
}

fn render_unsupported_language(ext: &str) -> String {
    format!(
        "\
# Error: Unsupported Language

No tree-sitter grammar for `.{ext}` files.

## Supported extensions

- `.ts`, `.tsx`, `.js`, `.jsx` — TypeScript / JavaScript
- `.rs` — Rust
- `.go` — Go
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn every_heading_names_the_error() {
        let e = Error::ParseFailed {
            file: PathBuf::from("src/lib.ts"),
            reason: "syntax errors in source".to_string(),
        };
        let md = render_error(&e);
        assert!(md.starts_with("# Error: Parse Failed"));
        assert!(md.contains("src/lib.ts"));
    }

    #[test]
    fn generation_failure_points_at_rerun() {
        let e = Error::GenerationFailed { reason: "timeout".to_string() };
        let md = render_error(&e);
        assert!(md.contains("timeout"));
        assert!(md.contains("autodocs generate"));
    }
}
