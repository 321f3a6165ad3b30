use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::grammar;

/// List all source files under `root` with a registered grammar.
/// Applies the config's include/exclude filters and returns paths relative
/// to `root`, sorted so runs process files in a stable order.
pub fn scan(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && grammar::is_supported(e.path()))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path()).to_path_buf();
            let relative_str = relative.to_string_lossy();
            config.should_scan(&relative_str).then_some(relative)
        })
        .collect();

    files.sort();
    files
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_supported_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/lib.ts"), "const x = 1;\n").unwrap();
        std::fs::write(dir.path().join("src/main.go"), "package main\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();

        let files = scan(dir.path(), &Config::defaults());
        assert_eq!(files, vec![PathBuf::from("src/lib.ts"), PathBuf::from("src/main.go")]);
    }

    #[test]
    fn exclude_prefix_filters_files_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/vendor")).unwrap();
        std::fs::write(dir.path().join("src/lib.ts"), "const x = 1;\n").unwrap();
        std::fs::write(dir.path().join("src/vendor/dep.ts"), "const y = 2;\n").unwrap();

        let config_path = dir.path().join(".autodocs.toml");
        std::fs::write(&config_path, "exclude = [\"src/vendor/\"]\n").unwrap();
        let config = Config::load(&config_path).unwrap();

        let files = scan(dir.path(), &config);
        assert_eq!(files, vec![PathBuf::from("src/lib.ts")]);
    }
}
