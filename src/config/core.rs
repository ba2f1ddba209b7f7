use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::tokens::TokenEncoding;

fn default_extensions() -> Vec<String> {
    [
        ".py", ".md", ".txt", ".toml", ".yml", ".yaml", ".json", ".cfg", ".ipynb",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    [".git", "node_modules", "__pycache__", ".venv", "venv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 1 MiB
fn default_max_file_size() -> u64 {
    1024 * 1024
}

fn default_token_encoding() -> String {
    "cl100k_base".to_string()
}

fn default_max_workers() -> usize {
    4
}

fn default_lint_command() -> String {
    "ruff".to_string()
}

fn default_source_extension() -> String {
    ".py".to_string()
}

/// Report formats written alongside the Markdown and HTML reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown and HTML reports only
    #[default]
    Markdown,
    /// Also dump the full aggregate as JSON
    Json,
}

/// Settings for one analysis run.
///
/// Built once at startup from defaults, an optional `.repo-analyzer.toml`
/// and command-line overrides, then shared read-only by every component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// File suffixes to include, each with a leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped at any depth
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Tokenizer used for token counts (cl100k_base, o200k_base, p50k_base,
    /// r50k_base or estimate)
    #[serde(default = "default_token_encoding")]
    pub token_encoding: String,

    /// Upper bound on concurrent file reads. 0 uses all available cores.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Lint executable invoked for quality metrics
    #[serde(default = "default_lint_command")]
    pub lint_command: String,

    /// Suffix of the files used for complexity and change frequency
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            max_file_size: default_max_file_size(),
            token_encoding: default_token_encoding(),
            max_workers: default_max_workers(),
            output_format: OutputFormat::default(),
            lint_command: default_lint_command(),
            source_extension: default_source_extension(),
        }
    }
}

/// Prefix a dot unless one is already present.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

impl AnalysisConfig {
    /// Normalize extensions and reject settings no run could succeed with.
    pub fn validate(mut self) -> Result<Self> {
        self.extensions = self
            .extensions
            .iter()
            .filter(|e| !e.trim().is_empty())
            .map(|e| normalize_extension(e))
            .collect();
        self.source_extension = normalize_extension(&self.source_extension);

        if self.extensions.is_empty() {
            return Err(Error::config("at least one file extension is required"));
        }
        if self.max_file_size == 0 {
            return Err(Error::config("max_file_size must be greater than zero"));
        }
        if self.lint_command.trim().is_empty() {
            return Err(Error::config("lint_command must not be empty"));
        }
        TokenEncoding::from_name(&self.token_encoding)?;

        Ok(self)
    }

    /// Worker count with 0 resolved to the available parallelism.
    pub fn worker_count(&self) -> usize {
        if self.max_workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.max_workers
        }
    }
}
