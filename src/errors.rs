//! Shared error types for the analyzer

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for repository analysis
#[derive(Debug, Error)]
pub enum Error {
    /// Cloning the remote repository failed. Always fatal.
    #[error("Failed to clone {url}: {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    /// The URL named a subdirectory the clone does not contain
    #[error("Subdirectory '{subdirectory}' not found in repository")]
    SubdirectoryNotFound { subdirectory: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external tool could not be located
    #[error("Tool '{tool}' is not available: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// The lint tool ran but its result could not be used
    #[error("Lint error: {0}")]
    Lint(String),

    /// Parsing errors
    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Tokenizer construction failed
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Source highlighting for the HTML report failed
    #[error("Highlight error: {0}")]
    Highlight(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Git errors outside of cloning
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn tool_unavailable(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
