//! CLI command implementations.
//!
//! - **analyze**: clone a repository and write its reports
//! - **init**: write a default `.repo-analyzer.toml`

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig, RepositoryAnalyzer};
pub use init::init_config;
