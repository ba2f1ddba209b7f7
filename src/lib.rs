//! Repository analysis: clone a repository, measure it with external
//! analyzers and render the aggregate as Markdown, HTML and JSON reports.

pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod debt;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod repository;
pub mod tokens;

pub use crate::commands::RepositoryAnalyzer;
pub use crate::config::{AnalysisConfig, OutputFormat};
pub use crate::core::AnalysisResult;
pub use crate::errors::{Error, Result};
