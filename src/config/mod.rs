//! Analysis configuration: defaults, file discovery and validation

mod core;
pub mod loader;

pub use core::{normalize_extension, AnalysisConfig, OutputFormat};
pub use loader::{load_config, CONFIG_FILE_NAME};
