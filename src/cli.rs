use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{normalize_extension, AnalysisConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "repo-analyze")]
#[command(about = "Repository complexity, lint, dependency and technical debt reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone a repository and write Markdown and HTML reports
    Analyze {
        /// Repository URL, optionally ending in /tree/<branch>/<subdir>
        url: String,

        /// Directory for the reports (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a JSON dump when set to json
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Configuration file (defaults to the nearest .repo-analyzer.toml)
        #[arg(short, long, env = "REPO_ANALYZER_CONFIG")]
        config: Option<PathBuf>,

        /// File extensions to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        /// Directory names to skip (comma-separated)
        #[arg(long = "exclude-dirs", value_delimiter = ',')]
        exclude_dirs: Option<Vec<String>>,

        /// Skip files larger than this many bytes
        #[arg(long = "max-file-size")]
        max_file_size: Option<u64>,

        /// Tokenizer for token counts
        #[arg(long = "token-encoding")]
        token_encoding: Option<String>,

        /// Number of worker threads for file processing (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .repo-analyzer.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub format: Option<OutputFormat>,
    pub extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
    pub token_encoding: Option<String>,
    pub jobs: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(extensions) = self.extensions {
            config.extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
        }
        if let Some(exclude_dirs) = self.exclude_dirs {
            config.exclude_dirs = exclude_dirs;
        }
        if let Some(max_file_size) = self.max_file_size {
            config.max_file_size = max_file_size;
        }
        if let Some(token_encoding) = self.token_encoding {
            config.token_encoding = token_encoding;
        }
        if let Some(jobs) = self.jobs {
            config.max_workers = jobs;
        }
        config
    }
}
