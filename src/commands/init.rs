use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# repo-analyzer configuration

# File suffixes counted in the repository statistics
extensions = [".py", ".md", ".txt", ".toml", ".yml", ".yaml", ".json", ".cfg", ".ipynb"]

# Directory names skipped at any depth
exclude_dirs = [".git", "node_modules", "__pycache__", ".venv", "venv"]

# Files larger than this many bytes are skipped
max_file_size = 1048576

# cl100k_base, o200k_base, p50k_base, r50k_base or estimate
token_encoding = "cl100k_base"

# Concurrent file reads (0 = all cores)
max_workers = 4

# markdown, or json to also write repository_analysis.json
output_format = "markdown"

lint_command = "ruff"
source_extension = ".py"
"#;

/// Write the default config into `dir`, refusing to overwrite unless forced.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}
