pub mod processor;
pub mod walker;
pub mod writers;

pub use processor::{relative_path, FileProcessor};
pub use walker::{dotted_extension, FileWalker};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
