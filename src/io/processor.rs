use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{FileRecord, ProcessedFile, SkipReason};
use crate::errors::{Error, Result};
use crate::formatting::count_lines;
use crate::io::walker::dotted_extension;
use crate::tokens::TokenCounter;

/// `path` relative to `base` with `/` separators
pub fn relative_path(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reads files, gating on size and counting tokens.
pub struct FileProcessor<'a> {
    repo_root: PathBuf,
    max_file_size: u64,
    tokens: &'a TokenCounter,
}

impl<'a> FileProcessor<'a> {
    pub fn new(repo_root: impl Into<PathBuf>, max_file_size: u64, tokens: &'a TokenCounter) -> Self {
        Self {
            repo_root: repo_root.into(),
            max_file_size,
            tokens,
        }
    }

    /// Process one file. Oversized and unreadable files come back as
    /// `Skipped` rather than as errors.
    pub fn process_file(&self, path: &Path) -> ProcessedFile {
        let relative_path = relative_path(path, &self.repo_root);

        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => return unreadable(relative_path, e),
        };
        if size > self.max_file_size {
            tracing::info!(
                file = %relative_path,
                size,
                limit = self.max_file_size,
                "Skipping file larger than the size limit"
            );
            return ProcessedFile::Skipped {
                relative_path,
                reason: SkipReason::TooLarge {
                    size,
                    limit: self.max_file_size,
                },
            };
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return unreadable(relative_path, e),
        };
        let content = String::from_utf8_lossy(&bytes).into_owned();

        ProcessedFile::Record(FileRecord {
            extension: dotted_extension(path),
            tokens: self.tokens.count(&content),
            lines: count_lines(&content),
            size: bytes.len() as u64,
            content,
            relative_path,
        })
    }

    /// Process `paths` on a pool of at most `workers` threads.
    ///
    /// Results keep the order of `paths`.
    pub fn process_files(&self, paths: &[PathBuf], workers: usize) -> Result<Vec<ProcessedFile>> {
        map_bounded(paths, workers, |path| self.process_file(path))
    }
}

/// Apply `f` to every item on a dedicated pool of `workers` threads (at
/// least one), so no more than `workers` calls run at once. Output order
/// matches `items`.
pub fn map_bounded<T, R, F>(items: &[T], workers: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| Error::config(format!("cannot start worker pool: {}", e)))?;

    Ok(pool.install(|| items.par_iter().map(|item| f(item)).collect()))
}

fn unreadable(relative_path: String, error: std::io::Error) -> ProcessedFile {
    tracing::warn!(file = %relative_path, "Failed to read file: {}", error);
    ProcessedFile::Skipped {
        relative_path,
        reason: SkipReason::Unreadable {
            message: error.to_string(),
        },
    }
}
