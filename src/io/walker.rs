use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Suffix of `path` with a leading dot, or empty
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Deterministic directory walk that prunes excluded directory names.
pub struct FileWalker {
    root: PathBuf,
    extensions: Option<Vec<String>>,
    exclude_dirs: Vec<String>,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: None,
            exclude_dirs: vec![],
        }
    }

    /// Keep only files with one of these dotted suffixes
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn with_exclude_dirs(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclude_dirs
                .iter()
                .any(|d| entry.file_name().to_string_lossy() == d.as_str())
    }

    fn should_process(&self, path: &Path) -> bool {
        match &self.extensions {
            Some(extensions) => {
                let ext = dotted_extension(path);
                extensions.iter().any(|e| *e == ext)
            }
            None => true,
        }
    }

    /// Files in walk order, sorted by name within each directory.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut skipped_count = 0;
        let files: Vec<PathBuf> = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!("Skipping directory entry: {}", err);
                    skipped_count += 1;
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.should_process(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        if skipped_count > 0 {
            tracing::warn!(skipped_count, "Some directory entries could not be read");
        }
        files
    }
}
