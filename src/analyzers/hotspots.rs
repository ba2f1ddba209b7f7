//! Files that are both complex and frequently changed.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::git_history::change_frequencies;
use super::python::{analyze_file, FileSummary};
use crate::core::{HotSpot, Severity};
use crate::io::{relative_path, FileWalker};

/// A file qualifies when its complexity exceeds this...
pub const COMPLEXITY_THRESHOLD: u32 = 10;
/// ...or its change count exceeds this.
pub const CHANGE_THRESHOLD: usize = 10;
pub const HIGH_SEVERITY_COMPLEXITY: u32 = 20;
pub const EXTRACT_HELPERS_COMPLEXITY: u32 = 15;
pub const LONG_FILE_LINES: usize = 300;

pub fn recommendation(complexity: u32, lines: usize) -> &'static str {
    if complexity > HIGH_SEVERITY_COMPLEXITY {
        "Consider breaking down this file into smaller, more focused modules"
    } else if complexity > EXTRACT_HELPERS_COMPLEXITY {
        "Reduce method complexity by extracting helper functions"
    } else if lines > LONG_FILE_LINES {
        "File is too long, consider splitting it into multiple files"
    } else {
        "Add more comprehensive documentation and tests"
    }
}

/// Build a hotspot for one file, or `None` if it is below both thresholds.
pub fn evaluate_file(
    file: &str,
    summary: &FileSummary,
    changes: usize,
    lines: usize,
) -> Option<HotSpot> {
    let score = summary.max_complexity;
    if score <= COMPLEXITY_THRESHOLD && changes <= CHANGE_THRESHOLD {
        return None;
    }

    let severity = if score > HIGH_SEVERITY_COMPLEXITY {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(HotSpot {
        file: file.to_string(),
        severity,
        complexity: score,
        changes,
        issues_count: summary.blocks,
        recommendation: recommendation(score, lines).to_string(),
        code_issues: summary.issues.clone(),
        classes: summary.classes.clone(),
        source: None,
    })
}

fn hotspot_order(a: &HotSpot, b: &HotSpot) -> Ordering {
    b.complexity
        .cmp(&a.complexity)
        .then_with(|| b.changes.cmp(&a.changes))
}

/// Descending by complexity, then by changes. Stable for full ties.
pub fn sort_hotspots(hotspots: &mut [HotSpot]) {
    hotspots.sort_by(hotspot_order);
}

/// Walks source files under `scan_root` and joins their complexity with
/// history from `repo_root`.
pub struct HotspotFinder<'a> {
    pub source_extension: &'a str,
    pub exclude_dirs: &'a [String],
}

impl HotspotFinder<'_> {
    pub fn find(&self, repo_root: &Path, scan_root: &Path) -> Vec<HotSpot> {
        let changes = change_frequencies(repo_root, self.source_extension).unwrap_or_else(|e| {
            tracing::warn!("Could not read commit history: {}", e);
            HashMap::new()
        });

        let files = FileWalker::new(scan_root)
            .with_extensions(vec![self.source_extension.to_string()])
            .with_exclude_dirs(self.exclude_dirs.to_vec())
            .walk();

        let mut hotspots: Vec<HotSpot> = files
            .iter()
            .filter_map(|path| {
                let rel = relative_path(path, repo_root);
                let content = match fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::debug!(file = %rel, "Skipping unreadable source file: {}", e);
                        return None;
                    }
                };
                let summary = match analyze_file(&content, path) {
                    Ok(summary) => summary,
                    Err(e) => {
                        tracing::debug!(file = %rel, "Skipping unparseable source file: {}", e);
                        return None;
                    }
                };
                let touched = changes.get(&rel).copied().unwrap_or(0);
                let lines = content.lines().count();
                let mut spot = evaluate_file(&rel, &summary, touched, lines)?;
                spot.source = Some(content);
                Some(spot)
            })
            .collect();

        sort_hotspots(&mut hotspots);
        tracing::debug!(count = hotspots.len(), "Hotspots identified");
        hotspots
    }
}
