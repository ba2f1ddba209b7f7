//! Data model shared by the analyzers and the report writers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::formatting::format_size;

/// One file that passed the size gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the repository root, `/`-separated
    pub relative_path: String,
    /// Suffix with leading dot, empty when the file has none
    pub extension: String,
    pub content: String,
    pub tokens: usize,
    pub size: u64,
    pub lines: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    TooLarge { size: u64, limit: u64 },
    Unreadable { message: String },
}

/// Outcome of processing one walked file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessedFile {
    Record(FileRecord),
    Skipped {
        relative_path: String,
        reason: SkipReason,
    },
}

impl ProcessedFile {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ProcessedFile::Skipped { .. })
    }

    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            ProcessedFile::Record(record) => Some(record),
            ProcessedFile::Skipped { .. } => None,
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            ProcessedFile::Record(record) => &record.relative_path,
            ProcessedFile::Skipped { relative_path, .. } => relative_path,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionStats {
    pub extension: String,
    pub files: usize,
    pub lines: usize,
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_files: usize,
    pub skipped_files: usize,
    pub total_lines: usize,
    pub total_size: u64,
    pub formatted_size: String,
    pub total_tokens: usize,
    /// Sorted by line count, largest first
    pub extensions: Vec<ExtensionStats>,
}

impl BasicStats {
    /// Fold processed files into totals. Skipped files only bump the skip count.
    pub fn from_files(files: &[ProcessedFile]) -> Self {
        let mut stats = BasicStats::default();
        let mut by_extension: BTreeMap<&str, ExtensionStats> = BTreeMap::new();

        for file in files {
            let Some(record) = file.record() else {
                stats.skipped_files += 1;
                continue;
            };
            stats.total_files += 1;
            stats.total_lines += record.lines;
            stats.total_size += record.size;
            stats.total_tokens += record.tokens;

            let entry = by_extension
                .entry(record.extension.as_str())
                .or_insert_with(|| ExtensionStats {
                    extension: record.extension.clone(),
                    ..Default::default()
                });
            entry.files += 1;
            entry.lines += record.lines;
            entry.size += record.size;
        }

        stats.formatted_size = format_size(stats.total_size);
        stats.extensions = by_extension.into_values().collect();
        stats.extensions.sort_by(|a, b| b.lines.cmp(&a.lines));
        stats
    }
}

/// Lint issue counts bucketed by category
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub performance_issues: usize,
    pub style_issues: usize,
    pub security_issues: usize,
    pub documentation_issues: usize,
    pub type_check_issues: usize,
    pub bug_risks: usize,
}

impl QualityMetrics {
    pub fn total_issues(&self) -> usize {
        self.performance_issues
            + self.style_issues
            + self.security_issues
            + self.documentation_issues
            + self.type_check_issues
            + self.bug_risks
    }
}

/// Whether the lint counts reflect a completed run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinterStatus {
    Completed { issues: usize },
    Unavailable { reason: String },
    Failed { reason: String },
}

impl Default for LinterStatus {
    fn default() -> Self {
        LinterStatus::Completed { issues: 0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(flatten)]
    pub metrics: QualityMetrics,
    pub total_issues: usize,
    pub linter: LinterStatus,
}

impl QualityReport {
    pub fn completed(metrics: QualityMetrics) -> Self {
        let total = metrics.total_issues();
        Self {
            metrics,
            total_issues: total,
            linter: LinterStatus::Completed { issues: total },
        }
    }

    /// Zero counts tagged with the reason the linter produced nothing.
    pub fn empty(linter: LinterStatus) -> Self {
        Self {
            metrics: QualityMetrics::default(),
            total_issues: 0,
            linter,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub name: String,
    pub line: usize,
    /// Last line minus first line
    pub length: usize,
}

/// A top-level class and the methods defined directly in its body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub name: String,
    pub line: usize,
    pub methods: Vec<MethodSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotSpot {
    pub file: String,
    pub severity: Severity,
    pub complexity: u32,
    pub changes: usize,
    /// Number of functions and methods in the file
    pub issues_count: usize,
    pub recommendation: String,
    /// Long functions and functions with too many arguments
    #[serde(default)]
    pub code_issues: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassSummary>,
    /// File contents for the highlighted listing in the HTML report
    #[serde(skip)]
    pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebtCategory {
    pub name: String,
    pub hours: f64,
    pub percentage: u32,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDebt {
    pub total_hours: f64,
    pub categories: Vec<DebtCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Version declared in the manifest, or `Unknown`
    pub current_version: String,
    /// Version found installed
    pub latest_version: String,
    pub outdated: bool,
    pub vulnerable: bool,
    /// Manifest path relative to the repository root
    pub manifest: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub basic_stats: BasicStats,
    pub code_quality: QualityReport,
    pub dependencies: Vec<Dependency>,
    pub hot_spots: Vec<HotSpot>,
    pub tech_debt: TechnicalDebt,
}

/// Everything one run produced, rendered by every writer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repo_name: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    pub analysis: Analysis,
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, ext: &str, lines: usize, size: u64) -> ProcessedFile {
        ProcessedFile::Record(FileRecord {
            relative_path: path.to_string(),
            extension: ext.to_string(),
            content: String::new(),
            tokens: 10,
            size,
            lines,
        })
    }

    #[test]
    fn test_basic_stats_fold() {
        let files = vec![
            record("a.py", ".py", 10, 100),
            record("README.md", ".md", 40, 400),
            record("b.py", ".py", 5, 50),
            ProcessedFile::Skipped {
                relative_path: "big.json".into(),
                reason: SkipReason::TooLarge {
                    size: 5_000_000,
                    limit: 1_048_576,
                },
            },
        ];

        let stats = BasicStats::from_files(&files);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.skipped_files, 1);
        assert_eq!(stats.total_lines, 55);
        assert_eq!(stats.total_size, 550);
        assert_eq!(stats.total_tokens, 30);
        assert_eq!(stats.formatted_size, "550.0B");
        assert_eq!(stats.extensions[0].extension, ".md");
        assert_eq!(stats.extensions[1].extension, ".py");
        assert_eq!(stats.extensions[1].files, 2);
    }

    #[test]
    fn test_quality_report_json_shape() {
        let report = QualityReport::completed(QualityMetrics {
            style_issues: 2,
            bug_risks: 1,
            ..Default::default()
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["style_issues"], 2);
        assert_eq!(json["total_issues"], 3);
        assert_eq!(json["linter"]["status"], "completed");
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(Severity::Medium.to_string(), "medium");
    }
}
