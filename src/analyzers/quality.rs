//! Lint issue counts from an external linter.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::{LinterStatus, QualityMetrics, QualityReport};
use crate::errors::{Error, Result};

/// One diagnostic from the linter's JSON output. Only the rule code is
/// used for bucketing; other fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LintIssue {
    #[serde(default)]
    pub code: Option<String>,
}

/// Runs a linter over a directory
pub trait LintRunner: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, path: &Path) -> Result<Vec<LintIssue>>;
}

/// `ruff check` with JSON output
pub struct RuffLinter {
    command: String,
}

impl RuffLinter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.command)
            .map_err(|e| Error::tool_unavailable(&self.command, e.to_string()))
    }
}

impl Default for RuffLinter {
    fn default() -> Self {
        Self::new("ruff")
    }
}

impl LintRunner for RuffLinter {
    fn name(&self) -> &str {
        &self.command
    }

    fn run(&self, path: &Path) -> Result<Vec<LintIssue>> {
        let executable = self.locate()?;
        let output = Command::new(&executable)
            .arg("check")
            .arg(path)
            .args(["--output-format", "json", "--exit-zero", "--no-cache"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Lint(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        parse_lint_output(&String::from_utf8_lossy(&output.stdout))
    }
}

pub fn parse_lint_output(stdout: &str) -> Result<Vec<LintIssue>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(stdout).map_err(|e| Error::Lint(format!("unparseable output: {}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    Performance,
    Style,
    Security,
    Documentation,
    TypeCheck,
    BugRisk,
}

/// Bucket a lint code by substring. The first match wins; anything
/// unmatched, including a missing code, is a bug risk.
pub fn classify_issue_code(code: &str) -> IssueCategory {
    let code = code.to_lowercase();
    if code.contains("performance") {
        IssueCategory::Performance
    } else if code.contains("style") {
        IssueCategory::Style
    } else if code.contains("security") {
        IssueCategory::Security
    } else if code.contains("doc") {
        IssueCategory::Documentation
    } else if code.contains("type") {
        IssueCategory::TypeCheck
    } else {
        IssueCategory::BugRisk
    }
}

pub fn tally_issues(issues: &[LintIssue]) -> QualityMetrics {
    let mut metrics = QualityMetrics::default();
    for issue in issues {
        match classify_issue_code(issue.code.as_deref().unwrap_or("")) {
            IssueCategory::Performance => metrics.performance_issues += 1,
            IssueCategory::Style => metrics.style_issues += 1,
            IssueCategory::Security => metrics.security_issues += 1,
            IssueCategory::Documentation => metrics.documentation_issues += 1,
            IssueCategory::TypeCheck => metrics.type_check_issues += 1,
            IssueCategory::BugRisk => metrics.bug_risks += 1,
        }
    }
    metrics
}

pub struct QualityAnalyzer {
    linter: Box<dyn LintRunner>,
}

impl QualityAnalyzer {
    pub fn new(linter: Box<dyn LintRunner>) -> Self {
        Self { linter }
    }

    /// Lint `path`. Failures yield zero counts with the reason recorded.
    pub fn analyze(&self, path: &Path) -> QualityReport {
        match self.linter.run(path) {
            Ok(issues) => {
                tracing::debug!(linter = self.linter.name(), issues = issues.len(), "Lint complete");
                QualityReport::completed(tally_issues(&issues))
            }
            Err(e @ Error::ToolUnavailable { .. }) => {
                tracing::warn!("Skipping code quality analysis: {}", e);
                QualityReport::empty(LinterStatus::Unavailable {
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!("Code quality analysis failed: {}", e);
                QualityReport::empty(LinterStatus::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }
}
