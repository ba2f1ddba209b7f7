pub mod highlight;
pub mod html;
pub mod json;
pub mod markdown;

pub use html::HtmlWriter;
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::OutputFormat;
use crate::core::AnalysisResult;

pub const MARKDOWN_REPORT: &str = "repository_analysis.md";
pub const HTML_REPORT: &str = "repository_analysis.html";
pub const JSON_REPORT: &str = "repository_analysis.json";

pub trait OutputWriter {
    fn write_results(&mut self, result: &AnalysisResult) -> anyhow::Result<()>;
}

fn write_report<F, T>(path: &Path, make_writer: F, result: &AnalysisResult) -> anyhow::Result<()>
where
    F: FnOnce(BufWriter<File>) -> T,
    T: OutputWriter,
{
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = make_writer(BufWriter::new(file));
    writer
        .write_results(result)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the Markdown and HTML reports, plus JSON when requested, into
/// `output_dir`. Returns the paths written.
pub fn write_reports(
    result: &AnalysisResult,
    output_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<Vec<PathBuf>> {
    super::ensure_dir(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let markdown = output_dir.join(MARKDOWN_REPORT);
    write_report(&markdown, MarkdownWriter::new, result)?;
    let html = output_dir.join(HTML_REPORT);
    write_report(&html, HtmlWriter::new, result)?;
    let mut written = vec![markdown, html];

    if format == OutputFormat::Json {
        let json = output_dir.join(JSON_REPORT);
        write_report(&json, JsonWriter::new, result)?;
        written.push(json);
    }

    Ok(written)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::{
        Analysis, BasicStats, ClassSummary, Dependency, ExtensionStats, HotSpot, MethodSummary,
        QualityMetrics, QualityReport, Severity,
    };
    use crate::debt::estimate_debt;
    use tempfile::TempDir;

    pub(crate) fn sample_result() -> AnalysisResult {
        let hot_spots = vec![HotSpot {
            file: "app/core.py".into(),
            severity: Severity::High,
            complexity: 25,
            changes: 12,
            issues_count: 3,
            recommendation: "Consider breaking down this file into smaller, more focused modules"
                .into(),
            code_issues: vec!["Function 'dispatch' has too many arguments (6)".into()],
            classes: vec![ClassSummary {
                name: "Engine".into(),
                line: 4,
                methods: vec![MethodSummary {
                    name: "run".into(),
                    line: 5,
                    length: 20,
                }],
            }],
            source: None,
        }];
        let code_quality = QualityReport::completed(QualityMetrics {
            style_issues: 4,
            bug_risks: 1,
            ..Default::default()
        });
        let tech_debt = estimate_debt(&hot_spots, &code_quality);

        AnalysisResult {
            repo_name: "demo".into(),
            timestamp: "2024-05-01 12:00:00".into(),
            analysis: Analysis {
                basic_stats: BasicStats {
                    total_files: 3,
                    skipped_files: 1,
                    total_lines: 150,
                    total_size: 3072,
                    formatted_size: "3.0KB".into(),
                    total_tokens: 900,
                    extensions: vec![
                        ExtensionStats {
                            extension: ".py".into(),
                            files: 2,
                            lines: 120,
                            size: 2048,
                        },
                        ExtensionStats {
                            extension: ".md".into(),
                            files: 1,
                            lines: 30,
                            size: 1024,
                        },
                    ],
                },
                code_quality,
                dependencies: vec![
                    Dependency {
                        name: "flask".into(),
                        current_version: "1.0".into(),
                        latest_version: "2.0.1".into(),
                        outdated: true,
                        vulnerable: false,
                        manifest: "requirements.txt".into(),
                    },
                    Dependency {
                        name: "rich".into(),
                        current_version: "13.0".into(),
                        latest_version: "13.0".into(),
                        outdated: false,
                        vulnerable: false,
                        manifest: "requirements.txt".into(),
                    },
                ],
                hot_spots,
                tech_debt,
            },
        }
    }

    #[test]
    fn test_markdown_and_html_always_written() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("reports");
        let written = write_reports(&sample_result(), &out, OutputFormat::Markdown).unwrap();

        assert_eq!(written.len(), 2);
        assert!(out.join(MARKDOWN_REPORT).is_file());
        assert!(out.join(HTML_REPORT).is_file());
        assert!(!out.join(JSON_REPORT).exists());
    }

    #[test]
    fn test_json_format_adds_dump() {
        let temp = TempDir::new().unwrap();
        let written = write_reports(&sample_result(), temp.path(), OutputFormat::Json).unwrap();

        assert_eq!(written.len(), 3);
        let dumped = std::fs::read_to_string(temp.path().join(JSON_REPORT)).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&dumped).unwrap();
        assert_eq!(parsed, sample_result());
    }
}
