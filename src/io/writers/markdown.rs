use std::io::Write;

use super::OutputWriter;
use crate::core::{AnalysisResult, BasicStats, Dependency, HotSpot, LinterStatus, QualityReport, TechnicalDebt};
use crate::formatting::format_size;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self, result: &AnalysisResult) -> anyhow::Result<()> {
        writeln!(self.writer, "# Repository Analysis Report: {}", result.repo_name)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Generated on: {}", result.timestamp)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_statistics(&mut self, stats: &BasicStats) -> anyhow::Result<()> {
        writeln!(self.writer, "## Repository Statistics")?;
        writeln!(self.writer, "- Total Files: {}", stats.total_files)?;
        writeln!(self.writer, "- Lines of Code: {}", stats.total_lines)?;
        writeln!(self.writer, "- Repository Size: {}", stats.formatted_size)?;
        writeln!(self.writer, "- Total Tokens: {}", stats.total_tokens)?;
        if stats.skipped_files > 0 {
            writeln!(self.writer, "- Skipped Files: {}", stats.skipped_files)?;
        }
        writeln!(self.writer)?;

        if stats.extensions.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "### File Type Statistics")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Extension | Files | Lines | Size |")?;
        writeln!(self.writer, "|-----------|-------|-------|------|")?;
        for ext in &stats.extensions {
            let name = if ext.extension.is_empty() {
                "no ext"
            } else {
                ext.extension.as_str()
            };
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                name,
                ext.files,
                ext.lines,
                format_size(ext.size)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_quality(&mut self, quality: &QualityReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Code Quality Analysis")?;
        match &quality.linter {
            LinterStatus::Completed { .. } => {}
            LinterStatus::Unavailable { reason } => {
                writeln!(self.writer, "\n_Linter unavailable: {}_", reason)?;
            }
            LinterStatus::Failed { reason } => {
                writeln!(self.writer, "\n_Linter failed: {}_", reason)?;
            }
        }

        let m = &quality.metrics;
        writeln!(self.writer, "\n### Issues Summary")?;
        writeln!(self.writer, "- Performance Issues: {}", m.performance_issues)?;
        writeln!(self.writer, "- Style Issues: {}", m.style_issues)?;
        writeln!(self.writer, "- Security Issues: {}", m.security_issues)?;
        writeln!(self.writer, "- Documentation Issues: {}", m.documentation_issues)?;
        writeln!(self.writer, "- Type Check Issues: {}", m.type_check_issues)?;
        writeln!(self.writer, "- Bug Risks: {}", m.bug_risks)?;
        writeln!(self.writer, "- Total Issues: {}", quality.total_issues)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_hotspots(&mut self, hotspots: &[HotSpot]) -> anyhow::Result<()> {
        writeln!(self.writer, "## Code Hot Spots")?;
        if hotspots.is_empty() {
            writeln!(self.writer, "\n_No hot spots found._")?;
        }
        for spot in hotspots {
            writeln!(self.writer, "\n### {}", spot.file)?;
            writeln!(self.writer, "- Severity: {}", spot.severity)?;
            writeln!(self.writer, "- Complexity Score: {}", spot.complexity)?;
            writeln!(self.writer, "- Recent Changes: {}", spot.changes)?;
            writeln!(self.writer, "- Issues Count: {}", spot.issues_count)?;
            writeln!(self.writer, "- Recommendation: {}", spot.recommendation)?;
            if !spot.code_issues.is_empty() {
                writeln!(self.writer, "- Code Issues:")?;
                for issue in &spot.code_issues {
                    writeln!(self.writer, "  - {}", issue)?;
                }
            }
            if !spot.classes.is_empty() {
                writeln!(self.writer, "- Classes:")?;
                for class in &spot.classes {
                    let methods: Vec<&str> =
                        class.methods.iter().map(|m| m.name.as_str()).collect();
                    writeln!(
                        self.writer,
                        "  - {} (line {}): {}",
                        class.name,
                        class.line,
                        if methods.is_empty() {
                            "no methods".to_string()
                        } else {
                            methods.join(", ")
                        }
                    )?;
                }
            }
        }
        Ok(())
    }

    fn write_debt(&mut self, debt: &TechnicalDebt) -> anyhow::Result<()> {
        writeln!(self.writer, "\n## Technical Debt Analysis")?;
        writeln!(
            self.writer,
            "\nEstimated Resolution Time: {:.1} hours\n",
            debt.total_hours
        )?;
        for category in &debt.categories {
            writeln!(self.writer, "### {} ({}%)", category.name, category.percentage)?;
            writeln!(self.writer, "- Estimated Hours: {:.1}", category.hours)?;
            writeln!(self.writer, "- Key Issues:")?;
            for issue in &category.issues {
                writeln!(self.writer, "  - {}", issue)?;
            }
        }
        Ok(())
    }

    fn write_dependencies(&mut self, deps: &[Dependency]) -> anyhow::Result<()> {
        writeln!(self.writer, "\n## Dependencies")?;
        writeln!(self.writer, "\nTotal Dependencies: {}", deps.len())?;
        writeln!(
            self.writer,
            "Outdated: {}",
            deps.iter().filter(|d| d.outdated).count()
        )?;
        writeln!(
            self.writer,
            "Security Vulnerabilities: {}\n",
            deps.iter().filter(|d| d.vulnerable).count()
        )?;

        for dep in deps.iter().filter(|d| d.outdated || d.vulnerable) {
            writeln!(self.writer, "### {}", dep.name)?;
            writeln!(self.writer, "- Current Version: {}", dep.current_version)?;
            writeln!(self.writer, "- Latest Version: {}", dep.latest_version)?;
            writeln!(self.writer, "- Manifest: {}", dep.manifest)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_results(&mut self, result: &AnalysisResult) -> anyhow::Result<()> {
        let analysis = &result.analysis;
        self.write_header(result)?;
        self.write_statistics(&analysis.basic_stats)?;
        self.write_quality(&analysis.code_quality)?;
        self.write_hotspots(&analysis.hot_spots)?;
        self.write_debt(&analysis.tech_debt)?;
        self.write_dependencies(&analysis.dependencies)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writers::tests::sample_result;

    fn render(result: &AnalysisResult) -> String {
        let mut writer = MarkdownWriter::new(Vec::new());
        writer.write_results(result).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_sections_in_order() {
        let md = render(&sample_result());
        let positions: Vec<usize> = [
            "# Repository Analysis Report: demo",
            "## Repository Statistics",
            "### File Type Statistics",
            "## Code Quality Analysis",
            "## Code Hot Spots",
            "## Technical Debt Analysis",
            "## Dependencies",
        ]
        .iter()
        .map(|heading| md.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_content_details() {
        let md = render(&sample_result());
        assert!(md.contains("Generated on: 2024-05-01 12:00:00"));
        assert!(md.contains("| .py | 2 | 120 | 2.0KB |"));
        assert!(md.contains("### app/core.py\n- Severity: high\n- Complexity Score: 25"));
        assert!(md.contains(
            "- Code Issues:\n  - Function 'dispatch' has too many arguments (6)\n- Classes:\n  - Engine (line 4): run\n"
        ));
        assert!(md.contains("Estimated Resolution Time: 87.5 hours"));
        assert!(md.contains("### Code Organization (57%)"));
        assert!(md.contains("Outdated: 1"));
        assert!(md.contains("### flask\n- Current Version: 1.0"));
        // up-to-date packages are only counted
        assert!(!md.contains("### rich"));
    }

    #[test]
    fn test_linter_status_is_reported() {
        let mut result = sample_result();
        result.analysis.code_quality = QualityReport::empty(LinterStatus::Unavailable {
            reason: "ruff not found".into(),
        });
        let md = render(&result);
        assert!(md.contains("_Linter unavailable: ruff not found_"));
        assert!(md.contains("- Total Issues: 0"));
    }
}
