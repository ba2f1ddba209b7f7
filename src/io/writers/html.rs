use html_escape::encode_text;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

use super::highlight::{highlight_css, SourceHighlighter};
use super::OutputWriter;
use crate::core::{AnalysisResult, BasicStats, Dependency, HotSpot, LinterStatus, QualityReport, TechnicalDebt};
use crate::formatting::format_size;

pub struct HtmlWriter<W: Write> {
    writer: W,
    template: &'static str,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            template: include_str!("templates/report.html"),
        }
    }

    fn render_html(&self, result: &AnalysisResult) -> anyhow::Result<String> {
        let analysis = &result.analysis;
        let stats = &analysis.basic_stats;
        let deps = &analysis.dependencies;

        // Raw text inside <script>, so only `<` needs neutralizing
        let escaped_json = serde_json::to_string(result)?.replace('<', "\\u003c");

        let has_sources = analysis.hot_spots.iter().any(|spot| spot.source.is_some());
        let highlighter = has_sources.then(SourceHighlighter::new);
        let highlight_css = if has_sources {
            highlight_css().unwrap_or_else(|e| {
                log::warn!("Highlight stylesheet unavailable: {}", e);
                String::new()
            })
        } else {
            String::new()
        };

        let values: HashMap<&str, String> = HashMap::from([
            ("REPO_NAME", encode_text(&result.repo_name).into_owned()),
            ("TIMESTAMP", encode_text(&result.timestamp).into_owned()),
            ("TOTAL_FILES", stats.total_files.to_string()),
            ("TOTAL_LINES", stats.total_lines.to_string()),
            ("TOTAL_SIZE", encode_text(&stats.formatted_size).into_owned()),
            ("TOTAL_TOKENS", stats.total_tokens.to_string()),
            ("EXTENSION_ROWS", extension_rows(stats)),
            ("LINTER_STATUS", linter_status(&analysis.code_quality)),
            ("QUALITY_ROWS", quality_rows(&analysis.code_quality)),
            ("HIGHLIGHT_CSS", highlight_css),
            ("HOTSPOT_ROWS", hotspot_rows(&analysis.hot_spots)),
            (
                "HOTSPOT_DETAILS",
                hotspot_details(&analysis.hot_spots, highlighter.as_ref()),
            ),
            ("DEBT_HOURS", format!("{:.1}", analysis.tech_debt.total_hours)),
            ("DEBT_SECTIONS", debt_sections(&analysis.tech_debt)),
            ("DEPENDENCY_TOTAL", deps.len().to_string()),
            (
                "DEPENDENCY_OUTDATED",
                deps.iter().filter(|d| d.outdated).count().to_string(),
            ),
            ("DEPENDENCY_ROWS", dependency_rows(deps)),
            ("JSON_DATA", escaped_json),
        ]);

        Ok(fill_template(self.template, &values))
    }
}

/// Substitute every `{{{KEY}}}` in `template` with its value in one pass.
///
/// Inserted values are never rescanned, so report data that happens to
/// look like a placeholder is emitted as-is. Unknown keys are left intact.
pub(crate) fn fill_template(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 3..];
        match after.find("}}}") {
            Some(close) => match values.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 3..];
                }
                None => {
                    out.push_str("{{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl<W: Write> OutputWriter for HtmlWriter<W> {
    fn write_results(&mut self, result: &AnalysisResult) -> anyhow::Result<()> {
        let html = self.render_html(result)?;
        write!(self.writer, "{}", html)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn empty_row(columns: usize, message: &str) -> String {
    format!(
        "          <tr><td colspan=\"{}\" class=\"empty\">{}</td></tr>\n",
        columns, message
    )
}

fn extension_rows(stats: &BasicStats) -> String {
    if stats.extensions.is_empty() {
        return empty_row(4, "No files analysed");
    }
    let mut rows = String::new();
    for ext in &stats.extensions {
        let name = if ext.extension.is_empty() {
            "no ext"
        } else {
            ext.extension.as_str()
        };
        let _ = writeln!(
            rows,
            "          <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_text(name),
            ext.files,
            ext.lines,
            format_size(ext.size)
        );
    }
    rows
}

fn linter_status(quality: &QualityReport) -> String {
    match &quality.linter {
        LinterStatus::Completed { issues } => format!("Linter completed with {} issues", issues),
        LinterStatus::Unavailable { reason } => {
            format!("Linter unavailable: {}", encode_text(reason))
        }
        LinterStatus::Failed { reason } => format!("Linter failed: {}", encode_text(reason)),
    }
}

fn quality_rows(quality: &QualityReport) -> String {
    let m = &quality.metrics;
    [
        ("Performance", m.performance_issues),
        ("Style", m.style_issues),
        ("Security", m.security_issues),
        ("Documentation", m.documentation_issues),
        ("Type Check", m.type_check_issues),
        ("Bug Risks", m.bug_risks),
        ("Total", quality.total_issues),
    ]
    .iter()
    .map(|(label, count)| format!("          <tr><td>{}</td><td>{}</td></tr>\n", label, count))
    .collect()
}

fn hotspot_rows(hotspots: &[HotSpot]) -> String {
    if hotspots.is_empty() {
        return empty_row(6, "No hot spots found");
    }
    let mut rows = String::new();
    for spot in hotspots {
        let _ = writeln!(
            rows,
            "          <tr><td>{}</td><td class=\"severity severity-{}\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_text(&spot.file),
            spot.severity,
            spot.severity,
            spot.complexity,
            spot.changes,
            spot.issues_count,
            encode_text(&spot.recommendation)
        );
    }
    rows
}

fn hotspot_details(hotspots: &[HotSpot], highlighter: Option<&SourceHighlighter>) -> String {
    if hotspots.is_empty() {
        return "      <p class=\"empty\">No hot spots found</p>\n".to_string();
    }
    let mut html = String::new();
    for spot in hotspots {
        let _ = writeln!(
            html,
            "      <details class=\"hotspot-detail\">\n        <summary>{} &middot; complexity {}, {} changes</summary>",
            encode_text(&spot.file),
            spot.complexity,
            spot.changes
        );
        if !spot.code_issues.is_empty() {
            let _ = writeln!(html, "        <h3>Code Issues</h3>\n        <ul>");
            for issue in &spot.code_issues {
                let _ = writeln!(html, "          <li>{}</li>", encode_text(issue));
            }
            let _ = writeln!(html, "        </ul>");
        }
        if !spot.classes.is_empty() {
            let _ = writeln!(html, "        <h3>Classes</h3>\n        <ul>");
            for class in &spot.classes {
                let methods = if class.methods.is_empty() {
                    "no methods".to_string()
                } else {
                    class
                        .methods
                        .iter()
                        .map(|m| format!("{} ({} lines)", m.name, m.length))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let _ = writeln!(
                    html,
                    "          <li>{} (line {}): {}</li>",
                    encode_text(&class.name),
                    class.line,
                    encode_text(&methods)
                );
            }
            let _ = writeln!(html, "        </ul>");
        }
        if let (Some(source), Some(highlighter)) = (&spot.source, highlighter) {
            match highlighter.highlight(source, &spot.file) {
                Ok(listing) => {
                    let _ = writeln!(html, "{}", listing);
                }
                Err(e) => log::warn!("Skipping source listing for {}: {}", spot.file, e),
            }
        }
        let _ = writeln!(html, "      </details>");
    }
    html
}

fn debt_sections(debt: &TechnicalDebt) -> String {
    let mut html = String::new();
    for category in &debt.categories {
        let _ = writeln!(html, "      <div class=\"debt-category\">");
        let _ = writeln!(
            html,
            "        <h3>{} &middot; {:.1} hours ({}%)</h3>",
            encode_text(&category.name),
            category.hours,
            category.percentage
        );
        let _ = writeln!(
            html,
            "        <div class=\"bar-track\"><div class=\"bar\" style=\"width: {}%\"></div></div>",
            category.percentage.min(100)
        );
        let _ = writeln!(html, "        <ul>");
        for issue in &category.issues {
            let _ = writeln!(html, "          <li>{}</li>", encode_text(issue));
        }
        let _ = writeln!(html, "        </ul>");
        let _ = writeln!(html, "      </div>");
    }
    html
}

fn dependency_rows(deps: &[Dependency]) -> String {
    if deps.is_empty() {
        return empty_row(5, "No installed dependencies found");
    }
    let mut rows = String::new();
    for dep in deps {
        let (class, status) = if dep.outdated {
            ("outdated", "Outdated")
        } else {
            ("current", "Current")
        };
        let _ = writeln!(
            rows,
            "          <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>",
            encode_text(&dep.name),
            encode_text(&dep.current_version),
            encode_text(&dep.latest_version),
            class,
            status,
            encode_text(&dep.manifest)
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writers::tests::sample_result;

    fn render(result: &AnalysisResult) -> String {
        let mut buffer = Vec::new();
        HtmlWriter::new(&mut buffer).write_results(result).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_all_placeholders_filled() {
        let html = render(&sample_result());
        assert!(!html.contains("{{{"));
        assert!(html.contains("<title>Repository Analysis: demo</title>"));
        assert!(html.contains("Generated on 2024-05-01 12:00:00"));
    }

    #[test]
    fn test_debt_bars_use_percentages() {
        let html = render(&sample_result());
        assert!(html.contains("style=\"width: 57%\""));
        assert!(html.contains("style=\"width: 43%\""));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut result = sample_result();
        result.analysis.hot_spots[0].file = "<script>alert(1)</script>.py".into();
        let html = render(&result);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;.py"));
    }

    #[test]
    fn test_embedded_json_parses() {
        let mut result = sample_result();
        result.analysis.hot_spots[0].recommendation = "see </script> tags".into();
        let html = render(&result);

        let start = html.find("type=\"application/json\">").unwrap() + 24;
        let end = start + html[start..].find("</script>").unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&html[start..end]).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_placeholder_text_in_data_is_not_expanded() {
        let mut result = sample_result();
        result.analysis.hot_spots[0].file = "pkg/{{{DEPENDENCY_ROWS}}}.py".into();
        let html = render(&result);

        assert!(html.contains(
            "<tr><td>pkg/{{{DEPENDENCY_ROWS}}}.py</td><td class=\"severity severity-high\">"
        ));
        assert_eq!(html.matches("<td>flask</td>").count(), 1);
    }

    #[test]
    fn test_fill_template_leaves_unknown_keys() {
        let values = HashMap::from([("A", "{{{B}}}".to_string()), ("B", "b".to_string())]);
        assert_eq!(
            fill_template("{{{A}}}-{{{B}}}-{{{C}}}-{{{open", &values),
            "{{{B}}}-b-{{{C}}}-{{{open"
        );
    }

    #[test]
    fn test_hotspot_details_list_issues_and_classes() {
        let html = render(&sample_result());
        assert!(html.contains("<summary>app/core.py &middot; complexity 25, 12 changes</summary>"));
        assert!(html.contains("<li>Function 'dispatch' has too many arguments (6)</li>"));
        assert!(html.contains("<li>Engine (line 4): run (20 lines)</li>"));
        // no listing without source, and no stylesheet either
        assert!(!html.contains("class=\"linenos\""));
    }

    #[test]
    fn test_hotspot_source_is_highlighted() {
        let mut result = sample_result();
        result.analysis.hot_spots[0].source = Some("def f(x):\n    return x\n".into());
        let html = render(&result);

        assert!(html.contains("<td class=\"linenos\"><pre>1\n2</pre></td>"));
        assert!(html.contains("hl-keyword"));
        assert!(html.contains(".hl-"));
    }

    #[test]
    fn test_dependency_status_cells() {
        let html = render(&sample_result());
        assert!(html.contains("<td class=\"outdated\">Outdated</td>"));
        assert!(html.contains("<td class=\"current\">Current</td>"));
    }
}
