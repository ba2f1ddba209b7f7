//! Syntax-highlighted source listings for the HTML report.

use std::path::Path;

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::errors::{Error, Result};

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };
const THEME: &str = "InspiredGitHub";

/// Renders source as classed HTML spans inside a line-numbered table.
pub struct SourceHighlighter {
    syntaxes: SyntaxSet,
}

impl Default for SourceHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlight `content`, choosing the grammar from the extension of
    /// `file_name`. Unknown extensions fall back to plain text.
    pub fn highlight(&self, content: &str, file_name: &str) -> Result<String> {
        let syntax = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.syntaxes.find_syntax_by_extension(ext))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        let mut line_count = 0;
        for line in LinesWithEndings::from(content) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight(format!("{}: {}", file_name, e)))?;
            line_count += 1;
        }
        let code = generator.finalize();

        let numbers = (1..=line_count)
            .map(|n: usize| n.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "<table class=\"source\"><tr><td class=\"linenos\"><pre>{}</pre></td><td class=\"code\"><pre>{}</pre></td></tr></table>",
            numbers, code
        ))
    }
}

/// Stylesheet for the classes emitted by [`SourceHighlighter`]
pub fn highlight_css() -> Result<String> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(THEME)
        .ok_or_else(|| Error::Highlight(format!("theme '{}' is not bundled", THEME)))?;
    css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| Error::Highlight(e.to_string()))
}
