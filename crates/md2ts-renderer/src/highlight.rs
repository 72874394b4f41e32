//! Syntax highlighting for fenced code blocks.
//!
//! Wraps [`syntect`] with the fallback ladder the build relies on:
//! highlight by declared language, fall back to first-line auto-detection,
//! and finally give up and let the caller emit escaped plain text.
//! Highlighting failures are logged and recovered; they never fail a
//! build.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Language whose sources are rendered on the client side and must pass
/// through unhighlighted.
const MERMAID: &str = "mermaid";

/// Class-based syntax highlighter over the bundled syntax set.
///
/// Produces `<span class="...">` markup to be styled by the viewer's
/// stylesheet; no inline colors or theme baked into the output.
pub struct CodeHighlighter {
    syntaxes: SyntaxSet,
}

impl CodeHighlighter {
    /// Create a highlighter with the default syntax set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlight a code block body.
    ///
    /// Returns pre-escaped HTML, or `None` when the source should be
    /// emitted as escaped plain text: mermaid diagrams (rendered client
    /// side), sources no syntax matches, and highlighter failures after
    /// the fallback ladder is exhausted.
    pub fn highlight(&self, language: Option<&str>, source: &str) -> Option<String> {
        if language == Some(MERMAID) {
            return None;
        }

        if let Some(lang) = language {
            if let Some(syntax) = self.syntaxes.find_syntax_by_token(lang) {
                match self.generate(syntax, source) {
                    Ok(html) => return Some(html),
                    Err(e) => {
                        tracing::warn!(language = lang, error = %e, "Syntax highlighting failed");
                    }
                }
            }
        }

        let first_line = source.lines().next().unwrap_or_default();
        let syntax = self.syntaxes.find_syntax_by_first_line(first_line)?;
        match self.generate(syntax, source) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!(error = %e, "Auto-detected highlighting failed");
                None
            }
        }
    }

    fn generate(&self, syntax: &SyntaxReference, source: &str) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
