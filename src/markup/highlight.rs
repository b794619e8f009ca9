//! Syntax highlighting for code spans and code blocks

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::node::TrustedHtml;
use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Syntax highlighter producing inline-styled spans
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    inline_language: String,
    enabled: bool,
}

impl Highlighter {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            inline_language: config.inline_language.clone(),
            enabled: config.enable,
        }
    }

    /// Highlight `code`. Spans without a language use the inline default.
    ///
    /// The result is escaped by syntect and wrapped as [`TrustedHtml`]; on
    /// any failure the code is returned escaped and unstyled.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> TrustedHtml {
        if !self.enabled {
            return TrustedHtml::new(html_escape(code));
        }

        let lang = lang.unwrap_or(&self.inline_language);
        let syntax = self.find_syntax(lang);

        match self.theme() {
            Some(theme) => match self.highlight_with(code, syntax, theme) {
                Ok(html) => TrustedHtml::new(html),
                Err(e) => {
                    tracing::debug!("Highlighting failed for {}: {}", lang, e);
                    TrustedHtml::new(html_escape(code))
                }
            },
            None => TrustedHtml::new(html_escape(code)),
        }
    }

    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    fn highlight_with(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<String, syntect::Error> {
        let mut lines = HighlightLines::new(syntax, theme);
        let mut html = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = lines.highlight_line(line, &self.syntax_set)?;
            html.push_str(&styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }
        Ok(html)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(&HighlightConfig::default())
    }
}
