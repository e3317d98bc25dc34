// ABOUTME: Plain markdown to HTML conversion used for every non-environment span
// ABOUTME: Wraps comrak behind a small trait so the slide pipeline stays converter-agnostic

use crate::errors::{MatisseError, Result};
use crate::math;
use comrak::{markdown_to_html, ComrakOptions};
use log::debug;

/// Converts plain markdown text to an HTML fragment.
pub trait MarkdownConverter {
    fn convert(&self, source: &str) -> String;

    /// Convert a single-line snippet, dropping the paragraph wrapper.
    fn convert_inline(&self, source: &str) -> String {
        let html = self.convert(source);
        let trimmed = html.trim();
        match trimmed
            .strip_prefix("<p>")
            .and_then(|s| s.strip_suffix("</p>"))
        {
            Some(inner) if !inner.contains("<p>") => inner.to_string(),
            _ => trimmed.to_string(),
        }
    }
}

/// comrak with the extensions scientific slides rely on.
pub struct ComrakConverter {
    options: ComrakOptions,
}

impl Default for ComrakConverter {
    fn default() -> Self {
        let mut options = ComrakOptions::default();
        options.extension.table = true;
        options.extension.footnotes = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.render.unsafe_ = true; // Allow raw HTML
        Self { options }
    }
}

impl MarkdownConverter for ComrakConverter {
    /// LaTeX spans bypass comrak so that MathJax sees them unchanged.
    fn convert(&self, source: &str) -> String {
        let (masked, saved) = math::protect(source);
        math::restore(&markdown_to_html(&masked, &self.options), &saved)
    }
}

/// Resolve the converter named in the configuration. Without a converter
/// nothing can be rendered, so an unknown name is fatal.
pub fn converter_for(engine: &str) -> Result<Box<dyn MarkdownConverter>> {
    debug!("Using markdown engine: {}", engine);
    match engine.trim().to_lowercase().as_str() {
        "comrak" | "" => Ok(Box::new(ComrakConverter::default())),
        other => Err(MatisseError::ConverterUnavailable(other.to_string())),
    }
}
