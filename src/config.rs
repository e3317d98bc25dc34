// ABOUTME: Configuration module for the matisse application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{MatisseError, Result};
use crate::html::BuildConfig;
use crate::resources::ResourceFile;
use crate::watch::WatchConfig;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_IMPRESS_JS: &str =
    "https://cdn.jsdelivr.net/gh/impress/impress.js@2.0.0/js/impress.js";
pub const DEFAULT_MATHJAX_JS: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";
pub const HIGHLIGHT_JS_BASE: &str = "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11.9.0/build";
pub const DEFAULT_HIGHLIGHT_STYLE: &str = "github";

/// Global configuration for the application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub markdown_engine: String,
    pub impress_js: String,
    pub embed_resources: bool,
    /// Depth of the `$toc` metadata value (1 = chapters only).
    pub toc_depth: usize,
    /// Insert a TOC slide of this depth at the beginning of every chapter.
    pub toc_at_chap_beginning: Option<usize>,
    pub toc_at_sec_beginning: Option<usize>,
    pub toc_at_subsec_beginning: Option<usize>,
    /// MathJax script rendering `$...$` and `$$...$$`; `None` leaves math as text.
    pub mathjax_js: Option<String>,
    /// highlight.js style name; `None` disables code highlighting.
    pub highlight_style: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markdown_engine: "comrak".to_string(),
            impress_js: DEFAULT_IMPRESS_JS.to_string(),
            embed_resources: true,
            toc_depth: 3,
            toc_at_chap_beginning: None,
            toc_at_sec_beginning: None,
            toc_at_subsec_beginning: None,
            mathjax_js: Some(DEFAULT_MATHJAX_JS.to_string()),
            highlight_style: Some(DEFAULT_HIGHLIGHT_STYLE.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let markdown_engine =
            env::var("MATISSE_MARKDOWN_ENGINE").unwrap_or(defaults.markdown_engine);
        let impress_js = env::var("MATISSE_IMPRESS_JS").unwrap_or(defaults.impress_js);
        let embed_resources = env::var("MATISSE_EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let toc_depth = env::var("MATISSE_TOC_DEPTH")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.toc_depth);
        let mathjax_js = env::var("MATISSE_MATHJAX_JS").ok().or(defaults.mathjax_js);
        let highlight_style = env::var("MATISSE_HIGHLIGHT_STYLE")
            .ok()
            .map(|s| normalize_highlight_style(&s))
            .unwrap_or(defaults.highlight_style);

        Self {
            markdown_engine,
            impress_js,
            embed_resources,
            toc_depth,
            mathjax_js,
            highlight_style,
            ..defaults
        }
    }

    /// Apply the command-line math and highlighting switches.
    pub fn with_renderers(&self, highlight_style: Option<&str>, no_mathjax: bool) -> Self {
        let mut config = self.clone();
        if let Some(style) = highlight_style {
            config.highlight_style = normalize_highlight_style(style);
        }
        if no_mathjax {
            config.mathjax_js = None;
        }
        config
    }

    /// Stylesheet and script of the selected highlight.js style, if enabled.
    pub fn highlight_resources(&self) -> Option<(String, String)> {
        self.highlight_style.as_ref().map(|style| {
            (
                format!("{}/styles/{}.min.css", HIGHLIGHT_JS_BASE, style),
                format!("{}/highlight.min.js", HIGHLIGHT_JS_BASE),
            )
        })
    }

    /// Depth of the TOC slide inserted at the beginning of a heading level
    /// (1 = chapter, 2 = section, 3 = subsection), if any.
    pub fn toc_at_beginning(&self, level: usize) -> Option<usize> {
        match level {
            1 => self.toc_at_chap_beginning,
            2 => self.toc_at_sec_beginning,
            3 => self.toc_at_subsec_beginning,
            _ => None,
        }
        .filter(|depth| *depth > 0)
    }

    /// Reject TOC depths outside the chapter/section/subsection range.
    pub fn validate(&self) -> Result<()> {
        if let Some(style) = &self.highlight_style {
            let valid = !style.is_empty()
                && !style.contains("..")
                && style
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'));
            if !valid {
                return Err(MatisseError::ConfigError(format!(
                    "Invalid highlight.js style '{}'",
                    style
                )));
            }
        }
        if !(1..=3).contains(&self.toc_depth) {
            return Err(MatisseError::ConfigError(format!(
                "TOC depth must be between 1 and 3, got {}",
                self.toc_depth
            )));
        }
        for depth in [
            self.toc_at_chap_beginning,
            self.toc_at_sec_beginning,
            self.toc_at_subsec_beginning,
        ]
        .into_iter()
        .flatten()
        {
            if depth > 3 {
                return Err(MatisseError::ConfigError(format!(
                    "TOC slide depth must be between 0 and 3, got {}",
                    depth
                )));
            }
        }
        Ok(())
    }

    /// Get a build configuration with defaults from this config
    #[allow(clippy::too_many_arguments)]
    pub fn get_build_config(
        &self,
        input: &Path,
        output_dir: Option<PathBuf>,
        css: Option<Vec<String>>,
        js: Option<Vec<String>>,
        mode: Option<&str>,
        toc_at_chap_beginning: Option<usize>,
        toc_at_sec_beginning: Option<usize>,
        toc_at_subsec_beginning: Option<usize>,
    ) -> Result<BuildConfig> {
        let mut config = self.clone();
        if let Some(mode) = mode {
            config.embed_resources = parse_mode(mode)?;
        }
        config.toc_at_chap_beginning = toc_at_chap_beginning.or(config.toc_at_chap_beginning);
        config.toc_at_sec_beginning = toc_at_sec_beginning.or(config.toc_at_sec_beginning);
        config.toc_at_subsec_beginning =
            toc_at_subsec_beginning.or(config.toc_at_subsec_beginning);
        config.validate()?;

        let to_resources = |paths: Option<Vec<String>>| -> Vec<ResourceFile> {
            paths
                .unwrap_or_default()
                .iter()
                .map(|path| ResourceFile::new(path))
                .collect()
        };

        Ok(BuildConfig {
            input: input.to_path_buf(),
            output_dir: output_dir.unwrap_or_else(|| default_output_dir(input)),
            css_files: to_resources(css),
            js_files: to_resources(js),
            config,
        })
    }

    /// Get a watch configuration wrapping a build configuration
    pub fn get_watch_config(&self, build: BuildConfig, debounce_ms: Option<u64>) -> WatchConfig {
        WatchConfig {
            build,
            debounce_ms: debounce_ms.unwrap_or(500),
        }
    }
}

/// `embed` inlines local resources, `link` references them.
pub fn parse_mode(mode: &str) -> Result<bool> {
    match mode.trim().to_lowercase().as_str() {
        "embed" => Ok(true),
        "link" => Ok(false),
        other => Err(MatisseError::ConfigError(format!(
            "Unknown resource mode '{}', expected 'embed' or 'link'",
            other
        ))),
    }
}

/// `disable` turns highlighting off; a trailing `.css` is accepted.
fn normalize_highlight_style(style: &str) -> Option<String> {
    let style = style.trim();
    if style.eq_ignore_ascii_case("disable") {
        return None;
    }
    Some(style.strip_suffix(".css").unwrap_or(style).to_string())
}

/// A directory named after the input file, next to it.
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "presentation".to_string());
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(stem),
        _ => PathBuf::from(stem),
    }
}
