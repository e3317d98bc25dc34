// ABOUTME: HTML generation module for the matisse application
// ABOUTME: Reads a source document, renders the impress.js deck and writes the output directory

use crate::config::Config;
use crate::errors::{MatisseError, Result};
use crate::markdown::converter_for;
use crate::metadata::Metadata;
use crate::presentation::Presentation;
use crate::resources::ResourceFile;
use crate::utils;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one build needs: input, output location, extra resources and
/// the effective configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub config: Config,
}

impl BuildConfig {
    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }
}

/// Generate the presentation HTML from a markdown file with optional CSS and
/// JS resources
pub fn generate_html(
    markdown_path: &Path,
    config: &Config,
    css_files: &[ResourceFile],
    js_files: &[ResourceFile],
) -> Result<String> {
    render_presentation(markdown_path, config, css_files, js_files).map(|(_, html)| html)
}

fn render_presentation(
    markdown_path: &Path,
    config: &Config,
    css_files: &[ResourceFile],
    js_files: &[ResourceFile],
) -> Result<(Presentation, String)> {
    info!("Generating HTML from markdown: {:?}", markdown_path);

    if !markdown_path.exists() {
        return Err(MatisseError::PathNotFoundError(markdown_path.to_path_buf()));
    }
    let source = fs::read_to_string(markdown_path).map_err(MatisseError::FileReadError)?;

    let converter = converter_for(&config.markdown_engine)?;
    let presentation = Presentation::parse(&source, config);
    let html = presentation.to_html(config, converter.as_ref(), css_files, js_files);
    Ok((presentation, html))
}

/// Build the presentation into `<output_dir>/index.html` and copy the
/// directories listed in the `dirs_to_copy` metadata next to it.
pub fn build_presentation(build: &BuildConfig) -> Result<PathBuf> {
    utils::validate_file_exists(&build.input)?;
    utils::validate_directory_writable(&build.output_dir)?;

    let (presentation, html) =
        render_presentation(&build.input, &build.config, &build.css_files, &build.js_files)?;
    let output = build.output_file();
    write_html_to_file(&html, &output)?;
    copy_assets(&presentation.metadata, &build.input, &build.output_dir)?;

    info!("Presentation written to {:?}", output);
    Ok(output)
}

fn copy_assets(metadata: &Metadata, input: &Path, output_dir: &Path) -> Result<()> {
    let Some(dirs) = metadata.get("dirs_to_copy") else {
        return Ok(());
    };
    let base = input.parent().unwrap_or(Path::new("."));
    for dir in dirs.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        let source = base.join(dir);
        if !source.is_dir() {
            warn!("Skipping missing directory to copy: {:?}", source);
            continue;
        }
        info!("Copying {:?} into {:?}", source, output_dir);
        utils::copy_dir_recursive(&source, &output_dir.join(dir))?;
    }
    Ok(())
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    if output_path.is_dir() {
        return Err(MatisseError::HtmlError(format!(
            "Output path is a directory: {:?}",
            output_path
        )));
    }
    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(MatisseError::FileReadError)?;

    Ok(())
}
