// ABOUTME: Watch module for monitoring source changes and rebuilding the presentation
// ABOUTME: Debounces file system events and regenerates the output directory

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::errors::{MatisseError, Result};
use crate::html::{self, BuildConfig};
use crate::utils;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// What to rebuild on every relevant change
    pub build: BuildConfig,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

/// Builds once, then watches the source directory and rebuilds when the
/// markdown source or a local resource changes
pub fn watch_markdown(config: WatchConfig) -> Result<()> {
    utils::validate_file_exists(&config.build.input)?;

    regenerate_outputs(&config)?;

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| MatisseError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let watch_path = match config.build.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let abs_watch_path = utils::get_absolute_path(watch_path)?;
    debug!("Watching absolute path: {:?}", abs_watch_path);

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::Recursive)
        .map_err(|e| {
            MatisseError::WatchError(format!(
                "Failed to start watching directory {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching for changes in {:?}", watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let output_dir = utils::get_absolute_path(&config.build.output_dir)
        .unwrap_or_else(|_| config.build.output_dir.clone());
    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let is_relevant = is_relevant_path(path, &config.build, &output_dir);
                        if is_relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        is_relevant
                    })
                });

                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_outputs(&config) {
                        Ok(_) => {
                            info!("Regenerated presentation successfully");
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate presentation: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// Checks if a path is relevant to watch: the source document, a local
/// resource, or any markdown/CSS/JS file outside the output directory
fn is_relevant_path(path: &Path, build: &BuildConfig, output_dir: &Path) -> bool {
    let path_abs: PathBuf = match utils::get_absolute_path(path) {
        Ok(p) => p,
        Err(_) => return false,
    };
    if path_abs.starts_with(output_dir) {
        return false;
    }

    let md_path_abs =
        utils::get_absolute_path(&build.input).unwrap_or_else(|_| build.input.clone());
    if path_abs == md_path_abs || path == build.input {
        return true;
    }

    let path_str = path.to_string_lossy();
    let path_abs_str = path_abs.to_string_lossy();
    let is_resource = build
        .css_files
        .iter()
        .chain(build.js_files.iter())
        .filter(|resource| !resource.is_remote)
        .any(|resource| resource.path == path_str || resource.path == path_abs_str);
    if is_resource {
        return true;
    }

    match path.extension() {
        Some(ext) => {
            let ext_str = ext.to_string_lossy().to_lowercase();
            ext_str == "md" || ext_str == "css" || ext_str == "js"
        }
        None => false,
    }
}

/// Rebuild the presentation from the current state of the source
fn regenerate_outputs(config: &WatchConfig) -> Result<()> {
    info!("Regenerating presentation...");
    let output = html::build_presentation(&config.build)?;
    info!("Presentation regenerated: {:?}", output);
    Ok(())
}
