// ABOUTME: Utility functions for the matisse application
// ABOUTME: Provides path validation helpers plus number and HTML formatting

use crate::errors::{MatisseError, Result};
use log::warn;
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MatisseError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(MatisseError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(MatisseError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(MatisseError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    // First ensure it exists
    ensure_directory_exists(path)?;

    // Try to create a temporary file to test write permissions
    let test_file = path.join(format!("test_write_{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&test_file) {
        Ok(_) => {
            if let Err(e) = std::fs::remove_file(&test_file) {
                warn!("Failed to clean up test file {:?}: {}", test_file, e);
            }
            Ok(())
        }
        Err(e) => Err(MatisseError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        MatisseError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Copy a directory tree, creating the destination as needed
pub fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<()> {
    ensure_directory_exists(destination)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Parse a number, ignoring a trailing unit such as `px`, `%` or `em`.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e'))
        .unwrap_or(value.len());
    value[..end].parse::<f64>().ok().or_else(|| {
        // "1e" style prefixes of units like "em" are not exponents
        value[..end].trim_end_matches('e').parse::<f64>().ok()
    })
}

/// Format a number with at most four decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_units() {
        assert_eq!(parse_number("900px"), Some(900.0));
        assert_eq!(parse_number(" 12.5% "), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("2em"), Some(2.0));
        assert_eq!(parse_number("auto"), None);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(100.0 / 3.0), "33.3333");
        assert_eq!(fmt_num(0.1 + 0.2), "0.3");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn test_copy_dir_recursive() {
        let source = tempfile::TempDir::new().expect("Failed to create temp dir");
        let target = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(source.path().join("img")).unwrap();
        std::fs::write(source.path().join("img/logo.svg"), "<svg/>").unwrap();
        std::fs::write(source.path().join("notes.txt"), "n").unwrap();

        let destination = target.path().join("copy");
        copy_dir_recursive(source.path(), &destination).unwrap();
        assert_eq!(
            std::fs::read_to_string(destination.join("img/logo.svg")).unwrap(),
            "<svg/>"
        );
        assert!(destination.join("notes.txt").exists());
    }

    #[test]
    fn test_validate_paths() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        assert!(matches!(
            validate_file_exists(&dir.path().join("missing.md")),
            Err(MatisseError::PathNotFoundError(_))
        ));
        assert!(validate_file_exists(dir.path()).is_err());
        assert!(validate_directory_writable(&dir.path().join("out")).is_ok());
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a <b> & \"c\""), "a &lt;b&gt; &amp; &quot;c&quot;");
    }
}
