// ABOUTME: Resource handling for the matisse application
// ABOUTME: Embeds local CSS/JavaScript files and links remote ones

use crate::errors::{MatisseError, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://")
            || path.starts_with("https://")
            || path.starts_with("//");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Read the content of a local resource. Remote resources are never
    /// fetched; they can only be linked.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            return Err(MatisseError::InvalidResourcePath(format!(
                "Remote resource cannot be embedded: {}",
                self.path
            )));
        }
        info!("Reading local resource: {}", self.path);
        if !Path::new(&self.path).exists() {
            return Err(MatisseError::PathNotFoundError(
                Path::new(&self.path).to_path_buf(),
            ));
        }

        fs::read_to_string(&self.path).map_err(MatisseError::FileReadError)
    }

    /// Generate HTML tag for the resource, either embedding or linking the content.
    /// - tag_type: The type of tag to generate ("css" or "js")
    /// - embed: Whether to embed the content in the tag or link to it
    pub fn tag(&self, tag_type: &str, embed: bool) -> Result<String> {
        if self.is_remote || !embed {
            Ok(match tag_type {
                "css" => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                "js" => format!(r#"<script src="{}"></script>"#, self.path),
                _ => {
                    return Err(MatisseError::InvalidResourcePath(format!(
                        "Unknown resource type: {}",
                        tag_type
                    )));
                }
            })
        } else {
            let content = self.content()?;
            Ok(match tag_type {
                "css" => format!(r#"<style>{}</style>"#, content),
                "js" => format!(r#"<script>{}</script>"#, content),
                _ => {
                    return Err(MatisseError::InvalidResourcePath(format!(
                        "Unknown resource type: {}",
                        tag_type
                    )));
                }
            })
        }
    }
}
