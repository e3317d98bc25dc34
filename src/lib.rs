// ABOUTME: Library module for the matisse program.
// ABOUTME: Turns extended markdown into themed impress.js presentations.

pub mod config;
pub mod errors;
pub mod html;
pub mod markdown;
pub mod markup;
pub mod math;
pub mod metadata;
pub mod position;
pub mod presentation;
pub mod resources;
pub mod sample;
pub mod slide;
pub mod source;
pub mod theme;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use errors::{MatisseError, Result};
pub use html::{build_presentation, generate_html, write_html_to_file, BuildConfig};
pub use markdown::{converter_for, ComrakConverter, MarkdownConverter};
pub use metadata::Metadata;
pub use position::Position;
pub use presentation::{OutlineEntry, Presentation};
pub use resources::ResourceFile;
pub use sample::write_sample;
pub use slide::{Slide, Titlepage};
pub use theme::Theme;
pub use watch::{watch_markdown, WatchConfig};
