// ABOUTME: Source editing helpers for slide-level blocks
// ABOUTME: Locates and strips override themes and top-level theme sections

use crate::metadata::strip_section;
use crate::theme::element::section;

const OVERTHEME_TAG: &str = "slide";

/// The inline override theme of a slide body, if any.
pub fn get_overtheme(raw_body: &str) -> Option<String> {
    section(raw_body, OVERTHEME_TAG).map(str::to_string)
}

/// The slide body without its override theme block.
pub fn strip_overtheme(raw_body: &str) -> String {
    strip_section(raw_body, OVERTHEME_TAG)
}

/// Split the top-level `---theme_*` sections out of a document. Sections
/// inside `---slide` override blocks belong to their slide and are left in
/// place. Returns `(theme_source, remaining_source)`.
pub fn split_global_theme(source: &str) -> (String, String) {
    let slide_begin = format!("---{}", OVERTHEME_TAG);
    let slide_end = format!("---end{}", OVERTHEME_TAG);
    let mut theme = String::new();
    let mut remaining = String::with_capacity(source.len());
    let mut in_slide = false;
    let mut in_theme: Option<String> = None;

    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(end) = &in_theme {
            theme.push_str(line);
            if trimmed == end.as_str() {
                in_theme = None;
                if !line.ends_with('\n') {
                    theme.push('\n');
                }
            }
            continue;
        }
        if in_slide {
            in_slide = trimmed != slide_end;
        } else if trimmed == slide_begin {
            in_slide = true;
        } else if let Some(tag) = trimmed.strip_prefix("---theme_") {
            in_theme = Some(format!("---endtheme_{}", tag));
            theme.push_str(line);
            continue;
        }
        remaining.push_str(line);
    }
    (theme, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overtheme_roundtrip() {
        let body = "Text\n---slide\n---theme_slide_content\n- color: red\n---endtheme_slide_content\n---endslide\nMore\n";
        let overtheme = get_overtheme(body).unwrap();
        assert!(overtheme.contains("color: red"));
        assert_eq!(strip_overtheme(body), "Text\nMore\n");
        assert_eq!(get_overtheme("plain body"), None);
    }

    #[test]
    fn test_split_global_theme_skips_overrides() {
        let source = "---theme_slide_global\n- width: 800px\n---endtheme_slide_global\n# Chapter\n#### Slide\n---slide\n---theme_slide_content\n- color: red\n---endtheme_slide_content\n---endslide\nBody\n";
        let (theme, remaining) = split_global_theme(source);
        assert_eq!(
            theme,
            "---theme_slide_global\n- width: 800px\n---endtheme_slide_global\n"
        );
        assert!(remaining.starts_with("# Chapter\n"));
        assert!(remaining.contains("---theme_slide_content\n- color: red\n"));
    }
}
