// ABOUTME: Generic themeable element parsed from a tagged theme section
// ABOUTME: Handles section lookup, key/value parsing, cascade merging and CSS output

use super::property::{PropertyKey, PropertyMap};
use log::debug;

/// A visual property bag bound to a theme section tag and a CSS class.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeElement {
    pub tag: String,
    pub class_name: String,
    /// Declarations always emitted first in the rule body.
    pub fixed: Vec<String>,
    pub data: PropertyMap,
    /// Whether the section was present in the parsed source.
    pub found: bool,
}

impl ThemeElement {
    pub fn new(tag: &str, class_name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class_name: class_name.to_string(),
            fixed: Vec::new(),
            data: PropertyMap::new(),
            found: false,
        }
    }

    pub fn with_fixed(mut self, declarations: &[&str]) -> Self {
        self.fixed = declarations.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_default(mut self, key: PropertyKey, value: &str) -> Self {
        self.data.set_default(key, value);
        self
    }

    /// Read the element's section out of `source`, marking every value found as
    /// custom. Missing sections leave the defaults untouched.
    pub fn get(&mut self, source: &str) {
        let Some(body) = section(source, &self.tag) else {
            return;
        };
        self.found = true;
        for (name, value) in parse_entries(body) {
            if let Some(key) = PropertyKey::parse(&name) {
                self.data.set_custom(key, &value);
            }
        }
        debug!("Parsed theme section {} ({} entries)", self.tag, self.data.len());
    }

    pub fn set_from(&mut self, other: &ThemeElement) {
        self.data.set_from(&other.data);
    }

    pub fn set_all_custom(&mut self) {
        self.data.set_all_custom();
    }

    pub fn value(&self, key: &PropertyKey) -> Option<&str> {
        self.data.value(key)
    }

    /// A single CSS rule for this element.
    pub fn get_css(&self, only_custom: bool) -> String {
        let mut css = format!("\n.{} {{", self.class_name);
        for declaration in &self.fixed {
            css.push_str("\n  ");
            css.push_str(declaration);
        }
        css.push_str(&self.data.get_css(only_custom));
        css.push_str("\n}\n");
        css
    }

    /// Whether the rule would carry any user customization.
    pub fn has_custom(&self) -> bool {
        self.data.iter().any(|(key, p)| key.is_css() && p.is_custom)
    }

    /// `active` defaults to on; only an explicit negative value disables.
    pub fn is_enabled(&self) -> bool {
        !matches!(
            self.value(&PropertyKey::Active)
                .map(|v| v.trim().to_lowercase())
                .as_deref(),
            Some("false") | Some("no") | Some("0") | Some("off")
        )
    }
}

/// Body of the `---<tag>` ... `---end<tag>` section, if present. An
/// unterminated section runs to the end of the source.
pub fn section<'a>(source: &'a str, tag: &str) -> Option<&'a str> {
    let begin = format!("---{}", tag);
    let end = format!("---end{}", tag);
    let mut offset = 0;
    let mut start = None;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(s) = start {
            if trimmed == end {
                return Some(&source[s..offset]);
            }
        } else if trimmed == begin {
            start = Some(offset + line.len());
        }
        offset += line.len();
    }
    start.map(|s| &source[s..])
}

/// Parse `key: value` lines. A leading `- ` and surrounding quotes are
/// accepted; lines without a colon are skipped.
pub fn parse_entries(body: &str) -> Vec<(String, String)> {
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = line.strip_prefix("- ").unwrap_or(line);
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

pub fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_lookup() {
        let source = "---theme_slide_header_1\n  height: 10%\n---endtheme_slide_header_1\n---theme_slide_header_10\n  height: 5%\n---endtheme_slide_header_10\n";
        assert_eq!(section(source, "theme_slide_header_1"), Some("  height: 10%\n"));
        assert_eq!(section(source, "theme_slide_header_10"), Some("  height: 5%\n"));
        assert_eq!(section(source, "theme_slide_header_2"), None);
    }

    #[test]
    fn test_get_marks_custom() {
        let source = "---theme_box\n- background: \"#eee\"\n- border: 1px solid black\n---endtheme_box";
        let mut element = ThemeElement::new("theme_box", "box").with_default(PropertyKey::Width, "auto");
        element.get(source);
        assert!(element.found);
        assert_eq!(
            element.get_css(true),
            "\n.box {\n  background: #eee;\n  border: 1px solid black;\n}\n"
        );
        assert_eq!(
            element.get_css(false),
            "\n.box {\n  width: auto;\n  background: #eee;\n  border: 1px solid black;\n}\n"
        );
    }

    #[test]
    fn test_is_enabled() {
        let mut element = ThemeElement::new("theme_slide_footer_1", "slide-footer_1");
        assert!(element.is_enabled());
        element.get("---theme_slide_footer_1\nactive: false\n---endtheme_slide_footer_1");
        assert!(!element.is_enabled());
    }
}
