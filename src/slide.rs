// ABOUTME: A single slide and the titlepage: override theme, scoped CSS and HTML assembly
// ABOUTME: Positions each slide through the shared Position state while rendering

use crate::markdown::MarkdownConverter;
use crate::markup;
use crate::metadata::Metadata;
use crate::position::Position;
use crate::source::{get_overtheme, strip_overtheme};
use crate::theme::{SidebarSide, Theme};
use crate::utils::{escape_html, fmt_num};
use log::debug;
use std::fmt;

pub const OVERVIEW_TITLE: &str = "$overview";

/// Hierarchy metadata copied onto the slide element when present.
const HIERARCHY_ATTRIBUTES: [&str; 4] = [
    "sectiontitle",
    "sectionnumber",
    "subsectiontitle",
    "subsectionnumber",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub raw_body: String,
    /// Global 1-based number, also used for the `slide-N` id.
    pub number: usize,
    /// Number within the enclosing subsection.
    pub local_number: usize,
    pub title: String,
    pub metadata: Metadata,
    pub overtheme: Option<Theme>,
}

impl Slide {
    pub fn new(
        raw_body: &str,
        title: &str,
        metadata: &Metadata,
        theme: Option<&Theme>,
        local_number: usize,
        number: usize,
    ) -> Self {
        Self::build(raw_body, title, metadata, theme, local_number, number, false)
    }

    fn build(
        raw_body: &str,
        title: &str,
        metadata: &Metadata,
        theme: Option<&Theme>,
        local_number: usize,
        number: usize,
        plain: bool,
    ) -> Self {
        let mut metadata = metadata.clone();
        metadata.set("slidetitle", title);
        metadata.set("slidenumber", &number.to_string());

        let overtheme_source = get_overtheme(raw_body);
        let mut overtheme = match (&overtheme_source, plain) {
            (source, true) => Some(Theme::plain_from(source.as_deref())),
            (Some(source), false) => Some(Theme::new(Some(source.as_str()))),
            (None, false) => None,
        };
        if let (Some(overtheme), Some(theme)) = (overtheme.as_mut(), theme) {
            overtheme.set_from(theme);
        }
        let raw_body = match overtheme_source {
            Some(_) => strip_overtheme(raw_body),
            None => raw_body.to_string(),
        };
        debug!(
            "Slide {} ({:?}) with{} override theme",
            number,
            title,
            if overtheme.is_some() { "" } else { "out" }
        );

        Self {
            raw_body,
            number,
            local_number,
            title: title.to_string(),
            metadata,
            overtheme,
        }
    }

    pub fn is_overview(&self) -> bool {
        self.title.trim() == OVERVIEW_TITLE
    }

    /// CSS of the override theme, every rule scoped to this slide. Empty when
    /// the slide has no override.
    pub fn get_css(&self, only_custom: bool) -> String {
        let Some(theme) = &self.overtheme else {
            return String::new();
        };
        let slide_class = &theme.slide.global.element.class_name;
        theme
            .elements()
            .filter(|element| !only_custom || element.has_custom())
            .map(|element| {
                let rule = element.get_css(only_custom);
                let rule = rule.strip_prefix('\n').unwrap_or(&rule);
                // The slide rule targets the slide element itself.
                let gap = if &element.class_name == slide_class { "" } else { " " };
                format!("\n#slide-{}{}{}", self.number, gap, rule)
            })
            .collect()
    }

    /// Substitute metadata placeholders, then tokenize and parse the body.
    pub fn raw_body_parse(&self, converter: &dyn MarkdownConverter) -> String {
        markup::parse(&self.metadata.substitute(&self.raw_body), converter)
    }

    /// Advance `position` and render the slide element.
    pub fn to_html(
        &self,
        position: &mut Position,
        theme: &Theme,
        converter: &dyn MarkdownConverter,
    ) -> String {
        let effective = self.overtheme.as_ref().unwrap_or(theme);
        position.set_position(&effective.slide.global);

        if self.is_overview() {
            return format!(
                "<div id=\"slide-{}\" title=\"{}\" class=\"step overview\" data-x=\"0\" data-y=\"0\" data-z=\"0\" data-scale=\"{}\">\n</div>",
                self.number,
                escape_html(&self.title),
                fmt_num(position.scale)
            );
        }

        let mut html = format!(
            "<div id=\"slide-{}\" title=\"{}\" class=\"step slide\"",
            self.number,
            escape_html(&self.title)
        );
        let [x, y, z] = position.coords;
        let [rx, ry, rz] = position.rotation;
        for (name, value) in [
            ("data-x", x),
            ("data-y", y),
            ("data-z", z),
            ("data-scale", position.scale),
            ("data-rotate-x", rx),
            ("data-rotate-y", ry),
            ("data-rotate-z", rz),
        ] {
            html.push_str(&format!(" {}=\"{}\"", name, fmt_num(value)));
        }
        for key in HIERARCHY_ATTRIBUTES {
            if let Some(value) = self.metadata.get(key) {
                html.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
            }
        }
        html.push_str(">\n");

        let slide = &effective.slide;
        for header in slide.headers.iter().filter(|h| h.is_active()) {
            html.push_str(&header.to_html(&self.metadata));
            html.push('\n');
        }
        for sidebar in slide.sidebars_on(SidebarSide::Left) {
            html.push_str(&sidebar.to_html(&self.metadata));
            html.push('\n');
        }
        html.push_str(&slide.content.to_html(&self.raw_body_parse(converter)));
        html.push('\n');
        for sidebar in slide.sidebars_on(SidebarSide::Right) {
            html.push_str(&sidebar.to_html(&self.metadata));
            html.push('\n');
        }
        for footer in slide.footers.iter().filter(|f| f.is_active()) {
            html.push_str(&footer.to_html(&self.metadata));
            html.push('\n');
        }
        html.push_str("</div>");
        html
    }
}

/// The optional `---titlepage` ... `---endtitlepage` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Titlepage {
    raw_body: String,
    pub number: usize,
    pub found: bool,
    /// Plain titlepages ignore the decoration of the global theme.
    pub plain: bool,
}

impl Titlepage {
    /// Pull the titlepage out of `source`. A `---titlepage[plain]` marker
    /// makes it plain as does the `plain` argument.
    pub fn extract(plain: bool, source: &str, number: usize) -> (Self, String) {
        let mut titlepage = Self {
            raw_body: String::new(),
            number,
            found: false,
            plain,
        };
        let mut remaining = String::with_capacity(source.len());
        let mut inside = false;
        for line in source.split_inclusive('\n') {
            let trimmed = line.trim();
            if inside {
                if trimmed == "---endtitlepage" {
                    inside = false;
                } else {
                    titlepage.raw_body.push_str(line);
                }
            } else if !titlepage.found && trimmed.starts_with("---titlepage") {
                let options = &trimmed["---titlepage".len()..];
                if options.is_empty() || options.starts_with('[') {
                    inside = true;
                    titlepage.found = true;
                    titlepage.plain |= options.contains("plain");
                } else {
                    remaining.push_str(line);
                }
            } else {
                remaining.push_str(line);
            }
        }
        (titlepage, remaining)
    }

    /// The titlepage as a renderable slide, if one was found.
    pub fn slide(&self, metadata: &Metadata, theme: &Theme) -> Option<Slide> {
        if !self.found {
            return None;
        }
        let title = metadata
            .get("title")
            .filter(|t| !t.is_empty())
            .unwrap_or("Titlepage");
        Some(Slide::build(
            &self.raw_body,
            title,
            metadata,
            Some(theme),
            0,
            self.number,
            self.plain,
        ))
    }
}

impl fmt::Display for Titlepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(f, "{}", self.raw_body)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ComrakConverter;

    const OVERRIDE: &str = "---slide\n---theme_slide_content\n- color: red\n---endtheme_slide_content\n---endslide\nHello $slidetitle\n";

    #[test]
    fn test_metadata_seeded() {
        let slide = Slide::new("body", "Intro", &Metadata::new(), None, 1, 4);
        assert_eq!(slide.metadata.get("slidetitle"), Some("Intro"));
        assert_eq!(slide.metadata.get("slidenumber"), Some("4"));
        assert!(slide.overtheme.is_none());
    }

    #[test]
    fn test_overtheme_stripped_and_scoped() {
        let global = Theme::default();
        let slide = Slide::new(OVERRIDE, "First", &Metadata::new(), Some(&global), 1, 3);
        assert_eq!(slide.raw_body, "Hello $slidetitle\n");
        let css = slide.get_css(true);
        assert!(css.starts_with("\n#slide-3 .slide-content {\n  float: left;"));
        assert!(css.contains("\n  color: red;\n}"));
        assert!(!css.contains("#slide-3.slide {"));

        let converter = ComrakConverter::default();
        assert!(slide.raw_body_parse(&converter).contains("<p>Hello First</p>"));
    }

    #[test]
    fn test_to_html_layout_order() {
        let global = Theme::new(Some(
            "---theme_slide_header_1\n- height: 10%\n- content: $title\n---endtheme_slide_header_1\n---theme_slide_sidebar_1\n- width: 20%\n- position: R\n---endtheme_slide_sidebar_1\n",
        ));
        let mut metadata = Metadata::new();
        metadata.set("title", "Deck & Co");
        metadata.set("sectiontitle", "Basics");
        let slide = Slide::new("Body text\n", "A <b>", &metadata, Some(&global), 1, 2);
        let converter = ComrakConverter::default();
        let mut position = Position::new();
        let html = slide.to_html(&mut position, &global, &converter);

        assert!(html.starts_with(
            "<div id=\"slide-2\" title=\"A &lt;b&gt;\" class=\"step slide\" data-x=\"0\" data-y=\"0\" data-z=\"0\" data-scale=\"1\""
        ));
        assert!(html.contains(" sectiontitle=\"Basics\">"));
        assert!(!html.contains("subsectiontitle"));
        let header = html.find("<div class=\"slide-header_1\">Deck & Co</div>").unwrap();
        let content = html.find("<div class=\"slide-content\">").unwrap();
        let sidebar = html.find("<div class=\"slide-sidebar_1\">").unwrap();
        assert!(header < content && content < sidebar);
    }

    #[test]
    fn test_overview_slide() {
        let theme = Theme::default();
        let converter = ComrakConverter::default();
        let mut position = Position::new();
        let first = Slide::new("x", "One", &Metadata::new(), None, 1, 1);
        let overview = Slide::new("", OVERVIEW_TITLE, &Metadata::new(), None, 2, 2);
        first.to_html(&mut position, &theme, &converter);
        let html = overview.to_html(&mut position, &theme, &converter);
        assert!(html.contains("class=\"step overview\" data-x=\"0\" data-y=\"0\" data-z=\"0\" data-scale=\"1\""));
        assert_eq!(position.coords, [900.0, 0.0, 0.0]);
    }

    #[test]
    fn test_titlepage_extract() {
        let source = "intro\n---titlepage[plain]\n# $title\n---endtitlepage\nrest\n";
        let (titlepage, remaining) = Titlepage::extract(false, source, 1);
        assert!(titlepage.found);
        assert!(titlepage.plain);
        assert_eq!(titlepage.to_string(), "# $title\n");
        assert_eq!(remaining, "intro\nrest\n");

        let global = Theme::new(Some(
            "---theme_slide_header_1\n- height: 10%\n---endtheme_slide_header_1\n",
        ));
        let slide = titlepage.slide(&Metadata::new(), &global).unwrap();
        assert_eq!(slide.number, 1);
        assert!(slide.overtheme.as_ref().unwrap().slide.headers.is_empty());

        let (missing, rest) = Titlepage::extract(false, "no titlepage\n", 1);
        assert!(!missing.found);
        assert_eq!(missing.to_string(), "");
        assert_eq!(rest, "no titlepage\n");
        assert!(missing.slide(&Metadata::new(), &global).is_none());
    }
}
