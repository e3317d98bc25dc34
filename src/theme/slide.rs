// ABOUTME: Slide-level theme elements: global geometry, content, headers, footers, sidebars
// ABOUTME: Implements the cascade merge and the derived content dimensions

use super::element::ThemeElement;
use super::property::PropertyKey;
use crate::metadata::Metadata;
use crate::utils::{fmt_num, parse_number};
use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*---theme_slide_(header|footer|sidebar)_(\d+)\s*$").unwrap()
});

/// Geometry and layout grammar shared by every slide (`theme_slide_global`).
#[derive(Debug, Clone, PartialEq)]
pub struct SlideGlobal {
    pub element: ThemeElement,
}

impl SlideGlobal {
    pub fn new(source: Option<&str>) -> Self {
        let mut element = ThemeElement::new("theme_slide_global", "slide")
            .with_fixed(&["position: relative;"])
            .with_default(PropertyKey::Width, "900px")
            .with_default(PropertyKey::Height, "700px")
            .with_default(PropertyKey::SlideTransition, "horizontal")
            .with_default(PropertyKey::DataOffset, "1")
            .with_default(PropertyKey::DataScale, "1")
            .with_default(PropertyKey::DataRotateX, "0")
            .with_default(PropertyKey::DataRotateY, "0")
            .with_default(PropertyKey::DataRotateZ, "0");
        if let Some(source) = source {
            element.get(source);
        }
        Self { element }
    }

    fn number(&self, key: &PropertyKey, default: f64) -> f64 {
        self.element
            .value(key)
            .and_then(parse_number)
            .unwrap_or(default)
    }

    /// Slide width and height in pixels.
    pub fn dimensions(&self) -> (f64, f64) {
        (
            self.number(&PropertyKey::Width, 900.0),
            self.number(&PropertyKey::Height, 700.0),
        )
    }

    /// Displacement from the previous slide.
    pub fn step(&self) -> [f64; 3] {
        if let Some(step) = self
            .element
            .value(&PropertyKey::DataStep)
            .and_then(parse_triple)
        {
            return step;
        }
        let (width, height) = self.dimensions();
        let offset = self.number(&PropertyKey::DataOffset, 1.0);
        let transition = self
            .element
            .value(&PropertyKey::SlideTransition)
            .unwrap_or("horizontal")
            .trim()
            .to_lowercase();
        match transition.as_str() {
            "horizontal" => [width * offset, 0.0, 0.0],
            "vertical" => [0.0, height * offset, 0.0],
            "diagonal" => [width * offset, height * offset, 0.0],
            _ => [0.0, 0.0, 0.0],
        }
    }

    /// Absolute coordinates declared by the theme, axis by axis.
    pub fn explicit_coords(&self) -> [Option<f64>; 3] {
        [PropertyKey::DataX, PropertyKey::DataY, PropertyKey::DataZ]
            .map(|key| self.element.value(&key).and_then(parse_number))
    }

    pub fn rotation(&self) -> [f64; 3] {
        [
            PropertyKey::DataRotateX,
            PropertyKey::DataRotateY,
            PropertyKey::DataRotateZ,
        ]
        .map(|key| self.number(&key, 0.0))
    }

    pub fn scale(&self) -> f64 {
        self.number(&PropertyKey::DataScale, 1.0)
    }
}

fn parse_triple(value: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(parse_number)
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        [x, y] => Some([*x, *y, 0.0]),
        _ => None,
    }
}

/// The slide content area. `padding` is applied to an inner wrapper so that
/// the content width stays exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub element: ThemeElement,
    pub padding: Option<String>,
}

impl Content {
    pub fn new(source: Option<&str>) -> Self {
        let mut element = ThemeElement::new("theme_slide_content", "slide-content")
            .with_fixed(&["float: left;"])
            .with_default(PropertyKey::Width, "100%")
            .with_default(PropertyKey::Height, "100%")
            .with_default(PropertyKey::Padding, "0");
        if let Some(source) = source {
            element.get(source);
        }
        let mut content = Self {
            element,
            padding: None,
        };
        content.extract_specials();
        content
    }

    /// Move a user padding into the typed field, leaving a custom `0` behind.
    fn extract_specials(&mut self) {
        let key = PropertyKey::Padding;
        if !self.element.data.is_custom(&key) {
            return;
        }
        if let Some(value) = self.element.value(&key) {
            if value.trim() != "0" {
                self.padding = Some(value.trim().to_string());
                self.element.data.set_custom(key, "0");
            }
        }
    }

    /// A plain receiver keeps its own padding, even when it has none.
    pub fn set_from(&mut self, other: &Content, plain: bool) {
        self.element.set_from(&other.element);
        if self.padding.is_none() && !plain {
            self.padding = other.padding.clone();
        }
    }

    pub fn to_html(&self, content: &str) -> String {
        match &self.padding {
            Some(padding) => format!(
                "<div class=\"{}\"><div style=\"padding: {};\">{}</div></div>",
                self.element.class_name, padding, content
            ),
            None => format!("<div class=\"{}\">{}</div>", self.element.class_name, content),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarKind {
    Header,
    Footer,
    Sidebar,
}

impl BarKind {
    fn name(self) -> &'static str {
        match self {
            BarKind::Header => "header",
            BarKind::Footer => "footer",
            BarKind::Sidebar => "sidebar",
        }
    }
}

/// A numbered header, footer or sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    kind: BarKind,
    pub number: usize,
    pub element: ThemeElement,
    pub side: SidebarSide,
}

pub type Header = Bar;
pub type Footer = Bar;
pub type Sidebar = Bar;

impl Bar {
    fn new(kind: BarKind, number: usize, source: Option<&str>) -> Self {
        let tag = format!("theme_slide_{}_{}", kind.name(), number);
        let class = format!("slide-{}_{}", kind.name(), number);
        let element = match kind {
            BarKind::Header | BarKind::Footer => ThemeElement::new(&tag, &class)
                .with_fixed(&["clear: both;"])
                .with_default(PropertyKey::Height, "0%"),
            BarKind::Sidebar => ThemeElement::new(&tag, &class)
                .with_fixed(&["float: left;"])
                .with_default(PropertyKey::Width, "0%")
                .with_default(PropertyKey::Height, "100%")
                .with_default(PropertyKey::Position, "L"),
        };
        let mut bar = Self {
            kind,
            number,
            element,
            side: SidebarSide::Left,
        };
        if let Some(source) = source {
            bar.element.get(source);
        }
        bar.extract_specials();
        bar
    }

    pub fn header(number: usize, source: Option<&str>) -> Self {
        Self::new(BarKind::Header, number, source)
    }

    pub fn footer(number: usize, source: Option<&str>) -> Self {
        Self::new(BarKind::Footer, number, source)
    }

    pub fn sidebar(number: usize, source: Option<&str>) -> Self {
        Self::new(BarKind::Sidebar, number, source)
    }

    fn extract_specials(&mut self) {
        if self.kind != BarKind::Sidebar {
            return;
        }
        self.side = match self.element.value(&PropertyKey::Position).map(str::trim) {
            Some("R") | Some("r") | Some("right") => SidebarSide::Right,
            _ => SidebarSide::Left,
        };
    }

    /// A fresh, non-custom copy of `other` for inheritance into an override.
    fn inherit(other: &Bar) -> Self {
        let mut bar = Self::new(other.kind, other.number, None);
        bar.element.found = other.element.found;
        bar.set_from(other);
        bar
    }

    pub fn set_from(&mut self, other: &Bar) {
        self.element.set_from(&other.element);
        self.extract_specials();
    }

    /// The size (percent) this element takes from the content area.
    fn extent(&self) -> f64 {
        let key = match self.kind {
            BarKind::Sidebar => PropertyKey::Width,
            BarKind::Header | BarKind::Footer => PropertyKey::Height,
        };
        self.element
            .value(&key)
            .and_then(parse_number)
            .unwrap_or(0.0)
    }

    /// Active elements are enabled and have a non-zero extent.
    pub fn is_active(&self) -> bool {
        self.element.is_enabled() && self.extent() > 0.0
    }

    pub fn to_html(&self, metadata: &Metadata) -> String {
        let content = self
            .element
            .value(&PropertyKey::Content)
            .map(|c| metadata.substitute(c))
            .unwrap_or_default();
        format!("<div class=\"{}\">{}</div>", self.element.class_name, content)
    }
}

/// All slide-level theme elements.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideTheme {
    pub global: SlideGlobal,
    pub content: Content,
    pub headers: Vec<Header>,
    pub footers: Vec<Footer>,
    pub sidebars: Vec<Sidebar>,
}

impl SlideTheme {
    pub fn new(source: Option<&str>) -> Self {
        let mut theme = Self {
            global: SlideGlobal::new(source),
            content: Content::new(source),
            headers: Vec::new(),
            footers: Vec::new(),
            sidebars: Vec::new(),
        };
        if let Some(source) = source {
            for (kind, number) in numbered_sections(source) {
                match kind {
                    BarKind::Header => theme.headers.push(Bar::header(number, Some(source))),
                    BarKind::Footer => theme.footers.push(Bar::footer(number, Some(source))),
                    BarKind::Sidebar => theme.sidebars.push(Bar::sidebar(number, Some(source))),
                }
            }
        }
        theme.adjust_dims();
        theme
    }

    /// Cascade `other` (less specific) onto this theme. Bars only present in
    /// `other` are inherited unless `plain` is set.
    pub fn set_from(&mut self, other: &SlideTheme, plain: bool) {
        self.global.element.set_from(&other.global.element);
        self.content.set_from(&other.content, plain);
        merge_bars(&mut self.headers, &other.headers, plain);
        merge_bars(&mut self.footers, &other.footers, plain);
        merge_bars(&mut self.sidebars, &other.sidebars, plain);
    }

    /// Recompute the content size from the 100% baseline, subtracting active
    /// headers and footers from the height and active sidebars from the width.
    pub fn adjust_dims(&mut self) {
        let mut width = 100.0;
        let mut height = 100.0;
        for bar in self.headers.iter().chain(self.footers.iter()) {
            if bar.is_active() {
                height -= bar.extent();
            }
        }
        for sidebar in &self.sidebars {
            if sidebar.is_active() {
                width -= sidebar.extent();
            }
        }
        let width = format!("{}%", fmt_num(width));
        let height = format!("{}%", fmt_num(height));
        for sidebar in &mut self.sidebars {
            if !sidebar.element.data.is_custom(&PropertyKey::Height) {
                sidebar
                    .element
                    .data
                    .set_default(PropertyKey::Height, &height);
            }
        }
        self.content.element.data.set_custom(PropertyKey::Width, &width);
        self.content.element.data.set_custom(PropertyKey::Height, &height);
    }

    pub fn set_all_custom(&mut self) {
        self.global.element.set_all_custom();
        self.content.element.set_all_custom();
        for bar in self
            .headers
            .iter_mut()
            .chain(self.footers.iter_mut())
            .chain(self.sidebars.iter_mut())
        {
            bar.element.set_all_custom();
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &ThemeElement> {
        std::iter::once(&self.global.element)
            .chain(std::iter::once(&self.content.element))
            .chain(self.headers.iter().map(|b| &b.element))
            .chain(self.footers.iter().map(|b| &b.element))
            .chain(self.sidebars.iter().map(|b| &b.element))
    }

    pub fn sidebars_on(&self, side: SidebarSide) -> impl Iterator<Item = &Sidebar> {
        self.sidebars
            .iter()
            .filter(move |s| s.side == side && s.is_active())
    }
}

fn merge_bars(mine: &mut Vec<Bar>, theirs: &[Bar], plain: bool) {
    for other in theirs {
        match mine.iter_mut().find(|b| b.number == other.number) {
            Some(bar) => bar.set_from(other),
            None if !plain => mine.push(Bar::inherit(other)),
            None => {}
        }
    }
    mine.sort_by_key(|b| b.number);
}

fn numbered_sections(source: &str) -> Vec<(BarKind, usize)> {
    let mut found: Vec<(BarKind, usize)> = Vec::new();
    for caps in NUMBERED_SECTION_RE.captures_iter(source) {
        let kind = match &caps[1] {
            "header" => BarKind::Header,
            "footer" => BarKind::Footer,
            _ => BarKind::Sidebar,
        };
        let Ok(number) = caps[2].parse::<usize>() else {
            continue;
        };
        if !found.contains(&(kind, number)) {
            found.push((kind, number));
        }
    }
    found.sort_by_key(|(_, n)| *n);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "---theme_slide_header_1\n- height: 10%\n---endtheme_slide_header_1\n---theme_slide_footer_1\n- height: 5%\n---endtheme_slide_footer_1\n---theme_slide_sidebar_1\n- width: 20%\n- position: R\n---endtheme_slide_sidebar_1\n---theme_slide_content\n- padding: 2%\n---endtheme_slide_content\n";

    #[test]
    fn test_adjust_dims_from_baseline() {
        let mut theme = SlideTheme::new(Some(SOURCE));
        assert_eq!(theme.content.element.value(&PropertyKey::Width), Some("80%"));
        assert_eq!(theme.content.element.value(&PropertyKey::Height), Some("85%"));
        theme.adjust_dims();
        theme.adjust_dims();
        assert_eq!(theme.content.element.value(&PropertyKey::Width), Some("80%"));
        assert_eq!(theme.content.element.value(&PropertyKey::Height), Some("85%"));
        assert_eq!(theme.sidebars[0].side, SidebarSide::Right);
        assert_eq!(
            theme.sidebars[0].element.value(&PropertyKey::Height),
            Some("85%")
        );
    }

    #[test]
    fn test_padding_extracted() {
        let theme = SlideTheme::new(Some(SOURCE));
        assert_eq!(theme.content.padding.as_deref(), Some("2%"));
        assert_eq!(theme.content.element.value(&PropertyKey::Padding), Some("0"));
        assert!(theme.content.element.data.is_custom(&PropertyKey::Padding));
        assert_eq!(
            theme.content.to_html("x"),
            "<div class=\"slide-content\"><div style=\"padding: 2%;\">x</div></div>"
        );
    }

    #[test]
    fn test_inactive_bar_ignored() {
        let source = "---theme_slide_header_1\n- height: 10%\n- active: false\n---endtheme_slide_header_1\n";
        let theme = SlideTheme::new(Some(source));
        assert!(!theme.headers[0].is_active());
        assert_eq!(theme.content.element.value(&PropertyKey::Height), Some("100%"));
    }

    #[test]
    fn test_override_inherits_bars() {
        let global = SlideTheme::new(Some(SOURCE));
        let mut local = SlideTheme::new(Some(
            "---theme_slide_footer_1\n- height: 15%\n---endtheme_slide_footer_1\n",
        ));
        local.set_from(&global, false);
        local.adjust_dims();
        assert_eq!(local.headers.len(), 1);
        assert!(!local.headers[0].element.data.is_custom(&PropertyKey::Height));
        assert_eq!(local.content.element.value(&PropertyKey::Height), Some("75%"));
        assert_eq!(local.content.padding.as_deref(), Some("2%"));
    }

    #[test]
    fn test_plain_keeps_own_padding() {
        let global = SlideTheme::new(Some(SOURCE));
        let mut plain = SlideTheme::new(None);
        plain.set_from(&global, true);
        assert_eq!(plain.content.padding, None);
        assert_eq!(
            plain.content.to_html("x"),
            "<div class=\"slide-content\">x</div>"
        );
    }

    #[test]
    fn test_step_from_transition() {
        let global = SlideGlobal::new(Some(
            "---theme_slide_global\n- width: 800px\n- height: 600px\n- slide-transition: diagonal\n- data-offset: 2\n---endtheme_slide_global\n",
        ));
        assert_eq!(global.step(), [1600.0, 1200.0, 0.0]);

        let explicit = SlideGlobal::new(Some(
            "---theme_slide_global\n- data-step: 1 0 0\n---endtheme_slide_global\n",
        ));
        assert_eq!(explicit.step(), [1.0, 0.0, 0.0]);
    }
}
