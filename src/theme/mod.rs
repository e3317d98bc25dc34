// ABOUTME: Presentation theme built from the tagged theme DSL
// ABOUTME: Groups slide elements and environment styles and drives the cascade

pub mod element;
pub mod environment;
pub mod property;
pub mod slide;

pub use element::ThemeElement;
pub use environment::{EnvironmentStyle, EnvironmentThemes};
pub use property::{PropertyKey, PropertyMap, ThemeProperty};
pub use slide::{Content, Footer, Header, Sidebar, SidebarSide, SlideGlobal, SlideTheme};

/// A complete (global) or partial (per-slide override) theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub slide: SlideTheme,
    pub environments: EnvironmentThemes,
    /// Plain themes never inherit decoration from a less specific theme.
    pub plain: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Theme {
    pub fn new(source: Option<&str>) -> Self {
        Self {
            slide: SlideTheme::new(source),
            environments: EnvironmentThemes::new(source),
            plain: false,
        }
    }

    /// The default theme with every property frozen as custom.
    pub fn plain() -> Self {
        Self::plain_from(None)
    }

    /// A theme parsed from `source` whose values, defaults included, are all
    /// frozen as custom so that no cascade can change them.
    pub fn plain_from(source: Option<&str>) -> Self {
        let mut theme = Self::new(source);
        theme.slide.set_all_custom();
        theme.environments.set_all_custom();
        theme.plain = true;
        theme
    }

    /// Cascade a less specific theme onto this one and recompute dimensions.
    pub fn set_from(&mut self, other: &Theme) {
        self.slide.set_from(&other.slide, self.plain);
        self.environments.set_from(&other.environments);
        self.slide.adjust_dims();
    }

    /// Slide elements followed by environment styles, in rendering order.
    pub fn elements(&self) -> impl Iterator<Item = &ThemeElement> {
        self.slide.elements().chain(self.environments.elements())
    }

    /// Every CSS rule of the theme, in rendering order. With `only_custom`,
    /// rules without any customized declaration are left out.
    pub fn css_rules(&self, only_custom: bool) -> Vec<String> {
        self.elements()
            .filter(|element| !only_custom || element.has_custom())
            .map(|element| element.get_css(only_custom))
            .collect()
    }

    pub fn get_css(&self, only_custom: bool) -> String {
        self.css_rules(only_custom).concat()
    }
}
