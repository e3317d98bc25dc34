// ABOUTME: Typed theme properties with explicit customization tracking
// ABOUTME: Defines property keys, values and the ordered property bag of a theme element

use indexmap::IndexMap;
use log::warn;
use std::fmt;

/// Name of a themeable property.
///
/// Engine keys drive layout and are never emitted as CSS; any other valid CSS
/// property name is carried through as `Css`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Width,
    Height,
    Padding,
    Active,
    Position,
    Content,
    SlideTransition,
    DataOffset,
    DataStep,
    DataScale,
    DataX,
    DataY,
    DataZ,
    DataRotateX,
    DataRotateY,
    DataRotateZ,
    Css(String),
}

impl PropertyKey {
    /// Parse a key as written in a theme section. Returns `None` (and logs) for
    /// names that are not valid CSS identifiers.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let key = match name.as_str() {
            "width" => PropertyKey::Width,
            "height" => PropertyKey::Height,
            "padding" => PropertyKey::Padding,
            "active" => PropertyKey::Active,
            "position" => PropertyKey::Position,
            "content" => PropertyKey::Content,
            "slide-transition" => PropertyKey::SlideTransition,
            "data-offset" => PropertyKey::DataOffset,
            "data-step" => PropertyKey::DataStep,
            "data-scale" => PropertyKey::DataScale,
            "data-x" => PropertyKey::DataX,
            "data-y" => PropertyKey::DataY,
            "data-z" => PropertyKey::DataZ,
            "data-rotate-x" => PropertyKey::DataRotateX,
            "data-rotate-y" => PropertyKey::DataRotateY,
            "data-rotate-z" => PropertyKey::DataRotateZ,
            _ if is_css_identifier(&name) => PropertyKey::Css(name),
            _ => {
                warn!("Ignoring unknown theme property: {:?}", name);
                return None;
            }
        };
        Some(key)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Width => "width",
            PropertyKey::Height => "height",
            PropertyKey::Padding => "padding",
            PropertyKey::Active => "active",
            PropertyKey::Position => "position",
            PropertyKey::Content => "content",
            PropertyKey::SlideTransition => "slide-transition",
            PropertyKey::DataOffset => "data-offset",
            PropertyKey::DataStep => "data-step",
            PropertyKey::DataScale => "data-scale",
            PropertyKey::DataX => "data-x",
            PropertyKey::DataY => "data-y",
            PropertyKey::DataZ => "data-z",
            PropertyKey::DataRotateX => "data-rotate-x",
            PropertyKey::DataRotateY => "data-rotate-y",
            PropertyKey::DataRotateZ => "data-rotate-z",
            PropertyKey::Css(name) => name,
        }
    }

    /// Whether the property becomes a CSS declaration.
    pub fn is_css(&self) -> bool {
        matches!(
            self,
            PropertyKey::Width | PropertyKey::Height | PropertyKey::Padding | PropertyKey::Css(_)
        )
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_css_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// A property value together with its "set by the user" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeProperty {
    pub value: String,
    pub is_custom: bool,
}

impl ThemeProperty {
    pub fn default_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            is_custom: false,
        }
    }

    pub fn custom(value: &str) -> Self {
        Self {
            value: value.to_string(),
            is_custom: true,
        }
    }
}

/// Ordered property bag; iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: IndexMap<PropertyKey, ThemeProperty>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built-in default. Existing entries keep their position.
    pub fn set_default(&mut self, key: PropertyKey, value: &str) {
        self.entries
            .insert(key, ThemeProperty::default_value(value));
    }

    /// Store a user-supplied value, marking it custom.
    pub fn set_custom(&mut self, key: PropertyKey, value: &str) {
        self.entries.insert(key, ThemeProperty::custom(value));
    }

    pub fn insert(&mut self, key: PropertyKey, property: ThemeProperty) {
        self.entries.insert(key, property);
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&ThemeProperty> {
        self.entries.get(key)
    }

    pub fn value(&self, key: &PropertyKey) -> Option<&str> {
        self.entries.get(key).map(|p| p.value.as_str())
    }

    pub fn is_custom(&self, key: &PropertyKey) -> bool {
        self.entries.get(key).is_some_and(|p| p.is_custom)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &ThemeProperty)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark every property as custom, freezing current values.
    pub fn set_all_custom(&mut self) {
        for property in self.entries.values_mut() {
            property.is_custom = true;
        }
    }

    /// Inherit from a less specific map: custom entries are kept, every other
    /// entry takes `other`'s value and stays non-custom.
    pub fn set_from(&mut self, other: &PropertyMap) {
        for (key, theirs) in &other.entries {
            match self.entries.get_mut(key) {
                Some(mine) if mine.is_custom => {}
                Some(mine) => mine.value = theirs.value.clone(),
                None => {
                    self.entries
                        .insert(key.clone(), ThemeProperty::default_value(&theirs.value));
                }
            }
        }
    }

    /// CSS declarations, one per line, indented for a rule body.
    pub fn get_css(&self, only_custom: bool) -> String {
        let mut css = String::new();
        for (key, property) in &self.entries {
            if !key.is_css() || (only_custom && !property.is_custom) {
                continue;
            }
            css.push_str(&format!("\n  {}: {};", key, property.value));
        }
        css
    }
}
