// ABOUTME: Theme styles for the box, figure, table and note environments
// ABOUTME: Each environment has a container, a caption and a content element

use super::element::ThemeElement;
use super::property::PropertyKey;

/// Styles of one environment kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentStyle {
    pub container: ThemeElement,
    pub caption: ThemeElement,
    pub content: ThemeElement,
}

impl EnvironmentStyle {
    fn new(name: &str, source: Option<&str>) -> Self {
        let css = |property: &str| PropertyKey::Css(property.to_string());
        let mut style = Self {
            container: ThemeElement::new(&format!("theme_{}", name), name),
            caption: ThemeElement::new(
                &format!("theme_{}_caption", name),
                &format!("{}-caption", name),
            ),
            content: ThemeElement::new(
                &format!("theme_{}_content", name),
                &format!("{}-content", name),
            ),
        };
        match name {
            "figure" => {
                style.container = style
                    .container
                    .with_default(css("text-align"), "center")
                    .with_default(css("margin"), "1% auto");
                style.caption = style.caption.with_default(css("font-style"), "italic");
            }
            "note" => {
                style.container = style
                    .container
                    .with_default(css("border-left"), "4px solid #888")
                    .with_default(PropertyKey::Padding, "0.5em 1em");
                style.caption = style.caption.with_default(css("font-weight"), "bold");
            }
            "table" => {
                style.container = style.container.with_default(css("margin"), "1% auto");
                style.caption = style
                    .caption
                    .with_default(css("text-align"), "center")
                    .with_default(css("font-style"), "italic");
            }
            _ => {
                style.container = style
                    .container
                    .with_default(css("margin"), "1% auto")
                    .with_default(css("border"), "1px solid #ccc");
                style.caption = style.caption.with_default(css("font-weight"), "bold");
            }
        }
        if let Some(source) = source {
            style.container.get(source);
            style.caption.get(source);
            style.content.get(source);
        }
        style
    }

    fn elements(&self) -> [&ThemeElement; 3] {
        [&self.container, &self.caption, &self.content]
    }

    fn elements_mut(&mut self) -> [&mut ThemeElement; 3] {
        [&mut self.container, &mut self.caption, &mut self.content]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentThemes {
    pub boxes: EnvironmentStyle,
    pub figure: EnvironmentStyle,
    pub table: EnvironmentStyle,
    pub note: EnvironmentStyle,
}

impl EnvironmentThemes {
    pub fn new(source: Option<&str>) -> Self {
        Self {
            boxes: EnvironmentStyle::new("box", source),
            figure: EnvironmentStyle::new("figure", source),
            table: EnvironmentStyle::new("table", source),
            note: EnvironmentStyle::new("note", source),
        }
    }

    fn styles_mut(&mut self) -> [&mut EnvironmentStyle; 4] {
        [&mut self.boxes, &mut self.figure, &mut self.table, &mut self.note]
    }

    pub fn set_from(&mut self, other: &EnvironmentThemes) {
        let theirs = [&other.boxes, &other.figure, &other.table, &other.note];
        for (mine, theirs) in self.styles_mut().into_iter().zip(theirs) {
            for (element, other) in mine.elements_mut().into_iter().zip(theirs.elements()) {
                element.set_from(other);
            }
        }
    }

    pub fn set_all_custom(&mut self) {
        for style in self.styles_mut() {
            for element in style.elements_mut() {
                element.set_all_custom();
            }
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &ThemeElement> {
        [&self.boxes, &self.figure, &self.table, &self.note]
            .into_iter()
            .flat_map(|style| style.elements())
    }
}
