// ABOUTME: HTML rendering of the box, figure, table and note environments
// ABOUTME: Each parser turns an environment body into a fixed HTML skeleton

use super::directive::{Directive, EnvironmentSource};
use crate::markdown::MarkdownConverter;
use crate::utils::escape_html;

fn style_attr(style: Option<&str>) -> String {
    match style {
        Some(style) if !style.trim().is_empty() => {
            format!(" style=\"{}\"", escape_html(style.trim()))
        }
        _ => String::new(),
    }
}

fn directive_style(directive: &Directive) -> String {
    style_attr(directive.options.as_deref())
}

/// Container, optional caption and content as nested divs.
fn captioned_block(
    name: &str,
    text: &str,
    converter: &dyn MarkdownConverter,
) -> String {
    let source = EnvironmentSource::parse(text);
    let class = match source.kind() {
        Some(kind) if !kind.is_empty() => format!("{} {}-{}", name, name, escape_html(kind)),
        _ => name.to_string(),
    };

    let mut html = format!(
        "<div class=\"{}\"{}>\n",
        class,
        style_attr(source.style.as_deref())
    );
    if let Some(caption) = &source.caption {
        html.push_str(&format!(
            "<div class=\"{}-caption\"{}>{}</div>\n",
            name,
            directive_style(caption),
            converter.convert_inline(&caption.body)
        ));
    }
    if let Some(content) = &source.content {
        html.push_str(&format!(
            "<div class=\"{}-content\"{}>{}</div>\n",
            name,
            directive_style(content),
            converter.convert(&content.body)
        ));
    }
    html.push_str("</div>");
    html
}

pub fn parse_box(text: &str, converter: &dyn MarkdownConverter) -> String {
    captioned_block("box", text, converter)
}

pub fn parse_table(text: &str, converter: &dyn MarkdownConverter) -> String {
    captioned_block("table", text, converter)
}

pub fn parse_note(text: &str, converter: &dyn MarkdownConverter) -> String {
    captioned_block("note", text, converter)
}

/// A content that is a single path-like word is an image source. Markdown
/// image or link syntax is not a path.
fn is_image_source(content: &str) -> bool {
    !content.is_empty()
        && !content.starts_with('!')
        && !content.contains(char::is_whitespace)
        && !content.contains(['<', '(', ')', '[', ']'])
}

pub fn parse_figure(text: &str, converter: &dyn MarkdownConverter) -> String {
    let source = EnvironmentSource::parse(text);
    let caption = source.caption_text().unwrap_or("");

    let mut html = format!(
        "<figure class=\"figure\"{}>\n",
        style_attr(source.style.as_deref())
    );
    if let Some(content) = &source.content {
        if is_image_source(&content.body) {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\"{}>\n",
                escape_html(&content.body),
                escape_html(caption),
                directive_style(content)
            ));
        } else {
            html.push_str(&format!(
                "<div class=\"figure-content\"{}>{}</div>\n",
                directive_style(content),
                converter.convert(&content.body)
            ));
        }
    }
    if let Some(caption) = &source.caption {
        html.push_str(&format!(
            "<figcaption class=\"figure-caption\"{}>{}</figcaption>\n",
            directive_style(caption),
            converter.convert_inline(&caption.body)
        ));
    }
    html.push_str("</figure>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ComrakConverter;

    #[test]
    fn test_box_skeleton() {
        let converter = ComrakConverter::default();
        let html = parse_box("$content{hi}\n", &converter);
        assert_eq!(
            html,
            "<div class=\"box\">\n<div class=\"box-content\"><p>hi</p>\n</div>\n</div>"
        );
    }

    #[test]
    fn test_note_with_kind_and_caption() {
        let converter = ComrakConverter::default();
        let html = parse_note(
            "$style[background: yellow]\n$caption(warning){Careful}\n$content{Do **not** touch}\n",
            &converter,
        );
        assert!(html.starts_with("<div class=\"note note-warning\" style=\"background: yellow\">"));
        assert!(html.contains("<div class=\"note-caption\">Careful</div>"));
        assert!(html.contains("<strong>not</strong>"));
    }

    #[test]
    fn test_figure_image() {
        let converter = ComrakConverter::default();
        let html = parse_figure(
            "$content[width:50%]{images/plot.png}\n$caption{A \"plot\"}\n",
            &converter,
        );
        assert!(html.contains(
            "<img src=\"images/plot.png\" alt=\"A &quot;plot&quot;\" style=\"width:50%\">"
        ));
        assert!(html.contains("<figcaption class=\"figure-caption\">A "));
        assert!(html.ends_with("</figcaption>\n</figure>"));
    }

    #[test]
    fn test_figure_markdown_image_not_a_path() {
        let converter = ComrakConverter::default();
        let html = parse_figure("$content{![plot](images/plot.png)}\n$caption{Plot}\n", &converter);
        assert!(!html.contains("<img src=\"![plot]"));
        assert!(html.contains("<div class=\"figure-content\"><p><img src=\"images/plot.png\" alt=\"plot\" /></p>"));
        assert!(html.contains("<figcaption class=\"figure-caption\">Plot</figcaption>"));
    }

    #[test]
    fn test_table_from_markdown() {
        let converter = ComrakConverter::default();
        let html = parse_table(
            "$caption{Results}\n$content{\n| a | b |\n|---|---|\n| 1 | 2 |\n}\n",
            &converter,
        );
        assert!(html.starts_with("<div class=\"table\">"));
        assert!(html.contains("<div class=\"table-caption\">Results</div>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_malformed_box_keeps_text() {
        let converter = ComrakConverter::default();
        let html = parse_box("$caption{Oops\nstill here", &converter);
        assert!(html.contains("Oops"));
        assert!(html.contains("still here"));
    }
}
