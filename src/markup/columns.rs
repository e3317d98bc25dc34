// ABOUTME: The columns environment: splits its body on $column markers
// ABOUTME: Renders a flex row of columns sized by weight, parsing each column recursively

use crate::markdown::MarkdownConverter;
use crate::utils::{escape_html, fmt_num, parse_number};

/// One column of a `columns` environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub weight: f64,
    pub style: Vec<String>,
    pub text: String,
}

impl Column {
    fn new(options: &str) -> Self {
        let mut column = Self {
            weight: 1.0,
            style: Vec::new(),
            text: String::new(),
        };
        for entry in options.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let weight = match entry.split_once(':') {
                Some((key, value)) if key.trim() == "width" => parse_number(value),
                Some(_) => None,
                None => parse_number(entry),
            };
            match weight {
                Some(w) if w > 0.0 => column.weight = w,
                Some(_) => {}
                None => column.style.push(entry.to_string()),
            }
        }
        column
    }
}

/// Split a columns body on `$column[...]` markers at nesting depth zero.
/// Text before the first marker becomes an implicit column of weight 1.
pub fn split_columns(source: &str) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    let mut preamble = String::new();
    let mut depth = 0usize;
    let mut fence: Option<&str> = None;

    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let mut marker = None;

        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
        } else if let Some(open) = ["```", "~~~"].into_iter().find(|f| trimmed.starts_with(f)) {
            fence = Some(open);
        } else if is_word(trimmed, "$columns") {
            depth += 1;
        } else if is_word(trimmed, "$endcolumns") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 {
            marker = column_marker(trimmed);
        }

        if let Some((options, rest)) = marker {
            let mut column = Column::new(options);
            if !rest.trim().is_empty() {
                column.text.push_str(rest.trim_start());
            }
            columns.push(column);
        } else if let Some(column) = columns.last_mut() {
            column.text.push_str(line);
        } else {
            preamble.push_str(line);
        }
    }

    if !preamble.trim().is_empty() {
        let mut implicit = Column::new("");
        implicit.text = preamble;
        columns.insert(0, implicit);
    }
    columns
}

fn is_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| rest.chars().next().map_or(true, char::is_whitespace))
}

/// `$column[options] rest` or a bare `$column`.
fn column_marker(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("$column")?;
    if let Some(inner) = rest.strip_prefix('[') {
        return Some(match inner.find(']') {
            Some(end) => (&inner[..end], &inner[end + 1..]),
            None => (inner.trim_end(), ""),
        });
    }
    match rest.chars().next() {
        None => Some(("", "")),
        Some(c) if c.is_whitespace() => Some(("", rest)),
        Some(_) => None,
    }
}

/// Render a columns environment; each column body goes through the full
/// tokenize/parse pipeline again.
pub fn parse_columns(text: &str, converter: &dyn MarkdownConverter) -> String {
    let columns = split_columns(text);
    let total: f64 = columns.iter().map(|c| c.weight).sum();
    let mut html = String::from("<div class=\"columns\" style=\"display: flex;\">\n");
    for column in &columns {
        let width = if total > 0.0 {
            column.weight / total * 100.0
        } else {
            100.0
        };
        let mut style = format!("width: {}%;", fmt_num(width));
        for extra in &column.style {
            style.push(' ');
            style.push_str(extra.trim_end_matches(';'));
            style.push(';');
        }
        html.push_str(&format!(
            "<div class=\"column\" style=\"{}\">\n{}\n</div>\n",
            escape_html(&style),
            super::parse(&column.text, converter)
        ));
    }
    html.push_str("</div>");
    html
}
