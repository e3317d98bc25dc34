// ABOUTME: Presentation metadata parsed from the ---metadata block
// ABOUTME: Ordered key/value store with $key placeholder substitution

use crate::math;
use crate::theme::element::{section, unquote};
use indexmap::IndexMap;
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Names that belong to the markup and are never substituted.
const RESERVED: [&str; 15] = [
    "columns",
    "column",
    "endcolumns",
    "box",
    "endbox",
    "figure",
    "endfigure",
    "table",
    "endtable",
    "note",
    "endnote",
    "style",
    "caption",
    "content",
    "overview",
];

const DEFAULT_KEYS: [(&str, &str); 19] = [
    ("title", ""),
    ("subtitle", ""),
    ("authors", ""),
    ("authors_short", ""),
    ("emails", ""),
    ("affiliations", ""),
    ("affiliations_short", ""),
    ("logo", ""),
    ("location", ""),
    ("location_short", ""),
    ("date", ""),
    ("conference", ""),
    ("conference_short", ""),
    ("session", ""),
    ("session_short", ""),
    ("max_time", "25"),
    ("total_slides_number", ""),
    ("dirs_to_copy", ""),
    ("toc", ""),
];

/// Ordered string metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    data: IndexMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata holding every presentation-level key with its default.
    pub fn with_defaults() -> Self {
        let mut metadata = Self::new();
        for (key, value) in DEFAULT_KEYS {
            metadata.set(key, value);
        }
        metadata
    }

    /// Extract the `---metadata` block from `source`, returning the metadata
    /// and the source without the block.
    pub fn parse(source: &str) -> (Self, String) {
        let mut metadata = Self::with_defaults();
        let Some(body) = section(source, "metadata") else {
            return (metadata, source.to_string());
        };
        for (key, value) in parse_metadata_entries(body) {
            debug!("Metadata {} = {:?}", key, value);
            metadata.set(&key, &value);
        }
        (metadata, strip_section(source, "metadata"))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` over this metadata, keeping insertion order for new keys.
    pub fn extend(&mut self, other: &Metadata) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Replace `$key` placeholders with metadata values. Unknown and reserved
    /// names are left untouched, and so is LaTeX math.
    pub fn substitute(&self, text: &str) -> String {
        let mut substituted = String::with_capacity(text.len());
        let mut last = 0;
        for span in math::spans(text) {
            substituted.push_str(&self.substitute_placeholders(&text[last..span.start]));
            substituted.push_str(&text[span.clone()]);
            last = span.end;
        }
        substituted.push_str(&self.substitute_placeholders(&text[last..]));
        substituted
    }

    fn substitute_placeholders(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                match self.get(name) {
                    Some(value) if !RESERVED.contains(&name) => value.to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Remove every `---<tag>` ... `---end<tag>` block from `source`.
pub fn strip_section(source: &str, tag: &str) -> String {
    let begin = format!("---{}", tag);
    let end = format!("---end{}", tag);
    let mut kept = String::with_capacity(source.len());
    let mut inside = false;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if inside {
            if trimmed == end {
                inside = false;
            }
        } else if trimmed == begin {
            inside = true;
        } else {
            kept.push_str(line);
        }
    }
    kept
}

/// `key: value` entries; list values are joined with `, `. Lists may be
/// inline (`[a, b]`) or given as indented `- item` lines under a key with an
/// empty value.
fn parse_metadata_entries(body: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut list: Option<(usize, Vec<String>)> = None;
    let mut base_indent: Option<usize> = None;

    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        let base = *base_indent.get_or_insert(indent);
        let item = line.trim().strip_prefix("- ").unwrap_or(line.trim());

        if indent > base {
            if let Some((_, items)) = list.as_mut() {
                items.push(unquote(item.trim()).to_string());
                continue;
            }
        }
        if let Some((index, items)) = list.take() {
            entries[index].1 = items.join(", ");
        }

        let Some((key, value)) = item.split_once(':') else {
            continue;
        };
        let value = value.trim();
        entries.push((key.trim().to_string(), inline_list(unquote(value))));
        if value.is_empty() {
            list = Some((entries.len() - 1, Vec::new()));
        }
    }
    if let Some((index, items)) = list {
        entries[index].1 = items.join(", ");
    }
    entries
}

fn inline_list(value: &str) -> String {
    match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let source = "---metadata\n  - title: \"My Talk\"\n  - authors:\n    - Jane Doe\n    - John Roe\n  - emails: [jane@example.com, 'john@example.com']\n  - custom: yes\n---endmetadata\n\n# Chapter\n";
        let (metadata, rest) = Metadata::parse(source);
        assert_eq!(metadata.get("title"), Some("My Talk"));
        assert_eq!(metadata.get("authors"), Some("Jane Doe, John Roe"));
        assert_eq!(
            metadata.get("emails"),
            Some("jane@example.com, john@example.com")
        );
        assert_eq!(metadata.get("custom"), Some("yes"));
        assert_eq!(metadata.get("max_time"), Some("25"));
        assert_eq!(rest, "\n# Chapter\n");
    }

    #[test]
    fn test_substitute() {
        let mut metadata = Metadata::new();
        metadata.set("title", "Talk");
        metadata.set("slidenumber", "3");
        metadata.set("box", "nope");
        assert_eq!(
            metadata.substitute("$title ($slidenumber) $unknown $box"),
            "Talk (3) $unknown $box"
        );
    }

    #[test]
    fn test_substitute_skips_math() {
        let mut metadata = Metadata::new();
        metadata.set("title", "Talk");
        metadata.set("x", "oops");
        assert_eq!(
            metadata.substitute("$title: $x$ and $$\\frac{$x}{2}$$"),
            "Talk: $x$ and $$\\frac{$x}{2}$$"
        );
    }

    #[test]
    fn test_missing_block_keeps_source() {
        let (metadata, rest) = Metadata::parse("# Only content\n");
        assert_eq!(metadata.get("title"), Some(""));
        assert_eq!(rest, "# Only content\n");
    }
}
