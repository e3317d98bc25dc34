// ABOUTME: LaTeX math span detection for $...$ and $$...$$ delimiters
// ABOUTME: Masks math before markdown conversion and restores it verbatim afterwards

use crate::utils::escape_html;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MATISSEMATH(\d+)X").unwrap());

/// Byte ranges of the math spans of `text`, delimiters included.
///
/// `$$ ... $$` may span lines. Inline `$ ... $` stays on one line, must not
/// start or end with whitespace, and its closing `$` must not be followed
/// by an identifier character, so `$slidenumber/$total` is not math.
/// `\$` never delimits.
pub fn spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'$') => match display_end(bytes, i + 2) {
                Some(end) => {
                    found.push(i..end);
                    i = end;
                }
                None => i += 2,
            },
            b'$' => match inline_end(bytes, i) {
                Some(end) => {
                    found.push(i..end);
                    i = end;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    found
}

/// End (exclusive) of the `$$` closing a display span whose body starts at `from`.
fn display_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j + 1 < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'$' if bytes[j + 1] == b'$' => return (j > from).then_some(j + 2),
            _ => j += 1,
        }
    }
    None
}

fn inline_end(bytes: &[u8], open: usize) -> Option<usize> {
    let first = *bytes.get(open + 1)?;
    if first.is_ascii_whitespace() {
        return None;
    }
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return None,
            b'$' => {
                let closes = !bytes[j - 1].is_ascii_whitespace()
                    && !bytes
                        .get(j + 1)
                        .is_some_and(|c| c.is_ascii_alphanumeric() || *c == b'_' || *c == b'$');
                return closes.then_some(j + 1);
            }
            _ => j += 1,
        }
    }
    None
}

/// Replace every math span with an inert placeholder word. Returns the masked
/// text and the spans in placeholder order.
pub fn protect(text: &str) -> (String, Vec<String>) {
    let ranges = spans(text);
    if ranges.is_empty() {
        return (text.to_string(), Vec::new());
    }
    let mut masked = String::with_capacity(text.len());
    let mut saved = Vec::with_capacity(ranges.len());
    let mut last = 0;
    for range in ranges {
        masked.push_str(&text[last..range.start]);
        masked.push_str(&format!("MATISSEMATH{}X", saved.len()));
        saved.push(text[range.clone()].to_string());
        last = range.end;
    }
    masked.push_str(&text[last..]);
    (masked, saved)
}

/// Put the saved spans back into converted HTML, escaped as text.
pub fn restore(html: &str, saved: &[String]) -> String {
    if saved.is_empty() {
        return html.to_string();
    }
    PLACEHOLDER_RE
        .replace_all(html, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| saved.get(index))
                .map(|span| escape_html(span))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> Vec<&str> {
        spans(text).into_iter().map(|r| &text[r]).collect()
    }

    #[test]
    fn test_inline_and_display_spans() {
        let text = "Euler: $e^{i\\pi}+1=0$ and\n$$\n\\int_0^1 x\\,dx\n$$\n";
        assert_eq!(found(text), vec!["$e^{i\\pi}+1=0$", "$$\n\\int_0^1 x\\,dx\n$$"]);
    }

    #[test]
    fn test_prices_and_placeholders_are_not_math() {
        assert!(found("costs $5 and $10 today").is_empty());
        assert!(found("$slidenumber/$total_slides_number").is_empty());
        assert!(found("$authors, $affiliations ($date)").is_empty());
        assert!(found("escaped \\$x$ sign").is_empty());
        assert_eq!(found("$title ($x$)"), vec!["$x$"]);
    }

    #[test]
    fn test_protect_and_restore() {
        let (masked, saved) = protect("a $x<y$ b");
        assert_eq!(masked, "a MATISSEMATH0X b");
        assert_eq!(saved, vec!["$x<y$".to_string()]);
        assert_eq!(restore("<p>a MATISSEMATH0X b</p>", &saved), "<p>a $x&lt;y$ b</p>");
    }
}
