// ABOUTME: Parser for the bracketed directives used inside environments
// ABOUTME: Extracts $style, $caption and $content with salvage of malformed input

/// One `$name(kind)[options]{body}` directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    pub kind: Option<String>,
    pub options: Option<String>,
    pub body: String,
}

/// The directives of one environment body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSource {
    pub style: Option<String>,
    pub caption: Option<Directive>,
    pub content: Option<Directive>,
}

impl EnvironmentSource {
    /// Extract directives from `text`. Text outside any directive is never
    /// dropped: it becomes the content when no `$content` is given, and is
    /// appended to it otherwise.
    pub fn parse(text: &str) -> Self {
        let mut source = EnvironmentSource::default();
        let mut rest = String::new();
        let mut cursor = 0;

        while let Some(found) = text[cursor..].find('$') {
            let at = cursor + found;
            let tail = &text[at..];
            let parsed = ["$style", "$caption", "$content"]
                .into_iter()
                .find_map(|name| {
                    let after = directive_name(tail, name)?;
                    let (directive, used) = parse_directive(after)?;
                    Some((name, directive, name.len() + used))
                });

            match parsed {
                Some((name, directive, len)) => {
                    rest.push_str(&text[cursor..at]);
                    source.assign(name, directive);
                    cursor = at + len;
                }
                None => {
                    rest.push_str(&text[cursor..=at]);
                    cursor = at + 1;
                }
            }
        }
        rest.push_str(&text[cursor..]);

        let rest = rest.trim();
        if !rest.is_empty() {
            match source.content.as_mut() {
                Some(content) => {
                    content.body.push_str("\n\n");
                    content.body.push_str(rest);
                }
                None => {
                    source.content = Some(Directive {
                        body: rest.to_string(),
                        ..Directive::default()
                    })
                }
            }
        }
        source
    }

    fn assign(&mut self, name: &str, directive: Directive) {
        match name {
            "$style" => {
                self.style = directive
                    .options
                    .or(Some(directive.body))
                    .filter(|s| !s.is_empty())
            }
            "$caption" => self.caption = Some(directive),
            _ => self.content = Some(directive),
        }
    }

    pub fn caption_text(&self) -> Option<&str> {
        self.caption.as_ref().map(|c| c.body.as_str())
    }

    pub fn content_text(&self) -> &str {
        self.content.as_ref().map(|c| c.body.as_str()).unwrap_or("")
    }

    /// The first kind declared by the caption or the content.
    pub fn kind(&self) -> Option<&str> {
        self.caption
            .iter()
            .chain(self.content.iter())
            .find_map(|d| d.kind.as_deref())
    }
}

/// The text following `name` if `text` starts with it and the next character
/// opens an argument.
fn directive_name<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let after = text.strip_prefix(name)?;
    after.starts_with(['(', '[', '{']).then_some(after)
}

/// Parse `(kind)[options]{body}` (each part optional but at least one
/// present). Returns the directive and the number of bytes consumed.
/// An unclosed kind or options group is not a directive, so its text stays
/// in the body instead of ending up inside an attribute.
fn parse_directive(text: &str) -> Option<(Directive, usize)> {
    let mut directive = Directive::default();
    let mut used = 0;
    if text[used..].starts_with('(') {
        let (inner, len) = balanced(&text[used..], '(', ')')?;
        directive.kind = Some(inner.trim().to_string());
        used += len;
    }
    if text[used..].starts_with('[') {
        let (inner, len) = balanced(&text[used..], '[', ']')?;
        directive.options = Some(inner.trim().to_string());
        used += len;
    }
    if text[used..].starts_with('{') {
        // an unterminated body takes the rest of the text
        let (inner, len) = balanced(&text[used..], '{', '}')
            .unwrap_or((&text[used + 1..], text.len() - used));
        directive.body = inner.trim().to_string();
        used += len;
    }
    (used > 0).then_some((directive, used))
}

/// Balanced `open ... close` at the start of `text`, or `None` when the
/// group is never closed.
fn balanced(text: &str, open: char, close: char) -> Option<(&str, usize)> {
    let inner_start = text.strip_prefix(open).map(|_| open.len_utf8())?;
    let mut depth = 1;
    for (i, c) in text[inner_start..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                let end = inner_start + i;
                return Some((&text[inner_start..end], end + close.len_utf8()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_directives() {
        let source = EnvironmentSource::parse(
            "$style[width:50%;]\n$caption(note){A *caption*}\n$content(note)[color:red]{Some {nested} text}\n",
        );
        assert_eq!(source.style.as_deref(), Some("width:50%;"));
        assert_eq!(source.caption_text(), Some("A *caption*"));
        assert_eq!(source.content_text(), "Some {nested} text");
        assert_eq!(source.kind(), Some("note"));
        assert_eq!(
            source.content.as_ref().and_then(|c| c.options.as_deref()),
            Some("color:red")
        );
    }

    #[test]
    fn test_missing_content_salvaged() {
        let source = EnvironmentSource::parse("$caption{Title}\nJust some text, costs $5\n");
        assert_eq!(source.caption_text(), Some("Title"));
        assert_eq!(source.content_text(), "Just some text, costs $5");
    }

    #[test]
    fn test_unterminated_brace_takes_rest() {
        let source = EnvironmentSource::parse("$content{never closed\nsecond line");
        assert_eq!(source.content_text(), "never closed\nsecond line");
    }

    #[test]
    fn test_unclosed_kind_stays_content() {
        let source = EnvironmentSource::parse("$caption(note{Title}\n$content{Body text}\n");
        assert_eq!(source.caption, None);
        assert_eq!(source.kind(), None);
        assert!(source.content_text().starts_with("Body text"));
        assert!(source.content_text().contains("$caption(note{Title}"));
    }

    #[test]
    fn test_unclosed_options_stays_content() {
        let source = EnvironmentSource::parse("$style[color: red\n$content{Visible body}\n");
        assert_eq!(source.style, None);
        assert!(source.content_text().starts_with("Visible body"));
        assert!(source.content_text().contains("$style[color: red"));
    }
}
