// ABOUTME: Nested-environment tokenizer for slide bodies
// ABOUTME: Splits raw text into plain markdown and environment tokens in source order

/// Kind of a token in a slide body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plain,
    Columns,
    Box,
    Figure,
    Table,
    Note,
}

impl TokenKind {
    /// Environments that may appear inside plain spans.
    pub const BLOCKS: [TokenKind; 4] = [
        TokenKind::Box,
        TokenKind::Figure,
        TokenKind::Table,
        TokenKind::Note,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Plain => "plain",
            TokenKind::Columns => "columns",
            TokenKind::Box => "box",
            TokenKind::Figure => "figure",
            TokenKind::Table => "table",
            TokenKind::Note => "note",
        }
    }

    pub fn begin_marker(self) -> String {
        format!("${}", self.name())
    }

    pub fn end_marker(self) -> String {
        format!("$end{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Tokenize a slide body.
///
/// `columns` spans are found first so that no other environment can cut
/// through them; every remaining plain span is then rescanned for `box`,
/// `figure`, `table` and `note`. Text inside a `columns` token is left raw
/// for the columns parser to tokenize again.
pub fn tokenize(source: &str) -> Vec<Token> {
    let master = scan(source, &[TokenKind::Columns]);
    let subtokens: Vec<(usize, Vec<Token>)> = master
        .iter()
        .enumerate()
        .filter(|(_, token)| token.kind == TokenKind::Plain)
        .filter_map(|(index, token)| {
            let found = scan(&token.text, &TokenKind::BLOCKS);
            let unchanged = found.len() == 1 && found[0].kind == TokenKind::Plain;
            (!unchanged).then_some((index, found))
        })
        .collect();
    merge_subtokens(master, &subtokens)
}

/// Replace each master token that has an entry in `subtokens` with that entry's
/// tokens, in place. Every master index is spliced at most once.
pub fn merge_subtokens(master: Vec<Token>, subtokens: &[(usize, Vec<Token>)]) -> Vec<Token> {
    let extra: usize = subtokens.iter().map(|(_, toks)| toks.len()).sum();
    let mut tokens = Vec::with_capacity(master.len() + extra);
    for (index, token) in master.into_iter().enumerate() {
        match subtokens.iter().find(|(i, _)| *i == index) {
            Some((_, found)) => tokens.extend(found.iter().cloned()),
            None => tokens.push(token),
        }
    }
    tokens
}

enum ScanState {
    Outside { plain_start: usize },
    Inside {
        kind: TokenKind,
        depth: usize,
        inner_start: usize,
    },
}

/// Split `source` on the environments in `kinds`.
///
/// Markers are recognized at the start of a line, outside fenced code. Only
/// markers of the currently open kind change the nesting depth. An
/// unterminated environment runs to the end of the source; a stray end marker
/// stays in the plain text.
pub fn scan(source: &str, kinds: &[TokenKind]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut state = ScanState::Outside { plain_start: 0 };
    let mut fence: Option<&str> = None;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim_start();

        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
            continue;
        }
        if let Some(open) = ["```", "~~~"].into_iter().find(|f| trimmed.starts_with(f)) {
            fence = Some(open);
            continue;
        }

        let indent = line.len() - trimmed.len();
        state = match state {
            ScanState::Outside { plain_start } => {
                match kinds.iter().find_map(|k| {
                    marker_len(trimmed, &k.begin_marker()).map(|len| (*k, len))
                }) {
                    Some((kind, len)) => {
                        push_plain(&mut tokens, &source[plain_start..line_start]);
                        ScanState::Inside {
                            kind,
                            depth: 1,
                            inner_start: after_marker(line_start, indent, len, line),
                        }
                    }
                    None => ScanState::Outside { plain_start },
                }
            }
            ScanState::Inside {
                kind,
                depth,
                inner_start,
            } => {
                if marker_len(trimmed, &kind.begin_marker()).is_some() {
                    ScanState::Inside {
                        kind,
                        depth: depth + 1,
                        inner_start,
                    }
                } else if let Some(len) = marker_len(trimmed, &kind.end_marker()) {
                    if depth == 1 {
                        tokens.push(Token::new(kind, &source[inner_start..line_start]));
                        ScanState::Outside {
                            plain_start: after_marker(line_start, indent, len, line),
                        }
                    } else {
                        ScanState::Inside {
                            kind,
                            depth: depth - 1,
                            inner_start,
                        }
                    }
                } else {
                    ScanState::Inside {
                        kind,
                        depth,
                        inner_start,
                    }
                }
            }
        };
    }

    match state {
        ScanState::Outside { plain_start } => push_plain(&mut tokens, &source[plain_start..]),
        ScanState::Inside {
            kind, inner_start, ..
        } => tokens.push(Token::new(kind, &source[inner_start..])),
    }
    tokens
}

fn push_plain(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::new(TokenKind::Plain, text));
    }
}

/// Length of `marker` if `text` starts with it as a whole word.
fn marker_len(text: &str, marker: &str) -> Option<usize> {
    let rest = text.strip_prefix(marker)?;
    match rest.chars().next() {
        None => Some(marker.len()),
        Some(c) if c.is_whitespace() => Some(marker.len()),
        Some(_) => None,
    }
}

/// Offset right after a marker; a marker line with nothing else on it is
/// consumed whole.
fn after_marker(line_start: usize, indent: usize, len: usize, line: &str) -> usize {
    let end = indent + len;
    if line[end..].trim().is_empty() {
        line_start + line.len()
    } else {
        line_start + end
    }
}
