// ABOUTME: Slide body markup: tokenizer, environment directives and HTML parsers
// ABOUTME: Exposes the tokenize-then-parse pipeline used for every slide body

pub mod columns;
pub mod directive;
pub mod environment;
pub mod tokenizer;

pub use tokenizer::{merge_subtokens, tokenize, Token, TokenKind};

use crate::markdown::MarkdownConverter;

/// Render one token to HTML.
pub fn parse_token(token: &Token, converter: &dyn MarkdownConverter) -> String {
    match token.kind {
        TokenKind::Plain => converter.convert(&token.text),
        TokenKind::Columns => columns::parse_columns(&token.text, converter),
        TokenKind::Box => environment::parse_box(&token.text, converter),
        TokenKind::Figure => environment::parse_figure(&token.text, converter),
        TokenKind::Table => environment::parse_table(&token.text, converter),
        TokenKind::Note => environment::parse_note(&token.text, converter),
    }
}

/// Tokenize `source` completely, then render the tokens in source order, one
/// per line.
pub fn parse(source: &str, converter: &dyn MarkdownConverter) -> String {
    tokenize(source)
        .iter()
        .map(|token| parse_token(token, converter))
        .collect::<Vec<_>>()
        .join("\n")
}
