//! Token definitions for the expression language
//!
//! Tokens are produced by the logos derive macro. Whitespace is skipped; string literals are
//! decoded while lexing, so [`Token::Str`] carries the final text.

use super::EvalError;
use logos::Logos;
use std::ops::Range;

/// A token together with its byte range in the expression source.
pub type TokenLocation = (Token, Range<usize>);

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,
    #[token("for")]
    For,
    #[token("in")]
    In,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unescape(lex.slice()))]
    #[regex(r"`[^`]*`", |lex| strip_delimiters(lex.slice()).to_string())]
    Str(String),

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // Operators
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("===")]
    StrictEq,
    #[token("!==")]
    StrictNe,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
}

/// Tokenize an expression, keeping byte ranges.
pub fn tokenize(source: &str) -> Result<Vec<TokenLocation>, EvalError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(EvalError::Syntax {
                    expression: source.to_string(),
                    message: format!("unexpected input at offset {}", span.start),
                })
            }
        }
    }
    Ok(tokens)
}

fn strip_delimiters(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// Decode the escapes of a quoted string literal. `None` rejects the token.
fn unescape(slice: &str) -> Option<String> {
    let mut out = String::with_capacity(slice.len());
    let mut chars = strip_delimiters(slice).chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            other => other,
        };
        out.push(decoded);
    }
    Some(out)
}
