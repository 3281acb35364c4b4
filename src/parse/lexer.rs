//! Context-driven lexer.
//!
//! The token classes overlap (`foo` is a valid filespec, argument and
//! keyword), so the parser tells the lexer which pattern class it can accept
//! at each point via [`LexMode`]. Operators are always tried first, longest
//! first, and are recognised in every mode.
//!
//! Token text is borrowed verbatim from the input: quotes and backslashes
//! are kept.

use log::trace;

use super::error::{ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<`
    Lt,
    /// `<<`
    LtLt,
    /// `>`
    Gt,
    /// `>>`
    GtGt,
    /// `2>`
    ErrGt,
    /// `2>>`
    ErrGtGt,
    /// `|`
    Pipe,
    Filespec,
    Arg,
    Keyword,
    Eof,
}

/// Operators in match order: every multi-character operator precedes its prefix.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("2>>", TokenKind::ErrGtGt),
    ("2>", TokenKind::ErrGt),
    ("<<", TokenKind::LtLt),
    ("<", TokenKind::Lt),
    (">>", TokenKind::GtGt),
    (">", TokenKind::Gt),
    ("|", TokenKind::Pipe),
];

/// Byte range of a token in the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl Token<'_> {
    /// How the token reads in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.text),
        }
    }
}

/// Which pattern class the parser accepts next, besides operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// A program name or a redirection target.
    Filespec,
    /// A command argument.
    Arg,
    /// A here-document delimiter.
    Keyword,
    /// Operators and end of input. Any other word still comes back as a
    /// token so the parser can reject it.
    Operator,
}

impl LexMode {
    fn expected(self) -> &'static str {
        match self {
            LexMode::Filespec => "a filespec",
            LexMode::Arg => "an argument, a redirection, `|` or end of input",
            LexMode::Keyword => "a here-document keyword",
            LexMode::Operator => "a redirection, `|` or end of input",
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Recognise the token at the start of `rest`.
///
/// `rest` must not start with blanks. Returns the token kind and its length
/// in bytes, or `None` when no lexical rule matches. An empty `rest` yields
/// `Eof` with length 0.
///
/// In `Keyword` and `Operator` mode a word the grammar cannot accept is still
/// returned, as an `Arg` or `Filespec` token, so that it surfaces as a syntax
/// error naming the whole word.
pub fn scan(rest: &str, mode: LexMode) -> Option<(TokenKind, usize)> {
    if rest.is_empty() {
        return Some((TokenKind::Eof, 0));
    }
    // Tried in every mode, so `2>x` never lexes as a filespec starting with `2`.
    if let Some(&(op, kind)) = OPERATORS.iter().find(|(op, _)| rest.starts_with(op)) {
        return Some((kind, op.len()));
    }
    let (kind, len) = match mode {
        LexMode::Filespec => (TokenKind::Filespec, filespec_len(rest)),
        LexMode::Arg => (TokenKind::Arg, arg_len(rest)),
        LexMode::Keyword => match keyword_len(rest) {
            0 => return stray_word(rest),
            len => (TokenKind::Keyword, len),
        },
        LexMode::Operator => return stray_word(rest),
    };
    (len > 0).then_some((kind, len))
}

/// A word in a position that admits none: the longest argument, else the
/// longest filespec.
fn stray_word(rest: &str) -> Option<(TokenKind, usize)> {
    match arg_len(rest) {
        0 => match filespec_len(rest) {
            0 => None,
            len => Some((TokenKind::Filespec, len)),
        },
        len => Some((TokenKind::Arg, len)),
    }
}

/// Characters other than `<`, `>`, `|` and blanks, or a backslash-escaped
/// `<`, `>` or `|`.
fn filespec_len(rest: &str) -> usize {
    let mut chars = rest.char_indices().peekable();
    let mut len = 0;
    while let Some((i, c)) = chars.next() {
        if c == '\\'
            && let Some(&(_, next @ ('<' | '>' | '|'))) = chars.peek()
        {
            chars.next();
            len = i + c.len_utf8() + next.len_utf8();
            continue;
        }
        if matches!(c, '<' | '>' | '|') || is_blank(c) {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

/// Concatenated runs of either a non-empty double-quoted string or
/// characters other than `"`, `<`, `>` and blanks.
fn arg_len(rest: &str) -> usize {
    let mut len = 0;
    loop {
        let tail = &rest[len..];
        let Some(c) = tail.chars().next() else {
            break;
        };
        if c == '"' {
            match tail[1..].find('"') {
                Some(close) if close > 0 => len += close + 2,
                _ => break,
            }
        } else if matches!(c, '<' | '>') || is_blank(c) {
            break;
        } else {
            len += c.len_utf8();
        }
    }
    len
}

/// Letters, digits and underscores.
fn keyword_len(rest: &str) -> usize {
    rest.find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len())
}

/// Lexer state over one input line.
pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the next unconsumed character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Skip blanks, then consume and return the next token acceptable in `mode`.
    pub fn next_token(&mut self, mode: LexMode) -> Result<Token<'src>> {
        self.skip_blanks();
        let start = self.pos;
        let rest = &self.src[start..];

        let Some((kind, len)) = scan(rest, mode) else {
            let found = rest
                .chars()
                .next()
                .map_or_else(|| "end of input".to_string(), |c| format!("`{c}`"));
            return Err(ParseError::lex(start, found, mode.expected()));
        };

        self.pos += len;
        let token = Token {
            kind,
            text: &self.src[start..self.pos],
            span: Span {
                start,
                end: self.pos,
            },
        };
        trace!("{mode:?}: {kind:?} {:?} at {start}", token.text);
        Ok(token)
    }

    fn skip_blanks(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start_matches(is_blank).len();
    }
}
