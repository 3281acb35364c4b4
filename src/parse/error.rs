use std::fmt;

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No lexical rule matches at the current position.
    Lex,
    /// The token stream does not fit the pipeline grammar.
    Syntax,
}

/// The first point of failure of a `parse` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    /// Byte offset into the input line.
    pub offset: usize,
    /// What was found there: a quoted token or character, or `end of input`.
    pub found: String,
    /// Human-readable description of what the grammar accepts at `offset`.
    pub expected: String,
}

impl ParseError {
    pub fn lex(offset: usize, found: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Lex,
            offset,
            found: found.into(),
            expected: expected.into(),
        }
    }

    pub fn syntax(offset: usize, found: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            offset,
            found: found.into(),
            expected: expected.into(),
        }
    }

    /// The input line followed by a caret under the offending offset.
    pub fn pointer(&self, line: &str) -> String {
        let column = line
            .get(..self.offset)
            .map_or(self.offset, |prefix| prefix.chars().count());
        format!("  | {line}\n  | {}^", " ".repeat(column))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ErrorKind::Lex => "lex error",
            ErrorKind::Syntax => "syntax error",
        };
        write!(
            f,
            "{what} at offset {}: expected {}, found {}",
            self.offset, self.expected, self.found
        )
    }
}

impl std::error::Error for ParseError {}
