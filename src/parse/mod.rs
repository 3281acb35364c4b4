pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;

pub use error::{ErrorKind, ParseError, Result};
pub use lexer::{LexMode, Lexer, Span, Token, TokenKind};
pub use parser::Parser;
pub use types::{Command, Pipeline, Process, Redirection, RedirectionKind, RedirectionSet};

/// Parse one line of pipeline syntax.
///
/// Pure: every call builds its own parser, so concurrent calls on different
/// inputs need no synchronisation. Empty or blank input is an error, since a
/// pipeline needs at least one command.
pub fn parse(line: &str) -> Result<Pipeline> {
    Parser::new(line).parse_pipeline()
}
