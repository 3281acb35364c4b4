//! Recursive-descent parser for the pipeline grammar:
//!
//! ```text
//! pipeline     = process { "|" process }
//! process      = command redirections
//! command      = filespec { arg }
//! redirections = { in_redir | out_redir | err_redir }
//! in_redir     = "<" filespec | "<<" keyword
//! out_redir    = ">" filespec | ">>" filespec
//! err_redir    = "2>" filespec | "2>>" filespec
//! ```
//!
//! Every production is selected by the class of its next token, so one token
//! of lookahead is enough and nothing is ever backtracked. Each `parse_*`
//! method returns the node it built together with the lookahead token that
//! ended it.

use log::debug;

use super::error::{ParseError, Result};
use super::lexer::{LexMode, Lexer, Token, TokenKind};
use super::types::{Command, Pipeline, Process, Redirection, RedirectionSet};

/// A parser over one input line. Built fresh for every line; holds no state
/// beyond its position.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            lexer: Lexer::new(src),
        }
    }

    /// Parse the whole line. Processes are folded left to right into a flat
    /// sequence; anything after the last process other than end of input is
    /// an error.
    pub fn parse_pipeline(mut self) -> Result<Pipeline> {
        let mut processes = Vec::new();
        loop {
            let (process, next) = self.parse_process()?;
            debug!("process {}: {process}", processes.len());
            processes.push(process);
            match next.kind {
                TokenKind::Pipe => continue,
                TokenKind::Eof => break,
                _ => return Err(unexpected(&next, "a redirection, `|` or end of input")),
            }
        }
        Ok(Pipeline::new(processes))
    }

    fn parse_process(&mut self) -> Result<(Process, Token<'src>)> {
        let (command, next) = self.parse_command()?;
        let (redirections, next) = self.parse_redirections(next)?;
        Ok((Process::new(command, redirections), next))
    }

    fn parse_command(&mut self) -> Result<(Command, Token<'src>)> {
        let program = self.lexer.next_token(LexMode::Filespec)?;
        if program.kind != TokenKind::Filespec {
            return Err(unexpected(&program, "a program name"));
        }

        let mut args = Vec::new();
        loop {
            let token = self.lexer.next_token(LexMode::Arg)?;
            if token.kind != TokenKind::Arg {
                return Ok((Command::new(program.text, args), token));
            }
            args.push(token.text.to_string());
        }
    }

    /// Fold redirections into a set, in source order, starting from `first`.
    fn parse_redirections(
        &mut self,
        first: Token<'src>,
    ) -> Result<(RedirectionSet, Token<'src>)> {
        let mut set = RedirectionSet::new();
        let mut token = first;
        while let Some(redirection) = self.parse_redirection(&token)? {
            let kind = redirection.kind();
            if !set.insert(redirection) {
                debug!("dropping {kind:?} redirection at {}: one is already set", token.span.start);
            }
            token = self.lexer.next_token(LexMode::Operator)?;
        }
        Ok((set, token))
    }

    /// Build the redirection introduced by `operator`, consuming its target.
    /// Returns `None` if `operator` does not start a redirection.
    fn parse_redirection(&mut self, operator: &Token<'src>) -> Result<Option<Redirection>> {
        let redirection = match operator.kind {
            TokenKind::Gt => Redirection::output(self.target()?, false),
            TokenKind::GtGt => Redirection::output(self.target()?, true),
            TokenKind::ErrGt => Redirection::error(self.target()?, false),
            TokenKind::ErrGtGt => Redirection::error(self.target()?, true),
            TokenKind::Lt => Redirection::input(self.target()?, false),
            TokenKind::LtLt => Redirection::input(self.keyword()?, true),
            _ => return Ok(None),
        };
        Ok(Some(redirection))
    }

    fn target(&mut self) -> Result<&'src str> {
        let token = self.lexer.next_token(LexMode::Filespec)?;
        match token.kind {
            TokenKind::Filespec => Ok(token.text),
            _ => Err(unexpected(&token, "a filespec")),
        }
    }

    fn keyword(&mut self) -> Result<&'src str> {
        let token = self.lexer.next_token(LexMode::Keyword)?;
        match token.kind {
            TokenKind::Keyword => Ok(token.text),
            _ => Err(unexpected(&token, "a here-document keyword")),
        }
    }
}

fn unexpected(token: &Token<'_>, expected: &str) -> ParseError {
    ParseError::syntax(token.span.start, token.describe(), expected)
}
