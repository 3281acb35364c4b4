//! shpipe: parse a line of shell pipeline syntax without running a shell.
//!
//! A line such as `sort -r < in | uniq -c > out 2>> err` becomes a
//! [`Pipeline`]: an ordered list of [`Process`]es, each holding a
//! [`Command`] (program + arguments) and a [`RedirectionSet`] with at most
//! one output, one error and one input [`Redirection`].
//!
//! ```text
//! let pipeline = shpipe::parse("foo toto > bar | fizz << EOF")?;
//! assert_eq!(pipeline.len(), 2);
//! ```
//!
//! # Architecture
//!
//! - **[`parse`](mod@parse)** — Lexer, recursive-descent parser, pipeline types, errors.
//! - **[`config`]** — CLI configuration: embedded defaults + user overlay merge.
//! - **[`logging`]** — simplelog setup and per-line parse records.
//!
//! No shell features beyond pipes and file redirections are understood:
//! no `&&`, `||`, `;`, `&`, expansion or globbing.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Logger initialisation and parse-outcome records.
pub mod logging;
/// Pipeline parsing: lexer, parser, object graph, errors.
pub mod parse;

pub use parse::{
    Command, ParseError, Pipeline, Process, Redirection, RedirectionKind, RedirectionSet, parse,
};
