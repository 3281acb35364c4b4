//! Types produced by the parser: the pipeline object graph.
//!
//! Ownership is strictly tree-shaped: a [`Pipeline`] owns its [`Process`]es,
//! each of which owns one [`Command`] and one [`RedirectionSet`].
//! Nothing is shared between pipelines and nothing points back up the tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// The three redirection kinds. A [`RedirectionSet`] holds at most one
/// redirection per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectionKind {
    /// stdout, `>` / `>>`
    Output,
    /// stderr, `2>` / `2>>`
    Error,
    /// stdin, `<` / `<<`
    Input,
}

impl RedirectionKind {
    /// Upper-case tag used by the CLI text view.
    pub fn label(self) -> &'static str {
        match self {
            RedirectionKind::Output => "OUTPUT",
            RedirectionKind::Error => "ERROR",
            RedirectionKind::Input => "INPUT",
        }
    }
}

/// A file-based rerouting directive attached to a process.
///
/// For a here-document (`<< EOF`) the `filespec` holds the delimiter keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Redirection {
    /// `>` (append = false) or `>>` (append = true)
    Output { filespec: String, append: bool },
    /// `2>` (append = false) or `2>>` (append = true)
    Error { filespec: String, append: bool },
    /// `<` (here = false) or `<<` (here = true)
    Input { filespec: String, here: bool },
}

impl Redirection {
    pub fn output(filespec: impl Into<String>, append: bool) -> Self {
        Redirection::Output {
            filespec: filespec.into(),
            append,
        }
    }

    pub fn error(filespec: impl Into<String>, append: bool) -> Self {
        Redirection::Error {
            filespec: filespec.into(),
            append,
        }
    }

    pub fn input(filespec: impl Into<String>, here: bool) -> Self {
        Redirection::Input {
            filespec: filespec.into(),
            here,
        }
    }

    pub fn kind(&self) -> RedirectionKind {
        match self {
            Redirection::Output { .. } => RedirectionKind::Output,
            Redirection::Error { .. } => RedirectionKind::Error,
            Redirection::Input { .. } => RedirectionKind::Input,
        }
    }

    /// Target file, or the delimiter keyword of a here-document.
    pub fn filespec(&self) -> &str {
        match self {
            Redirection::Output { filespec, .. }
            | Redirection::Error { filespec, .. }
            | Redirection::Input { filespec, .. } => filespec,
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Redirection::Output { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Redirection::Error { .. })
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Redirection::Input { .. })
    }

    /// `>>` or `2>>`. Always false for input redirections.
    pub fn is_append(&self) -> bool {
        match self {
            Redirection::Output { append, .. } | Redirection::Error { append, .. } => *append,
            Redirection::Input { .. } => false,
        }
    }

    /// `<<`. Always false for output and error redirections.
    pub fn is_here(&self) -> bool {
        match self {
            Redirection::Input { here, .. } => *here,
            _ => false,
        }
    }

    /// The operator that produces this redirection.
    pub fn operator(&self) -> &'static str {
        match self {
            Redirection::Output { append: false, .. } => ">",
            Redirection::Output { append: true, .. } => ">>",
            Redirection::Error { append: false, .. } => "2>",
            Redirection::Error { append: true, .. } => "2>>",
            Redirection::Input { here: false, .. } => "<",
            Redirection::Input { here: true, .. } => "<<",
        }
    }
}

impl fmt::Display for Redirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra = match self {
            Redirection::Output { append: true, .. } | Redirection::Error { append: true, .. } => {
                ",append=true"
            }
            Redirection::Input { here: true, .. } => ",here=true",
            _ => "",
        };
        let name = match self.kind() {
            RedirectionKind::Output => "Output",
            RedirectionKind::Error => "Error",
            RedirectionKind::Input => "Input",
        };
        write!(f, "{name}({}{extra})", self.filespec())
    }
}

/// Redirections of one process, keyed by kind only.
///
/// Inserting a redirection whose kind is already present is a no-op:
/// the first one written wins, regardless of filespec or flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionSet {
    by_kind: BTreeMap<RedirectionKind, Redirection>,
}

impl RedirectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless a redirection of the same kind is already held.
    /// Returns `true` if `redirection` was retained.
    pub fn insert(&mut self, redirection: Redirection) -> bool {
        let kind = redirection.kind();
        if self.by_kind.contains_key(&kind) {
            return false;
        }
        self.by_kind.insert(kind, redirection);
        true
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, redirection: Redirection) -> Self {
        self.insert(redirection);
        self
    }

    pub fn get(&self, kind: RedirectionKind) -> Option<&Redirection> {
        self.by_kind.get(&kind)
    }

    pub fn contains(&self, kind: RedirectionKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    pub fn output(&self) -> Option<&Redirection> {
        self.get(RedirectionKind::Output)
    }

    pub fn error(&self) -> Option<&Redirection> {
        self.get(RedirectionKind::Error)
    }

    pub fn input(&self) -> Option<&Redirection> {
        self.get(RedirectionKind::Input)
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Iterate in kind order: output, error, input.
    pub fn iter(&self) -> impl Iterator<Item = &Redirection> {
        self.by_kind.values()
    }
}

impl<'a> IntoIterator for &'a RedirectionSet {
    type Item = &'a Redirection;
    type IntoIter = std::collections::btree_map::Values<'a, RedirectionKind, Redirection>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_kind.values()
    }
}

impl Serialize for RedirectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.by_kind.values())
    }
}

impl fmt::Display for RedirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for redirection in self {
            write!(f, "{sep}{redirection}")?;
            sep = ", ";
        }
        Ok(())
    }
}

/// A program name and its arguments, in source order.
///
/// Arguments are kept verbatim, double quotes included; see [`Command::argv`]
/// for the unquoted view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    program: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by arguments with their double-quote delimiters removed.
    ///
    /// `foo"bar baz"qux` becomes `foobar bazqux`. No other quoting or
    /// escaping is interpreted.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.replace('"', "")))
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.program, self.args.join(" "))
    }
}

/// One command plus its redirections. Pipe linkage is not part of a process;
/// it lives only in the ordering of [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    command: Command,
    redirections: RedirectionSet,
}

impl Process {
    pub fn new(command: Command, redirections: RedirectionSet) -> Self {
        Self {
            command,
            redirections,
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn redirections(&self) -> &RedirectionSet {
        &self.redirections
    }

    /// Render as a single line of source syntax that parses back to `self`.
    pub fn to_line(&self) -> String {
        let mut line = self.command.program.clone();
        for arg in &self.command.args {
            line.push(' ');
            line.push_str(arg);
        }
        for redirection in &self.redirections {
            line.push(' ');
            line.push_str(redirection.operator());
            line.push(' ');
            line.push_str(redirection.filespec());
        }
        line
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proc(cmd={}, redirs=[{}])", self.command, self.redirections)
    }
}

/// Processes in left-to-right source order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    processes: Vec<Process>,
}

impl Pipeline {
    /// Only the parser builds pipelines, which guarantees at least one process.
    pub(crate) fn new(processes: Vec<Process>) -> Self {
        debug_assert!(!processes.is_empty());
        Self { processes }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn first(&self) -> Option<&Process> {
        self.processes.first()
    }

    pub fn last(&self) -> Option<&Process> {
        self.processes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    /// Render as a single line of source syntax that parses back to `self`.
    pub fn to_line(&self) -> String {
        self.processes
            .iter()
            .map(Process::to_line)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
