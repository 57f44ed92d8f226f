//! Error types raised while extracting a single file.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::token::Location;

/// The token source rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {loc}")]
pub struct LexError {
    pub message: String,
    pub loc: Location,
}

impl LexError {
    pub fn new(message: impl Into<String>, loc: Location) -> Self {
        Self {
            message: message.into(),
            loc,
        }
    }
}

/// Bracket or interpolation-context corruption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unbalanced {} at {}: {} [ {} ]",
    describe_found(.found),
    .loc,
    describe_expected(.expected),
    quote_all(.stack)
)]
pub struct BalanceMismatch {
    /// Closer expected by the innermost open bracket, if any.
    pub expected: Option<String>,
    /// Offending lexeme, `None` at end of input.
    pub found: Option<String>,
    /// Every open bracket from the outermost context inwards; `${` marks an
    /// open interpolation context.
    pub stack: Vec<String>,
    pub loc: Location,
}

impl BalanceMismatch {
    pub fn stack_display(&self) -> String {
        quote_all(&self.stack)
    }
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(lexeme) => format!("'{}'", lexeme),
        None => "end of input".to_string(),
    }
}

fn describe_expected(expected: &Option<String>) -> String {
    match expected {
        Some(closer) => format!("expected '{}'", closer),
        None => "no open bracket".to_string(),
    }
}

fn quote_all(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which statement keyword a malformed statement started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Import,
    Export,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Import => write!(f, "import"),
            StatementKind::Export => write!(f, "export"),
        }
    }
}

/// A collected import/export statement could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} statement: {reason}")]
pub struct MalformedStatement {
    pub kind: StatementKind,
    pub reason: String,
    pub loc: Location,
}

impl MalformedStatement {
    pub fn import(reason: impl Into<String>, loc: Location) -> Self {
        Self {
            kind: StatementKind::Import,
            reason: reason.into(),
            loc,
        }
    }

    pub fn export(reason: impl Into<String>, loc: Location) -> Self {
        Self {
            kind: StatementKind::Export,
            reason: reason.into(),
            loc,
        }
    }
}

/// An extractable import names a file that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve '{specifier}' (no file at {})", .resolved.display())]
pub struct UnresolvedSpecifier {
    pub specifier: String,
    pub resolved: PathBuf,
    pub loc: Location,
}

/// Errors that stop the extraction of a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Balance(#[from] BalanceMismatch),
}

impl ExtractError {
    pub fn loc(&self) -> Location {
        match self {
            ExtractError::Lex(err) => err.loc,
            ExtractError::Balance(err) => err.loc,
        }
    }
}
