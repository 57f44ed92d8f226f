//! Issue types for extraction results.
//!
//! Every problem found while processing a file becomes an [`Issue`]. Issues
//! are self-contained: they carry the file, position and source line needed
//! by the reporter.

use enum_dispatch::enum_dispatch;
use serde::Serialize;

use crate::core::error::{BalanceMismatch, StatementKind};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    LexError,
    BalanceMismatch,
    MalformedImport,
    MalformedExport,
    UnresolvedSpecifier,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::LexError => write!(f, "lex-error"),
            Rule::BalanceMismatch => write!(f, "balance-mismatch"),
            Rule::MalformedImport => write!(f, "malformed-import"),
            Rule::MalformedExport => write!(f, "malformed-export"),
            Rule::UnresolvedSpecifier => write!(f, "unresolved-specifier"),
        }
    }
}

// ============================================================
// Source Context
// ============================================================

/// Where an issue points: file, 1-based line and column, and the text of
/// that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub source_line: String,
}

impl SourceContext {
    pub fn new(
        file_path: impl Into<String>,
        line: usize,
        col: usize,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
            source_line: source_line.into(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

// ============================================================
// Issue Types
// ============================================================

/// The token source rejected the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexErrorIssue {
    pub context: SourceContext,
    pub message: String,
}

impl LexErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::LexError
    }
}

/// Brackets or interpolation contexts do not nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceMismatchIssue {
    pub context: SourceContext,
    pub mismatch: BalanceMismatch,
}

impl BalanceMismatchIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::BalanceMismatch
    }
}

/// An import or export statement that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedStatementIssue {
    pub context: SourceContext,
    pub kind: StatementKind,
    pub reason: String,
}

impl MalformedStatementIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }
}

/// An extractable import whose target file does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedSpecifierIssue {
    pub context: SourceContext,
    pub specifier: String,
    /// Path the specifier resolved to.
    pub resolved: String,
}

impl UnresolvedSpecifierIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnresolvedSpecifier
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found while processing a file.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    LexError(LexErrorIssue),
    BalanceMismatch(BalanceMismatchIssue),
    Malformed(MalformedStatementIssue),
    UnresolvedSpecifier(UnresolvedSpecifierIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::LexError(_) => LexErrorIssue::severity(),
            Issue::BalanceMismatch(_) => BalanceMismatchIssue::severity(),
            Issue::Malformed(_) => MalformedStatementIssue::severity(),
            Issue::UnresolvedSpecifier(_) => UnresolvedSpecifierIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::LexError(_) => LexErrorIssue::rule(),
            Issue::BalanceMismatch(_) => BalanceMismatchIssue::rule(),
            Issue::Malformed(issue) => issue.report_rule(),
            Issue::UnresolvedSpecifier(_) => UnresolvedSpecifierIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Trait for types that can be reported to the CLI.
#[enum_dispatch]
pub trait Report {
    fn context(&self) -> &SourceContext;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for LexErrorIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("the rest of this file was not scanned".to_string())
    }
}

impl Report for BalanceMismatchIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        match (&self.mismatch.found, &self.mismatch.expected) {
            (Some(found), Some(expected)) => {
                format!("found '{}' where '{}' was expected", found, expected)
            }
            (Some(found), None) => format!("found '{}' with no open bracket", found),
            (None, Some(expected)) => format!("end of input where '{}' was expected", expected),
            (None, None) => "end of input inside an open context".to_string(),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        if self.mismatch.stack.is_empty() {
            None
        } else {
            Some(format!("open: [ {} ]", self.mismatch.stack_display()))
        }
    }
}

impl Report for MalformedStatementIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        self.reason.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        match self.kind {
            StatementKind::Import => Rule::MalformedImport,
            StatementKind::Export => Rule::MalformedExport,
        }
    }

    fn details(&self) -> Option<String> {
        Some(format!("the {} statement was skipped", self.kind))
    }
}

impl Report for UnresolvedSpecifierIssue {
    fn context(&self) -> &SourceContext {
        &self.context
    }

    fn message(&self) -> String {
        format!("cannot resolve '{}'", self.specifier)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("no file at {}", self.resolved))
    }

    fn hint(&self) -> Option<&str> {
        Some("add the file, or exclude it with `ignores` in .modsplitrc.json")
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let (a, b) = (self.context(), other.context());
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.col.cmp(&b.col))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::token::Location;
    use crate::issues::*;

    fn ctx(path: &str, line: usize, col: usize) -> SourceContext {
        SourceContext::new(path, line, col, "const a = [1, 2);")
    }

    #[test]
    fn test_balance_issue() {
        let issue = Issue::from(BalanceMismatchIssue {
            context: ctx("./lib/a.js", 1, 16),
            mismatch: BalanceMismatch {
                expected: Some("]".to_string()),
                found: Some(")".to_string()),
                stack: vec!["[".to_string()],
                loc: Location::new(1, 16, 15),
            },
        });

        assert_eq!(issue.severity(), Severity::Error);
        assert_eq!(issue.rule(), Rule::BalanceMismatch);
        assert_eq!(issue.message(), "found ')' where ']' was expected");
        assert_eq!(issue.details().as_deref(), Some("open: [ '[' ]"));
    }

    #[test]
    fn test_malformed_rule_follows_statement_kind() {
        let import = Issue::from(MalformedStatementIssue {
            context: ctx("a.js", 1, 1),
            kind: StatementKind::Import,
            reason: "expected `from`".to_string(),
        });
        let export = Issue::from(MalformedStatementIssue {
            context: ctx("a.js", 2, 1),
            kind: StatementKind::Export,
            reason: "expected an exported name".to_string(),
        });

        assert_eq!(import.rule(), Rule::MalformedImport);
        assert_eq!(export.rule(), Rule::MalformedExport);
        assert_eq!(import.severity(), Severity::Warning);
        assert_eq!(Rule::MalformedExport.to_string(), "malformed-export");
    }

    #[test]
    fn test_unresolved_issue() {
        let issue = Issue::from(UnresolvedSpecifierIssue {
            context: ctx("lib/a.js", 3, 1),
            specifier: "./gone.js".to_string(),
            resolved: "lib/gone.js".to_string(),
        });

        assert_eq!(issue.message(), "cannot resolve './gone.js'");
        assert_eq!(issue.details().as_deref(), Some("no file at lib/gone.js"));
        assert!(issue.hint().is_some());
    }

    #[test]
    fn test_issue_ordering() {
        let lex = |path: &str, line| {
            Issue::from(LexErrorIssue {
                context: ctx(path, line, 1),
                message: "unexpected character".to_string(),
            })
        };
        let mut issues = vec![lex("b.js", 1), lex("a.js", 9), lex("a.js", 2)];
        issues.sort();
        let order: Vec<_> = issues
            .iter()
            .map(|i| (i.context().file_path.clone(), i.context().line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.js".to_string(), 2),
                ("a.js".to_string(), 9),
                ("b.js".to_string(), 1),
            ]
        );
    }
}
