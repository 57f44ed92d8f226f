//! Statement segmentation: finding where import/export statements start and end
//! in a token stream.

use std::ops::Range;

use super::error::StatementKind;
use super::token::{Location, Token};

/// A terminated `import`/`export` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedStatement {
    pub kind: StatementKind,
    /// Every token of the statement, trivia included.
    pub tokens: Vec<Token>,
    /// Byte range in the file buffer, including the terminator.
    pub range: Range<usize>,
    pub loc: Location,
}

impl CollectedStatement {
    /// Tokens relevant to classification (whitespace and comments removed).
    pub fn significant(&self) -> Vec<Token> {
        self.tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .cloned()
            .collect()
    }

    pub fn has_from(&self) -> bool {
        self.tokens.iter().any(|t| t.is_keyword("from"))
    }

    /// Source text of the statement, rebuilt from its tokens.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// A statement that was still open when the token stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedStatement {
    pub kind: StatementKind,
    pub loc: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    Collecting {
        kind: StatementKind,
        tokens: Vec<Token>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StatementSegmenter {
    state: State,
}

impl StatementSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, State::Collecting { .. })
    }

    /// Feed the next token; returns the statement it terminates, if any.
    pub fn feed(&mut self, token: &Token) -> Option<CollectedStatement> {
        match &mut self.state {
            State::Idle => {
                let kind = if token.is_keyword("import") {
                    StatementKind::Import
                } else if token.is_keyword("export") {
                    StatementKind::Export
                } else {
                    return None;
                };
                self.state = State::Collecting {
                    kind,
                    tokens: vec![token.clone()],
                };
                None
            }
            State::Collecting { tokens, .. } => {
                tokens.push(token.clone());
                if token.is_punctuator(";") || token.is_line_terminator() {
                    self.take()
                } else {
                    None
                }
            }
        }
    }

    fn take(&mut self) -> Option<CollectedStatement> {
        let State::Collecting { kind, tokens } = std::mem::take(&mut self.state) else {
            return None;
        };
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(CollectedStatement {
            kind,
            range: first.loc.offset..last.end(),
            loc: first.loc,
            tokens,
        })
    }

    /// End of stream: report a statement left without terminator.
    pub fn finish(&mut self) -> Option<UnterminatedStatement> {
        match std::mem::take(&mut self.state) {
            State::Idle => None,
            State::Collecting { kind, tokens } => Some(UnterminatedStatement {
                kind,
                loc: tokens.first().map(|t| t.loc).unwrap_or_default(),
            }),
        }
    }
}
