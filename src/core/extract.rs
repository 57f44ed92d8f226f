//! Per-file extraction: one pass over a token source.

use std::path::Path;

use super::balance::ContextStack;
use super::classify::{classify_export, classify_import};
use super::error::{ExtractError, MalformedStatement, StatementKind};
use super::module::{ExportRecord, ImportRecord};
use super::segment::{CollectedStatement, StatementSegmenter};
use super::token::{LexerState, Token, TokenSource};

/// Receives every token pulled from a token source.
pub trait TokenObserver {
    fn on_file(&mut self, _path: &Path) {}

    fn on_token(&mut self, token: &Token, state: LexerState);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TokenObserver for NoTrace {
    fn on_token(&mut self, _token: &Token, _state: LexerState) {}
}

/// Records found in one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    /// Statements dropped because they could not be classified.
    pub malformed: Vec<MalformedStatement>,
}

impl FileExtraction {
    fn dispatch(&mut self, stmt: CollectedStatement) {
        match stmt.kind {
            StatementKind::Import if stmt.has_from() => match classify_import(&stmt) {
                Ok(record) => self.imports.push(record),
                Err(err) => self.malformed.push(err),
            },
            // `import 'x'`, `import(...)` and `import.meta` bind nothing.
            StatementKind::Import => {}
            StatementKind::Export => match classify_export(&stmt) {
                Ok(record) => self.exports.push(record),
                Err(err) => self.malformed.push(err),
            },
        }
    }
}

/// Drive `source` to exhaustion, collecting import and export records.
///
/// Lexer errors and bracket corruption stop the file; malformed statements
/// are collected in [`FileExtraction::malformed`] and skipped.
pub fn extract_file<S: TokenSource + ?Sized>(
    source: &mut S,
    observer: &mut dyn TokenObserver,
) -> Result<FileExtraction, ExtractError> {
    let mut contexts = ContextStack::new();
    let mut segmenter = StatementSegmenter::new();
    let mut extraction = FileExtraction::default();

    loop {
        let depth_before = source.state().depth;
        let token = match source.next_token() {
            Some(token) => token?,
            None => break,
        };
        let state = source.state();
        observer.on_token(&token, state);

        if state.depth > depth_before && state.mode.is_code() {
            contexts.push();
        }

        if contexts.closes_interpolation(&token) {
            contexts.pop(token.loc)?;
            source.pop_state();
        } else {
            contexts.observe(&token)?;
        }

        if let Some(stmt) = segmenter.feed(&token) {
            extraction.dispatch(stmt);
        }
    }

    if let Some(open) = segmenter.finish() {
        extraction.malformed.push(MalformedStatement {
            kind: open.kind,
            reason: "statement not terminated before end of input".to_string(),
            loc: open.loc,
        });
    }
    contexts.finish(source.location())?;

    Ok(extraction)
}
