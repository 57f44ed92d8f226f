//! `--trace` output: one line per token, in fixed-width columns.

use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::core::extract::TokenObserver;
use crate::core::token::{LexerState, Token};

/// Column widths for state, byte length, id, type, lexeme and lexeme length.
const COLUMNS: [usize; 6] = [12, 8, 4, 16, 32, 10];

pub struct TokenTracer<W: Write> {
    writer: W,
    file: String,
}

impl<W: Write> TokenTracer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            file: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TokenObserver for TokenTracer<W> {
    fn on_file(&mut self, path: &Path) {
        self.file = path.display().to_string();
    }

    fn on_token(&mut self, token: &Token, state: LexerState) {
        let line = format_token(token, state);
        let _ = writeln!(self.writer, "{} {}", format!("{}:", self.file).dimmed(), line);
    }
}

/// Format one token as a trace line, newlines escaped.
pub fn format_token(token: &Token, state: LexerState) -> String {
    let cells = [
        format!("{}({})", state.mode, state.depth),
        format!("tok[{}]", token.byte_len()),
        token.id.to_string(),
        token.kind.to_string(),
        escape(&token.lexeme),
        token.lexeme.chars().count().to_string(),
    ];
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(COLUMNS) {
        line.push_str(&format!("{:<width$}", cell, width = width));
    }
    line.push_str(&token.loc.to_string());
    line
}

fn escape(lexeme: &str) -> String {
    lexeme
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
