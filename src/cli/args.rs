//! CLI argument definitions using clap.
//!
//! `modsplit [OPTIONS] [FILES]...` extracts the imports and exports of the
//! given files and of every extractable module they import, and partitions
//! each file at its import statements.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::lexer::Language;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Entry files (default: `entry` from .modsplitrc.json, or lib/util.js)
    pub files: Vec<PathBuf>,

    /// Scanner to use for every file (default: chosen by file extension)
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Print every token with its lexer state to stderr
    #[arg(short = 'x', long)]
    pub trace: bool,

    /// Print per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Fail only the offending file on a bracket mismatch instead of the run
    #[arg(long)]
    pub keep_going: bool,

    /// Do not follow imports into further files
    #[arg(long)]
    pub no_follow: bool,

    /// Write a default .modsplitrc.json to the current directory and exit
    #[arg(long, exclusive = true)]
    pub init: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-file summary and segment table.
    Text,
    /// Every file module as JSON.
    Json,
    /// Imports rewritten as ES module statements.
    Es6,
    /// Imports rewritten as CommonJS `require` calls.
    Cjs,
}
