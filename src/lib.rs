//! modsplit - import/export extraction and partitioning for source files
//!
//! modsplit scans a source file token by token, tracks bracket balance across
//! nested template-string substitutions, collects the file's import and export
//! statements, and splits the file into text and import segments. Extractable
//! imports are followed into further files through a FIFO worklist.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (token source, balancing, classification,
//!   partitioning, resolution)
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
