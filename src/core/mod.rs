//! Extraction engine.
//!
//! Tokens are pulled one at a time from a [`TokenSource`]. Each token updates
//! the [`ContextStack`] and is fed to the [`StatementSegmenter`]; finished
//! statements are classified into import and export records. When the source
//! is exhausted the buffer is partitioned at the import ranges and the
//! extractable imports are appended to the worklist of the [`RunContext`].

pub mod balance;
pub mod classify;
pub mod context;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod module;
pub mod partition;
pub mod resolve;
pub mod segment;
pub mod source;
pub mod token;

pub use balance::{Balancer, ContextStack};
pub use context::{BalancePolicy, RunContext, RunOptions};
pub use error::{BalanceMismatch, ExtractError, LexError, MalformedStatement, UnresolvedSpecifier};
pub use extract::{FileExtraction, NoTrace, TokenObserver, extract_file};
pub use lexer::{Language, Lexer};
pub use module::{
    ExportKind, ExportRecord, FileModule, ImportBindings, ImportRecord, ModuleStatus,
    NamedBinding, Segment, SegmentKind,
};
pub use segment::StatementSegmenter;
pub use source::{FsProvider, MemoryProvider, SourceProvider};
pub use token::{LexerMode, LexerState, Location, Token, TokenSource, TokenType};
