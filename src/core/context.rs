//! Run context: all state shared across the files of one run.
//!
//! The context owns the worklist, the file modules discovered so far and the
//! issues reported for them. Files are processed one at a time in worklist
//! order; each file is loaded, scanned, partitioned and resolved before the
//! next one starts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{BalanceMismatch, ExtractError, LexError, MalformedStatement};
use super::extract::{FileExtraction, TokenObserver, extract_file};
use super::lexer::{Language, Lexer, is_line_terminator};
use super::module::{FileModule, ModuleStatus};
use super::partition::partition;
use super::resolve::DependencyResolver;
use super::source::SourceProvider;
use super::token::Location;
use crate::config::Config;
use crate::issues::{
    BalanceMismatchIssue, Issue, LexErrorIssue, MalformedStatementIssue, SourceContext,
    UnresolvedSpecifierIssue,
};

/// What a bracket mismatch does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BalancePolicy {
    /// Stop the whole run.
    #[default]
    AbortRun,
    /// Mark the file failed and continue with the worklist.
    SkipFile,
}

/// Settings for a run, compiled from [`Config`] and command-line overrides.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scanner for every file; chosen by extension when `None`.
    pub language: Option<Language>,
    pub extractable: Regex,
    pub ignores: Vec<Pattern>,
    pub follow_imports: bool,
    pub balance_policy: BalancePolicy,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            language: config.language,
            extractable: config.extractable_regex()?,
            ignores: config.ignore_patterns()?,
            follow_imports: config.follow_imports,
            balance_policy: config.on_balance_mismatch,
        })
    }
}

pub struct RunContext<'p> {
    provider: &'p dyn SourceProvider,
    language: Option<Language>,
    balance_policy: BalancePolicy,
    resolver: DependencyResolver,
    modules: Vec<FileModule>,
    index: HashMap<PathBuf, usize>,
    issues: Vec<Issue>,
}

impl<'p> RunContext<'p> {
    pub fn new(provider: &'p dyn SourceProvider, options: RunOptions) -> Self {
        let resolver = DependencyResolver::new(options.extractable, options.ignores)
            .with_follow(options.follow_imports);
        Self {
            provider,
            language: options.language,
            balance_policy: options.balance_policy,
            resolver,
            modules: Vec::new(),
            index: HashMap::new(),
            issues: Vec::new(),
        }
    }

    /// Schedule an entry file. Returns false if the path was already scheduled.
    pub fn add_entry(&mut self, path: &Path) -> bool {
        match self.resolver.schedule(path) {
            Some(path) => {
                self.register(path);
                true
            }
            None => false,
        }
    }

    /// Process the worklist until it drains.
    ///
    /// Per-file failures are recorded as issues. An error is returned for I/O
    /// failures and, under [`BalancePolicy::AbortRun`], for a bracket mismatch.
    pub fn run(&mut self, observer: &mut dyn TokenObserver) -> Result<()> {
        while let Some(path) = self.resolver.next() {
            self.process(&path, observer)
                .with_context(|| format!("Failed to process {}", path.display()))?;
        }
        Ok(())
    }

    /// Modules in the order they were scheduled.
    pub fn modules(&self) -> &[FileModule] {
        &self.modules
    }

    pub fn module(&self, path: &Path) -> Option<&FileModule> {
        self.index.get(path).map(|&i| &self.modules[i])
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_parts(self) -> (Vec<FileModule>, Vec<Issue>) {
        (self.modules, self.issues)
    }

    fn register(&mut self, path: PathBuf) {
        self.index.insert(path.clone(), self.modules.len());
        self.modules.push(FileModule::new(path));
    }

    fn process(&mut self, path: &Path, observer: &mut dyn TokenObserver) -> Result<()> {
        let started = Instant::now();
        let Some(&idx) = self.index.get(path) else {
            bail!("{} was scheduled but never registered", path.display());
        };
        let buffer = self.provider.load(path)?;
        self.modules[idx].status = ModuleStatus::InProgress;

        observer.on_file(path);
        let language = self.language.unwrap_or_else(|| Language::from_path(path));
        let mut lexer = Lexer::new(&buffer, language);
        let outcome = extract_file(&mut lexer, observer);

        let file_path = path.display().to_string();
        let result = match outcome {
            Ok(extraction) => {
                self.complete(idx, path, &file_path, &buffer, extraction);
                Ok(())
            }
            Err(ExtractError::Lex(err)) => {
                self.report_lex_error(&file_path, &buffer, err);
                self.modules[idx].status = ModuleStatus::Failed;
                Ok(())
            }
            Err(ExtractError::Balance(err)) => {
                self.report_balance(&file_path, &buffer, &err);
                self.modules[idx].status = ModuleStatus::Failed;
                match self.balance_policy {
                    BalancePolicy::AbortRun => Err(anyhow::Error::new(err)),
                    BalancePolicy::SkipFile => Ok(()),
                }
            }
        };

        let module = &mut self.modules[idx];
        module.buffer = buffer;
        module.elapsed = started.elapsed();
        result
    }

    fn complete(
        &mut self,
        idx: usize,
        path: &Path,
        file_path: &str,
        buffer: &str,
        extraction: FileExtraction,
    ) {
        let FileExtraction {
            imports,
            exports,
            malformed,
        } = extraction;

        for stmt in malformed {
            self.report_malformed(file_path, buffer, stmt);
        }

        let ranges: Vec<_> = imports.iter().map(|r| r.range.clone()).collect();
        let segments = partition(buffer, &ranges);

        let resolution = self.resolver.resolve(path, &imports, self.provider);
        for unresolved in resolution.unresolved {
            self.issues.push(
                UnresolvedSpecifierIssue {
                    context: source_context(file_path, buffer, unresolved.loc),
                    specifier: unresolved.specifier,
                    resolved: unresolved.resolved.display().to_string(),
                }
                .into(),
            );
        }
        for next in resolution.enqueued {
            self.register(next);
        }

        let module = &mut self.modules[idx];
        module.imports = imports;
        module.exports = exports;
        module.segments = segments;
        module.status = ModuleStatus::Done;
    }

    fn report_lex_error(&mut self, file_path: &str, buffer: &str, err: LexError) {
        self.issues.push(
            LexErrorIssue {
                context: source_context(file_path, buffer, err.loc),
                message: err.message,
            }
            .into(),
        );
    }

    fn report_balance(&mut self, file_path: &str, buffer: &str, err: &BalanceMismatch) {
        self.issues.push(
            BalanceMismatchIssue {
                context: source_context(file_path, buffer, err.loc),
                mismatch: err.clone(),
            }
            .into(),
        );
    }

    fn report_malformed(&mut self, file_path: &str, buffer: &str, stmt: MalformedStatement) {
        self.issues.push(
            MalformedStatementIssue {
                context: source_context(file_path, buffer, stmt.loc),
                kind: stmt.kind,
                reason: stmt.reason,
            }
            .into(),
        );
    }
}

fn source_context(file_path: &str, buffer: &str, loc: Location) -> SourceContext {
    SourceContext::new(file_path, loc.line, loc.column, source_line(buffer, loc.line))
}

/// Text of the 1-based `line` of `buffer`, without its terminator.
/// Text of the 1-based `line`, counting line ends the way the lexer does.
fn source_line(buffer: &str, line: usize) -> String {
    let mut rest = buffer;
    for _ in 1..line.max(1) {
        let Some((i, c)) = rest.char_indices().find(|&(_, c)| is_line_terminator(c)) else {
            return String::new();
        };
        let len = if rest[i..].starts_with("\r\n") { 2 } else { c.len_utf8() };
        rest = &rest[i + len..];
    }
    let end = rest.find(is_line_terminator).unwrap_or(rest.len());
    rest[..end].to_string()
}
