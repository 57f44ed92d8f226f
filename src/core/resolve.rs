//! Dependency resolution and the file worklist.
//!
//! Import specifiers that name extractable files are resolved relative to the
//! importing file and appended, once each, to a FIFO worklist.

use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use regex::Regex;

use super::error::UnresolvedSpecifier;
use super::module::ImportRecord;
use super::source::SourceProvider;

/// Lexically normalize a path: drop `.` segments and fold `name/..` pairs.
///
/// Leading `..` segments of a relative path are kept; `..` never climbs above
/// the root of an absolute path.
pub fn collapse(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Resolve `specifier` against the directory containing `importer`.
pub fn resolve_specifier(importer: &Path, specifier: &str) -> PathBuf {
    let dir = importer.parent().unwrap_or(Path::new(""));
    collapse(&dir.join(specifier))
}

/// Outcome of resolving one file's imports.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Newly scheduled paths, in first-seen order.
    pub enqueued: Vec<PathBuf>,
    pub unresolved: Vec<UnresolvedSpecifier>,
}

#[derive(Debug)]
pub struct DependencyResolver {
    extractable: Regex,
    ignores: Vec<Pattern>,
    follow: bool,
    scheduled: HashSet<PathBuf>,
    queue: VecDeque<PathBuf>,
}

impl DependencyResolver {
    pub fn new(extractable: Regex, ignores: Vec<Pattern>) -> Self {
        Self {
            extractable,
            ignores,
            follow: true,
            scheduled: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    /// Whether imports are followed into further files.
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn is_extractable(&self, specifier: &str) -> bool {
        self.extractable.is_match(specifier)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignores.iter().any(|p| p.matches_path(path))
    }

    pub fn is_scheduled(&self, path: &Path) -> bool {
        self.scheduled.contains(path)
    }

    /// Append `path` to the worklist unless it was scheduled before.
    ///
    /// Returns the normalized path if it was newly scheduled.
    pub fn schedule(&mut self, path: &Path) -> Option<PathBuf> {
        let path = collapse(path);
        if !self.scheduled.insert(path.clone()) {
            return None;
        }
        self.queue.push_back(path.clone());
        Some(path)
    }

    /// Next path to process.
    pub fn next(&mut self) -> Option<PathBuf> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule the extractable imports of `importer`.
    pub fn resolve(
        &mut self,
        importer: &Path,
        imports: &[ImportRecord],
        provider: &dyn SourceProvider,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        if !self.follow {
            return resolution;
        }
        for import in imports {
            if !self.is_extractable(&import.specifier) {
                continue;
            }
            let path = resolve_specifier(importer, &import.specifier);
            if self.is_ignored(&path) || self.is_scheduled(&path) {
                continue;
            }
            if !provider.exists(&path) {
                resolution.unresolved.push(UnresolvedSpecifier {
                    specifier: import.specifier.clone(),
                    resolved: path,
                    loc: import.loc,
                });
                continue;
            }
            if let Some(path) = self.schedule(&path) {
                resolution.enqueued.push(path);
            }
        }
        resolution
    }
}
