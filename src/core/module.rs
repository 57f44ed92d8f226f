//! Records produced for each processed file.

use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use super::token::Location;

/// One `name` or `name as alias` entry of a named import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedBinding {
    pub imported: String,
    pub local: String,
}

impl NamedBinding {
    pub fn new(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
        }
    }

    /// `a` or `a as b`.
    pub fn to_es6(&self) -> String {
        if self.imported == self.local {
            self.local.clone()
        } else {
            format!("{} as {}", self.imported, self.local)
        }
    }

    /// `a` or `a: b`, as used in a destructuring `require`.
    pub fn to_cjs(&self) -> String {
        if self.imported == self.local {
            self.local.clone()
        } else {
            format!("{}: {}", self.imported, self.local)
        }
    }
}

/// What an import statement binds, by import kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "bindings", rename_all = "lowercase")]
pub enum ImportBindings {
    /// `import * as ns from '...'`
    Namespace(String),
    /// `import Def from '...'`
    Default(String),
    /// `import { a, b as c } from '...'`
    Named(Vec<NamedBinding>),
}

impl ImportBindings {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ImportBindings::Namespace(_) => "namespace",
            ImportBindings::Default(_) => "default",
            ImportBindings::Named(_) => "named",
        }
    }

    /// Local names introduced into the importing module.
    pub fn locals(&self) -> Vec<&str> {
        match self {
            ImportBindings::Namespace(local) | ImportBindings::Default(local) => vec![local.as_str()],
            ImportBindings::Named(list) => list.iter().map(|b| b.local.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    #[serde(flatten)]
    pub bindings: ImportBindings,
    /// Module specifier with its quotes stripped.
    pub specifier: String,
    pub range: Range<usize>,
    pub loc: Location,
    pub code: String,
}

impl ImportRecord {
    /// Render as an ES module import.
    pub fn to_es6(&self) -> String {
        match &self.bindings {
            ImportBindings::Namespace(local) => {
                format!("import * as {} from '{}';", local, self.specifier)
            }
            ImportBindings::Default(local) => format!("import {} from '{}';", local, self.specifier),
            ImportBindings::Named(list) => format!(
                "import {{ {} }} from '{}';",
                list.iter().map(NamedBinding::to_es6).collect::<Vec<_>>().join(", "),
                self.specifier
            ),
        }
    }

    /// Render as a CommonJS `require`.
    pub fn to_cjs(&self) -> String {
        match &self.bindings {
            ImportBindings::Namespace(local) | ImportBindings::Default(local) => {
                format!("const {} = require('{}');", local, self.specifier)
            }
            ImportBindings::Named(list) => format!(
                "const {{ {} }} = require('{}');",
                list.iter().map(NamedBinding::to_cjs).collect::<Vec<_>>().join(", "),
                self.specifier
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportKind {
    /// `export ... from '...'`
    ReExport,
    /// `export default ...`
    Default,
    /// Declarations and export lists.
    Named,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::ReExport => write!(f, "re-export"),
            ExportKind::Default => write!(f, "default"),
            ExportKind::Named => write!(f, "named"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub kind: ExportKind,
    /// Lexeme right after `export`: `default`, `const`, `function`, `{`, ...
    pub declaration: String,
    pub exported: String,
    pub range: Range<usize>,
    pub loc: Location,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    Import,
    Text,
}

/// A contiguous slice of a file buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub range: Range<usize>,
    pub text: String,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

/// A source file taking part in a run.
#[derive(Debug, Clone, Serialize)]
pub struct FileModule {
    pub path: PathBuf,
    pub status: ModuleStatus,
    #[serde(skip)]
    pub buffer: String,
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    pub segments: Vec<Segment>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl FileModule {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            status: ModuleStatus::Pending,
            buffer: String::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            segments: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Rebuild the buffer from its segments.
    pub fn reassemble(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Start offset of every segment.
    pub fn segment_offsets(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.range.start).collect()
    }

    /// Byte length of every segment.
    pub fn segment_lengths(&self) -> Vec<usize> {
        self.segments.iter().map(Segment::len).collect()
    }
}
