//! Language-agnostic extraction types and trait.
//!
//! `ImportParser` is the extension point for adding new ecosystems.
//! Implement it to teach layer-lint how to extract imports, exported
//! symbols and package info from a source file.

use layer_lint_core::{Ecosystem, Signal};
use std::collections::BTreeMap;
use std::path::Path;

use crate::kotlin::KotlinParser;
use crate::python::PythonParser;
use crate::swift::SwiftParser;
use crate::typescript::TypeScriptParser;

/// One file handed to a parser.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Analysis root.
    pub root: &'a Path,
    /// Path of the file on disk.
    pub path: &'a Path,
    /// Path relative to the root, `/`-separated.
    pub relative: &'a str,
    /// File content.
    pub content: &'a str,
}

/// What an import statement refers to, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// Filesystem specifier (`./utils`, `react`); `resolved` is set when the
    /// parser already located it to a local file.
    Path {
        /// Specifier as written.
        specifier: String,
        /// Root-relative path of the located file.
        resolved: Option<String>,
    },
    /// Dotted or namespaced name (`com.example.User`, `app.models`).
    Name(String),
    /// Everything under a package (`import com.example.*`).
    Wildcard(String),
    /// Relative import with `level` leading dots (`from ..pkg import x`).
    Relative {
        /// Number of leading dots.
        level: usize,
        /// Dotted remainder after the dots (may be empty).
        name: String,
        /// `from . import *` form.
        wildcard: bool,
    },
}

/// A single import statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    /// Line number (1-indexed).
    pub line: usize,
    /// Statement text, for diagnostics.
    pub statement: String,
    /// What the statement imports.
    pub target: ImportTarget,
}

impl ImportCandidate {
    /// Creates a candidate.
    #[must_use]
    pub fn new(line: usize, statement: impl Into<String>, target: ImportTarget) -> Self {
        Self {
            line,
            statement: statement.into(),
            target,
        }
    }
}

/// Result of parsing a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    /// Package (or module directory) the file belongs to.
    pub package: Option<String>,
    /// Fully qualified name of the file itself (`com.example.User`,
    /// `app.services.user`).
    pub qualified_name: Option<String>,
    /// Namespace exported symbols are qualified with.
    pub export_namespace: Option<String>,
    /// Import statements in source order.
    pub imports: Vec<ImportCandidate>,
    /// Top-level exported symbol names.
    pub exports: Vec<String>,
    /// Declaration line of each export.
    pub export_lines: BTreeMap<String, usize>,
    /// Ecosystem-specific anti-pattern signals.
    pub signals: Vec<Signal>,
}

impl ParsedFile {
    /// Records an export declared on `line`. Repeated names keep their
    /// first line.
    pub fn add_export(&mut self, name: impl Into<String>, line: usize) {
        let name = name.into();
        if self.export_lines.contains_key(&name) {
            return;
        }
        self.export_lines.insert(name.clone(), line);
        self.exports.push(name);
    }
}

/// Trait for ecosystem-specific import extraction.
///
/// The parser receives one [`SourceFile`] and returns a [`ParsedFile`]
/// containing the language-agnostic intermediate representation.
/// Parsers never fail: malformed input yields an empty result.
pub trait ImportParser: Send + Sync {
    /// Ecosystem handled by this parser.
    fn ecosystem(&self) -> Ecosystem;

    /// File extensions this parser handles (e.g., `&[".kt", ".kts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract imports, exports, and package info from a file.
    fn parse(&self, file: &SourceFile<'_>) -> ParsedFile;

    /// Whether `path` has one of [`ImportParser::extensions`].
    fn handles(&self, path: &Path) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }
}

/// Returns the parser for an ecosystem.
#[must_use]
pub fn parser_for(ecosystem: Ecosystem) -> Box<dyn ImportParser> {
    match ecosystem {
        Ecosystem::TypeScript => Box::new(TypeScriptParser::new()),
        Ecosystem::Python => Box::new(PythonParser::new()),
        Ecosystem::Kotlin => Box::new(KotlinParser::new()),
        Ecosystem::Swift => Box::new(SwiftParser::new()),
    }
}

/// File name without directories or extension (`Foo.kt` -> `Foo`).
#[must_use]
pub fn file_stem(relative: &str) -> &str {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    name.split_once('.').map_or(name, |(stem, _)| stem)
}

/// Joins two dotted names, skipping empty parts.
#[must_use]
pub fn join_dotted(base: &str, name: &str) -> String {
    match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}.{name}"),
    }
}
