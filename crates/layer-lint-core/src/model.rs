//! Module graph model shared by the graph builder and the rule engine.
//!
//! Everything here is plain data: a run creates its [`Module`]s once,
//! assigns layers, and hands the slice to the rule engine read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Source ecosystem analyzed in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// TypeScript and JavaScript (`.ts`, `.tsx`, `.js`, ...).
    TypeScript,
    /// Python (`.py`).
    Python,
    /// Kotlin (`.kt`, `.kts`).
    Kotlin,
    /// Swift (`.swift`).
    Swift,
}

impl Ecosystem {
    /// All supported ecosystems.
    pub const ALL: [Self; 4] = [Self::TypeScript, Self::Python, Self::Kotlin, Self::Swift];

    /// Lowercase identifier used in config files and rule ids.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
        }
    }

    /// Rule identifier for this ecosystem's anti-pattern detector.
    #[must_use]
    pub fn anti_pattern_rule(self) -> String {
        format!("{}-architecture-anti-pattern", self.as_str())
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" | "javascript" | "js" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "swift" => Ok(Self::Swift),
            other => Err(format!("unknown ecosystem '{other}'")),
        }
    }
}

/// Resolution status of one import edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Target is a known local file.
    LocalResolved,
    /// Looks internal but no matching file or symbol was found.
    LocalUnresolved,
    /// Third-party or framework name; never checked further.
    External,
}

/// One import edge from a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Relative path of the importing module.
    pub source: String,
    /// Resolved relative path, or the raw import text when not resolved.
    pub target: String,
    /// Line of the import statement (1-indexed).
    pub line: usize,
    /// Original import statement, for diagnostics.
    pub statement: String,
    /// Resolution status.
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a dependency edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        line: usize,
        statement: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            line,
            statement: statement.into(),
            kind,
        }
    }

    /// Target resolves to a third-party/framework name.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.kind == DependencyKind::External
    }

    /// Target looks internal but was not found.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.kind == DependencyKind::LocalUnresolved
    }

    /// Target is a known local file.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.kind == DependencyKind::LocalResolved
    }
}

/// Kind of ecosystem-specific signal found while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    /// Direct networking call (`URLSession`, `dataTask`).
    Networking,
    /// JSON decoding call.
    JsonDecoding,
    /// `reduce`-based arithmetic.
    AggregationArithmetic,
}

impl SignalKind {
    /// Short human description.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Networking => "direct networking call",
            Self::JsonDecoding => "JSON decoding",
            Self::AggregationArithmetic => "reduce-based arithmetic",
        }
    }
}

/// An anti-pattern hit detected inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// What was detected.
    pub kind: SignalKind,
    /// Line (1-indexed).
    pub line: usize,
    /// Enclosing scope, e.g. the view type name.
    pub scope: String,
    /// The matched source line, trimmed.
    pub text: String,
}

/// One analyzed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Path relative to the analysis root, `/`-separated.
    pub path: String,
    /// Assigned layer, if any pattern matched.
    pub layer: Option<String>,
    /// Import edges in source order.
    pub dependencies: Vec<Dependency>,
    /// Top-level exported symbol names.
    pub exports: Vec<String>,
    /// Declaration line of each export.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub export_lines: BTreeMap<String, usize>,
    /// Ecosystem-specific signals.
    pub signals: Vec<Signal>,
}

impl Module {
    /// Creates a module with no layer.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Line an export is declared on, or 1 when unknown.
    #[must_use]
    pub fn export_line(&self, name: &str) -> usize {
        self.export_lines.get(name).copied().unwrap_or(1)
    }

    /// Layer name as a string slice.
    #[must_use]
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecosystem_parses_aliases() {
        assert_eq!("ts".parse::<Ecosystem>(), Ok(Ecosystem::TypeScript));
        assert_eq!("Kotlin".parse::<Ecosystem>(), Ok(Ecosystem::Kotlin));
        assert!("cobol".parse::<Ecosystem>().is_err());
    }

    #[test]
    fn anti_pattern_rule_is_prefixed() {
        assert_eq!(
            Ecosystem::Swift.anti_pattern_rule(),
            "swift-architecture-anti-pattern"
        );
    }

    #[test]
    fn dependency_kind_flags_are_exclusive() {
        let dep = Dependency::new("a.py", "os", 1, "import os", DependencyKind::External);
        assert!(dep.is_external());
        assert!(!dep.is_unresolved());
        assert!(!dep.is_local());

        let dep = Dependency::new("a.py", "b.py", 2, "import b", DependencyKind::LocalResolved);
        assert!(dep.is_local());
        assert!(!dep.is_external() && !dep.is_unresolved());
    }
}
