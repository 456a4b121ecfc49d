//! Turns import candidates into classified dependencies.

use layer_lint_core::{Dependency, DependencyKind};

use crate::extractor::{join_dotted, ImportCandidate, ImportTarget, ParsedFile};
use crate::index::ModuleIndex;
use crate::typescript::is_local_specifier;

/// Resolves imports against a [`ModuleIndex`].
pub struct Resolver<'a> {
    index: &'a ModuleIndex,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a finished index.
    #[must_use]
    pub fn new(index: &'a ModuleIndex) -> Self {
        Self { index }
    }

    /// Resolves every import of one file. Imports resolving to the file
    /// itself are dropped.
    #[must_use]
    pub fn resolve(&self, path: &str, parsed: &ParsedFile) -> Vec<Dependency> {
        parsed
            .imports
            .iter()
            .filter_map(|import| {
                let (target, kind) = self.classify(parsed.package.as_deref(), import);
                if kind == DependencyKind::LocalResolved && target == path {
                    return None;
                }
                Some(Dependency::new(
                    path,
                    target,
                    import.line,
                    import.statement.clone(),
                    kind,
                ))
            })
            .collect()
    }

    fn classify(&self, package: Option<&str>, import: &ImportCandidate) -> (String, DependencyKind) {
        match &import.target {
            ImportTarget::Path {
                specifier,
                resolved,
            } => match resolved {
                Some(path) => (path.clone(), DependencyKind::LocalResolved),
                None if is_local_specifier(specifier) => {
                    (specifier.clone(), DependencyKind::LocalUnresolved)
                }
                None => (specifier.clone(), DependencyKind::External),
            },
            ImportTarget::Name(name) => self
                .index
                .lookup(name)
                .map_or_else(|| self.unmatched(name), resolved),
            ImportTarget::Wildcard(package) => self
                .wildcard(package)
                .map_or_else(|| self.unmatched(package), resolved),
            ImportTarget::Relative {
                level,
                name,
                wildcard,
            } => {
                let Some(base) = relative_base(package.unwrap_or(""), *level) else {
                    return (import.statement.clone(), DependencyKind::LocalUnresolved);
                };
                let full = join_dotted(&base, name);
                let found = if *wildcard {
                    self.wildcard(&full)
                } else {
                    self.index.lookup(&full)
                };
                found.map_or((full, DependencyKind::LocalUnresolved), resolved)
            }
        }
    }

    fn wildcard(&self, package: &str) -> Option<&str> {
        self.index
            .first_in_package(package)
            .or_else(|| self.index.symbol(package))
    }

    fn unmatched(&self, name: &str) -> (String, DependencyKind) {
        let kind = if self.index.is_local_prefix(name) {
            DependencyKind::LocalUnresolved
        } else {
            DependencyKind::External
        };
        (name.to_string(), kind)
    }
}

fn resolved(path: &str) -> (String, DependencyKind) {
    (path.to_string(), DependencyKind::LocalResolved)
}

/// Package a relative import with `level` dots starts from.
///
/// One dot is the importing package itself; each extra dot ascends one
/// package. `None` when the import ascends past the top.
#[must_use]
pub fn relative_base(package: &str, level: usize) -> Option<String> {
    let segments: Vec<&str> = package.split('.').filter(|s| !s.is_empty()).collect();
    let ascent = level.saturating_sub(1);
    if ascent > 0 && ascent >= segments.len() {
        return None;
    }
    Some(segments[..segments.len() - ascent].join("."))
}
