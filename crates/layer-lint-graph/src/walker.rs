//! Source file discovery.

use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use layer_lint_core::Ecosystem;
use tracing::{debug, warn};

use crate::extractor::parser_for;

const COMMON_PRUNED: &[&str] = &[".git", ".hg", ".svn", ".idea", ".vscode"];

/// Directories never descended into for an ecosystem.
#[must_use]
pub fn pruned_dirs(ecosystem: Ecosystem) -> &'static [&'static str] {
    match ecosystem {
        Ecosystem::TypeScript => &["node_modules", "dist", "build", "coverage", ".next", "out"],
        Ecosystem::Python => &[
            "__pycache__",
            ".venv",
            ".tox",
            ".mypy_cache",
            ".pytest_cache",
            "build",
            "dist",
            "site-packages",
        ],
        Ecosystem::Kotlin => &["build", ".gradle", "out", "generated"],
        Ecosystem::Swift => &[".build", "Pods", "Carthage", "DerivedData", ".swiftpm"],
    }
}

fn is_pruned(ecosystem: Ecosystem, dir: &Path) -> bool {
    let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    COMMON_PRUNED.contains(&name)
        || pruned_dirs(ecosystem).contains(&name)
        || (ecosystem == Ecosystem::Python && name.ends_with(".egg-info"))
        || (ecosystem == Ecosystem::Python && is_virtualenv(dir))
}

/// Virtual environments are recognised by their `pyvenv.cfg`, not their name.
fn is_virtualenv(dir: &Path) -> bool {
    dir.join("pyvenv.cfg").is_file()
}

/// Whether a root-relative path is a test file by the ecosystem's naming
/// convention.
#[must_use]
pub fn is_test_file(ecosystem: Ecosystem, relative: &str) -> bool {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    match ecosystem {
        Ecosystem::TypeScript => {
            name.contains(".test.")
                || name.contains(".spec.")
                || relative.split('/').any(|dir| dir == "__tests__")
        }
        Ecosystem::Python => {
            name == "conftest.py"
                || (name.starts_with("test_") && name.ends_with(".py"))
                || name.ends_with("_test.py")
        }
        Ecosystem::Kotlin => {
            name.ends_with("Test.kt")
                || name.ends_with("Tests.kt")
                || name.ends_with("Test.kts")
        }
        Ecosystem::Swift => name.ends_with("Test.swift") || name.ends_with("Tests.swift"),
    }
}

/// Lists the source files of one ecosystem under a root.
pub struct SourceWalker {
    root: PathBuf,
    ecosystem: Ecosystem,
    exclude: Vec<Pattern>,
}

impl SourceWalker {
    /// Creates a walker with no user excludes.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, ecosystem: Ecosystem) -> Self {
        Self {
            root: root.into(),
            ecosystem,
            exclude: Vec::new(),
        }
    }

    /// Adds root-relative exclude globs.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn exclude<I, S>(mut self, patterns: I) -> Result<Self, glob::PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.exclude.push(Pattern::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }

    /// Walks the root and returns matching files, sorted.
    #[must_use]
    pub fn walk(&self) -> Vec<PathBuf> {
        let parser = parser_for(self.ecosystem);
        let ecosystem = self.ecosystem;

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(true)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && entry.depth() > 0 && is_pruned(ecosystem, entry.path()))
            });

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !parser.handles(path) {
                continue;
            }

            let Some(relative) = relative_path(&self.root, path) else {
                continue;
            };
            if is_test_file(ecosystem, &relative) {
                debug!("Skipping test file: {relative}");
                continue;
            }
            if self.is_excluded(&relative) {
                debug!("Excluded: {relative}");
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        files
    }
}

/// Lexically resolves `.` and `..` components.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `/`-separated path of `path` relative to `root`, or `None` when it lies
/// outside the root.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let root = normalize(root);
    let path = normalize(path);
    let relative = path.strip_prefix(&root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn walk(root: &Path, ecosystem: Ecosystem, exclude: &[&str]) -> Vec<String> {
        SourceWalker::new(root, ecosystem)
            .exclude(exclude)
            .unwrap()
            .walk()
            .iter()
            .filter_map(|p| relative_path(root, p))
            .collect()
    }

    #[test]
    fn prunes_dependency_dirs_and_tests() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/views/Home.tsx");
        touch(root, "src/data/api.ts");
        touch(root, "src/data/api.test.ts");
        touch(root, "src/__tests__/home.ts");
        touch(root, "node_modules/react/index.js");
        touch(root, "dist/bundle.js");
        touch(root, "README.md");

        assert_eq!(
            walk(root, Ecosystem::TypeScript, &[]),
            vec!["src/data/api.ts", "src/views/Home.tsx"]
        );
    }

    #[test]
    fn python_conventions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "app/models.py");
        touch(root, "app/test_models.py");
        touch(root, "app/models_test.py");
        touch(root, "conftest.py");
        touch(root, ".venv/lib/site.py");
        touch(root, "pkg.egg-info/x.py");
        touch(root, "app/__pycache__/models.py");

        assert_eq!(walk(root, Ecosystem::Python, &[]), vec!["app/models.py"]);
    }

    #[test]
    fn python_virtualenv_detected_by_marker_not_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "env/__init__.py");
        touch(root, "env/settings.py");
        touch(root, "venv/pyvenv.cfg");
        touch(root, "venv/lib/python3.12/site.py");
        touch(root, "tools/py312/pyvenv.cfg");
        touch(root, "tools/py312/bin/activate.py");

        assert_eq!(
            walk(root, Ecosystem::Python, &[]),
            vec!["env/__init__.py", "env/settings.py"]
        );
    }

    #[test]
    fn kotlin_and_swift_conventions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "app/src/main/kotlin/User.kt");
        touch(root, "app/src/test/kotlin/UserTest.kt");
        touch(root, "app/build/generated/Gen.kt");
        touch(root, "Sources/Core/User.swift");
        touch(root, "Tests/CoreTests/UserTests.swift");
        touch(root, ".build/checkouts/Dep.swift");

        assert_eq!(
            walk(root, Ecosystem::Kotlin, &[]),
            vec!["app/src/main/kotlin/User.kt"]
        );
        assert_eq!(walk(root, Ecosystem::Swift, &[]), vec!["Sources/Core/User.swift"]);
    }

    #[test]
    fn user_excludes_match_relative_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "app/models.py");
        touch(root, "app/legacy/old.py");
        touch(root, "scripts/tool.py");

        assert_eq!(
            walk(root, Ecosystem::Python, &["app/legacy/**", "scripts/*"]),
            vec!["app/models.py"]
        );
    }

    #[test]
    fn invalid_exclude_is_an_error() {
        assert!(SourceWalker::new(".", Ecosystem::Python).exclude(["a/[b"]).is_err());
    }

    #[test]
    fn normalize_and_relative() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(
            relative_path(Path::new("/proj"), Path::new("/proj/src/../lib/x.ts")).as_deref(),
            Some("lib/x.ts")
        );
        assert_eq!(relative_path(Path::new("/proj"), Path::new("/other/x.ts")), None);
    }
}
