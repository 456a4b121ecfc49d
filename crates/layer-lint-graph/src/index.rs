//! Name-to-file index used to resolve dotted imports.
//!
//! Keys are inserted first-writer-wins over files in the order given, so a
//! name defined in two files always resolves to the same one.

use std::collections::{HashMap, HashSet};

use layer_lint_core::utils::{last_segment, leading_segments, root_segment};

use crate::extractor::{join_dotted, ParsedFile};

/// Symbol, package, and local-prefix lookups for one analysis run.
#[derive(Debug, Default, Clone)]
pub struct ModuleIndex {
    symbols: HashMap<String, String>,
    packages: HashMap<String, Vec<String>>,
    local_prefixes: HashSet<String>,
}

impl ModuleIndex {
    /// Builds the index from `(path, parsed file)` pairs.
    pub fn build<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a ParsedFile)>,
    {
        let mut index = Self::default();

        for (path, parsed) in files {
            if let Some(qualified) = &parsed.qualified_name {
                index.insert_symbol(qualified, path);
                index.insert_symbol(last_segment(qualified), path);
            }

            let namespace = parsed.export_namespace.as_deref().unwrap_or("");
            for export in &parsed.exports {
                index.insert_symbol(&join_dotted(namespace, export), path);
                index.insert_symbol(export, path);
            }

            if let Some(package) = &parsed.package {
                index
                    .packages
                    .entry(package.clone())
                    .or_default()
                    .push(path.to_string());
                index.insert_prefixes(package);
            }
        }

        index
    }

    fn insert_symbol(&mut self, key: &str, path: &str) {
        if key.is_empty() {
            return;
        }
        self.symbols
            .entry(key.to_string())
            .or_insert_with(|| path.to_string());
    }

    fn insert_prefixes(&mut self, package: &str) {
        self.local_prefixes.insert(package.to_string());
        for n in 1..=2 {
            if let Some(prefix) = leading_segments(package, n) {
                self.local_prefixes.insert(prefix);
            }
        }
    }

    /// Exact symbol lookup.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(String::as_str)
    }

    /// Files declaring `package`, in index order.
    #[must_use]
    pub fn package_files(&self, package: &str) -> &[String] {
        self.packages.get(package).map_or(&[], Vec::as_slice)
    }

    /// First file of `package`.
    #[must_use]
    pub fn first_in_package(&self, package: &str) -> Option<&str> {
        self.package_files(package).first().map(String::as_str)
    }

    /// Resolves a dotted name: the longest dotted prefix present in the
    /// symbol index wins, then an exact package lookup.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let mut candidate = name;
        loop {
            if let Some(path) = self.symbol(candidate) {
                return Some(path);
            }
            match candidate.rsplit_once('.') {
                Some((shorter, _)) => candidate = shorter,
                None => break,
            }
        }
        self.first_in_package(name)
    }

    /// Whether an unresolved name looks like it belongs to this project.
    #[must_use]
    pub fn is_local_prefix(&self, name: &str) -> bool {
        self.local_prefixes.contains(root_segment(name))
            || leading_segments(name, 2).is_some_and(|p| self.local_prefixes.contains(&p))
    }

    /// Number of symbol keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the index holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
