//! End-to-end analysis: walk, parse, index, resolve, assign layers, check.

use std::fs;
use std::path::{Path, PathBuf};

use layer_lint_core::{ConfigError, Ecosystem, LintConfig, LintResult, Module};
use layer_lint_rules::RuleEngine;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extractor::{parser_for, ParsedFile, SourceFile};
use crate::index::ModuleIndex;
use crate::layer::{LayerAssigner, LayerPatternError};
use crate::resolver::Resolver;
use crate::walker::{relative_path, SourceWalker};

/// Errors that stop an analysis before any file is read.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A layer pattern does not compile.
    #[error(transparent)]
    Layer(#[from] LayerPatternError),

    /// An exclude glob is malformed.
    #[error("Invalid exclude pattern: {0}")]
    Exclude(#[from] glob::PatternError),

    /// The analysis root does not exist.
    #[error("Analysis root not found: {}", .0.display())]
    RootNotFound(PathBuf),
}

/// Runs one analysis over a source tree.
pub struct Analyzer {
    config: LintConfig,
    root: PathBuf,
    ecosystem: Ecosystem,
    assigner: LayerAssigner,
}

impl Analyzer {
    /// Creates an analyzer rooted at `config.analyzer.root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: LintConfig) -> Result<Self, AnalyzeError> {
        let root = config.analyzer.root.clone();
        Self::with_root(config, root)
    }

    /// Creates an analyzer over an explicit root.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the root is not
    /// a directory.
    pub fn with_root(config: LintConfig, root: impl Into<PathBuf>) -> Result<Self, AnalyzeError> {
        config.validate()?;
        let ecosystem = config.ecosystem()?;
        let assigner = LayerAssigner::new(&config.layers)?;

        let root = root.into();
        if !root.is_dir() {
            return Err(AnalyzeError::RootNotFound(root));
        }

        Ok(Self {
            config,
            root,
            ecosystem,
            assigner,
        })
    }

    /// Analysis root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the module graph without running checks.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is malformed.
    pub fn build_modules(&self) -> Result<Vec<Module>, AnalyzeError> {
        let files = SourceWalker::new(&self.root, self.ecosystem)
            .exclude(&self.config.analyzer.exclude)?
            .walk();
        info!(
            "Found {} {} file(s) under {}",
            files.len(),
            self.ecosystem,
            self.root.display()
        );

        let parsed = self.parse_files(&files);

        let index = if self.ecosystem == Ecosystem::TypeScript {
            ModuleIndex::default()
        } else {
            ModuleIndex::build(parsed.iter().map(|(path, file)| (path.as_str(), file)))
        };
        debug!("Resolution index: {} symbol(s)", index.len());

        let resolver = Resolver::new(&index);
        let modules = parsed
            .par_iter()
            .map(|(path, file)| {
                let mut module = Module::new(path.clone());
                module.layer = self.assigner.assign(path).map(str::to_string);
                module.dependencies = resolver.resolve(path, file);
                module.exports.clone_from(&file.exports);
                module.export_lines.clone_from(&file.export_lines);
                module.signals.clone_from(&file.signals);
                module
            })
            .collect::<Vec<_>>();

        let unlayered = modules.iter().filter(|m| m.layer.is_none()).count();
        if unlayered > 0 {
            debug!("{unlayered} module(s) matched no layer");
        }

        Ok(modules)
    }

    fn parse_files(&self, files: &[PathBuf]) -> Vec<(String, ParsedFile)> {
        let parser = parser_for(self.ecosystem);

        files
            .par_iter()
            .filter_map(|path| {
                let relative = relative_path(&self.root, path)?;
                let content = match fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Skipping unreadable file {relative}: {e}");
                        return None;
                    }
                };
                let parsed = parser.parse(&SourceFile {
                    root: &self.root,
                    path,
                    relative: &relative,
                    content: &content,
                });
                Some((relative, parsed))
            })
            .collect()
    }

    /// Runs the full analysis.
    ///
    /// # Errors
    ///
    /// Returns an error if the module graph cannot be built.
    pub fn analyze(&self) -> Result<LintResult, AnalyzeError> {
        let modules = self.build_modules()?;
        let engine = RuleEngine::new(self.ecosystem, &self.config);
        debug!("Enabled checks: {:?}", engine.rule_names());

        let violations = engine.check(&modules);
        let dependencies_analyzed = modules.iter().map(|m| m.dependencies.len()).sum();

        Ok(LintResult {
            violations,
            modules_analyzed: modules.len(),
            dependencies_analyzed,
        })
    }
}

/// Validates `config` and analyzes the tree at its configured root.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn analyze(config: LintConfig) -> Result<LintResult, AnalyzeError> {
    Analyzer::new(config)?.analyze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::LayerDefinition;
    use tempfile::TempDir;

    fn config() -> LintConfig {
        LintConfig::new(
            Ecosystem::Python,
            vec![LayerDefinition::new("views", "**/views/**", Vec::<String>::new())],
        )
    }

    #[test]
    fn rejects_invalid_config_before_walking() {
        let dir = TempDir::new().unwrap();
        let config = LintConfig::new(Ecosystem::Python, Vec::new());
        let err = Analyzer::with_root(config, dir.path()).err().unwrap();
        assert!(matches!(err, AnalyzeError::Config(_)));
    }

    #[test]
    fn rejects_missing_root() {
        let err = Analyzer::with_root(config(), "/definitely/not/here").err().unwrap();
        assert!(matches!(err, AnalyzeError::RootNotFound(_)));
    }

    #[test]
    fn rejects_bad_exclude() {
        let dir = TempDir::new().unwrap();
        let mut config = config();
        config.analyzer.exclude = vec!["a/[".into()];
        let analyzer = Analyzer::with_root(config, dir.path()).unwrap();
        assert!(matches!(analyzer.analyze(), Err(AnalyzeError::Exclude(_))));
    }

    #[test]
    fn empty_tree_has_no_violations() {
        let dir = TempDir::new().unwrap();
        let result = Analyzer::with_root(config(), dir.path()).unwrap().analyze().unwrap();
        assert_eq!(result.modules_analyzed, 0);
        assert!(result.violations.is_empty());
    }
}
