//! Check command implementation.

use anyhow::{bail, Context, Result};
use layer_lint_core::{Ecosystem, LintConfig};
use layer_lint_graph::Analyzer;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    ecosystem: Option<Ecosystem>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let mut config = load_config(source)?;

    if let Some(ecosystem) = ecosystem {
        config.analyzer.ecosystem = Some(ecosystem);
    }
    config.analyzer.exclude.extend(exclude);

    let root = analysis_root(path, &config.analyzer.root);
    let analyzer = Analyzer::with_root(config, &root).context("Failed to set up analysis")?;

    tracing::info!("Analyzing {}", analyzer.root().display());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<LintConfig> {
    match source {
        ConfigSource::Default => {
            bail!("No layer-lint.toml found. Run `layer-lint init` to create one.")
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            LintConfig::from_file(p).with_context(|| format!("Failed to load {}", p.display()))
        }
    }
}

/// Configured root, taken relative to the checked path unless absolute.
fn analysis_root(path: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else if configured == Path::new(".") || configured.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        path.join(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn relative_root_joins_checked_path() {
        assert_eq!(
            analysis_root(Path::new("project"), Path::new("src")),
            PathBuf::from("project/src")
        );
        assert_eq!(
            analysis_root(Path::new("project"), Path::new(".")),
            PathBuf::from("project")
        );
    }

    #[test]
    fn absolute_root_wins() {
        assert_eq!(
            analysis_root(Path::new("project"), Path::new("/srv/app")),
            PathBuf::from("/srv/app")
        );
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = load_config(&ConfigSource::Default).unwrap_err();
        assert!(err.to_string().contains("layer-lint init"));
    }

    #[test]
    fn loads_project_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("layer-lint.toml");
        fs::write(
            &path,
            r#"
[analyzer]
ecosystem = "python"

[[layers]]
name = "views"
pattern = "**/views/**"
"#,
        )
        .unwrap();

        let config = load_config(&ConfigSource::Project(path)).unwrap();
        assert_eq!(config.layers.len(), 1);
        assert_eq!(config.analyzer.ecosystem, Some(Ecosystem::Python));
    }

    #[test]
    fn unreadable_config_names_the_file() {
        let err = load_config(&ConfigSource::Explicit(PathBuf::from("/nonexistent.toml")))
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent.toml"));
    }
}
