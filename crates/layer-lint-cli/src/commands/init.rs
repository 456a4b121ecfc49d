//! Init command implementation.

use anyhow::{bail, Result};
use layer_lint_core::Ecosystem;
use std::path::Path;

const CONFIG_FILE: &str = "layer-lint.toml";

const CHECKS_SECTION: &str = r"
# Checks are all enabled by default; set one to false to skip it.
[checks]
unresolved-import = true
dependency-direction = true
circular-dependency = true
business-logic-placement = true
architecture-anti-pattern = true
";

const TYPESCRIPT_LAYERS: &str = r#"
# Layers are matched against root-relative paths. A module belongs to the
# matching layer with the highest precedence, then the most specific
# pattern, then the one declared first. A layer may always import itself.

[[layers]]
name = "views"
pattern = "**/views/**"
allow = ["hooks", "domain"]

[[layers]]
name = "hooks"
pattern = "**/hooks/**"
allow = ["domain", "data"]

[[layers]]
name = "domain"
pattern = "**/domain/**"
allow = []

[[layers]]
name = "data"
pattern = "**/data/**"
allow = ["domain"]
"#;

const PYTHON_LAYERS: &str = r#"
# Layers are matched against root-relative paths. A module belongs to the
# matching layer with the highest precedence, then the most specific
# pattern, then the one declared first. A layer may always import itself.

[[layers]]
name = "views"
pattern = "**/views/**"
allow = ["services", "domain"]

[[layers]]
name = "services"
pattern = "**/services/**"
allow = ["domain", "repositories"]

[[layers]]
name = "domain"
pattern = "**/domain/**"
allow = []

[[layers]]
name = "repositories"
pattern = "**/repositories/**"
allow = ["domain"]
"#;

const KOTLIN_LAYERS: &str = r#"
# Layers are matched against root-relative paths. A module belongs to the
# matching layer with the highest precedence, then the most specific
# pattern, then the one declared first. A layer may always import itself.

[[layers]]
name = "ui"
pattern = "**/ui/**"
allow = ["viewmodel", "domain"]

[[layers]]
name = "viewmodel"
pattern = "**/viewmodel/**"
allow = ["domain"]

[[layers]]
name = "domain"
pattern = "**/domain/**"
allow = []

[[layers]]
name = "data"
pattern = "**/data/**"
allow = ["domain"]
"#;

const SWIFT_LAYERS: &str = r#"
# Layers are matched against root-relative paths. A module belongs to the
# matching layer with the highest precedence, then the most specific
# pattern, then the one declared first. A layer may always import itself.

[[layers]]
name = "views"
pattern = "**/Views/**"
allow = ["viewmodels", "models"]

[[layers]]
name = "viewmodels"
pattern = "**/ViewModels/**"
allow = ["models", "services"]

[[layers]]
name = "models"
pattern = "**/Models/**"
allow = []

[[layers]]
name = "services"
pattern = "**/Services/**"
allow = ["models"]
"#;

/// Builds the starter configuration for an ecosystem.
fn template(ecosystem: Ecosystem) -> String {
    let (exclude, layers) = match ecosystem {
        Ecosystem::TypeScript => (r#"["**/generated/**", "**/*.stories.tsx"]"#, TYPESCRIPT_LAYERS),
        Ecosystem::Python => (r#"["**/migrations/**"]"#, PYTHON_LAYERS),
        Ecosystem::Kotlin => (r#"["**/generated/**"]"#, KOTLIN_LAYERS),
        Ecosystem::Swift => (r#"["**/Generated/**"]"#, SWIFT_LAYERS),
    };

    format!(
        r#"# layer-lint configuration

[analyzer]
root = "."
ecosystem = "{ecosystem}"
exclude = {exclude}
{layers}{CHECKS_SECTION}"#
    )
}

/// Runs the init command.
pub fn run(force: bool, ecosystem: Ecosystem) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, template(ecosystem))?;

    println!("Created {CONFIG_FILE} for {ecosystem}");
    println!();
    println!("Next steps:");
    println!("  1. Edit [[layers]] patterns and allow-lists for your project");
    println!("  2. Run: layer-lint check");

    Ok(())
}
