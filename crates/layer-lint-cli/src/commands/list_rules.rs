//! List rules command implementation.

use layer_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<28} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        println!(
            "{:<8} {:<28} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nThe anti-pattern rule reports as <ecosystem>-architecture-anti-pattern.");
    println!("Disable a check in layer-lint.toml, e.g.:");
    println!("  [checks]");
    println!("  unresolved-import = false");
}
