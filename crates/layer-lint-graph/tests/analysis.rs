//! Integration test: source tree → module graph → violations.
//!
//! Each test writes a small project into a temp directory and runs the
//! full pipeline through `Analyzer`.

use layer_lint_core::{DependencyKind, LintConfig, LintResult, Module, Severity};
use layer_lint_graph::Analyzer;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
    fs::write(path, content).expect("write fixture");
}

fn analyzer(root: &Path, toml: &str) -> Analyzer {
    let config = LintConfig::parse(toml).expect("fixture config should parse");
    Analyzer::with_root(config, root).expect("analyzer should build")
}

fn analyze(root: &Path, toml: &str) -> LintResult {
    analyzer(root, toml).analyze().expect("analysis should succeed")
}

fn rules(result: &LintResult) -> Vec<&str> {
    result.violations.iter().map(|v| v.rule.as_str()).collect()
}

fn module<'a>(modules: &'a [Module], path: &str) -> &'a Module {
    modules
        .iter()
        .find(|m| m.path == path)
        .unwrap_or_else(|| panic!("module {path} missing"))
}

// ── TypeScript ──

const TS_CONFIG: &str = r#"
[analyzer]
ecosystem = "typescript"

[[layers]]
name = "views"
pattern = "**/views/**"
allow = ["viewmodels"]

[[layers]]
name = "viewmodels"
pattern = "**/viewmodels/**"
allow = ["data"]

[[layers]]
name = "data"
pattern = "**/data/**"
"#;

fn typescript_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();
    write(
        root,
        "src/views/Home.tsx",
        r#"import React from "react";
import { useCart } from "../viewmodels/cart";
import { fetchItems } from "../data/api";
import { ghost } from "./missing";

export default function Home() {
  return null;
}
"#,
    );
    write(
        root,
        "src/viewmodels/cart.ts",
        "import { fetchItems } from \"../data/api\";\nexport function useCart() { return fetchItems(); }\n",
    );
    write(root, "src/data/api.ts", "export function fetchItems() { return []; }\n");
    write(root, "src/lib/util.ts", "import { fetchItems } from \"../data/api\";\nexport const x = 1;\n");
    write(root, "src/views/Home.test.tsx", "import { fetchItems } from \"../data/api\";\n");
    write(root, "node_modules/react/index.js", "export default {};\n");
    dir
}

#[test]
fn view_importing_data_is_one_direction_error() {
    let dir = typescript_project();
    let result = analyze(dir.path(), TS_CONFIG);

    let direction = result.by_rule("dependency-direction");
    assert_eq!(direction.len(), 1, "{:#?}", result.violations);
    assert_eq!(direction[0].severity, Severity::Error);
    assert_eq!(direction[0].location.line, 3);
    assert!(direction[0].message.contains("views -> data"));
    assert!(result.has_errors());
}

#[test]
fn typescript_violations_in_engine_order() {
    let dir = typescript_project();
    let result = analyze(dir.path(), TS_CONFIG);

    assert_eq!(
        rules(&result),
        vec![
            "unresolved-import",
            "dependency-direction",
            "typescript-architecture-anti-pattern",
        ]
    );
    assert_eq!(result.modules_analyzed, 4);
    assert_eq!(result.dependencies_analyzed, 6);
}

#[test]
fn third_party_packages_are_external() {
    let dir = typescript_project();
    let modules = analyzer(dir.path(), TS_CONFIG).build_modules().unwrap();
    let home = module(&modules, "src/views/Home.tsx");

    let react = home.dependencies.iter().find(|d| d.target == "react").unwrap();
    assert_eq!(react.kind, DependencyKind::External);
    let missing = home.dependencies.iter().find(|d| d.target == "./missing").unwrap();
    assert_eq!(missing.kind, DependencyKind::LocalUnresolved);
}

#[test]
fn unlayered_modules_are_not_checked_for_direction() {
    let dir = typescript_project();
    let modules = analyzer(dir.path(), TS_CONFIG).build_modules().unwrap();
    let util = module(&modules, "src/lib/util.ts");
    assert_eq!(util.layer, None);
    assert_eq!(util.dependencies[0].target, "src/data/api.ts");

    let result = analyze(dir.path(), TS_CONFIG);
    assert!(result
        .violations
        .iter()
        .all(|v| v.location.file != Path::new("src/lib/util.ts")));
}

#[test]
fn analysis_is_deterministic() {
    let dir = typescript_project();
    let first = analyze(dir.path(), TS_CONFIG);
    let second = analyze(dir.path(), TS_CONFIG);
    assert_eq!(first.violations, second.violations);
}

#[test]
fn disabled_checks_produce_nothing() {
    let dir = typescript_project();
    let toml = format!(
        "{TS_CONFIG}\n[checks]\nunresolved-import = false\narchitecture-anti-pattern = false\n"
    );
    let result = analyze(dir.path(), &toml);
    assert_eq!(rules(&result), vec!["dependency-direction"]);
}

// ── Python ──

#[test]
fn business_logic_reported_at_its_declaration() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/views/Checkout.tsx",
        "import React from \"react\";\n\nexport const Checkout = () => null;\nexport function calculateTotal() { return 0; }\n",
    );

    let result = analyze(root, TS_CONFIG);
    let placement = result.by_rule("business-logic-placement");
    assert_eq!(placement.len(), 1);
    assert!(placement[0].message.contains("calculateTotal"));
    assert_eq!(placement[0].location.line, 4);
}

const PY_CONFIG: &str = r#"
[analyzer]
ecosystem = "python"

[[layers]]
name = "core"
pattern = "app/**"
"#;

#[test]
fn three_module_cycle_reported_once() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "app/__init__.py", "");
    write(root, "app/a.py", "from app import b\n\ndef run():\n    pass\n");
    write(root, "app/b.py", "import app.c\n");
    write(root, "app/c.py", "from app.a import run\n");

    let result = analyze(root, PY_CONFIG);
    let cycles = result.by_rule("circular-dependency");
    assert_eq!(cycles.len(), 1, "{:#?}", result.violations);
    assert_eq!(
        cycles[0].message,
        "Circular dependency: app/a.py -> app/b.py -> app/c.py -> app/a.py"
    );
    assert_eq!(cycles[0].location.file, Path::new("app/a.py"));
    assert_eq!(cycles[0].severity, Severity::Warning);
}

#[test]
fn multi_line_import_resolves_like_single_line() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "app/models.py", "class User:\n    pass\n\nclass Order:\n    pass\n");
    write(
        root,
        "app/one.py",
        "from app.models import (\n    User,  # people\n    Order,\n)\n",
    );
    write(root, "app/two.py", "from app.models import User, Order\n");

    let modules = analyzer(root, PY_CONFIG).build_modules().unwrap();
    let edges = |path: &str| -> Vec<(String, DependencyKind)> {
        module(&modules, path)
            .dependencies
            .iter()
            .map(|d| (d.target.clone(), d.kind))
            .collect()
    };
    assert_eq!(edges("app/one.py"), edges("app/two.py"));
    assert_eq!(
        edges("app/two.py"),
        vec![
            ("app/models.py".to_string(), DependencyKind::LocalResolved),
            ("app/models.py".to_string(), DependencyKind::LocalResolved),
        ]
    );
}

#[test]
fn well_known_third_party_is_not_unresolved() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "app/service.py",
        "import os\nimport requests\nimport numpy as np\nfrom django.db import models\nimport app.ghost\n",
    );

    let result = analyze(root, PY_CONFIG);
    let unresolved = result.by_rule("unresolved-import");
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].message.contains("app.ghost"));
    assert_eq!(unresolved[0].severity, Severity::Info);
}

#[test]
fn semicolon_joined_import_is_still_checked() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "app/service.py", "import os; import app.ghost
");

    let result = analyze(root, PY_CONFIG);
    let unresolved = result.by_rule("unresolved-import");
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].message.contains("app.ghost"));
    assert_eq!(unresolved[0].location.line, 1);
}

#[test]
fn relative_imports_resolve_within_packages() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/shop/data/repo.py", "def load():\n    pass\n");
    write(root, "src/shop/views/page.py", "from ..data import repo\nfrom . import widgets\n");

    let modules = analyzer(
        root,
        "[analyzer]\necosystem = \"python\"\n[[layers]]\nname = \"shop\"\npattern = \"src/shop/**\"\n",
    )
    .build_modules()
    .unwrap();
    let page = module(&modules, "src/shop/views/page.py");
    assert_eq!(page.dependencies[0].target, "src/shop/data/repo.py");
    assert_eq!(page.dependencies[0].kind, DependencyKind::LocalResolved);
    assert_eq!(page.dependencies[1].target, "shop.views.widgets");
    assert_eq!(page.dependencies[1].kind, DependencyKind::LocalUnresolved);
}

// ── Kotlin ──

#[test]
fn kotlin_wildcards_and_prefix_heuristic() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let base = "app/src/main/kotlin/com/example";
    write(
        root,
        &format!("{base}/ui/HomeScreen.kt"),
        "package com.example.ui\n\nimport com.example.data.*\nimport com.example.domain.User\nimport com.example.ghost.Thing\nimport androidx.compose.runtime.Composable\n\nfun HomeScreen() {}\n",
    );
    write(
        root,
        &format!("{base}/data/UserRepository.kt"),
        "package com.example.data\n\nclass UserRepository\n",
    );
    write(
        root,
        &format!("{base}/domain/User.kt"),
        "package com.example.domain\n\ndata class User(val id: Int)\n",
    );

    let toml = r#"
[analyzer]
ecosystem = "kotlin"

[[layers]]
name = "ui"
pattern = "**/ui/**"
allow = ["domain"]

[[layers]]
name = "data"
pattern = "**/data/**"
allow = ["domain"]

[[layers]]
name = "domain"
pattern = "**/domain/**"
"#;

    let modules = analyzer(root, toml).build_modules().unwrap();
    let home = module(&modules, &format!("{base}/ui/HomeScreen.kt"));
    let kinds: Vec<DependencyKind> = home.dependencies.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DependencyKind::LocalResolved,
            DependencyKind::LocalResolved,
            DependencyKind::LocalUnresolved,
            DependencyKind::External,
        ]
    );
    assert_eq!(home.dependencies[0].target, format!("{base}/data/UserRepository.kt"));

    let result = analyze(root, toml);
    assert_eq!(
        rules(&result),
        vec![
            "unresolved-import",
            "dependency-direction",
            "kotlin-architecture-anti-pattern",
        ]
    );
}

// ── Swift ──

#[test]
fn swift_module_imports_and_view_signals() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "Sources/Core/User.swift", "public struct User {}\n");
    write(
        root,
        "Sources/App/Views/HomeView.swift",
        r#"import SwiftUI
import Core

struct HomeView: View {
    var body: some View { Text("hi") }
    func load() {
        URLSession.shared.dataTask(with: url).resume()
    }
}
"#,
    );

    let toml = r#"
[analyzer]
ecosystem = "swift"

[[layers]]
name = "views"
pattern = "**/Views/**"
allow = ["core"]

[[layers]]
name = "core"
pattern = "Sources/Core/**"
"#;

    let modules = analyzer(root, toml).build_modules().unwrap();
    let view = module(&modules, "Sources/App/Views/HomeView.swift");
    assert_eq!(view.layer.as_deref(), Some("views"));
    assert_eq!(view.dependencies[0].kind, DependencyKind::External);
    assert_eq!(view.dependencies[1].target, "Sources/Core/User.swift");

    let result = analyze(root, toml);
    assert_eq!(rules(&result), vec!["swift-architecture-anti-pattern"]);
    assert!(result.violations[0].message.contains("HomeView"));
    assert_eq!(result.violations[0].location.line, 7);
}

#[test]
fn swift_view_under_domain_layer_has_no_signal_finding() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "Sources/Domain/Summary.swift",
        r#"import Foundation

struct SummaryView: View {
    func load() { URLSession.shared.dataTask(with: u) }
}
"#,
    );

    let toml = r#"
[analyzer]
ecosystem = "swift"

[[layers]]
name = "domain"
pattern = "**/Domain/**"
"#;

    let modules = analyzer(root, toml).build_modules().unwrap();
    assert_eq!(module(&modules, "Sources/Domain/Summary.swift").signals.len(), 1);

    let result = analyze(root, toml);
    assert!(result.violations.is_empty(), "{:?}", result.violations);
}

// ── Layer assignment ──

#[test]
fn precedence_and_specificity_pick_one_layer() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/features/checkout/views/Cart.ts", "export const a = 1;\n");
    write(root, "src/data/api.ts", "export const b = 1;\n");
    write(root, "src/other.ts", "export const c = 1;\n");

    let toml = r#"
[analyzer]
ecosystem = "typescript"

[[layers]]
name = "app"
pattern = "src/**"

[[layers]]
name = "data"
pattern = "src/data/**"

[[layers]]
name = "views"
pattern = "**/views/**"
precedence = 5
"#;

    let modules = analyzer(root, toml).build_modules().unwrap();
    let layer = |path: &str| module(&modules, path).layer.clone();
    assert_eq!(layer("src/features/checkout/views/Cart.ts").as_deref(), Some("views"));
    assert_eq!(layer("src/data/api.ts").as_deref(), Some("data"));
    assert_eq!(layer("src/other.ts").as_deref(), Some("app"));
}
