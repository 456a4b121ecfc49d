//! Ecosystem-specific architecture anti-pattern detectors.
//!
//! # Detected Patterns
//!
//! - presentation modules importing data-access, networking or persistence
//!   names, or modules of a data layer
//! - state-holder modules (view models, presenters, stores) importing UI
//!   framework names, or modules of a presentation layer
//! - domain modules importing platform framework names
//! - parser signals (Swift: networking, JSON decoding and `reduce`
//!   arithmetic inside SwiftUI view scopes) in presentation or unlayered
//!   modules
//!
//! Violations carry the rule id `<ecosystem>-architecture-anti-pattern`.
//! The check is additive: an edge may also be reported by
//! `dependency-direction`.

use layer_lint_core::utils::name_matches;
use layer_lint_core::{
    Dependency, Ecosystem, Location, Module, Severity, Suggestion, Violation, CHECK_ANTI_PATTERN,
};

use crate::role::LayerRole;
use crate::rule::{GraphContext, GraphRule};

/// Rule code for architecture-anti-pattern.
pub const CODE: &str = "LL005";

/// Toggle name for architecture-anti-pattern.
pub const NAME: &str = CHECK_ANTI_PATTERN;

/// Name patterns that drive the detectors for one ecosystem.
///
/// Patterns use [`name_matches`] syntax: `*` is one segment, `**` any number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiPatternProfile {
    /// Data-access, networking and persistence libraries.
    pub data_access: &'static [&'static str],
    /// UI framework names a state holder must not touch.
    pub presentation: &'static [&'static str],
    /// Platform frameworks the domain must not import.
    pub platform: &'static [&'static str],
}

const KOTLIN: AntiPatternProfile = AntiPatternProfile {
    data_access: &[
        "retrofit2.**",
        "okhttp3.**",
        "io.ktor.client.**",
        "androidx.room.**",
        "androidx.datastore.**",
        "android.database.**",
        "java.sql.**",
        "java.net.**",
        "com.google.firebase.firestore.**",
    ],
    presentation: &[
        "android.widget.**",
        "android.view.**",
        "android.app.Activity",
        "android.app.Fragment",
        "androidx.fragment.**",
        "androidx.appcompat.**",
        "androidx.compose.ui.**",
        "androidx.compose.material.**",
        "androidx.compose.material3.**",
        "androidx.compose.foundation.**",
    ],
    platform: &["android.**", "androidx.**", "retrofit2.**", "okhttp3.**", "java.sql.**"],
};

const SWIFT: AntiPatternProfile = AntiPatternProfile {
    data_access: &[
        "CoreData",
        "Alamofire",
        "Moya",
        "RealmSwift",
        "GRDB",
        "SQLite",
        "FirebaseFirestore",
    ],
    presentation: &["UIKit", "SwiftUI", "AppKit"],
    platform: &["UIKit", "SwiftUI", "AppKit", "CoreData", "Alamofire", "RealmSwift"],
};

const TYPESCRIPT: AntiPatternProfile = AntiPatternProfile {
    data_access: &[
        "axios",
        "node-fetch",
        "prisma",
        "@prisma/**",
        "mongoose",
        "typeorm",
        "sequelize",
        "knex",
        "pg",
        "mysql2",
        "@supabase/**",
        "firebase/**",
    ],
    presentation: &[
        "react-dom",
        "react-dom/**",
        "react-native",
        "@mui/**",
        "styled-components",
        "@angular/core",
        "vue",
        "svelte",
    ],
    platform: &[
        "react",
        "react-dom/**",
        "react-native",
        "next/**",
        "express",
        "vue",
        "@angular/**",
        "axios",
        "mongoose",
        "@prisma/**",
    ],
};

const PYTHON: AntiPatternProfile = AntiPatternProfile {
    data_access: &[
        "sqlalchemy.**",
        "django.db.**",
        "psycopg2.**",
        "pymongo.**",
        "redis.**",
        "sqlite3.**",
        "requests.**",
        "httpx.**",
        "aiohttp.**",
    ],
    presentation: &[
        "tkinter.**",
        "PyQt5.**",
        "PyQt6.**",
        "PySide6.**",
        "jinja2.**",
        "django.shortcuts.**",
        "django.template.**",
        "flask.render_template",
    ],
    platform: &[
        "django.**",
        "flask.**",
        "fastapi.**",
        "starlette.**",
        "sqlalchemy.**",
        "requests.**",
    ],
};

impl AntiPatternProfile {
    /// Built-in profile for an ecosystem.
    #[must_use]
    pub fn for_ecosystem(ecosystem: Ecosystem) -> &'static Self {
        match ecosystem {
            Ecosystem::Kotlin => &KOTLIN,
            Ecosystem::Swift => &SWIFT,
            Ecosystem::TypeScript => &TYPESCRIPT,
            Ecosystem::Python => &PYTHON,
        }
    }
}

/// First pattern matching `name`.
///
/// A pattern without wildcards also matches names below it, so `UIKit`
/// covers `UIKit.UIView` and `axios` covers `axios/lib/adapters/http`.
fn first_match(name: &str, patterns: &[&'static str]) -> Option<&'static str> {
    patterns.iter().copied().find(|p| {
        name_matches(name, p) || (!p.contains('*') && name_matches(name, &format!("{p}/**")))
    })
}

/// Runs the ecosystem's anti-pattern detectors.
#[derive(Debug, Clone)]
pub struct ArchitectureAntiPattern {
    /// Severity level.
    pub severity: Severity,
}

impl Default for ArchitectureAntiPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchitectureAntiPattern {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn violation(
        &self,
        graph: &GraphContext<'_>,
        file: &str,
        line: usize,
        message: String,
        help: &str,
    ) -> Violation {
        Violation::new(
            CODE,
            graph.ecosystem.anti_pattern_rule(),
            self.severity,
            Location::line(file, line),
            message,
        )
        .with_suggestion(Suggestion::new(help))
    }

    fn check_dependency(
        &self,
        graph: &GraphContext<'_>,
        profile: &AntiPatternProfile,
        module: &Module,
        role: LayerRole,
        dep: &Dependency,
    ) -> Option<Violation> {
        let target_role = if dep.is_local() {
            graph.layer_of(&dep.target).map(LayerRole::classify)
        } else {
            None
        };

        match role {
            LayerRole::Presentation => {
                let hit = if dep.is_local() {
                    (target_role == Some(LayerRole::Data)).then(|| dep.target.clone())
                } else {
                    first_match(&dep.target, profile.data_access).map(|_| dep.target.clone())
                };
                hit.map(|name| {
                    self.violation(
                        graph,
                        &module.path,
                        dep.line,
                        format!("Presentation module imports data-access dependency '{name}'"),
                        "Fetch and persist data through a view model, store or repository interface",
                    )
                })
            }
            LayerRole::StateHolder => {
                let hit = if dep.is_local() {
                    (target_role == Some(LayerRole::Presentation)).then(|| dep.target.clone())
                } else {
                    first_match(&dep.target, profile.presentation).map(|_| dep.target.clone())
                };
                hit.map(|name| {
                    self.violation(
                        graph,
                        &module.path,
                        dep.line,
                        format!("State holder depends on presentation code '{name}'"),
                        "Expose state for the view to observe instead of referencing UI types",
                    )
                })
            }
            LayerRole::Domain => {
                if dep.is_local() {
                    return None;
                }
                first_match(&dep.target, profile.platform).map(|_| {
                    self.violation(
                        graph,
                        &module.path,
                        dep.line,
                        format!("Domain module imports platform framework '{}'", dep.target),
                        "Keep the domain framework-free; put platform code behind an interface",
                    )
                })
            }
            LayerRole::Data | LayerRole::Other => None,
        }
    }
}

impl GraphRule for ArchitectureAntiPattern {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects ecosystem-specific layering anti-patterns"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
        let profile = AntiPatternProfile::for_ecosystem(graph.ecosystem);
        let mut violations = Vec::new();

        for module in graph.modules {
            let role = module.layer().map_or(LayerRole::Other, LayerRole::classify);

            if role != LayerRole::Other {
                violations.extend(
                    module
                        .dependencies
                        .iter()
                        .filter_map(|dep| self.check_dependency(graph, profile, module, role, dep)),
                );
            }

            // View signals belong to presentation code; a view type placed
            // under another role is left to the dependency detectors.
            if !matches!(role, LayerRole::Presentation | LayerRole::Other) {
                continue;
            }
            for signal in &module.signals {
                violations.push(self.violation(
                    graph,
                    &module.path,
                    signal.line,
                    format!(
                        "View '{}' contains {}: {}",
                        signal.scope,
                        signal.kind.describe(),
                        signal.text
                    ),
                    "Move this logic into a view model or service and bind the result",
                ));
            }
        }

        violations
    }
}
