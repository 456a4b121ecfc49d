//! Kotlin import extraction.

use layer_lint_core::Ecosystem;
use regex::Regex;

use crate::extractor::{
    file_stem, join_dotted, ImportCandidate, ImportParser, ImportTarget, ParsedFile, SourceFile,
};
use crate::literal_regex;
use crate::sanitize::{brace_depths, sanitize, LexicalSyntax};

/// Extracts package, imports, and top-level declarations from Kotlin source.
pub struct KotlinParser {
    package: Regex,
    import: Regex,
    declaration: Regex,
}

impl Default for KotlinParser {
    fn default() -> Self {
        Self::new()
    }
}

impl KotlinParser {
    /// Creates a new Kotlin parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            package: literal_regex(r"^\s*package\s+([\w.]+)"),
            import: literal_regex(r"^\s*import\s+([\w.]+?)(\.\*)?(?:\s+as\s+\w+)?\s*;?\s*$"),
            declaration: literal_regex(concat!(
                r"^\s*(?:@[\w.]+(?:\([^)]*\))?\s+)*",
                r"((?:(?:public|private|internal|protected|open|abstract|sealed|data|enum|",
                r"annotation|inline|value|inner|const|lateinit|override|suspend|operator|",
                r"infix|tailrec|external|expect|actual|final|fun)\s+)*)",
                r"(?:class|interface|object|fun|val|var|typealias)\s+",
                r"(?:<(?:[^<>]|<[^<>]*>)*>\s*)?",
                r"(?:[\w.]+(?:<(?:[^<>]|<[^<>]*>)*>)?\??\.)?",
                r"(\w+)",
            )),
        }
    }

    fn collect_exports(&self, lines: &[String], parsed: &mut ParsedFile) {
        let depths = brace_depths(lines);

        for (idx, (line, depth)) in lines.iter().zip(depths).enumerate() {
            if depth != 0 {
                continue;
            }
            let Some(caps) = self.declaration.captures(line) else {
                continue;
            };
            if caps[1].split_whitespace().any(|m| m == "private") {
                continue;
            }
            // Extension receivers (`fun <T> List<T>.slug()`) are not captured.
            parsed.add_export(&caps[2], idx + 1);
        }
    }
}

impl ImportParser for KotlinParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Kotlin
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".kt", ".kts"]
    }

    fn parse(&self, file: &SourceFile<'_>) -> ParsedFile {
        let lines = sanitize(file.content, LexicalSyntax::KOTLIN);

        let package = lines
            .iter()
            .find_map(|line| self.package.captures(line).map(|c| c[1].to_string()));

        let imports = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let caps = self.import.captures(line)?;
                let name = caps[1].to_string();
                let target = if caps.get(2).is_some() {
                    ImportTarget::Wildcard(name)
                } else {
                    ImportTarget::Name(name)
                };
                Some(ImportCandidate::new(idx + 1, line.trim(), target))
            })
            .collect();

        let namespace = package.clone().unwrap_or_default();
        let mut parsed = ParsedFile {
            qualified_name: Some(join_dotted(&namespace, file_stem(file.relative))),
            export_namespace: package.clone(),
            package,
            imports,
            ..ParsedFile::default()
        };
        self.collect_exports(&lines, &mut parsed);
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(src: &str) -> ParsedFile {
        KotlinParser::new().parse(&SourceFile {
            root: Path::new("/proj"),
            path: Path::new("/proj/app/src/main/kotlin/UserScreen.kt"),
            relative: "app/src/main/kotlin/UserScreen.kt",
            content: src,
        })
    }

    #[test]
    fn extracts_package_and_imports() {
        let src = r#"
package com.example.ui

import com.example.domain.User
import com.example.data.Repo as Repository
import com.example.util.*
import kotlinx.coroutines.flow.Flow
"#;
        let p = parse(src);
        assert_eq!(p.package.as_deref(), Some("com.example.ui"));
        assert_eq!(p.qualified_name.as_deref(), Some("com.example.ui.UserScreen"));
        let targets: Vec<_> = p.imports.iter().map(|i| i.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                ImportTarget::Name("com.example.domain.User".into()),
                ImportTarget::Name("com.example.data.Repo".into()),
                ImportTarget::Wildcard("com.example.util".into()),
                ImportTarget::Name("kotlinx.coroutines.flow.Flow".into()),
            ]
        );
        assert_eq!(p.imports[0].line, 4);
        assert_eq!(p.imports[1].statement, "import com.example.data.Repo as Repository");
    }

    #[test]
    fn commented_imports_are_ignored() {
        let src = "package a\n// import b.C\n/* import d.E */\nimport f.G\n";
        let p = parse(src);
        assert_eq!(p.imports.len(), 1);
        assert_eq!(p.imports[0].target, ImportTarget::Name("f.G".into()));
    }

    #[test]
    fn exports_top_level_declarations_only() {
        let src = r#"
package com.example.ui

@Composable
fun UserScreen() {
    val inner = 1
}

data class UserState(val name: String)
sealed interface Event
object Routes
enum class Tab { HOME, SETTINGS }
private fun helper() {}
internal val MAX = 3
typealias Handler = () -> Unit
fun String.slugify(): String = this
class Outer {
    fun member() {}
}
"#;
        let p = parse(src);
        assert_eq!(
            p.exports,
            vec!["UserScreen", "UserState", "Event", "Routes", "Tab", "MAX", "Handler", "slugify", "Outer"]
        );
    }

    #[test]
    fn generic_extension_receivers_export_member_name() {
        let src = "package com.example.util\n\n\
fun <T> List<T>.firstOrNone(): T? = firstOrNull()\n\
val Map<String, List<Int>>.total: Int get() = 0\n\
fun String?.orBlank(): String = this ?: \"\"\n";
        let p = parse(src);
        assert_eq!(p.exports, vec!["firstOrNone", "total", "orBlank"]);
    }

    #[test]
    fn file_without_package_uses_stem() {
        let p = parse("fun main() {}\n");
        assert_eq!(p.package, None);
        assert_eq!(p.qualified_name.as_deref(), Some("UserScreen"));
    }
}
