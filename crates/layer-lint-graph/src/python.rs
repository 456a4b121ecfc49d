//! Python import extraction.
//!
//! Lexical: the file is sanitized first, then `import` / `from ... import`
//! statements are matched line by line. Parenthesized and backslash-continued
//! statements are joined before matching, and `;`-separated statements on
//! one line are matched separately.

use layer_lint_core::Ecosystem;
use regex::Regex;

use crate::extractor::{
    join_dotted, ImportCandidate, ImportParser, ImportTarget, ParsedFile, SourceFile,
};
use crate::literal_regex;
use crate::sanitize::{sanitize, LexicalSyntax};

/// Python import parser.
pub struct PythonParser {
    from_import: Regex,
    plain_import: Regex,
    def: Regex,
    assignment: Regex,
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonParser {
    /// Creates the parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            from_import: literal_regex(r"^\s*from\s+(\.*)\s*([\w.]*)\s+import\s+(.+)$"),
            plain_import: literal_regex(r"^\s*import\s+(.+)$"),
            def: literal_regex(r"^(?:async\s+def|def|class)\s+([A-Za-z_]\w*)"),
            assignment: literal_regex(r"^([A-Za-z_]\w*)\s*(?::[^=]*)?=(?:[^=]|$)"),
        }
    }

    fn imports(&self, lines: &[String]) -> Vec<ImportCandidate> {
        let mut imports = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let start = i;
            if !lines[i].split(';').any(starts_import) {
                i += 1;
                continue;
            }

            let (joined, next) = join_statement(lines, i);
            i = next;
            // `import os; import app.ghost` holds two statements.
            for statement in joined.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                self.parse_statement(statement, start + 1, &mut imports);
            }
        }

        imports
    }

    fn parse_statement(&self, statement: &str, line: usize, out: &mut Vec<ImportCandidate>) {
        if let Some(caps) = self.from_import.captures(statement) {
            let level = caps[1].len();
            let module = &caps[2];
            for name in imported_names(&caps[3]) {
                let target = if level > 0 {
                    let wildcard = name == "*";
                    let name = if wildcard {
                        module.to_string()
                    } else {
                        join_dotted(module, &name)
                    };
                    ImportTarget::Relative { level, name, wildcard }
                } else if module.is_empty() {
                    continue;
                } else if name == "*" {
                    ImportTarget::Wildcard(module.to_string())
                } else {
                    ImportTarget::Name(join_dotted(module, &name))
                };
                out.push(ImportCandidate::new(line, statement, target));
            }
            return;
        }

        if let Some(caps) = self.plain_import.captures(statement) {
            for name in imported_names(&caps[1]) {
                out.push(ImportCandidate::new(line, statement, ImportTarget::Name(name)));
            }
        }
    }

    fn collect_exports(&self, lines: &[String], parsed: &mut ParsedFile) {
        let mut depth = 0usize;

        for (idx, line) in lines.iter().enumerate() {
            if depth == 0 {
                let name = self
                    .def
                    .captures(line)
                    .or_else(|| self.assignment.captures(line))
                    .map(|caps| caps[1].to_string());
                if let Some(name) = name.filter(|n| !n.starts_with('_')) {
                    parsed.add_export(name, idx + 1);
                }
            }
            depth = paren_depth_after(line, depth);
        }
    }
}

impl ImportParser for PythonParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn parse(&self, file: &SourceFile<'_>) -> ParsedFile {
        let lines = sanitize(file.content, LexicalSyntax::PYTHON);
        let (module, package) = module_names(file.relative);

        let mut parsed = ParsedFile {
            package: Some(package).filter(|p| !p.is_empty()),
            qualified_name: Some(module.clone()).filter(|m| !m.is_empty()),
            export_namespace: Some(module).filter(|m| !m.is_empty()),
            imports: self.imports(&lines),
            ..ParsedFile::default()
        };
        self.collect_exports(&lines, &mut parsed);
        parsed
    }
}

/// Dotted module name and package of a root-relative `.py` path.
///
/// A leading `src/` directory is not part of the module name. For
/// `__init__.py` the package is the module itself.
#[must_use]
pub fn module_names(relative: &str) -> (String, String) {
    let without_ext = relative.strip_suffix(".py").unwrap_or(relative);
    let mut parts: Vec<&str> = without_ext.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() > 1 && parts[0] == "src" {
        parts.remove(0);
    }

    if parts.last() == Some(&"__init__") {
        parts.pop();
        let module = parts.join(".");
        return (module.clone(), module);
    }

    let module = parts.join(".");
    let package = parts[..parts.len().saturating_sub(1)].join(".");
    (module, package)
}

/// Joins a statement spanning several lines (open parens or a trailing
/// backslash). Returns the statement and the index of the next line.
fn join_statement(lines: &[String], start: usize) -> (String, usize) {
    let mut statement = String::new();
    let mut depth = 0usize;
    let mut i = start;

    while i < lines.len() {
        let line = lines[i].trim();
        depth = paren_depth_after(line, depth);
        let continued = line.ends_with('\\');
        let part = line.trim_end_matches('\\').trim();

        if !statement.is_empty() && !part.is_empty() {
            statement.push(' ');
        }
        statement.push_str(part);
        i += 1;

        if depth == 0 && !continued {
            break;
        }
    }

    let statement = statement.replace(['(', ')'], " ");
    let collapsed = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    (collapsed, i)
}

fn starts_import(statement: &str) -> bool {
    let statement = statement.trim_start();
    statement.starts_with("import ") || statement.starts_with("from ")
}

fn paren_depth_after(line: &str, mut depth: usize) -> usize {
    for c in line.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

/// Names in an import list with `as` aliases removed.
fn imported_names(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|item| item.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(relative: &str, content: &str) -> ParsedFile {
        let parser = PythonParser::new();
        parser.parse(&SourceFile {
            root: Path::new("/proj"),
            path: Path::new("/proj/x.py"),
            relative,
            content,
        })
    }

    fn targets(parsed: &ParsedFile) -> Vec<ImportTarget> {
        parsed.imports.iter().map(|i| i.target.clone()).collect()
    }

    #[test]
    fn plain_imports_with_alias() {
        let p = parse("app/main.py", "import os\nimport app.models as m, json\n");
        assert_eq!(
            targets(&p),
            vec![
                ImportTarget::Name("os".into()),
                ImportTarget::Name("app.models".into()),
                ImportTarget::Name("json".into()),
            ]
        );
        assert_eq!(p.imports[1].line, 2);
    }

    #[test]
    fn from_imports() {
        let p = parse("app/main.py", "from app.services import user_service, order as o\n");
        assert_eq!(
            targets(&p),
            vec![
                ImportTarget::Name("app.services.user_service".into()),
                ImportTarget::Name("app.services.order".into()),
            ]
        );
    }

    #[test]
    fn relative_and_wildcard_imports() {
        let p = parse(
            "app/views/home.py",
            "from . import helpers\nfrom ..data import *\nfrom app.models import *\n",
        );
        assert_eq!(
            targets(&p),
            vec![
                ImportTarget::Relative { level: 1, name: "helpers".into(), wildcard: false },
                ImportTarget::Relative { level: 2, name: "data".into(), wildcard: true },
                ImportTarget::Wildcard("app.models".into()),
            ]
        );
    }

    #[test]
    fn multi_line_import_matches_single_line() {
        let multi = parse(
            "app/main.py",
            "from app.models import (\n    User,  # the user\n    Order,\n)\n",
        );
        let single = parse("app/main.py", "from app.models import User, Order\n");
        assert_eq!(targets(&multi), targets(&single));
        assert_eq!(multi.imports[0].line, 1);
    }

    #[test]
    fn backslash_continuation() {
        let p = parse("app/main.py", "from app.models import User, \\\n    Order\n");
        assert_eq!(p.imports.len(), 2);
    }

    #[test]
    fn imports_in_strings_and_comments_are_ignored() {
        let p = parse(
            "app/main.py",
            "# import secret\ndoc = \"\"\"\nimport hidden\n\"\"\"\nimport real\n",
        );
        assert_eq!(targets(&p), vec![ImportTarget::Name("real".into())]);
    }

    #[test]
    fn exports_skip_private_and_nested() {
        let src = "\
def calculate_total(items):
    inner = 1
    def nested():
        pass

async def fetch():
    pass

class Cart:
    x = 1

_private = 2
MAX_ITEMS: int = 10
CONFIG = {
    'a': 1,
}
if x == 1:
    pass
";
        let p = parse("app/cart.py", src);
        assert_eq!(p.exports, vec!["calculate_total", "fetch", "Cart", "MAX_ITEMS", "CONFIG"]);
        assert_eq!(p.export_lines["calculate_total"], 1);
        assert_eq!(p.export_lines["fetch"], 6);
        assert_eq!(p.export_lines["Cart"], 9);
    }

    #[test]
    fn module_names_strip_src_and_init() {
        assert_eq!(module_names("src/app/models.py"), ("app.models".into(), "app".into()));
        assert_eq!(module_names("app/__init__.py"), ("app".into(), "app".into()));
        assert_eq!(module_names("main.py"), ("main".into(), String::new()));
    }

    #[test]
    fn package_and_qualified_name() {
        let p = parse("app/services/user.py", "");
        assert_eq!(p.package.as_deref(), Some("app.services"));
        assert_eq!(p.qualified_name.as_deref(), Some("app.services.user"));
        assert_eq!(p.export_namespace.as_deref(), Some("app.services.user"));
    }

    #[test]
    fn semicolon_separated_statements() {
        let p = parse("app/main.py", "import os; import app.ghost
x = 1; from app import models
");
        assert_eq!(
            targets(&p),
            vec![
                ImportTarget::Name("os".into()),
                ImportTarget::Name("app.ghost".into()),
                ImportTarget::Name("app.models".into()),
            ]
        );
        assert_eq!(p.imports[1].statement, "import app.ghost");
        assert_eq!(p.imports[1].line, 1);
        assert_eq!(p.imports[2].line, 2);
    }
}
