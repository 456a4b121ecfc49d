//! TypeScript/JavaScript import extraction using Tree-sitter.

use std::path::{Path, PathBuf};
use tracing::warn;
use tree_sitter::{Language, Node, Parser};

use layer_lint_core::Ecosystem;

use crate::extractor::{ImportCandidate, ImportParser, ImportTarget, ParsedFile, SourceFile};
use crate::walker::{normalize, relative_path};

/// Extensions tried, in order, for an extensionless specifier.
pub const CANDIDATE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".d.ts"];

/// Path aliases mapped to `<root>/src`, then `<root>`.
const ROOT_ALIASES: &[&str] = &["@/", "~/"];

const DECLARATION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
];

/// Extracts imports and exports from TypeScript and JavaScript sources.
pub struct TypeScriptParser {
    typescript: Language,
    tsx: Language,
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeScriptParser {
    /// Creates a new TypeScript parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn language_for(&self, relative: &str) -> &Language {
        if relative.ends_with(".tsx") || relative.ends_with(".jsx") {
            &self.tsx
        } else {
            &self.typescript
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    fn string_value(node: &Node<'_>, src: &[u8]) -> String {
        Self::text(node, src)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string()
    }

    /// Module specifier of an import or re-export statement.
    fn source_of(node: &Node<'_>, src: &[u8]) -> Option<String> {
        if let Some(source) = node.child_by_field_name("source") {
            return Some(Self::string_value(&source, src));
        }
        let mut cursor = node.walk();
        let require = node
            .children(&mut cursor)
            .find(|child| child.kind() == "import_require_clause")?;
        let source = require.child_by_field_name("source")?;
        Some(Self::string_value(&source, src))
    }

    fn candidate(&self, node: &Node<'_>, file: &SourceFile<'_>) -> Option<ImportCandidate> {
        let src = file.content.as_bytes();
        let specifier = Self::source_of(node, src)?;
        if specifier.is_empty() {
            return None;
        }
        let resolved = resolve_specifier(file, &specifier);
        let statement = Self::text(node, src)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Some(ImportCandidate::new(
            node.start_position().row + 1,
            statement,
            ImportTarget::Path {
                specifier,
                resolved,
            },
        ))
    }

    fn collect_exports(node: &Node<'_>, src: &[u8], exports: &mut Vec<String>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

        if children.iter().any(|c| c.kind() == "default") {
            exports.push("default".to_string());
            return;
        }

        if let Some(decl) = node.child_by_field_name("declaration") {
            Self::declaration_names(&decl, src, exports);
        }

        for clause in children.iter().filter(|c| c.kind() == "export_clause") {
            let mut clause_cursor = clause.walk();
            for spec in clause.children(&mut clause_cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let name = spec
                    .child_by_field_name("alias")
                    .or_else(|| spec.child_by_field_name("name"));
                if let Some(name) = name {
                    exports.push(Self::string_value(&name, src));
                }
            }
        }
    }

    fn declaration_names(decl: &Node<'_>, src: &[u8], exports: &mut Vec<String>) {
        if DECLARATION_KINDS.contains(&decl.kind()) {
            if let Some(name) = decl.child_by_field_name("name") {
                exports.push(Self::text(&name, src).to_string());
            }
            return;
        }

        if matches!(decl.kind(), "lexical_declaration" | "variable_declaration") {
            let mut cursor = decl.walk();
            for declarator in decl.children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        exports.push(Self::text(&name, src).to_string());
                    }
                }
            }
        }
    }
}

impl ImportParser for TypeScriptParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::TypeScript
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"]
    }

    fn parse(&self, file: &SourceFile<'_>) -> ParsedFile {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(self.language_for(file.relative)) {
            warn!("Failed to load TypeScript grammar for {}: {e}", file.relative);
            return ParsedFile::default();
        }

        let src = file.content.as_bytes();
        let Some(tree) = parser.parse(src, None) else {
            warn!("Failed to parse {}", file.relative);
            return ParsedFile::default();
        };
        let root = tree.root_node();
        if root.has_error() {
            warn!("Syntax errors in {}, skipping its imports and exports", file.relative);
            return ParsedFile::default();
        }

        let mut result = ParsedFile::default();
        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "import_statement" => {
                    if let Some(import) = self.candidate(&node, file) {
                        result.imports.push(import);
                    }
                }
                "export_statement" => {
                    if let Some(import) = self.candidate(&node, file) {
                        result.imports.push(import);
                    }
                    let mut names = Vec::new();
                    Self::collect_exports(&node, src, &mut names);
                    for name in names {
                        result.add_export(name, node.start_position().row + 1);
                    }
                }
                _ => {}
            }
        }

        result
    }
}

/// Whether a specifier points into the project rather than a package.
#[must_use]
pub fn is_local_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || ROOT_ALIASES.iter().any(|a| specifier.starts_with(a))
}

/// Locates a local specifier to a root-relative file path.
fn resolve_specifier(file: &SourceFile<'_>, specifier: &str) -> Option<String> {
    if !is_local_specifier(specifier) {
        return None;
    }

    let bases: Vec<PathBuf> = if let Some(rest) = ROOT_ALIASES
        .iter()
        .find_map(|alias| specifier.strip_prefix(alias))
    {
        vec![file.root.join("src").join(rest), file.root.join(rest)]
    } else if let Some(rest) = specifier.strip_prefix('/') {
        vec![file.root.join(rest)]
    } else {
        let dir = file.path.parent().unwrap_or(file.root);
        vec![dir.join(specifier)]
    };

    bases
        .iter()
        .find_map(|base| locate(&normalize(base)))
        .and_then(|found| relative_path(file.root, &found))
}

/// Tries the path itself, the path with each candidate extension appended, then
/// `index.*` inside it.
fn locate(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    // ESM-style `./foo.js` pointing at `foo.ts`
    let name = base.to_string_lossy();
    for js in [".js", ".jsx", ".mjs", ".cjs"] {
        if let Some(stem) = name.strip_suffix(js) {
            if let Some(found) = try_extensions(Path::new(stem)) {
                return Some(found);
            }
        }
    }

    try_extensions(base).or_else(|| {
        if base.is_dir() {
            try_extensions(&base.join("index"))
        } else {
            None
        }
    })
}

fn try_extensions(base: &Path) -> Option<PathBuf> {
    CANDIDATE_EXTENSIONS.iter().find_map(|ext| {
        let mut candidate = base.as_os_str().to_owned();
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        candidate.is_file().then_some(candidate)
    })
}
