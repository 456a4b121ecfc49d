//! Swift import extraction and SwiftUI view scanning.

use layer_lint_core::{Ecosystem, Signal, SignalKind};
use regex::Regex;

use crate::extractor::{
    file_stem, join_dotted, ImportCandidate, ImportParser, ImportTarget, ParsedFile, SourceFile,
};
use crate::literal_regex;
use crate::sanitize::{brace_depths, sanitize, LexicalSyntax};

/// Lines after a `.reduce(` call searched for its combining operator.
const REDUCE_LOOKAHEAD: usize = 3;

/// Swift import parser.
pub struct SwiftParser {
    import: Regex,
    declaration: Regex,
    view: Regex,
    view_conformance: Regex,
    networking: Regex,
    json_decoding: Regex,
    reduce: Regex,
    arithmetic: Regex,
}

impl Default for SwiftParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SwiftParser {
    /// Creates the parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            import: literal_regex(concat!(
                r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*import\s+",
                r"(?:(?:typealias|struct|class|enum|protocol|let|var|func)\s+)?([\w.]+)",
            )),
            declaration: literal_regex(concat!(
                r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*",
                r"((?:(?:public|open|internal|private|fileprivate|final|indirect|static|",
                r"nonisolated|override|convenience|required|mutating|dynamic|lazy)\s+)*)",
                r"(?:(?:public|open|internal|private|fileprivate)\(set\)\s+)?",
                r"(?:class|struct|enum|protocol|actor|func|typealias|let|var)\s+",
                r"([A-Za-z_]\w*)",
            )),
            view: literal_regex(concat!(
                r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*",
                r"(?:(?:public|internal|private|fileprivate|final)\s+)*",
                r"(?:struct|class)\s+(\w+)\s*(?:<[^{:]*>)?\s*:\s*([^{]*)",
            )),
            view_conformance: literal_regex(r"\bView\b"),
            networking: literal_regex(r"\bURLSession\b|\.dataTask\("),
            json_decoding: literal_regex(r"\bJSONDecoder\b"),
            reduce: literal_regex(r"\.reduce\("),
            arithmetic: literal_regex(r"[\w)\]$]\s*[-+*/]\s*[\w($.\[]|,\s*[-+*/]\s*\)"),
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
            let private = caps[1]
                .split_whitespace()
                .any(|m| m == "private" || m == "fileprivate");
            if private {
                continue;
            }
            parsed.add_export(&caps[2], idx + 1);
        }
    }

    /// Finds networking, decoding, and aggregation code inside SwiftUI views.
    fn signals(&self, lines: &[String], original: &[&str]) -> Vec<Signal> {
        let mut signals = Vec::new();
        let mut depth = 0usize;
        // (view name, depth outside the view body)
        let mut pending: Option<(String, usize)> = None;
        let mut active: Option<usize> = None;
        let mut scope = String::new();

        for (idx, line) in lines.iter().enumerate() {
            if active.is_none() && pending.is_none() {
                if let Some(caps) = self.view.captures(line) {
                    if self.view_conformance.is_match(&caps[2]) {
                        pending = Some((caps[1].to_string(), depth));
                    }
                }
            }

            let mut in_view = active.is_some();
            for c in line.chars() {
                match c {
                    '{' => {
                        if let Some((name, outer)) = pending.take() {
                            if depth == outer {
                                active = Some(outer);
                                scope = name;
                                in_view = true;
                            } else {
                                pending = Some((name, outer));
                            }
                        }
                        depth += 1;
                    }
                    '}' => {
                        depth = depth.saturating_sub(1);
                        if active == Some(depth) {
                            active = None;
                        }
                    }
                    _ => {}
                }
            }

            if !in_view {
                continue;
            }
            let text = original.get(idx).map_or("", |l| l.trim());
            self.scan_line(lines, idx, &scope, text, &mut signals);
        }

        signals
    }

    fn scan_line(
        &self,
        lines: &[String],
        idx: usize,
        scope: &str,
        text: &str,
        out: &mut Vec<Signal>,
    ) {
        let line = &lines[idx];
        let mut push = |kind| {
            out.push(Signal {
                kind,
                line: idx + 1,
                scope: scope.to_string(),
                text: text.to_string(),
            });
        };

        if self.networking.is_match(line) {
            push(SignalKind::Networking);
        }
        if self.json_decoding.is_match(line) {
            push(SignalKind::JsonDecoding);
        }
        if let Some(m) = self.reduce.find(line) {
            let end = (idx + REDUCE_LOOKAHEAD).min(lines.len() - 1);
            let same_line = &line[m.end()..];
            let arithmetic = self.arithmetic.is_match(same_line)
                || lines[idx + 1..=end]
                    .iter()
                    .any(|l| self.arithmetic.is_match(l));
            if arithmetic {
                push(SignalKind::AggregationArithmetic);
            }
        }
    }
}

impl ImportParser for SwiftParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Swift
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".swift"]
    }

    fn parse(&self, file: &SourceFile<'_>) -> ParsedFile {
        let lines = sanitize(file.content, LexicalSyntax::SWIFT);
        let original: Vec<&str> = file.content.lines().collect();

        let imports = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let caps = self.import.captures(line)?;
                Some(ImportCandidate::new(
                    idx + 1,
                    line.trim(),
                    ImportTarget::Name(caps[1].to_string()),
                ))
            })
            .collect();

        let package = swift_package(file.relative);
        let namespace = package.clone().unwrap_or_default();

        let mut parsed = ParsedFile {
            qualified_name: Some(join_dotted(&namespace, file_stem(file.relative))),
            export_namespace: package.clone(),
            package,
            imports,
            signals: self.signals(&lines, &original),
            ..ParsedFile::default()
        };
        self.collect_exports(&lines, &mut parsed);
        parsed
    }
}

/// Module a Swift file belongs to: the directory under `Sources/` when the
/// file lives in a Swift package, otherwise its parent directory name.
#[must_use]
pub fn swift_package(relative: &str) -> Option<String> {
    let parts: Vec<&str> = relative.split('/').collect();
    if let Some(pos) = parts.iter().position(|p| *p == "Sources") {
        if pos + 2 < parts.len() {
            return Some(parts[pos + 1].to_string());
        }
    }
    parts
        .len()
        .checked_sub(2)
        .map(|parent| parts[parent].to_string())
}
