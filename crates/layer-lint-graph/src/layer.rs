//! Layer assignment: maps module paths to architecture layers.

use layer_lint_core::LayerDefinition;
use regex::Regex;
use thiserror::Error;

/// A layer pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}' for layer '{layer}': {source}")]
pub struct LayerPatternError {
    /// Layer name.
    pub layer: String,
    /// Pattern as written.
    pub pattern: String,
    /// Regex compilation error.
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone)]
enum Matcher {
    /// `**/name/**`
    Segment(String),
    /// `prefix/**`
    Prefix(String),
    /// `**/name`
    Suffix(String),
    Regex(Regex),
}

/// A compiled glob pattern over `/`-separated relative paths.
#[derive(Debug, Clone)]
pub struct LayerPattern {
    matcher: Matcher,
    specificity: usize,
}

impl LayerPattern {
    /// Compiles a glob.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex translation does not compile.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let specificity = pattern.chars().filter(|c| *c != '*' && *c != '?').count();
        let matcher = match fast_path(pattern) {
            Some(matcher) => matcher,
            None => Matcher::Regex(Regex::new(&glob_to_regex(pattern))?),
        };
        Ok(Self {
            matcher,
            specificity,
        })
    }

    /// Pattern length without wildcard characters.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.specificity
    }

    /// Whether `path` matches.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path = path.strip_prefix("./").unwrap_or(path);
        match &self.matcher {
            Matcher::Segment(name) => {
                path.starts_with(&format!("{name}/")) || path.contains(&format!("/{name}/"))
            }
            Matcher::Prefix(prefix) => path == prefix || path.starts_with(&format!("{prefix}/")),
            Matcher::Suffix(name) => path == name || path.ends_with(&format!("/{name}")),
            Matcher::Regex(re) => re.is_match(path),
        }
    }
}

fn is_literal(part: &str) -> bool {
    !part.is_empty() && !part.contains(['*', '?', '[', ']', '{', '}'])
}

fn fast_path(pattern: &str) -> Option<Matcher> {
    if let Some(inner) = pattern
        .strip_prefix("**/")
        .and_then(|p| p.strip_suffix("/**"))
    {
        return is_literal(inner).then(|| Matcher::Segment(inner.to_string()));
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return is_literal(prefix).then(|| Matcher::Prefix(prefix.to_string()));
    }
    if let Some(name) = pattern.strip_prefix("**/") {
        return is_literal(name).then(|| Matcher::Suffix(name.to_string()));
    }
    None
}

/// Translates a glob into an anchored regex.
///
/// `**/` matches any number of directories (including none), `**` anything,
/// `*` anything within one segment, and `?` one non-slash character.
#[must_use]
pub fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::from("^");
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**/") {
            re.push_str("(?:.*/)?");
            rest = after;
        } else if let Some(after) = rest.strip_prefix("**") {
            re.push_str(".*");
            rest = after;
        } else {
            match c {
                '*' => re.push_str("[^/]*"),
                '?' => re.push_str("[^/]"),
                other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    re.push('$');
    re
}

struct LayerEntry {
    name: String,
    pattern: LayerPattern,
    precedence: i32,
}

/// Assigns each module path to at most one layer.
///
/// Among matching layers the highest precedence wins, then the most
/// specific pattern, then the earliest declared.
pub struct LayerAssigner {
    entries: Vec<LayerEntry>,
}

impl LayerAssigner {
    /// Compiles every layer pattern.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first layer whose pattern does not compile.
    pub fn new(layers: &[LayerDefinition]) -> Result<Self, LayerPatternError> {
        let entries = layers
            .iter()
            .map(|layer| {
                let pattern =
                    LayerPattern::new(&layer.pattern).map_err(|source| LayerPatternError {
                        layer: layer.name.clone(),
                        pattern: layer.pattern.clone(),
                        source,
                    })?;
                Ok(LayerEntry {
                    name: layer.name.clone(),
                    pattern,
                    precedence: layer.effective_precedence(),
                })
            })
            .collect::<Result<Vec<_>, LayerPatternError>>()?;
        Ok(Self { entries })
    }

    /// Which layer does this path belong to?
    #[must_use]
    pub fn assign(&self, path: &str) -> Option<&str> {
        let mut best: Option<&LayerEntry> = None;
        for entry in self.entries.iter().filter(|e| e.pattern.matches(path)) {
            let better = best.map_or(true, |b| {
                (entry.precedence, entry.pattern.specificity())
                    > (b.precedence, b.pattern.specificity())
            });
            if better {
                best = Some(entry);
            }
        }
        best.map(|e| e.name.as_str())
    }
}
