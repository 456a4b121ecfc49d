//! Comment and literal blanking for the lexical parsers.
//!
//! The sanitized copy has the same number of lines and the same number of
//! characters per line as the input. Comment text and string/char literal
//! bodies become spaces; quote delimiters are kept. Regexes that run over the
//! result never see a keyword hidden in a comment or a string.

/// Lexical rules of one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalSyntax {
    /// Line comment marker.
    pub line_comment: &'static str,
    /// `/* */` block comments.
    pub block_comments: bool,
    /// Block comments nest (`/* /* */ */`).
    pub nested_block_comments: bool,
    /// `'...'` is a string or char literal.
    pub single_quote_strings: bool,
    /// `'''...'''` is a multi-line string.
    pub triple_single_quotes: bool,
    /// Backslashes inside `"""..."""` are literal.
    pub raw_triple_quotes: bool,
    /// `#"..."#` raw strings.
    pub hash_raw_strings: bool,
}

impl LexicalSyntax {
    /// Python: `#` comments, `'`/`"` strings, both triple-quote forms.
    pub const PYTHON: Self = Self {
        line_comment: "#",
        block_comments: false,
        nested_block_comments: false,
        single_quote_strings: true,
        triple_single_quotes: true,
        raw_triple_quotes: false,
        hash_raw_strings: false,
    };

    /// Kotlin: nested block comments, char literals, raw `"""` strings.
    pub const KOTLIN: Self = Self {
        line_comment: "//",
        block_comments: true,
        nested_block_comments: true,
        single_quote_strings: true,
        triple_single_quotes: false,
        raw_triple_quotes: true,
        hash_raw_strings: false,
    };

    /// Swift: nested block comments, `"""` strings, `#"..."#` raw strings.
    pub const SWIFT: Self = Self {
        line_comment: "//",
        block_comments: true,
        nested_block_comments: true,
        single_quote_strings: false,
        triple_single_quotes: false,
        raw_triple_quotes: false,
        hash_raw_strings: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Double,
    Single,
    TripleDouble,
    TripleSingle,
}

impl Quote {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Double => "\"",
            Self::Single => "'",
            Self::TripleDouble => "\"\"\"",
            Self::TripleSingle => "'''",
        }
    }

    fn spans_lines(self) -> bool {
        matches!(self, Self::TripleDouble | Self::TripleSingle)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenString {
    quote: Quote,
    raw: bool,
    hashes: usize,
}

/// Scanner state carried from one line to the next.
#[derive(Debug, Clone)]
pub struct SanitizerState {
    syntax: LexicalSyntax,
    block_depth: usize,
    string: Option<OpenString>,
    escape: bool,
}

impl SanitizerState {
    /// Fresh state at the start of a file.
    #[must_use]
    pub fn new(syntax: LexicalSyntax) -> Self {
        Self {
            syntax,
            block_depth: 0,
            string: None,
            escape: false,
        }
    }

    /// Whether the scanner is inside a block comment.
    #[must_use]
    pub fn in_block_comment(&self) -> bool {
        self.block_depth > 0
    }

    /// Whether the scanner is inside a multi-line string.
    #[must_use]
    pub fn in_string(&self) -> bool {
        self.string.is_some()
    }

    /// Sanitizes one line (without its terminator) and advances the state.
    pub fn sanitize_line(&mut self, line: &str) -> String {
        let chars: Vec<char> = line.chars().collect();
        let mut out = String::with_capacity(line.len());
        let mut i = 0;

        while i < chars.len() {
            let rest = &chars[i..];

            if self.block_depth > 0 {
                i += self.step_block_comment(rest, &mut out);
                continue;
            }

            if let Some(open) = self.string {
                i += self.step_string(open, rest, &mut out);
                continue;
            }

            if starts_with(rest, self.syntax.line_comment) {
                blank(&mut out, rest.len());
                break;
            }

            if self.syntax.block_comments && starts_with(rest, "/*") {
                self.block_depth = 1;
                out.push_str("  ");
                i += 2;
                continue;
            }

            if let Some(consumed) = self.open_string(rest, &mut out) {
                i += consumed;
                continue;
            }

            out.push(rest[0]);
            i += 1;
        }

        // Single-line literals cannot continue onto the next line.
        if self.string.is_some_and(|s| !s.quote.spans_lines()) {
            self.string = None;
        }
        self.escape = false;

        out
    }

    fn step_block_comment(&mut self, rest: &[char], out: &mut String) -> usize {
        if self.syntax.nested_block_comments && starts_with(rest, "/*") {
            self.block_depth += 1;
            out.push_str("  ");
            return 2;
        }
        if starts_with(rest, "*/") {
            self.block_depth -= 1;
            out.push_str("  ");
            return 2;
        }
        out.push(' ');
        1
    }

    fn step_string(&mut self, open: OpenString, rest: &[char], out: &mut String) -> usize {
        if self.escape {
            self.escape = false;
            out.push(' ');
            return 1;
        }
        if !open.raw && rest[0] == '\\' {
            self.escape = true;
            out.push(' ');
            return 1;
        }

        let delimiter = open.quote.delimiter();
        if starts_with(rest, delimiter) {
            let after = &rest[delimiter.len()..];
            let hashes = after.iter().take_while(|c| **c == '#').count();
            if hashes >= open.hashes {
                out.push_str(delimiter);
                blank(out, open.hashes);
                self.string = None;
                return delimiter.len() + open.hashes;
            }
        }

        out.push(' ');
        1
    }

    fn open_string(&mut self, rest: &[char], out: &mut String) -> Option<usize> {
        let mut hashes = 0;
        if self.syntax.hash_raw_strings {
            hashes = rest.iter().take_while(|c| **c == '#').count();
            if hashes > 0 && rest.get(hashes) != Some(&'"') {
                return None;
            }
        }
        let body = &rest[hashes..];

        let quote = if starts_with(body, "\"\"\"") {
            Quote::TripleDouble
        } else if self.syntax.triple_single_quotes && starts_with(body, "'''") {
            Quote::TripleSingle
        } else if body.first() == Some(&'"') {
            Quote::Double
        } else if self.syntax.single_quote_strings && body.first() == Some(&'\'') {
            Quote::Single
        } else {
            return None;
        };

        let raw = hashes > 0 || (self.syntax.raw_triple_quotes && quote == Quote::TripleDouble);
        self.string = Some(OpenString { quote, raw, hashes });

        blank(out, hashes);
        out.push_str(quote.delimiter());
        Some(hashes + quote.delimiter().len())
    }
}

/// Sanitizes a whole file, returning one entry per source line.
#[must_use]
pub fn sanitize(source: &str, syntax: LexicalSyntax) -> Vec<String> {
    let mut state = SanitizerState::new(syntax);
    source
        .lines()
        .map(|line| state.sanitize_line(line))
        .collect()
}

/// Brace depth at the start of every line of a sanitized file.
#[must_use]
pub fn brace_depths(lines: &[String]) -> Vec<usize> {
    let mut depth = 0usize;
    lines
        .iter()
        .map(|line| {
            let start = depth;
            for c in line.chars() {
                match c {
                    '{' => depth += 1,
                    '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            start
        })
        .collect()
}

fn starts_with(chars: &[char], prefix: &str) -> bool {
    let mut it = chars.iter();
    prefix.chars().all(|p| it.next() == Some(&p))
}

fn blank(out: &mut String, count: usize) {
    out.extend(std::iter::repeat(' ').take(count));
}
