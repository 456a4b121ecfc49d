//! Helpers for dotted and slash-separated import names.
//!
//! Import names across ecosystems use either `.` (`com.example.Foo`,
//! `app.services`) or `/` (`@scope/pkg/sub`) as separators. These helpers
//! treat both uniformly.

/// Splits an import name into its segments.
///
/// ```ignore
/// assert_eq!(segments("androidx.room.Dao"), vec!["androidx", "room", "Dao"]);
/// assert_eq!(segments("@prisma/client"), vec!["@prisma", "client"]);
/// ```
#[must_use]
pub fn segments(name: &str) -> Vec<&str> {
    name.split(['.', '/']).filter(|s| !s.is_empty()).collect()
}

/// Returns the first segment of a name.
#[must_use]
pub fn root_segment(name: &str) -> &str {
    name.split(['.', '/'])
        .find(|s| !s.is_empty())
        .unwrap_or(name)
}

/// Returns the first `n` dot-separated segments joined back with dots.
///
/// Returns `None` when the name has fewer than `n` segments.
#[must_use]
pub fn leading_segments(name: &str, n: usize) -> Option<String> {
    let parts: Vec<&str> = name.split('.').collect();
    if n == 0 || parts.len() < n {
        return None;
    }
    Some(parts[..n].join("."))
}

/// Extracts the last segment from a dotted name.
#[must_use]
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Checks if a name matches a pattern.
///
/// Supports wildcards:
/// - `*` matches any single segment
/// - `**` matches any number of segments
///
/// # Examples
///
/// ```ignore
/// assert!(name_matches("androidx.room.Dao", "androidx.room.*"));
/// assert!(name_matches("androidx.room.migration.Migration", "androidx.room.**"));
/// assert!(!name_matches("androidx.compose.ui.Modifier", "androidx.room.**"));
/// ```
#[must_use]
pub fn name_matches(name: &str, pattern: &str) -> bool {
    let name_parts = segments(name);
    let pattern_parts = segments(pattern);

    match_parts(&name_parts, &pattern_parts)
}

fn match_parts(name: &[&str], pattern: &[&str]) -> bool {
    let Some((first_pattern, rest_pattern)) = pattern.split_first() else {
        return name.is_empty();
    };

    match *first_pattern {
        "**" => (0..=name.len()).any(|i| match_parts(&name[i..], rest_pattern)),
        "*" => !name.is_empty() && match_parts(&name[1..], rest_pattern),
        literal => name.first() == Some(&literal) && match_parts(&name[1..], rest_pattern),
    }
}
