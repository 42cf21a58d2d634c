use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TableError};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid identifier regex"));
static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]+").expect("valid word regex"));
static MULTI_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").expect("valid underscore regex"));
static LEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[_0-9]+").expect("valid leading regex"));

// Rust keywords, so generated names can be used as struct field names.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// A valid column name starts with an ASCII letter, continues with ASCII
/// letters, digits and underscores, and does not end with an underscore.
pub fn is_valid_column_name(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !name.ends_with('_')
}

/// Derive a column name from heading text.
///
/// Lowercases, turns whitespace runs into `_`, drops other characters,
/// then trims leading digits/underscores and trailing underscores.
/// Keywords get a `_v` suffix.
pub fn column_name_from_heading(heading: &str) -> Result<String> {
    let lower = heading.to_lowercase();
    let spaced = SPACE.replace_all(&lower, "_");
    let word = NON_WORD.replace_all(&spaced, "");
    let single = MULTI_UNDER.replace_all(&word, "_");
    let lead = LEADING.replace(&single, "");
    let ident = lead.trim_end_matches('_').to_string();

    if !is_valid_column_name(&ident) {
        return Err(TableError::schema(format!(
            "cannot convert {:?} to a valid column name",
            heading
        )));
    }
    if KEYWORDS.contains(&ident.as_str()) {
        return Ok(format!("{}_v", ident));
    }
    Ok(ident)
}
