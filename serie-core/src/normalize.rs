use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::Symbol;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.\-]+").expect("static token pattern compiles"));

/// Extract candidate symbols from free-form text.
///
/// Separators are any run of characters outside `[\w.\-]` (whitespace, commas,
/// semicolons, newlines, ...). Tokens come back uppercased, in input order, with
/// duplicates preserved. Empty input yields an empty vector.
#[must_use]
pub fn normalize_symbols(raw: &str) -> Vec<Symbol> {
    let upper = raw.to_uppercase();
    TOKEN
        .find_iter(&upper)
        .map(|m| Symbol::from_normalized(m.as_str()))
        .collect()
}

/// Drop repeated symbols, keeping the first occurrence.
#[must_use]
pub fn dedup_symbols(symbols: Vec<Symbol>) -> Vec<Symbol> {
    let mut seen: HashSet<Symbol> = HashSet::with_capacity(symbols.len());
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
