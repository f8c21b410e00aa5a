//! Shell-style wildcard matching for account and domain searches.

use regex::Regex;

fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Compile a `*`/`?` wildcard pattern into an anchored, case-insensitive regex.
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source).ok()
}

/// A search pattern: a wildcard expression when it contains `*` or `?`,
/// otherwise a case-insensitive substring.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Substring(String),
    Wildcard(Regex),
}

impl NamePattern {
    pub fn new(pattern: &str) -> Self {
        let trimmed = pattern.trim();
        if has_wildcards(trimmed)
            && let Some(regex) = glob_to_regex(trimmed)
        {
            return Self::Wildcard(regex);
        }
        Self::Substring(trimmed.to_lowercase())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Substring(needle) => text.to_lowercase().contains(needle),
            Self::Wildcard(regex) => regex.is_match(text),
        }
    }
}
