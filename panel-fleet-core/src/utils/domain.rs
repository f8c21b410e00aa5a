//! Domain name normalization.

/// Canonical form of a domain name: trimmed, lowercased, trailing dot removed.
///
/// Returns `None` when nothing remains.
pub fn normalize_domain(name: &str) -> Option<String> {
    let trimmed = name.trim().trim_end_matches('.').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Compare two names after normalization.
pub fn same_domain(a: &str, b: &str) -> bool {
    match (normalize_domain(a), normalize_domain(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
