//! Whitespace and phone normalization.

/// Trim and collapse every whitespace run to a single space.
pub fn normalize_input(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a phone number, or return `""` if it is not acceptable.
///
/// Accepts digits, whitespace, parentheses and hyphens with an optional
/// leading `+`. The result is the digits, prefixed with `+` when the input
/// started with one.
pub fn normalize_phone(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let body = value.strip_prefix('+').unwrap_or(value);
    let allowed = |c: char| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '-');
    if body.is_empty() || !body.chars().all(allowed) {
        return String::new();
    }

    let stripped: String = value
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '(' | ')' | '-')))
        .collect();
    if stripped.is_empty() {
        return String::new();
    }

    if stripped.matches('+').count() > 1 || stripped.rfind('+').is_some_and(|i| i > 0) {
        return String::new();
    }

    let digits = stripped.trim_start_matches('+');
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }

    if stripped.starts_with('+') {
        format!("+{digits}")
    } else {
        digits.to_string()
    }
}
