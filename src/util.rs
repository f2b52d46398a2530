//! Small shared helpers.

/// Truncate a string to at most `max_chars` characters, appending an
/// ellipsis when anything was cut.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars).collect();
    format!("{kept}...")
}
