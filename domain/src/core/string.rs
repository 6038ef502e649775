//! String utilities for the domain layer.

/// Flatten text to one line and cut it to `max_chars` characters.
///
/// Blank input becomes the placeholder `（暂无内容）`; cut text ends with `…`.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let normalized = content.replace('\r', " ").replace('\n', " ");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return "（暂无内容）".to_string();
    }
    if normalized.chars().count() <= max_chars {
        normalized.to_string()
    } else {
        let mut cut: String = normalized.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}
