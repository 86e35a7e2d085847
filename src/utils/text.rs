//! Text processing utilities.

/// Truncate `text` to at most `max_length` characters including `suffix`.
///
/// Text that already fits is returned unchanged. When `max_length` is shorter
/// than the suffix, only the suffix is returned.
pub fn truncate_text(text: &str, max_length: usize, suffix: &str) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let keep = max_length.saturating_sub(suffix.chars().count());
    let mut result: String = text.chars().take(keep).collect();
    result.push_str(suffix);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_fits() {
        assert_eq!(truncate_text("Hello World", 20, "..."), "Hello World");
        assert_eq!(truncate_text("Short text", 20, " [more]"), "Short text");
        assert_eq!(truncate_text("", 5, "..."), "");
    }

    #[test]
    fn test_truncate_text_cuts() {
        assert_eq!(truncate_text("Hello World", 8, "..."), "Hello...");
        assert_eq!(truncate_text("Hello World", 9, " [more]"), "He [more]");
    }

    #[test]
    fn test_truncate_text_suffix_only() {
        assert_eq!(truncate_text("Hello World", 3, "..."), "...");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(truncate_text("Grüße aus Köln", 8, "..."), "Grüße...");
    }
}
