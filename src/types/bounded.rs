// src/types/bounded.rs
//! Character-bounded text helpers.
//!
//! All content bounds in this crate count Unicode scalar values, matching how
//! a reader would count characters. Byte lengths are never used for bounds
//! because truncating at a byte offset can split a multi-byte character.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Owned variant of [`truncate_chars`] that reuses the allocation.
pub fn truncate_owned(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_character_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_owned("日本語".to_string(), 10), "日本語");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("", 0), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(char_len("é"), 1);
        assert_eq!(char_len("abc"), 3);
    }
}
