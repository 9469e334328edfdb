//! # Line Wrapping
//!
//! Splits free text into lines that fit the printer's column width.
//!
//! ## Rules
//!
//! 1. Any run of whitespace (spaces, tabs, newlines) separates words.
//! 2. Words longer than the width are cut to the width; the rest of the
//!    word is dropped, not carried over.
//! 3. Words are packed greedily, one space between them.
//! 4. Empty lines are never produced.
//!
//! Widths count characters, not bytes, so accented letters take one column
//! like they do on paper.
//!
//! ```text
//! wrap("abc def", 3)  →  ["abc", "def"]
//! wrap("abc def", 7)  →  ["abc def"]
//! wrap("abc def", 2)  →  ["ab", "de"]
//! ```

/// Wrap `text` into lines of at most `max_width` characters.
///
/// `max_width` must be at least 1.
///
/// ## Example
///
/// ```
/// use ludivina::render::text::wrap;
///
/// assert_eq!(wrap("hello   world", 32), vec!["hello world"]);
/// assert_eq!(wrap("abc\r\n\tdef", 32), vec!["abc def"]);
/// assert!(wrap("   ", 32).is_empty());
/// ```
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    debug_assert!(max_width >= 1, "wrap width must be at least 1");

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word = truncate(word, max_width);
        let word_len = word.chars().count();

        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Cut `word` to its first `max` characters.
fn truncate(word: &str, max: usize) -> &str {
    match word.char_indices().nth(max) {
        Some((byte_idx, _)) => &word[..byte_idx],
        None => word,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_word() {
        assert_eq!(wrap("abc", 32), vec!["abc"]);
    }

    #[test]
    fn test_spaces() {
        assert_eq!(wrap("abc def", 32), vec!["abc def"]);
        assert_eq!(wrap("abc  def", 32), vec!["abc def"]);
        assert_eq!(wrap("abc def ", 32), vec!["abc def"]);
        assert_eq!(wrap("  abc def", 32), vec!["abc def"]);
    }

    #[test]
    fn test_multiple_lines() {
        assert_eq!(wrap("abc def", 3), vec!["abc", "def"]);
        assert_eq!(wrap("abc def ", 3), vec!["abc", "def"]);
        assert_eq!(wrap("abc def", 4), vec!["abc", "def"]);
        assert_eq!(wrap("abc def", 5), vec!["abc", "def"]);
        assert_eq!(wrap("abc def", 6), vec!["abc", "def"]);
        assert_eq!(wrap("abc def", 7), vec!["abc def"]);
    }

    #[test]
    fn test_long_words_are_truncated() {
        assert_eq!(wrap("abc def", 2), vec!["ab", "de"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd"]);
    }

    #[test]
    fn test_line_breaks_collapse() {
        assert_eq!(wrap("abc\r\n\tdef", 32), vec!["abc def"]);
        assert_eq!(wrap("abc\n\n\ndef", 32), vec!["abc def"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(wrap("", 32).is_empty());
        assert!(wrap(" \t\n ", 32).is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(wrap("ñandú", 5), vec!["ñandú"]);
        assert_eq!(wrap("ñandú pingüino", 5), vec!["ñandú", "pingü"]);
    }

    #[test]
    fn test_width_one() {
        assert_eq!(wrap("a bc d", 1), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_greedy_packing() {
        assert_eq!(
            wrap("the quick brown fox jumps over the lazy dog", 10),
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn test_lines_bounded_and_non_empty() {
        let samples = [
            "",
            "a",
            "Hola abuela, ¿qué tal estás? Te mando un beso muy grande desde Madrid",
            "supercalifragilisticexpialidocious is a long word",
            "\t\tlots   of\n\nwhitespace  \r\n here ",
            "días de sol y de lluvia, días de frío",
        ];
        for text in samples {
            for width in 1..=40 {
                for line in wrap(text, width) {
                    assert!(!line.is_empty(), "empty line for {:?} at {}", text, width);
                    assert!(
                        line.chars().count() <= width,
                        "line {:?} exceeds width {}",
                        line,
                        width
                    );
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "same input gives the same lines every time";
        assert_eq!(wrap(text, 12), wrap(text, 12));
    }
}
