//! Utility functions for block text

/// Characters ropey treats as line breaks (with the default `unicode_lines` feature)
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{0085}', '\u{2028}', '\u{2029}',
];

/// Clamp a byte column to the text length and floor it to a char boundary.
pub fn floor_char_boundary(text: &str, col: usize) -> usize {
    if col >= text.len() {
        return text.len();
    }

    let mut col = col;
    while !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}

/// Strip exactly one trailing line ending (`\r\n` counts as one).
pub fn trim_line_ending(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped;
    }
    match line.chars().next_back() {
        Some(ch) if LINE_BREAKS.contains(&ch) => &line[..line.len() - ch.len_utf8()],
        _ => line,
    }
}

/// Split text on the same breaks ropey uses (`\r\n` counts as one).
///
/// Always yields at least one piece; a trailing break yields an empty last piece.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !LINE_BREAKS.contains(&ch) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + ch.len_utf8();
        if ch == '\r' && matches!(chars.peek(), Some(&(_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    lines.push(&text[start..]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_char_boundary_ascii() {
        assert_eq!(floor_char_boundary("hello", 2), 2);
        assert_eq!(floor_char_boundary("hello", 99), 5);
        assert_eq!(floor_char_boundary("", 0), 0);
    }

    #[test]
    fn test_floor_char_boundary_multibyte() {
        // 'é' is two bytes (1..3)
        let text = "héllo";
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 3), 3);
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("abc\n"), "abc");
        assert_eq!(trim_line_ending("abc\r\n"), "abc");
        assert_eq!(trim_line_ending("abc\r"), "abc");
        assert_eq!(trim_line_ending("abc\u{2028}"), "abc");
        assert_eq!(trim_line_ending("abc"), "abc");
        assert_eq!(trim_line_ending("abc\n\n"), "abc\n");
    }

    #[test]
    fn test_split_lines_matches_line_break_set() {
        assert_eq!(split_lines("abc"), vec!["abc"]);
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{2028}b\u{0085}"), vec!["a", "b", ""]);
        assert_eq!(split_lines("\r\r\n"), vec!["", "", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }
}
