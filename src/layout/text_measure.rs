//! Text measurement in terminal cells.
//!
//! Widths come from `unicode-width` (East Asian Width tables), so CJK and most
//! emoji count as two cells and combining marks as zero.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cell width of a single char. Control characters are zero.
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Cell width of a string, saturating at `u16::MAX`.
pub fn string_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

/// Word-wrap `text` to `width` cells.
///
/// Breaks at spaces; a word wider than the line is split by character.
/// Explicit newlines are kept. Empty input yields no lines.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0u16;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = string_width(word);
            let gap = u16::from(!line.is_empty());

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
            } else {
                for c in word.chars() {
                    let w = char_width(c);
                    if line_width + w > width && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += w;
                }
            }
        }
        lines.push(line);
    }
    lines
}

/// Number of lines `text` occupies when wrapped to `width`.
pub fn measure_text_height(text: &str, width: u16) -> u16 {
    u16::try_from(wrap_text(text, width).len()).unwrap_or(u16::MAX)
}

/// Cut `text` to at most `width` cells, ending in `…` when something was cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if string_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut out = String::new();
    let mut used = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width(""), 0);
        assert_eq!(char_width('●'), 1);
        assert_eq!(char_width('\u{7}'), 0);
    }

    #[test]
    fn test_wrap_at_spaces() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn test_wrap_degenerate() {
        assert!(wrap_text("", 10).is_empty());
        assert_eq!(wrap_text("abc", 0), vec!["abc"]);
        assert_eq!(measure_text_height("one two three", 7), 2);
    }

    #[test]
    fn test_wide_chars_wrap_by_cells() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("attribution", 6), "attri…");
        assert_eq!(truncate_text("attribution", 1), "…");
        assert_eq!(truncate_text("attribution", 0), "");
    }
}
