/// Byte index of the `col`-th character of `s`.
///
/// Columns past the end of the string map to `s.len()`, so callers can
/// splice at a clamped cursor column without checking bounds first.
pub fn byte_index_for_char(s: &str, col: usize) -> usize {
    s.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_index_ascii() {
        let s = "hello";
        assert_eq!(byte_index_for_char(s, 0), 0);
        assert_eq!(byte_index_for_char(s, 3), 3);
        assert_eq!(byte_index_for_char(s, 5), 5);
        assert_eq!(byte_index_for_char(s, 99), 5);
    }

    #[test]
    fn test_byte_index_multibyte() {
        let s = "aöb";
        assert_eq!(byte_index_for_char(s, 0), 0);
        assert_eq!(byte_index_for_char(s, 1), 1);
        assert_eq!(byte_index_for_char(s, 2), 3);
        assert_eq!(byte_index_for_char(s, 3), 4);
    }

    #[test]
    fn test_byte_index_emoji() {
        let s = "👋🌍";
        assert_eq!(byte_index_for_char(s, 1), 4);
        assert_eq!(byte_index_for_char(s, 2), 8);
    }

    #[test]
    fn test_char_len() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("hello"), 5);
        assert_eq!(char_len("öðólæþ"), 6);
    }
}
