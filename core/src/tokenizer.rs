use crate::index::Position;

/// Keep only ASCII letters from a raw token and lowercase them.
/// Digits, punctuation and any non-ASCII character are dropped, not replaced.
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split on whitespace and normalize each piece; pieces that normalize to
/// nothing are omitted.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Tokenize text into (term, position), numbering positions from `start`.
/// Ingestion calls this once per line so offsets keep counting across lines.
pub fn tokenize_with_offset(text: &str, start: Position) -> Vec<(String, Position)> {
    tokenize(text)
        .into_iter()
        .zip(start..)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_non_letters() {
        assert_eq!(normalize("Hello,"), "hello");
        assert_eq!(normalize("it's"), "its");
        assert_eq!(normalize("R2-D2"), "rd");
        assert_eq!(normalize("café"), "caf");
        assert_eq!(normalize("1234"), "");
    }

    #[test]
    fn tokenize_drops_empty_tokens() {
        let t = tokenize("  The 42 quick\tbrown -- FOX!\n");
        assert_eq!(t, vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn offsets_continue_from_start() {
        let t = tokenize_with_offset("on the 99 mat", 4);
        let positions: Vec<Position> = t.iter().map(|(_, p)| *p).collect();
        assert_eq!(positions, vec![4, 5, 6]);
        assert_eq!(t[2].0, "mat");
    }
}
