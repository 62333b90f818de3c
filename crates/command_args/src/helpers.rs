//! Cursor helpers shared by the argument kinds and the branch matcher.
//!
//! Every position handled here is a byte offset that sits on a `char`
//! boundary of the input.

/// Advances `pos` past any whitespace, never beyond `end`.
pub fn skip_whitespace(input: &str, pos: usize, end: usize) -> usize {
    input[pos..end]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(end, |(offset, _)| pos + offset)
}

/// Returns the end of the word starting at `begin` (the next whitespace or `end`).
pub fn word_end(input: &str, begin: usize, end: usize) -> usize {
    input[begin..end]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map_or(end, |(offset, _)| begin + offset)
}

/// Moves `end` back over trailing whitespace, never before `begin`.
pub fn trim_end(input: &str, begin: usize, end: usize) -> usize {
    begin + input[begin..end].trim_end().len()
}

/// Brings a caller-supplied span inside `input`.
///
/// `end` is capped at the input length, `begin` at `end`, and both are moved
/// back to the closest `char` boundary, so `input[begin..end]` never panics.
pub fn clamp_span(input: &str, begin: usize, end: usize) -> (usize, usize) {
    let mut end = end.min(input.len());
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let mut begin = begin.min(end);
    while !input.is_char_boundary(begin) {
        begin -= 1;
    }
    (begin, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace("   abc", 0, 6), 3);
        assert_eq!(skip_whitespace("abc", 0, 3), 0);
        assert_eq!(skip_whitespace("    ", 1, 4), 4);
    }

    #[test]
    fn test_word_end() {
        assert_eq!(word_end("take sword", 0, 10), 4);
        assert_eq!(word_end("take sword", 5, 10), 10);
        assert_eq!(word_end("épée longue", 0, 12), 6);
    }

    #[test]
    fn test_trim_end() {
        assert_eq!(trim_end("hello   ", 0, 8), 5);
        assert_eq!(trim_end("   ", 0, 3), 0);
    }

    #[test]
    fn test_clamp_span() {
        assert_eq!(clamp_span("look", 0, 4), (0, 4));
        assert_eq!(clamp_span("look", 2, 40), (2, 4));
        assert_eq!(clamp_span("look", 3, 1), (1, 1));
        // 'é' covers bytes 1..3
        assert_eq!(clamp_span("réel", 2, 4), (1, 4));
        assert_eq!(clamp_span("réel", 0, 2), (0, 1));
    }
}
