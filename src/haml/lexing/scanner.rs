//! Brace and backtick aware scanning
//!
//! Attribute blocks may contain values that carry their own braces, either as `{{ expr }}`
//! insertions or as backtick-quoted template strings. Every place that scans an attribute block
//! (finding the closing `}`, splitting pairs on `,`, finding a pair's `:`/`=`) must agree on
//! what "top level" means, so they all drive the same [`ScanState`].
//!
//! Rules:
//! - A backtick toggles the quoted state.
//! - Outside a backtick span `{` increments and `}` decrements the depth.
//! - Inside a backtick span braces are ignored.
//! - A character is at top level when the depth is zero and no backtick span is open.

/// Running brace depth and backtick state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    depth: i32,
    in_backticks: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character.
    pub fn advance(&mut self, c: char) {
        match c {
            '`' => self.in_backticks = !self.in_backticks,
            '{' if !self.in_backticks => self.depth += 1,
            '}' if !self.in_backticks => self.depth -= 1,
            _ => {}
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn in_backticks(&self) -> bool {
        self.in_backticks
    }

    pub fn at_top_level(&self) -> bool {
        self.depth == 0 && !self.in_backticks
    }
}

/// Find the byte offset of the `}` closing the block opened by the first character of `source`.
///
/// Returns `None` when `source` does not start with `{` or the block is never closed.
pub fn find_block_end(source: &str) -> Option<usize> {
    if !source.starts_with('{') {
        return None;
    }
    let mut state = ScanState::new();
    for (idx, c) in source.char_indices() {
        state.advance(c);
        if c == '}' && state.at_top_level() {
            return Some(idx);
        }
    }
    None
}

/// Split `source` on every top-level occurrence of `separator`.
///
/// Pieces are trimmed; a trailing empty piece is dropped.
pub fn split_top_level(source: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut state = ScanState::new();
    let mut start = 0;
    for (idx, c) in source.char_indices() {
        state.advance(c);
        if c == separator && state.at_top_level() {
            pieces.push(source[start..idx].trim());
            start = idx + c.len_utf8();
        }
    }
    let last = source[start..].trim();
    if !last.is_empty() {
        pieces.push(last);
    }
    pieces
}

/// Byte offset of the first top-level character matching `predicate`.
pub fn find_top_level(source: &str, predicate: impl Fn(char) -> bool) -> Option<usize> {
    let mut state = ScanState::new();
    for (idx, c) in source.char_indices() {
        state.advance(c);
        if predicate(c) && state.at_top_level() {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_end_with_nested_braces() {
        let source = r#"{ class: "foo-{{ el }}" } text"#;
        assert_eq!(find_block_end(source), Some(24));
        assert_eq!(&source[..=24], r#"{ class: "foo-{{ el }}" }"#);
    }

    #[test]
    fn test_block_end_ignores_braces_in_backticks() {
        let source = "{ title: `}{` } rest";
        let end = find_block_end(source).unwrap();
        assert_eq!(&source[end + 1..], " rest");
    }

    #[test]
    fn test_unclosed_block() {
        assert_eq!(find_block_end("{ a: 1"), None);
        assert_eq!(find_block_end("a: 1 }"), None);
    }

    #[test]
    fn test_split_respects_depth_and_backticks() {
        let pieces = split_top_level("a: 1, b: {{ f(x, y) }}, c: `p, q`", ',');
        assert_eq!(pieces, vec!["a: 1", "b: {{ f(x, y) }}", "c: `p, q`"]);
    }

    #[test]
    fn test_split_drops_trailing_empty_piece() {
        assert_eq!(split_top_level("a: 1,", ','), vec!["a: 1"]);
        assert!(split_top_level("", ',').is_empty());
    }

    #[test]
    fn test_find_top_level_separator() {
        let pair = "href: {{ a ? 'x:y' : b }}";
        assert_eq!(find_top_level(pair, |c| c == ':' || c == '='), Some(4));
        let pair = "`a:b`=c";
        assert_eq!(find_top_level(pair, |c| c == ':' || c == '='), Some(5));
    }

    #[test]
    fn test_state_tracking() {
        let mut state = ScanState::new();
        for c in "{`{".chars() {
            state.advance(c);
        }
        assert_eq!(state.depth(), 1);
        assert!(state.in_backticks());
        assert!(!state.at_top_level());
    }
}
