//! Embedded expression segmentation
//!
//! Text may carry `{{ expr }}` insertions. Matching is non-greedy: each insertion ends at the
//! first `}}` that follows at least one character, so single braces inside an insertion are
//! fine (`{{ {a: 1}.a }}`).

use super::scanner::find_block_end;
use crate::haml::ast::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static INSERTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(.+?)\s*\}\}").expect("insertion pattern is valid"));

/// A piece of segmented text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expr(String),
}

/// Split `text` into literal and expression segments, in source order.
///
/// Text without insertions yields a single literal segment (or nothing for empty text).
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for captures in INSERTION.captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(text[last..whole.start()].to_string()));
        }
        segments.push(Segment::Expr(inner.as_str().trim().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        segments.push(Segment::Literal(text[last..].to_string()));
    }
    segments
}

/// Whether the whole of `text` is one `{{ expr }}` insertion, returning the expression.
///
/// The opening `{{` must be closed by the final `}}`, with braces balanced in between, so the
/// expression itself may contain `}}` (`{{ {a: {b: 1}}.a.b }}`).
pub fn as_single_insertion(text: &str) -> Option<String> {
    let text = text.trim();
    if !text.starts_with("{{") || find_block_end(text) != Some(text.len() - 1) {
        return None;
    }
    let inner = text[2..text.len() - 2].trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Convert segments into `Text`/`Expression` nodes.
pub fn segments_to_nodes(segments: Vec<Segment>) -> Vec<Node> {
    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => Node::text(text),
            Segment::Expr(expr) => Node::expression(expr),
        })
        .collect()
}

/// Segment a text line into a node: a plain `Text` when there are no insertions,
/// otherwise a `Fragment` of the pieces.
pub fn text_line_node(text: &str) -> Node {
    line_node(segment(text))
}

/// The node for an already segmented text line.
pub fn line_node(segments: Vec<Segment>) -> Node {
    match segments.as_slice() {
        [] => Node::text(""),
        [Segment::Literal(value)] => Node::text(value.clone()),
        _ => Node::Fragment {
            children: segments_to_nodes(segments),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(
            segment("Hello world"),
            vec![Segment::Literal("Hello world".to_string())]
        );
        assert_eq!(text_line_node("Hello world"), Node::text("Hello world"));
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(
            segment("Hi {{ name }}, you have {{count}} items"),
            vec![
                Segment::Literal("Hi ".to_string()),
                Segment::Expr("name".to_string()),
                Segment::Literal(", you have ".to_string()),
                Segment::Expr("count".to_string()),
                Segment::Literal(" items".to_string()),
            ]
        );
    }

    #[test]
    fn test_insertion_is_non_greedy() {
        assert_eq!(
            segment("{{ a }}{{ b }}"),
            vec![
                Segment::Expr("a".to_string()),
                Segment::Expr("b".to_string())
            ]
        );
    }

    #[test]
    fn test_single_braces_inside_insertion() {
        assert_eq!(
            segment("{{ {a: 1}.a }}"),
            vec![Segment::Expr("{a: 1}.a".to_string())]
        );
    }

    #[test]
    fn test_single_insertion_detection() {
        assert_eq!(as_single_insertion("{{ x }}"), Some("x".to_string()));
        assert_eq!(as_single_insertion("{{ x }} y"), None);
        assert_eq!(as_single_insertion("{{ a }} and {{ b }}"), None);
        assert_eq!(as_single_insertion("plain"), None);
        assert_eq!(as_single_insertion("{{ a }}{{ b }}"), None);
        assert_eq!(as_single_insertion("{{ x }"), None);
        assert_eq!(as_single_insertion("{{}}"), None);
    }

    #[test]
    fn test_single_insertion_with_closing_braces_inside() {
        assert_eq!(
            as_single_insertion("{{ {a: {b: 1}}.a.b }}"),
            Some("{a: {b: 1}}.a.b".to_string())
        );
        assert_eq!(
            as_single_insertion("{{ `}}` + x }}"),
            Some("`}}` + x".to_string())
        );
    }

    #[test]
    fn test_fragment_node() {
        assert_eq!(
            text_line_node("Count: {{ n }}"),
            Node::Fragment {
                children: vec![Node::text("Count: "), Node::expression("n")]
            }
        );
    }
}
