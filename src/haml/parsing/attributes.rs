//! Attribute scanning
//!
//! An element head (`%tag.a#b` or `.a#b`) may be followed by, in order:
//!
//! ```text
//! %a.btn{ href: "/items/{{ id }}", title: `x{y}` } target="_blank" data-n={{ n }} Inline text
//!        └──────────── curly block ─────────────┘ └──── simple attributes ─────┘ └ content ┘
//! ```
//!
//! The curly block is scanned with the shared [`ScanState`](crate::haml::lexing::ScanState):
//! braces nest, backtick spans suspend brace counting, and both the pair split (`,`) and the
//! key/value split (`:` or `=`) only happen at top level. Simple attributes are not nested and are
//! matched one at a time until the first token that is not an attribute; whatever remains is
//! inline content.
//!
//! Attributes are unified in a fixed order (shorthand, curly block, simple attributes). A later
//! definition replaces an earlier one in place, except that `class` values are combined with the
//! shorthand class list instead of replacing it.

use super::ParseOptions;
use crate::haml::ast::{AttrValue, Attributes, Node};
use crate::haml::expr::quote;
use crate::haml::lexing::segmentation::{as_single_insertion, segment, segments_to_nodes};
use crate::haml::lexing::{find_block_end, find_top_level, split_top_level, ElementHead, Segment};
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\w[\w-]*)=(?:"([^"]*)"|'([^']*)')"#).expect("quoted attribute pattern is valid")
});

static EXPRESSION_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w[\w-]*)=\{\{(.+?)\}\}").expect("expression attribute pattern is valid")
});

/// An element built from its head line, plus the shorthand class list that later `class`
/// definitions (including continuation lines) combine with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedElement {
    pub node: Node,
    pub shorthand_class: Option<String>,
}

/// Build an element node from a classified head line.
pub fn scan_element(head: ElementHead, options: &ParseOptions) -> ScannedElement {
    let tag = head.tag.unwrap_or_else(|| options.default_tag.clone());
    let shorthand_class = (!head.classes.is_empty()).then(|| head.classes.join(" "));

    let mut attributes = Attributes::new();
    if let Some(class) = &shorthand_class {
        attributes.insert("class".to_string(), AttrValue::literal(class.clone()));
    }
    if let Some(id) = head.id {
        attributes.insert("id".to_string(), AttrValue::literal(id));
    }

    let rest = head.rest.as_str();
    let after_block = match scan_curly_block(rest) {
        Some((pairs, after)) => {
            for (key, value) in pairs {
                merge_attribute(&mut attributes, shorthand_class.as_deref(), key, value);
            }
            after
        }
        None => rest,
    };

    let (simple, content) = scan_simple_attributes(after_block);
    for (key, value) in simple {
        merge_attribute(&mut attributes, shorthand_class.as_deref(), key, value);
    }

    let children = content.map(inline_content).unwrap_or_default();
    ScannedElement {
        node: Node::element(tag, attributes, children),
        shorthand_class,
    }
}

/// Insert one attribute, applying the `class` combination rule.
///
/// When the element has shorthand classes, a `class` value is appended to them: two literals
/// join with a space, a literal and an expression become one expression that appends
/// `" " + value` only when the value is truthy.
pub fn merge_attribute(
    attributes: &mut Attributes,
    shorthand_class: Option<&str>,
    key: String,
    value: AttrValue,
) {
    let value = match (key.as_str(), shorthand_class) {
        ("class", Some(prefix)) => combine_class(prefix, value),
        _ => value,
    };
    attributes.insert(key, value);
}

fn combine_class(prefix: &str, value: AttrValue) -> AttrValue {
    match value {
        AttrValue::Literal(extra) => AttrValue::Literal(format!("{} {}", prefix, extra)),
        AttrValue::Expr { value, raw } => AttrValue::Expr {
            value: format!(
                "{} + (({value}) ? \" \" + ({value}) : \"\")",
                quote(prefix),
                value = value
            ),
            raw,
        },
    }
}

/// Scan a leading `{ … }` block. Returns the parsed pairs and the text after the closing brace,
/// or `None` when there is no block or it is never closed.
fn scan_curly_block(rest: &str) -> Option<(Vec<(String, AttrValue)>, &str)> {
    let trimmed = rest.trim_start();
    let end = find_block_end(trimmed)?;
    let body = &trimmed[1..end];
    let pairs = split_top_level(body, ',')
        .into_iter()
        .filter_map(scan_pair)
        .collect();
    Some((pairs, &trimmed[end + 1..]))
}

/// Split one `key: value` / `key = value` pair. Pairs without a separator are dropped.
fn scan_pair(pair: &str) -> Option<(String, AttrValue)> {
    let Some(separator) = find_top_level(pair, |c| c == ':' || c == '=') else {
        tracing::trace!(pair, "attribute pair without separator dropped");
        return None;
    };
    let key = strip_quotes(pair[..separator].trim());
    let value = strip_quotes(pair[separator + 1..].trim());
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), classify_value(value)))
}

/// Remove one layer of matching `"` or `'` quotes.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A curly-block value: one whole insertion is an expression, text mixed with insertions becomes
/// a concatenation expression, anything else is literal.
fn classify_value(value: &str) -> AttrValue {
    if let Some(expression) = as_single_insertion(value) {
        return AttrValue::expr(expression);
    }
    let segments = segment(value);
    if segments.iter().any(|s| matches!(s, Segment::Expr(_))) {
        return AttrValue::Expr {
            value: concatenation(&segments),
            raw: false,
        };
    }
    AttrValue::literal(value)
}

/// `"foo-{{ el }}"` → `"foo-" + (el)`. An expression in first position is preceded by `""` so
/// the whole chain is string concatenation.
fn concatenation(segments: &[Segment]) -> String {
    let mut pieces = Vec::with_capacity(segments.len() + 1);
    if matches!(segments.first(), Some(Segment::Expr(_))) {
        pieces.push(quote(""));
    }
    for segment in segments {
        pieces.push(match segment {
            Segment::Literal(text) => quote(text),
            Segment::Expr(expression) => format!("({})", expression),
        });
    }
    pieces.join(" + ")
}

/// Parse `key="v"`, `key='v'` and `key={{ expr }}` pairs left to right. Returns the pairs and
/// the remaining inline content, if any.
fn scan_simple_attributes(text: &str) -> (Vec<(String, AttrValue)>, Option<&str>) {
    let mut pairs = Vec::new();
    let mut rest = text.trim_start();
    loop {
        if let Some(captures) = QUOTED_ATTRIBUTE.captures(rest) {
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map_or("", |m| m.as_str());
            pairs.push((captures[1].to_string(), AttrValue::literal(value)));
            rest = rest[captures[0].len()..].trim_start();
        } else if let Some(captures) = EXPRESSION_ATTRIBUTE.captures(rest) {
            pairs.push((captures[1].to_string(), AttrValue::expr(captures[2].trim())));
            rest = rest[captures[0].len()..].trim_start();
        } else {
            break;
        }
    }
    let content = rest.trim();
    (pairs, (!content.is_empty()).then_some(content))
}

/// Parse one multi-line attribute continuation (`name="v"`, `name='v'`, `name={{ e }}`).
pub fn scan_continuation(line: &str) -> Option<(String, AttrValue)> {
    let (pairs, content) = scan_simple_attributes(line);
    match (pairs.as_slice(), content) {
        ([(key, value)], None) => Some((key.clone(), value.clone())),
        _ => None,
    }
}

/// Children produced by the content after an element's attributes.
fn inline_content(content: &str) -> Vec<Node> {
    match content.strip_prefix('=') {
        Some(expression) if expression.trim().is_empty() => Vec::new(),
        Some(expression) => vec![Node::expression(expression)],
        None => segments_to_nodes(segment(content)),
    }
}
