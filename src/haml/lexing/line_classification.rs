//! Line Classification
//!
//! Turns one trimmed source line into a [`Directive`]: a typed but still unparsed description of
//! what the line contributes. Element heads keep their attribute region as raw text; the tree
//! builder hands it to the attribute scanner.
//!
//! Classification follows this specific order (first match wins):
//! 1. Escaped dash (`\-`) -> literal text with the backslash stripped
//! 2. Statement marker (`- `) -> `if`, `else`, `else if`/`elsif`, `for`, or a bare statement
//! 3. Shorthand element (`.class`, `#id`) -> default container tag
//! 4. Element (`%tag`)
//! 5. Standalone expression (`= expr`)
//! 6. Default to text, segmented on `{{ expr }}` insertions

use super::segmentation::{segment, Segment};
use once_cell::sync::Lazy;
use regex::Regex;

static FOR_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^for\s+([A-Za-z_$][A-Za-z0-9_$]*)(?:\s*,\s*([A-Za-z_$][A-Za-z0-9_$]*))?\s+in\s+(.+)$")
        .expect("for pattern is valid")
});

static ELEMENT_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%([\w-]+)([.#][\w.#-]*)?").expect("element pattern is valid"));

static SHORTHAND_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[.#][\w.#-]*").expect("shorthand pattern is valid"));

static MODIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.#][\w-]+").expect("modifier pattern is valid"));

/// The head of an element line, before attribute scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHead {
    /// `None` for shorthand lines, which use the default container tag.
    pub tag: Option<String>,
    pub classes: Vec<String>,
    /// The last `#id` modifier wins.
    pub id: Option<String>,
    /// Everything after the tag and modifiers: attributes and inline content.
    pub rest: String,
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Text emitted as-is, with no insertion scanning (escaped dash lines).
    Literal(String),
    /// Plain text split on `{{ }}` insertions.
    Text(Vec<Segment>),
    Element(ElementHead),
    Expression(String),
    Statement(String),
    If(String),
    ElseIf(String),
    Else,
    For {
        variable: String,
        index_variable: Option<String>,
        expression: String,
    },
}

/// Classify a single line. Leading and trailing whitespace is ignored; blank lines yield `None`.
pub fn classify_line(line: &str) -> Option<Directive> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with("\\-") {
        return Some(Directive::Literal(line[1..].to_string()));
    }

    if let Some(code) = line.strip_prefix("- ") {
        return Some(classify_control(code.trim()));
    }

    if line.starts_with('.') || line.starts_with('#') {
        if let Some(head) = shorthand_head(line) {
            return Some(Directive::Element(head));
        }
    }

    if line.starts_with('%') {
        if let Some(head) = element_head(line) {
            return Some(Directive::Element(head));
        }
        // `%` without a usable tag name stays literal text
    }

    if let Some(expression) = line.strip_prefix("= ") {
        return Some(Directive::Expression(expression.trim().to_string()));
    }

    Some(Directive::Text(segment(line)))
}

/// Classify the code following a `- ` statement marker.
fn classify_control(code: &str) -> Directive {
    if let Some(condition) = code.strip_prefix("if ") {
        return Directive::If(condition.trim().to_string());
    }
    if code == "else" {
        return Directive::Else;
    }
    if let Some(condition) = code
        .strip_prefix("else if ")
        .or_else(|| code.strip_prefix("elsif "))
    {
        return Directive::ElseIf(condition.trim().to_string());
    }
    if code.starts_with("for ") {
        if let Some(captures) = FOR_HEAD.captures(code) {
            return Directive::For {
                variable: captures[1].to_string(),
                index_variable: captures.get(2).map(|m| m.as_str().to_string()),
                expression: captures[3].trim().to_string(),
            };
        }
    }
    Directive::Statement(code.to_string())
}

fn element_head(line: &str) -> Option<ElementHead> {
    let captures = ELEMENT_HEAD.captures(line)?;
    let whole = captures.get(0)?;
    let (classes, id) = parse_modifiers(captures.get(2).map_or("", |m| m.as_str()));
    Some(ElementHead {
        tag: Some(captures[1].to_string()),
        classes,
        id,
        rest: line[whole.end()..].to_string(),
    })
}

fn shorthand_head(line: &str) -> Option<ElementHead> {
    let whole = SHORTHAND_HEAD.find(line)?;
    let (classes, id) = parse_modifiers(whole.as_str());
    Some(ElementHead {
        tag: None,
        classes,
        id,
        rest: line[whole.end()..].to_string(),
    })
}

/// Split a `.a.b#c` run into its classes and id.
fn parse_modifiers(run: &str) -> (Vec<String>, Option<String>) {
    let mut classes = Vec::new();
    let mut id = None;
    for modifier in MODIFIER.find_iter(run) {
        let token = modifier.as_str();
        if let Some(class) = token.strip_prefix('.') {
            classes.push(class.to_string());
        } else if let Some(name) = token.strip_prefix('#') {
            id = Some(name.to_string());
        }
    }
    (classes, id)
}
