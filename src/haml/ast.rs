//! Template tree
//!
//! The node tree is built once per template by the [tree builder](crate::haml::parsing) and
//! rewritten once by [lowering](crate::haml::lowering). After that it is never mutated: the same
//! tree is rendered against any number of contexts, and no node carries render-time state.
//!
//! Raw trees and lowered trees share the [`Node`] type. The raw control markers (`If`, `ElseIf`,
//! `Else`) only appear in builder output; lowering folds every run that starts with an `If` into
//! a [`Node::DecisionChain`]. Markers that survive lowering are orphans and render nothing.

use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered attribute map. Re-inserting a key keeps its first position.
pub type Attributes = IndexMap<String, AttrValue>;

/// The value of one element attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum AttrValue {
    /// Emitted verbatim as `key="value"`.
    Literal(String),
    /// Evaluated per render. `false`/`null` omit the attribute, `true` emits a bare key.
    Expr { value: String, raw: bool },
}

impl AttrValue {
    pub fn literal(value: impl Into<String>) -> Self {
        AttrValue::Literal(value.into())
    }

    /// Build an expression attribute, honoring a leading `raw ` marker.
    pub fn expr(value: impl AsRef<str>) -> Self {
        let (value, raw) = split_raw_marker(value.as_ref());
        AttrValue::Expr {
            value: value.to_string(),
            raw,
        }
    }
}

/// The guard of one decision-chain branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "condition", rename_all = "kebab-case")]
pub enum Guard {
    Expr(String),
    /// The literal `else` branch.
    Always,
}

/// One `(condition, children)` arm of a decision chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub guard: Guard,
    pub children: Vec<Node>,
}

impl Branch {
    pub fn new(guard: Guard, children: Vec<Node>) -> Self {
        Self { guard, children }
    }
}

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Element {
        tag: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    /// Literal output, never escaped.
    Text { value: String },
    Expression { value: String, raw: bool },
    /// Evaluated for effect only.
    Statement { code: String },
    If { condition: String, children: Vec<Node> },
    ElseIf { condition: String, children: Vec<Node> },
    Else { children: Vec<Node> },
    For {
        variable: String,
        index_variable: Option<String>,
        expression: String,
        children: Vec<Node>,
    },
    /// A text line with embedded expressions, split into `Text`/`Expression` children.
    Fragment { children: Vec<Node> },
    DecisionChain { branches: Vec<Branch> },
}

impl Node {
    pub fn element(tag: impl Into<String>, attributes: Attributes, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            attributes,
            children,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Build an expression node, honoring a leading `raw ` marker.
    pub fn expression(value: impl AsRef<str>) -> Self {
        let (value, raw) = split_raw_marker(value.as_ref());
        Node::Expression {
            value: value.to_string(),
            raw,
        }
    }

    pub fn statement(code: impl Into<String>) -> Self {
        Node::Statement { code: code.into() }
    }

    /// Short type name, used in logs and test failure messages.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Element { .. } => "element",
            Node::Text { .. } => "text",
            Node::Expression { .. } => "expression",
            Node::Statement { .. } => "statement",
            Node::If { .. } => "if",
            Node::ElseIf { .. } => "else-if",
            Node::Else { .. } => "else",
            Node::For { .. } => "for",
            Node::Fragment { .. } => "fragment",
            Node::DecisionChain { .. } => "decision-chain",
        }
    }

    /// Whether the tree builder opens a nesting frame for this node.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Node::Element { .. }
                | Node::If { .. }
                | Node::ElseIf { .. }
                | Node::Else { .. }
                | Node::For { .. }
        )
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. }
            | Node::If { children, .. }
            | Node::ElseIf { children, .. }
            | Node::Else { children }
            | Node::For { children, .. }
            | Node::Fragment { children } => children,
            Node::Text { .. }
            | Node::Expression { .. }
            | Node::Statement { .. }
            | Node::DecisionChain { .. } => &[],
        }
    }

    /// Replace the children of a container node. Leaf nodes are returned unchanged.
    pub fn with_children(self, new_children: Vec<Node>) -> Self {
        match self {
            Node::Element {
                tag, attributes, ..
            } => Node::Element {
                tag,
                attributes,
                children: new_children,
            },
            Node::If { condition, .. } => Node::If {
                condition,
                children: new_children,
            },
            Node::ElseIf { condition, .. } => Node::ElseIf {
                condition,
                children: new_children,
            },
            Node::Else { .. } => Node::Else {
                children: new_children,
            },
            Node::For {
                variable,
                index_variable,
                expression,
                ..
            } => Node::For {
                variable,
                index_variable,
                expression,
                children: new_children,
            },
            Node::Fragment { .. } => Node::Fragment {
                children: new_children,
            },
            other => other,
        }
    }
}

/// Strip a leading `raw ` marker from an expression, reporting whether it was present.
pub fn split_raw_marker(expression: &str) -> (&str, bool) {
    let trimmed = expression.trim();
    match trimmed.strip_prefix("raw ") {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_marker_is_stripped() {
        assert_eq!(
            Node::expression("raw html"),
            Node::Expression {
                value: "html".to_string(),
                raw: true
            }
        );
        assert_eq!(
            Node::expression(" value "),
            Node::Expression {
                value: "value".to_string(),
                raw: false
            }
        );
        // Only a whole `raw` word counts as the marker
        assert_eq!(
            AttrValue::expr("rawValue"),
            AttrValue::Expr {
                value: "rawValue".to_string(),
                raw: false
            }
        );
    }

    #[test]
    fn test_with_children_keeps_payload() {
        let node = Node::For {
            variable: "item".to_string(),
            index_variable: Some("i".to_string()),
            expression: "items".to_string(),
            children: vec![],
        };
        let rebuilt = node.with_children(vec![Node::text("x")]);
        match rebuilt {
            Node::For {
                variable,
                index_variable,
                children,
                ..
            } => {
                assert_eq!(variable, "item");
                assert_eq!(index_variable.as_deref(), Some("i"));
                assert_eq!(children, vec![Node::text("x")]);
            }
            other => panic!("expected for node, got {}", other.node_type()),
        }
    }

    #[test]
    fn test_attribute_order_survives_overwrite() {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), AttrValue::literal("a"));
        attributes.insert("title".to_string(), AttrValue::literal("t"));
        attributes.insert("id".to_string(), AttrValue::literal("b"));
        let keys: Vec<_> = attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "title"]);
        assert_eq!(attributes["id"], AttrValue::literal("b"));
    }
}
