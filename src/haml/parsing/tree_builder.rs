//! Tree building
//!
//! Consumes source lines in order and assembles the raw node tree with an indentation stack.
//!
//! The stack holds one frame per open container (element, `if`, `else if`, `else`, `for`),
//! seeded with a root frame that is never closed. For each non-blank line, every frame whose
//! indent is greater than or equal to the line's indent is closed (its node is finished and
//! appended to the frame below), and the new top frame is the line's parent.
//!
//! A line of the form `name="value"` / `name={{ expr }}` nested under an element is not a child:
//! it adds an attribute to that element (multi-line attribute continuation).

use super::attributes::{merge_attribute, scan_continuation, scan_element};
use super::ParseOptions;
use crate::haml::ast::Node;
use crate::haml::lexing::segmentation::line_node;
use crate::haml::lexing::{classify_line, indent_of, Directive};

/// An open container awaiting its children.
struct Owner {
    node: Node,
    shorthand_class: Option<String>,
}

struct Frame {
    /// `None` for the root frame.
    indent: Option<usize>,
    owner: Option<Owner>,
    children: Vec<Node>,
}

impl Frame {
    fn root() -> Self {
        Self {
            indent: None,
            owner: None,
            children: Vec::new(),
        }
    }

    fn open(indent: usize, owner: Owner) -> Self {
        let children = owner.node.children().to_vec();
        Self {
            indent: Some(indent),
            owner: Some(owner),
            children,
        }
    }

    fn encloses(&self, indent: usize) -> bool {
        self.indent.map_or(true, |own| own < indent)
    }
}

/// Indentation-stack tree builder.
pub struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    stack: Vec<Frame>,
}

impl<'o> TreeBuilder<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            stack: vec![Frame::root()],
        }
    }

    /// Build the raw tree for a whole source.
    pub fn build(mut self, source: &str) -> Vec<Node> {
        let mut line_count = 0;
        for line in source.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            line_count += 1;
            self.push_line(indent_of(line), line.trim());
        }
        let nodes = self.finish();
        tracing::debug!(lines = line_count, nodes = nodes.len(), "assembled raw tree");
        nodes
    }

    fn push_line(&mut self, indent: usize, trimmed: &str) {
        self.close_frames(indent);

        if self.absorb_continuation(trimmed) {
            return;
        }

        let Some(directive) = classify_line(trimmed) else {
            return;
        };
        tracing::trace!(indent, ?directive, "classified line");

        let (node, shorthand_class) = directive_node(directive, self.options);

        if node.is_container() {
            self.stack.push(Frame::open(
                indent,
                Owner {
                    node,
                    shorthand_class,
                },
            ));
        } else {
            self.top().children.push(node);
        }
    }

    /// Attach a continuation line to the enclosing element, if it is one.
    fn absorb_continuation(&mut self, trimmed: &str) -> bool {
        let Some(Owner {
            node: Node::Element { attributes, .. },
            shorthand_class,
        }) = self.top().owner.as_mut()
        else {
            return false;
        };
        let Some((key, value)) = scan_continuation(trimmed) else {
            return false;
        };
        tracing::trace!(%key, "attribute continuation");
        merge_attribute(attributes, shorthand_class.as_deref(), key, value);
        true
    }

    fn close_frames(&mut self, indent: usize) {
        while self.stack.len() > 1 && !self.top().encloses(indent) {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Some(owner) = frame.owner {
            let node = owner.node.with_children(frame.children);
            self.top().children.push(node);
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close_top();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }
}

/// The node for a classified line, plus the shorthand class list of element heads.
fn directive_node(directive: Directive, options: &ParseOptions) -> (Node, Option<String>) {
    let node = match directive {
        Directive::Element(head) => {
            let scanned = scan_element(head, options);
            return (scanned.node, scanned.shorthand_class);
        }
        Directive::Literal(text) => Node::text(text),
        Directive::Text(segments) => line_node(segments),
        Directive::Expression(expression) => Node::expression(expression),
        Directive::Statement(code) => Node::statement(code),
        Directive::If(condition) => Node::If {
            condition,
            children: Vec::new(),
        },
        Directive::ElseIf(condition) => Node::ElseIf {
            condition,
            children: Vec::new(),
        },
        Directive::Else => Node::Else {
            children: Vec::new(),
        },
        Directive::For {
            variable,
            index_variable,
            expression,
        } => Node::For {
            variable,
            index_variable,
            expression,
            children: Vec::new(),
        },
    };
    (node, None)
}
