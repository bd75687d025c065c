//! Control-flow lowering
//!
//! Folds every sibling run `If (ElseIf)* Else?` into one [`Node::DecisionChain`], at every depth:
//! element children, loop bodies and the branch bodies themselves are lowered too.
//!
//! Lowering builds a new tree; its input is never modified. An `ElseIf` or `Else` that does not
//! directly continue a run is left in place as an orphan marker and renders nothing.

use crate::haml::ast::{Branch, Guard, Node};

/// Lower a node list into a tree without `If` markers.
pub fn lower(nodes: &[Node]) -> Vec<Node> {
    let mut lowered = Vec::with_capacity(nodes.len());
    let mut index = 0;
    while index < nodes.len() {
        match &nodes[index] {
            Node::If {
                condition,
                children,
            } => {
                let mut branches = vec![Branch::new(
                    Guard::Expr(condition.clone()),
                    lower(children),
                )];
                index += 1;
                while let Some(next) = nodes.get(index) {
                    match next {
                        Node::ElseIf {
                            condition,
                            children,
                        } => {
                            branches.push(Branch::new(
                                Guard::Expr(condition.clone()),
                                lower(children),
                            ));
                            index += 1;
                        }
                        Node::Else { children } => {
                            branches.push(Branch::new(Guard::Always, lower(children)));
                            index += 1;
                            break;
                        }
                        _ => break,
                    }
                }
                lowered.push(Node::DecisionChain { branches });
            }
            other => {
                lowered.push(lower_node(other));
                index += 1;
            }
        }
    }
    lowered
}

fn lower_node(node: &Node) -> Node {
    match node {
        Node::DecisionChain { branches } => Node::DecisionChain {
            branches: branches
                .iter()
                .map(|branch| Branch::new(branch.guard.clone(), lower(&branch.children)))
                .collect(),
        },
        other if other.children().is_empty() => other.clone(),
        other => other.clone().with_children(lower(other.children())),
    }
}
