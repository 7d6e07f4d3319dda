use crate::ast::{LogicOp, Node};

/// Split `node` on the requested combinator
///
/// Nested combinators of the requested kind are flattened recursively; any
/// other node, including the opposite combinator, is returned as a single
/// leaf. A list is an implicit AND-sequence: it is split when flattening for
/// AND and kept whole when flattening for OR.
pub fn flatten(node: &Node, kind: LogicOp) -> Vec<&Node> {
    let mut items = Vec::new();
    flatten_into(node, kind, &mut items);
    items
}

fn flatten_into<'a>(node: &'a Node, kind: LogicOp, items: &mut Vec<&'a Node>) {
    match node {
        Node::List(list) if kind == LogicOp::And => {
            for item in list {
                flatten_into(item, kind, items);
            }
        }
        Node::Combine {
            kind: node_kind,
            left,
            right,
        } if *node_kind == kind => {
            flatten_into(left, kind, items);
            flatten_into(right, kind, items);
        }
        _ => items.push(node),
    }
}

/// Split `A * B * C` into its factors
pub fn flatten_product(node: &Node) -> Vec<&Node> {
    let mut factors = Vec::new();
    product_into(node, &mut factors);
    factors
}

fn product_into<'a>(node: &'a Node, factors: &mut Vec<&'a Node>) {
    match node {
        Node::BinOp {
            op: crate::ast::ArithOp::Mul,
            left,
            right,
        } => {
            product_into(left, factors);
            product_into(right, factors);
        }
        _ => factors.push(node),
    }
}
