//! Additive polarity decomposition
//!
//! Splits a sum/difference into the variables that push it up and the ones
//! that pull it down. Multiplication passes the current sign to both
//! operands unchanged, which is only sound for non-negative quantities.
//! Division, MIN/MAX and conditionals are opaque.

use crate::ast::{ArithOp, Function, Node};

/// Variables contributing with each sign, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polarity {
    /// Variables with a positive sign
    pub positive: Vec<String>,
    /// Variables with a negative sign
    pub negative: Vec<String>,
}

impl Polarity {
    /// Total number of terms
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// True if no variable was found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any term is subtracted
    pub fn has_negative(&self) -> bool {
        !self.negative.is_empty()
    }

    /// Positive terms followed by negative terms
    pub fn all_terms(&self) -> impl Iterator<Item = &String> {
        self.positive.iter().chain(self.negative.iter())
    }
}

/// The argument of a `POS` wrapper, or the node itself
pub fn unwrap_pos(node: &Node) -> &Node {
    match node {
        Node::Call {
            function: Function::Pos,
            args,
        } => args.first().unwrap_or(node),
        _ => node,
    }
}

/// Decompose `node` into positive and negative variables
pub fn decompose_additive(node: &Node) -> Polarity {
    let mut polarity = Polarity::default();
    walk(node, true, &mut polarity);
    polarity
}

fn walk(node: &Node, positive: bool, out: &mut Polarity) {
    match node {
        Node::Ref { name, .. } => {
            if positive {
                out.positive.push(name.clone());
            } else {
                out.negative.push(name.clone());
            }
        }
        Node::Sum(terms) => {
            for term in terms {
                walk(term, positive, out);
            }
        }
        Node::BinOp { op, left, right } => match op {
            ArithOp::Add | ArithOp::Mul => {
                walk(left, positive, out);
                walk(right, positive, out);
            }
            ArithOp::Sub => {
                walk(left, positive, out);
                walk(right, !positive, out);
            }
            ArithOp::Div => {}
        },
        Node::Call {
            function: Function::Pos,
            args,
        } => {
            if let Some(inner) = args.first() {
                walk(inner, positive, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_flips_on_subtraction() {
        // A + B - C
        let node = Node::var("A").add(Node::var("B")).sub(Node::var("C"));
        let p = decompose_additive(&node);
        assert_eq!(p.positive, vec!["A", "B"]);
        assert_eq!(p.negative, vec!["C"]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_double_negation() {
        // A - (B - C)
        let node = Node::var("A").sub(Node::var("B").sub(Node::var("C")));
        let p = decompose_additive(&node);
        assert_eq!(p.positive, vec!["A", "C"]);
        assert_eq!(p.negative, vec!["B"]);
    }

    #[test]
    fn test_pos_wrapper_sum_and_product() {
        let node = Node::call(
            Function::Pos,
            vec![Node::sum(vec![Node::var("C1"), Node::var("C2")])
                .sub(Node::var("K").mul(Node::var("P18")))],
        );
        let p = decompose_additive(&node);
        assert_eq!(p.positive, vec!["C1", "C2"]);
        assert_eq!(p.negative, vec!["K", "P18"]);
        assert!(p.has_negative());
    }

    #[test]
    fn test_opaque_nodes() {
        let node = Node::var("A").div(Node::var("B"));
        assert!(decompose_additive(&node).is_empty());
        assert!(decompose_additive(&Node::constant(5.0)).is_empty());
    }

    #[test]
    fn test_unwrap_pos() {
        let inner = Node::var("A").sub(Node::var("B"));
        let wrapped = Node::call(Function::Pos, vec![inner.clone()]);
        assert_eq!(unwrap_pos(&wrapped), &inner);
        assert_eq!(unwrap_pos(&inner), &inner);
    }
}
