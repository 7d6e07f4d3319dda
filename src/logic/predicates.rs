//! Predicate extraction
//!
//! Reduces a condition to atomic predicates `target op rhs` that the solvers
//! can assign directly. Rewrites applied in priority order:
//!
//! 1. `f1 * f2 * ... > 0` becomes one `fi > 0` per factor (same for `>=`)
//! 2. `k - V > 0` with `k` a positive literal becomes `V < k`
//! 3. any other comparison yields one predicate on its leader variable
//! 4. every other node is searched structurally

use std::fmt;

use super::flatten::flatten_product;
use crate::ast::{ArithOp, CompareOp, Node};
use crate::runtime::Assignment;

/// Atomic constraint on one variable
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Variable the solver assigns
    pub target: String,
    /// Comparison to satisfy or break
    pub op: CompareOp,
    /// Threshold expression (a list for `IN`)
    pub rhs: Node,
}

impl Predicate {
    /// Create a predicate
    pub fn new(target: impl Into<String>, op: CompareOp, rhs: Node) -> Self {
        Self {
            target: target.into(),
            op,
            rhs,
        }
    }

    /// Value of the right-hand side under `context`
    pub fn threshold(&self, context: &Assignment) -> f64 {
        crate::runtime::evaluate(&self.rhs, context)
    }

    /// The same constraint solved for the right-hand side, when that side
    /// is a single variable
    pub fn mirrored(&self) -> Option<Predicate> {
        let op = self.op.mirrored()?;
        match &self.rhs {
            Node::Ref { name, .. } => Some(Predicate::new(
                name.clone(),
                op,
                Node::var(self.target.clone()),
            )),
            _ => None,
        }
    }

    /// Rebuild the comparison node this predicate stands for
    pub fn to_node(&self) -> Node {
        Node::compare(self.op, Node::var(self.target.clone()), self.rhs.clone())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.target, self.op.symbol(), self.rhs)
    }
}

/// First variable of a left-to-right depth-first scan
pub fn leader(node: &Node) -> Option<&str> {
    node.leaf_vars().into_iter().next()
}

/// Extract every atomic predicate found in `node`
pub fn extract_predicates(node: &Node) -> Vec<Predicate> {
    let mut preds = Vec::new();
    extract_into(node, &mut preds);
    preds
}

fn extract_into(node: &Node, preds: &mut Vec<Predicate>) {
    if let Node::Compare { op, left, right } = node {
        if op.is_lower_bound() && right.is_zero() {
            let factors = flatten_product(left);
            if factors.len() > 1 {
                for factor in factors {
                    let synthetic = Node::compare(*op, factor.clone(), Node::constant(0.0));
                    extract_into(&synthetic, preds);
                }
                return;
            }

            if let Some(pred) = complement(left) {
                preds.push(pred);
                return;
            }
        }

        // terminal: do not look further inside
        if let Some(target) = leader(left) {
            preds.push(Predicate::new(target, *op, right.as_ref().clone()));
        }
        return;
    }

    for child in node.children() {
        extract_into(child, preds);
    }
}

/// `k - V` with a positive literal `k`, read as "V below k"
fn complement(left: &Node) -> Option<Predicate> {
    match left {
        Node::BinOp {
            op: ArithOp::Sub,
            left: minuend,
            right: subtrahend,
        } => {
            let k = minuend.as_const().filter(|k| *k > 0.0)?;
            let target = leader(subtrahend)?;
            Some(Predicate::new(target, CompareOp::Lt, Node::constant(k)))
        }
        _ => None,
    }
}
