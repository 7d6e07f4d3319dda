//! Expression evaluator
//!
//! Pure recursive evaluation of rule expressions over an [`Assignment`].
//! Two business rules shape it:
//!
//! - an undefined variable evaluates to `0`
//! - division by zero evaluates to `0`
//!
//! Comparisons and combinators evaluate to `1.0` / `0.0`, so conditions can be
//! evaluated directly (for instance inside a conditional).

use super::value::{from_bool, normalize, truthy, Assignment};
use crate::ast::{ArithOp, CompareOp, Function, LogicOp, Node};

/// Evaluate `node` under `context`
pub fn evaluate(node: &Node, context: &Assignment) -> f64 {
    normalize(eval_node(node, context))
}

/// Evaluate `node` as a condition
pub fn evaluate_truth(node: &Node, context: &Assignment) -> bool {
    truthy(eval_node(node, context))
}

fn eval_node(node: &Node, ctx: &Assignment) -> f64 {
    match node {
        Node::Const(v) => *v,
        Node::Ref { name, .. } => ctx.get(name.trim()).copied().unwrap_or(0.0),
        Node::Sum(terms) => terms.iter().map(|t| eval_node(t, ctx)).sum(),
        Node::BinOp { op, left, right } => {
            let l = eval_node(left, ctx);
            let r = eval_node(right, ctx);
            match op {
                ArithOp::Add => l + r,
                ArithOp::Sub => l - r,
                ArithOp::Mul => l * r,
                ArithOp::Div => {
                    if r == 0.0 {
                        0.0
                    } else {
                        l / r
                    }
                }
            }
        }
        Node::Compare { op, left, right } => from_bool(eval_compare(*op, left, right, ctx)),
        Node::Combine { kind, left, right } => {
            // short-circuit like the conditional
            let l = truthy(eval_node(left, ctx));
            let result = match kind {
                LogicOp::And => l && truthy(eval_node(right, ctx)),
                LogicOp::Or => l || truthy(eval_node(right, ctx)),
            };
            from_bool(result)
        }
        Node::Call { function, args } => eval_call(*function, args, ctx),
        Node::Conditional {
            cond,
            when_true,
            when_false,
        } => {
            if truthy(eval_node(cond, ctx)) {
                eval_node(when_true, ctx)
            } else {
                eval_node(when_false, ctx)
            }
        }
        // a bare list is an implicit AND-sequence
        Node::List(items) => from_bool(items.iter().all(|i| truthy(eval_node(i, ctx)))),
    }
}

fn eval_compare(op: CompareOp, left: &Node, right: &Node, ctx: &Assignment) -> bool {
    let l = eval_node(left, ctx);
    match (op, right) {
        (CompareOp::In, Node::List(allowed)) => allowed.iter().any(|a| eval_node(a, ctx) == l),
        _ => op.holds(l, eval_node(right, ctx)),
    }
}

fn eval_call(function: Function, args: &[Node], ctx: &Assignment) -> f64 {
    let values: Vec<f64> = args.iter().map(|a| eval_node(a, ctx)).collect();
    match function {
        Function::Pos => values.first().map_or(0.0, |v| v.max(0.0)),
        Function::Min => values.into_iter().reduce(f64::min).unwrap_or(0.0),
        Function::Max => values.into_iter().reduce(f64::max).unwrap_or(0.0),
    }
}
