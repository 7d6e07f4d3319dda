//! Value tables for counter-examples and norm boundaries

use crate::ast::CompareOp;
use crate::runtime::normalize;

/// Value that falsifies `x op reference`
///
/// `IN` has no single breaking value; the predicate is skipped.
pub fn broken_value(op: CompareOp, reference: f64) -> Option<f64> {
    let value = match op {
        CompareOp::Eq => reference + 1.0,
        CompareOp::Ne => reference,
        CompareOp::Gt => 0.0,
        CompareOp::Ge => reference - 1.0,
        CompareOp::Lt => reference + 1000.0,
        CompareOp::Le => reference + 1.0,
        CompareOp::In => return None,
    };
    Some(normalize(value))
}

/// Value sitting on the boundary of `x op threshold`
///
/// With `force_true` the comparison holds by the smallest integer margin,
/// otherwise it fails by the smallest integer margin.
pub fn boundary_value(op: CompareOp, threshold: f64, force_true: bool) -> f64 {
    let t = threshold;
    let value = if force_true {
        match op {
            CompareOp::Gt | CompareOp::Ne => t + 1.0,
            CompareOp::Ge | CompareOp::Le | CompareOp::Eq | CompareOp::In => t,
            CompareOp::Lt => t - 1.0,
        }
    } else {
        match op {
            CompareOp::Gt | CompareOp::Lt | CompareOp::Ne | CompareOp::In => t,
            CompareOp::Ge => t - 1.0,
            CompareOp::Le | CompareOp::Eq => t + 1.0,
        }
    };
    normalize(value)
}
