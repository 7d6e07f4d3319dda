//! Failure modes of a single OR-alternative
//!
//! Additive comparisons are broken proportionally: the terms are pushed
//! against the threshold as a group so that a subtraction inside the
//! expression is actually exercised. Anything else falls back to breaking
//! each extracted predicate with the broken-value table.

use super::tables::broken_value;
use super::Solver;
use crate::ast::{CompareOp, Node};
use crate::error::Result;
use crate::logic::{decompose_additive, extract_predicates, unwrap_pos, Polarity};
use crate::runtime::{evaluate, Assignment};

impl<'r> Solver<'r> {
    /// Assignments that each falsify `alternative`; empty if it cannot be
    /// broken
    pub(crate) fn failure_modes(&mut self, alternative: &Node, depth: usize) -> Result<Vec<Assignment>> {
        if let Some(mode) = self.proportional(alternative, depth)? {
            return Ok(vec![mode]);
        }
        self.generic_modes(alternative, depth)
    }

    fn proportional(&mut self, alternative: &Node, depth: usize) -> Result<Option<Assignment>> {
        let (op, left, right) = match alternative {
            Node::Compare { op, left, right } if *op != CompareOp::In => (*op, left, right),
            _ => return Ok(None),
        };

        let polarity = decompose_additive(unwrap_pos(left));
        if polarity.len() <= 1 && !polarity.has_negative() {
            return Ok(None);
        }

        let reference = evaluate(right, self.rules.parameters());
        let base = reference.trunc();
        let Polarity { positive, negative } = self.writable(polarity);
        let margin = self.options.sabotage_margin;
        let mut mode = Assignment::new();

        match op {
            CompareOp::Gt | CompareOp::Ge => {
                if negative.is_empty() {
                    // no counterweight: the sum can only drop by switching terms off
                    self.set_all(&mut mode, &positive, 0.0, depth)?;
                } else {
                    let counterweight = margin + self.options.sabotage_counterweight;
                    self.set_all(&mut mode, &positive, share(base + margin, positive.len()), depth)?;
                    self.set_all(&mut mode, &negative, share(counterweight, negative.len()), depth)?;
                }
            }
            CompareOp::Lt | CompareOp::Le => {
                self.set_all(&mut mode, &positive, share(base + margin, positive.len()), depth)?;
                self.set_all(&mut mode, &negative, 0.0, depth)?;
            }
            CompareOp::Eq | CompareOp::Ne | CompareOp::In => {
                let first = match positive.first() {
                    Some(first) => first,
                    None => return Ok(None),
                };
                match broken_value(op, reference) {
                    Some(value) => self.smart_set_at(&mut mode, first, value, depth)?,
                    None => return Ok(None),
                }
            }
        }

        tracing::debug!("proportional sabotage of {}: {:?}", alternative, mode);
        Ok(Some(mode))
    }

    fn generic_modes(&mut self, alternative: &Node, depth: usize) -> Result<Vec<Assignment>> {
        let rules = self.rules;
        let mut modes = Vec::new();
        let preds: Vec<_> = extract_predicates(alternative)
            .iter()
            .filter_map(|p| self.writable_predicate(p))
            .collect();
        for pred in preds {
            let reference = evaluate(&pred.rhs, rules.parameters());
            match broken_value(pred.op, reference) {
                Some(value) => {
                    let mut mode = Assignment::new();
                    self.smart_set_at(&mut mode, &pred.target, value, depth)?;
                    modes.push(mode);
                }
                None => tracing::debug!("{} has no breaking value; skipped", pred),
            }
        }
        Ok(modes)
    }

    /// Parameters are fixed and never written
    fn writable(&self, polarity: Polarity) -> Polarity {
        let keep = |terms: Vec<String>| -> Vec<String> {
            terms
                .into_iter()
                .filter(|t| !self.rules.is_parameter(t))
                .collect()
        };
        Polarity {
            positive: keep(polarity.positive),
            negative: keep(polarity.negative),
        }
    }

    fn set_all(&mut self, mode: &mut Assignment, names: &[String], value: f64, depth: usize) -> Result<()> {
        for name in names {
            self.smart_set_at(mode, name, value, depth)?;
        }
        Ok(())
    }
}

/// `total` split evenly over `count` terms, truncated, plus one
fn share(total: f64, count: usize) -> f64 {
    (total / count.max(1) as f64).trunc() + 1.0
}
