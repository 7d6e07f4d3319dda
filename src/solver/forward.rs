//! Forward solver: finds an assignment satisfying a list of predicates

use super::Solver;
use crate::ast::{CompareOp, Node};
use crate::error::Result;
use crate::logic::Predicate;
use crate::runtime::{evaluate, normalize, Assignment};

impl<'r> Solver<'r> {
    /// Assignment satisfying every predicate, parameters stripped
    ///
    /// Runs a fixed number of refinement passes; dependency chains deeper than
    /// the pass count may not settle.
    pub fn solve_for_true(&mut self, predicates: &[Predicate]) -> Result<Assignment> {
        self.solve_at(predicates, 0)
    }

    pub(crate) fn solve_at(&mut self, predicates: &[Predicate], depth: usize) -> Result<Assignment> {
        let rules = self.rules;
        let baseline = self.options.baseline_value;
        let mut current = rules.parameters().clone();
        let predicates: Vec<Predicate> = predicates
            .iter()
            .filter_map(|pred| self.writable_predicate(pred))
            .collect();

        // unbound inputs start high so chained predicates do not collapse to 0
        for pred in &predicates {
            let names = pred
                .rhs
                .leaf_vars()
                .into_iter()
                .chain(std::iter::once(pred.target.as_str()));
            for name in names {
                if !current.contains_key(name) && rules.is_input(name) {
                    current.insert(name.to_string(), baseline);
                }
            }
        }

        for pass in 0..self.options.refinement_passes {
            for pred in &predicates {
                let value = self.candidate(pred, &current);
                tracing::debug!("pass {}: {} -> {}", pass + 1, pred, value);
                self.smart_set_at(&mut current, &pred.target, value, depth)?;
            }
        }

        Ok(rules.strip_parameters(current))
    }

    /// `pred` rewritten so that its target is not a parameter: a parameter
    /// leader is swapped with a single-variable right-hand side, otherwise
    /// the predicate is dropped
    pub(crate) fn writable_predicate(&self, pred: &Predicate) -> Option<Predicate> {
        let rules = self.rules;
        if !rules.is_parameter(&pred.target) {
            return Some(pred.clone());
        }
        let mirrored = pred
            .mirrored()
            .filter(|m| !rules.is_parameter(&m.target));
        if mirrored.is_none() {
            tracing::debug!("{} only constrains parameters; skipped", pred);
        }
        mirrored
    }

    fn candidate(&self, pred: &Predicate, context: &Assignment) -> f64 {
        let baseline = self.options.baseline_value;
        let value = match (pred.op, &pred.rhs) {
            (CompareOp::In, Node::List(allowed)) => allowed
                .first()
                .map_or(0.0, |first| evaluate(first, context)),
            (op, rhs) => {
                let rhs = evaluate(rhs, context);
                match op {
                    CompareOp::Gt => (rhs + 1.0).max(baseline),
                    CompareOp::Ge => rhs.max(baseline),
                    CompareOp::Lt => (rhs - 1.0).max(0.0),
                    CompareOp::Le => rhs.max(0.0),
                    // `= 0` means "must be off"
                    CompareOp::Eq if rhs == 0.0 => 0.0,
                    CompareOp::Eq | CompareOp::In => rhs,
                    CompareOp::Ne => rhs + 1.0,
                }
            }
        };
        normalize(value)
    }
}
