//! Delegation engine ("smart set")
//!
//! The only way the solvers write into an assignment. Setting a name that is
//! not itself an input pushes the intent down to the inputs behind it:
//!
//! - a macro records the value and switches its delegate input on or off
//! - an alias (`B := A`) forwards the same value
//! - a conditional definition re-enters the solvers on its branch condition

use super::Solver;
use crate::ast::Node;
use crate::error::{Error, Result};
use crate::runtime::Assignment;

/// Which branch of a conditional definition an intended value selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchIntent {
    /// The condition must hold
    True,
    /// The condition must fail
    False,
}

impl BranchIntent {
    /// Infer the branch from the intended value
    ///
    /// Exact match on a branch literal wins; otherwise a `1`/`0` flag reads
    /// any value `>= 1` as true and any value `<= 0` as false. Non-literal
    /// branches never match.
    pub fn infer(value: f64, when_true: &Node, when_false: &Node) -> Option<Self> {
        let t = when_true.as_const();
        let f = when_false.as_const();

        if t == Some(value) || (t == Some(1.0) && value >= 1.0) {
            Some(BranchIntent::True)
        } else if f == Some(value) || (f == Some(0.0) && value <= 0.0) {
            Some(BranchIntent::False)
        } else {
            None
        }
    }
}

impl<'r> Solver<'r> {
    /// Write `value` for `target` and propagate it to the inputs behind it
    pub fn smart_set(&mut self, assignment: &mut Assignment, target: &str, value: f64) -> Result<()> {
        self.smart_set_at(assignment, target, value, 0)
    }

    pub(crate) fn smart_set_at(
        &mut self,
        assignment: &mut Assignment,
        target: &str,
        value: f64,
        depth: usize,
    ) -> Result<()> {
        if depth > self.options.max_delegation_depth {
            return Err(Error::cycle(target, depth));
        }
        let rules = self.rules;

        if rules.is_macro(target) {
            assignment.insert(target.to_string(), value);
            if let Some(delegate) = rules.macro_delegate(target) {
                let magnitude = if value > 0.0 {
                    self.options.delegate_saturation
                } else {
                    0.0
                };
                tracing::debug!("macro {} = {} via {} = {}", target, value, delegate, magnitude);
                return self.smart_set_at(assignment, delegate, magnitude, depth + 1);
            }
        }

        assignment.insert(target.to_string(), value);

        match rules.definition(target) {
            Some(Node::Ref { name, .. }) => self.smart_set_at(assignment, name, value, depth + 1),
            Some(Node::Conditional {
                cond,
                when_true,
                when_false,
            }) => {
                let trigger = match BranchIntent::infer(value, when_true, when_false) {
                    Some(BranchIntent::True) => {
                        if let Some(literal) = when_true.as_const() {
                            assignment.insert(target.to_string(), literal);
                        }
                        self.satisfying_at(cond, depth + 1)?.into_iter().next()
                    }
                    Some(BranchIntent::False) => self.failure_at(cond, depth + 1)?.into_iter().next(),
                    None => None,
                };

                if let Some(trigger) = trigger {
                    tracing::debug!("{} = {} triggered by {:?}", target, value, trigger);
                    for (name, v) in trigger {
                        if name != target {
                            self.smart_set_at(assignment, &name, v, depth + 1)?;
                        }
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
