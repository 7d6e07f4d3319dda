//! Combinatorial expansion of AND/OR structure
//!
//! A block is split into AND-components, each component into
//! OR-alternatives. Satisfying scenarios take one solved alternative per
//! component (one scenario per path through the tree); failure scenarios
//! break every alternative of one component at a time.

use super::Solver;
use crate::ast::{CompareOp, LogicOp, Node};
use crate::error::{Error, Result};
use crate::logic::{
    decompose_additive, extract_predicates, flatten, flatten_product, unwrap_pos,
};
use crate::runtime::{evaluate_truth, Assignment};

impl<'r> Solver<'r> {
    /// One assignment per satisfying path through `block`
    ///
    /// An empty block yields a single empty assignment.
    pub fn satisfying_scenarios(&mut self, block: &Node) -> Result<Vec<Assignment>> {
        self.satisfying_at(block, 0)
    }

    /// Sabotage assignments, each breaking exactly one AND-component of
    /// `block` when merged onto a satisfying baseline
    pub fn failure_scenarios(&mut self, block: &Node) -> Result<Vec<Assignment>> {
        self.failure_at(block, 0)
    }

    pub(crate) fn satisfying_at(&mut self, block: &Node, depth: usize) -> Result<Vec<Assignment>> {
        let mut component_options = Vec::new();

        for component in flatten(block, LogicOp::And) {
            let mut solved = Vec::new();
            for alternative in flatten(component, LogicOp::Or) {
                for variant in self.variants(alternative) {
                    let preds = extract_predicates(&variant);
                    let inputs = self.solve_at(&preds, depth)?;
                    if !inputs.is_empty() {
                        solved.push(inputs);
                    }
                }
            }
            if !solved.is_empty() {
                component_options.push(solved);
            }
        }

        let scenarios = self.product(&component_options, block);
        tracing::debug!("{} satisfying scenario(s) for {}", scenarios.len(), block);
        Ok(scenarios)
    }

    pub(crate) fn failure_at(&mut self, block: &Node, depth: usize) -> Result<Vec<Assignment>> {
        let mut scenarios = Vec::new();

        for (index, component) in flatten(block, LogicOp::And).into_iter().enumerate() {
            let mut per_alternative = Vec::new();
            let mut breakable = true;
            for alternative in flatten(component, LogicOp::Or) {
                let modes = self.failure_modes(alternative, depth)?;
                if modes.is_empty() {
                    breakable = false;
                    break;
                }
                per_alternative.push(modes);
            }

            if !breakable {
                tracing::warn!(
                    "Component #{} ({}) cannot be broken; sabotage case omitted",
                    index + 1,
                    component
                );
                continue;
            }

            // an OR group fails only when every alternative fails together
            let combined = self.product(&per_alternative, component);
            for sabotage in combined.into_iter().filter(|a| !a.is_empty()) {
                if evaluate_truth(component, &self.rules.replay(&sabotage)) {
                    self.warn(Error::UnbreakableComponent {
                        component: component.to_string(),
                    });
                    continue;
                }
                scenarios.push(sabotage);
            }
        }

        tracing::debug!("{} failure scenario(s) for {}", scenarios.len(), block);
        Ok(scenarios)
    }

    fn variants(&self, alternative: &Node) -> Vec<Node> {
        if self.options.expand_comparisons {
            expand_comparison(alternative)
        } else {
            vec![alternative.clone()]
        }
    }

    fn product(&mut self, lists: &[Vec<Assignment>], block: &Node) -> Vec<Assignment> {
        let limit = self.options.max_scenarios_per_block;
        let (combos, truncated) = capped_product(lists, limit);
        if truncated {
            self.warn(Error::ScenarioCeiling {
                block: block.to_string(),
                limit,
            });
        }
        combos
    }
}

/// Rewrite a comparison into single-variable variants before solving
///
/// - `f1 * f2 * ... > 0` becomes one AND-list of `fi > 0`
/// - `a + b - c > k` becomes one variant per positive term (`a > k`, `b > k`)
/// - `a - b ≠ k` becomes one variant per term
/// - upper bounds and everything else are kept as they are
pub fn expand_comparison(node: &Node) -> Vec<Node> {
    let (op, left, right) = match node {
        Node::Compare { op, left, right } => (*op, left.as_ref(), right.as_ref()),
        _ => return vec![node.clone()],
    };

    if op.is_lower_bound() && right.is_zero() {
        let factors = flatten_product(left);
        if factors.len() > 1 {
            let constraints = factors
                .into_iter()
                .map(|f| Node::compare(op, f.clone(), right.clone()))
                .collect();
            return vec![Node::list(constraints)];
        }
    }

    let polarity = decompose_additive(unwrap_pos(left));
    let terms: Vec<&String> = match op {
        CompareOp::Gt | CompareOp::Ge => polarity.positive.iter().collect(),
        CompareOp::Ne => polarity.all_terms().collect(),
        _ => Vec::new(),
    };

    if terms.is_empty() {
        return vec![node.clone()];
    }
    terms
        .into_iter()
        .map(|name| Node::compare(op, Node::var(name.clone()), right.clone()))
        .collect()
}

/// Cartesian product of option lists, merging each combination last write
/// wins, stopping after `limit` combinations
///
/// Returns the combinations and whether the ceiling cut the product short.
/// The product of zero lists is one empty assignment.
pub fn capped_product(lists: &[Vec<Assignment>], limit: usize) -> (Vec<Assignment>, bool) {
    let limit = limit.max(1);
    let mut combos = vec![Assignment::new()];
    let mut truncated = false;

    for options in lists {
        let mut next = Vec::with_capacity(combos.len() * options.len());
        'fill: for base in &combos {
            for option in options {
                if next.len() >= limit {
                    truncated = true;
                    break 'fill;
                }
                let mut merged = base.clone();
                merged.extend(option.iter().map(|(k, v)| (k.clone(), *v)));
                next.push(merged);
            }
        }
        combos = next;
    }

    (combos, truncated)
}
