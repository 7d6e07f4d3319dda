//! Norm-observation cases
//!
//! The norm comparison is tested on both sides of its boundary, once per
//! function variation of its threshold. Norm calculations are evaluated in
//! order over each case context to build the expected result.

use super::builder::Session;
use super::variations::{function_variations, Variation};
use crate::ast::{Function, Node, NormItem, VariableDef};
use crate::error::Result;
use crate::runtime::{evaluate, format_number, normalize, Assignment};
use crate::solver::boundary_value;

const UNKNOWN_TARGET: &str = "Unknown";

impl<'r> Session<'r> {
    /// Norm cases built on the golden baseline
    pub(crate) fn norm_cases(&mut self, golden: &Assignment) -> Result<()> {
        let rules = self.rules;
        let document = rules.document();
        if document.norm_observation.is_empty() {
            return Ok(());
        }
        let calculations = document.norm_calculations();

        let mut rich = rules.with_parameters(golden);
        rich.extend(rules.calculate_variables(&rich));
        for item in &document.norm_observation {
            let node = match item {
                NormItem::Condition(node) => node,
                NormItem::Calculation(def) => &def.logic,
            };
            for leaf in node.leaf_vars() {
                if rules.is_input(leaf) && !rich.contains_key(leaf) {
                    rich.insert(leaf.to_string(), self.options.norm_hydration_value);
                }
            }
        }

        let (op, left, right) = match document.norm_condition() {
            Some(Node::Compare { op, left, right }) => (*op, left.as_ref(), right.as_ref()),
            _ => {
                let context = rules.replay(&rich);
                self.norm_result(&context, &calculations, "Generic norm", "Standard execution".to_string(), false);
                return Ok(());
            }
        };

        let variations = function_variations(rules, self.options, right, &rich)?;
        let variations = if variations.is_empty() {
            vec![Variation {
                label: String::new(),
                context: rich.clone(),
            }]
        } else {
            variations
        };

        let pos_probe = calculations
            .iter()
            .any(|calc| calc.logic.contains_call(Function::Pos));
        let leader = self.norm_leader(left)?;
        let others: Vec<&str> = left
            .leaf_vars()
            .into_iter()
            .filter(|v| *v != leader && rules.is_input(v))
            .collect();

        for Variation { label, context } in variations {
            let suffix = if label.is_empty() {
                String::new()
            } else {
                format!(" {}", label)
            };
            let mut base = rules.emittable(&context);
            for name in &others {
                if base.contains_key(*name) {
                    continue;
                }
                if let Some(v) = rich.get(*name) {
                    base.insert(name.to_string(), *v);
                }
            }
            let threshold = evaluate(right, &rules.replay(&base));

            let edge = boundary_value(op, threshold, true);
            let (ok, value) = self.boundary_context(&base, left, &leader, edge)?;
            let description = edge_description("Boundary met", &suffix, &leader, value, threshold);
            self.norm_result(&ok, &calculations, "Norm OK", description, false);

            let edge = boundary_value(op, threshold, false);
            let (nk, value) = self.boundary_context(&base, left, &leader, edge)?;
            let description = edge_description("Boundary not met", &suffix, &leader, value, threshold);
            self.norm_result(&nk, &calculations, "Norm NK", description, true);

            if pos_probe {
                let probe = self.pinned_context(&base, &leader, 1.0)?;
                let description = format!("Internal probe{} (forcing {}=1)", suffix, leader);
                self.norm_result(&probe, &calculations, "POS=0 probe", description, true);
            }
        }
        Ok(())
    }

    /// Input the boundary is solved for: the first input among the
    /// left-hand leaves, else the first input behind them
    fn norm_leader(&self, left: &Node) -> Result<String> {
        let rules = self.rules;
        let writable = |name: &str| rules.is_input(name) && !rules.is_parameter(name);
        let direct = left
            .leaf_vars()
            .into_iter()
            .find(|&v| writable(v))
            .map(str::to_string);
        let leader = match direct {
            Some(leader) => Some(leader),
            None => rules
                .roots(left, self.options.max_delegation_depth)?
                .into_iter()
                .find(|r| writable(r.as_str())),
        };
        Ok(leader.unwrap_or_else(|| UNKNOWN_TARGET.to_string()))
    }

    /// `base` with `leader` solved so that the whole left side lands on
    /// `edge`; returns the replayed context and the leader value
    ///
    /// The left side is probed at two leader values. A side that does not
    /// move with the leader gets `edge` written directly.
    fn boundary_context(
        &mut self,
        base: &Assignment,
        left: &Node,
        leader: &str,
        edge: f64,
    ) -> Result<(Assignment, f64)> {
        let rules = self.rules;
        let side = |value: f64| {
            let mut trial = base.clone();
            trial.insert(leader.to_string(), value);
            evaluate(left, &rules.replay(&trial))
        };
        let origin = side(0.0);
        let slope = side(1.0) - origin;
        let value = if slope != 0.0 {
            normalize((edge - origin) / slope)
        } else {
            edge
        };

        let context = self.pinned_context(base, leader, value)?;
        Ok((context, value))
    }

    /// `base` with `leader` set to `value`, replayed
    fn pinned_context(&mut self, base: &Assignment, leader: &str, value: f64) -> Result<Assignment> {
        let mut inputs = base.clone();
        self.solver.smart_set(&mut inputs, leader, value)?;
        Ok(self.rules.replay(&inputs))
    }

    fn norm_result(
        &mut self,
        context: &Assignment,
        calculations: &[&VariableDef],
        category: &str,
        description: String,
        not_met: bool,
    ) {
        let expected = if not_met {
            "Norm not met".to_string()
        } else {
            let mut current = context.clone();
            let mut results = Vec::with_capacity(calculations.len());
            for calc in calculations {
                let value = evaluate(&calc.logic, &current);
                current.insert(calc.target.clone(), value);
                results.push(format!("{}={}", calc.target, format_number(value)));
            }
            if results.is_empty() {
                "Met".to_string()
            } else {
                results.join(" ")
            }
        };
        self.emit(category, description, context, expected);
    }
}

fn edge_description(kind: &str, suffix: &str, target: &str, value: f64, threshold: f64) -> String {
    format!(
        "{}{} ({}={} vs {})",
        kind,
        suffix,
        target,
        format_number(value),
        format_number(threshold)
    )
}
