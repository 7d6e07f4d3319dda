//! Case orchestrator
//!
//! Sequences the solvers into the three case groups of a suite:
//!
//! 1. Entry condition: one `Cond. OK` case per satisfying path (the first is
//!    the golden baseline), one `Cond. NK` case per sabotaged component
//! 2. Variables: branch, polarity, argument and calculation cases per
//!    declared variable
//! 3. Norm observation: boundary pairs per function variation, plus a POS
//!    probe when a norm calculation clamps

use super::suite::ScenarioSuite;
use crate::ast::Node;
use crate::error::{Error, Result};
use crate::options::GeneratorOptions;
use crate::runtime::{describe_pairs, evaluate_truth, Assignment, RuleSet};
use crate::solver::Solver;

const DESCRIBED_ACTIVE_INPUTS: usize = 5;
const DESCRIBED_TRIGGERS: usize = 4;

/// Builds the scenario suite for one rule set
#[derive(Debug, Clone)]
pub struct ScenarioBuilder<'r> {
    rules: &'r RuleSet,
    options: GeneratorOptions,
}

impl<'r> ScenarioBuilder<'r> {
    /// Builder with explicit options
    pub fn new(rules: &'r RuleSet, options: GeneratorOptions) -> Self {
        Self { rules, options }
    }

    /// Builder with default options
    pub fn with_defaults(rules: &'r RuleSet) -> Self {
        Self::new(rules, GeneratorOptions::default())
    }

    /// Active options
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the full suite
    ///
    /// A definition cycle met while testing one declared variable skips that
    /// variable and is recorded in [`ScenarioSuite::warnings`]; a cycle in
    /// the entry condition or the norm block aborts the build.
    pub fn build(&self) -> Result<ScenarioSuite> {
        let mut session = Session::new(self.rules, &self.options);

        let golden = session.entry_condition_cases()?;
        session.variable_cases(&golden);
        session.norm_cases(&golden)?;

        let suite = session.finish();
        tracing::debug!("Generated {} case(s)", suite.len());
        Ok(suite)
    }
}

/// State of one build
pub(crate) struct Session<'r> {
    pub(crate) rules: &'r RuleSet,
    pub(crate) options: &'r GeneratorOptions,
    pub(crate) solver: Solver<'r>,
    pub(crate) suite: ScenarioSuite,
}

impl<'r> Session<'r> {
    fn new(rules: &'r RuleSet, options: &'r GeneratorOptions) -> Self {
        Self {
            rules,
            options,
            solver: Solver::new(rules, options),
            suite: ScenarioSuite::new(options.case_id_base),
        }
    }

    fn finish(mut self) -> ScenarioSuite {
        for warning in self.solver.take_warnings() {
            self.suite.push_warning(warning);
        }
        self.suite
    }

    /// Append a case, exposing only the externally suppliable inputs
    pub(crate) fn emit(
        &mut self,
        category: impl Into<String>,
        description: impl Into<String>,
        inputs: &Assignment,
        expected: impl Into<String>,
    ) {
        let visible = self.rules.emittable(inputs);
        self.suite.push(category, description, visible, expected);
    }

    /// Entry-condition cases; returns the golden baseline
    fn entry_condition_cases(&mut self) -> Result<Assignment> {
        let rules = self.rules;
        let block = &rules.document().entry_condition;

        let mut satisfying = self.solver.satisfying_scenarios(block)?;
        satisfying.retain(|inputs| self.reproduces(block, inputs, true));
        let golden = satisfying.first().cloned().unwrap_or_default();
        for (i, inputs) in satisfying.iter().enumerate() {
            let description = format!("Valid path #{}: {}", i + 1, self.describe(inputs));
            self.emit("Cond. OK", description, inputs, "Meets condition");
        }

        // golden is also the reference satisfying assignment
        let failures = self.solver.failure_scenarios(block)?;
        let mut block_index = 0;
        for sabotage in &failures {
            let mut inputs = golden.clone();
            inputs.extend(sabotage.iter().map(|(k, v)| (k.clone(), *v)));
            if !self.reproduces(block, &inputs, false) {
                continue;
            }
            block_index += 1;

            let triggers: Vec<&str> = sabotage
                .keys()
                .map(String::as_str)
                .filter(|k| !rules.is_parameter(k))
                .take(DESCRIBED_TRIGGERS)
                .collect();
            let description = format!(
                "Forced failure in block #{} (Trigger: {})",
                block_index,
                triggers.join(", ")
            );
            self.emit("Cond. NK", description, &inputs, "Fails condition");
        }

        Ok(golden)
    }

    /// True if the emitted view of `inputs` gives `block` the outcome
    /// `holds`; a mismatch is recorded as a warning
    fn reproduces(&mut self, block: &Node, inputs: &Assignment, holds: bool) -> bool {
        let rules = self.rules;
        if evaluate_truth(block, &rules.replay(inputs)) == holds {
            return true;
        }
        let category = if holds { "Cond. OK" } else { "Cond. NK" };
        let warning = Error::ContradictoryCase {
            category: category.to_string(),
            inputs: format!("{:?}", rules.emittable(inputs)),
        };
        tracing::warn!("{}", warning);
        self.suite.push_warning(warning);
        false
    }

    fn describe(&self, inputs: &Assignment) -> String {
        let rules = self.rules;
        let active = describe_pairs(inputs, DESCRIBED_ACTIVE_INPUTS, |k, v| {
            v != 0.0 && !rules.is_parameter(k)
        });
        if active.is_empty() {
            "Default".to_string()
        } else {
            format!("Activating {}...", active.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RuleDocument;
    use crate::params::Parameters;
    use crate::runtime::evaluate_truth;

    fn rules(entry: Node) -> RuleSet {
        let document = RuleDocument {
            entry_condition: entry,
            ..RuleDocument::default()
        };
        RuleSet::new(document, Default::default(), Parameters::from_pairs([("P1", 10.0)])).unwrap()
    }

    #[test]
    fn test_entry_condition_groups() {
        let entry = Node::var("Vx1")
            .gt(Node::var("P1"))
            .and(Node::var("C7").lt(Node::constant(50.0)));
        let rules = rules(entry.clone());
        let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();

        let ok: Vec<_> = suite.by_category("Cond. OK").collect();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].id, 11_468);
        assert_eq!(ok[0].expected, "Meets condition");
        assert!(ok[0].description.starts_with("Valid path #1: Activating "));
        assert!(evaluate_truth(&entry, &rules.with_parameters(&ok[0].inputs)));

        let nk: Vec<_> = suite.by_category("Cond. NK").collect();
        assert_eq!(nk.len(), 2);
        assert_eq!(nk[0].description, "Forced failure in block #1 (Trigger: Vx1)");
        for case in nk {
            assert!(!evaluate_truth(&entry, &rules.with_parameters(&case.inputs)));
        }
    }

    #[test]
    fn test_empty_entry_condition_is_default_path() {
        let rules = rules(Node::default());
        let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.cases()[0].description, "Valid path #1: Default");
        assert!(suite.cases()[0].inputs.is_empty());
    }

    #[test]
    fn test_component_held_by_parameter_gets_no_failure_case() {
        let rules = rules(Node::var("Vx1").add(Node::var("P1")).gt(Node::constant(0.0)));
        let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
        assert_eq!(suite.by_category("Cond. OK").count(), 1);
        assert_eq!(suite.by_category("Cond. NK").count(), 0);
        assert!(suite
            .warnings()
            .iter()
            .any(|w| matches!(w, Error::UnbreakableComponent { .. })));
    }

    #[test]
    fn test_parameters_never_emitted() {
        let rules = rules(Node::var("Vx1").ge(Node::var("P1")));
        let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
        for case in suite.cases() {
            assert!(!case.inputs.contains_key("P1"));
            assert!(case.inputs.values().all(|v| *v != 0.0));
        }
    }
}
