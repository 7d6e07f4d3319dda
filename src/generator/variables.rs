//! Per-variable cases
//!
//! Each declared variable is tested according to the shape of its
//! definition:
//!
//! - `IF(c; t; f)`: both branches, entered by satisfying or breaking `c`
//! - `POS(a - b)`: the two sides of the balance point, with derived terms
//!   expanded down to the inputs behind them
//! - `MIN`/`MAX`: one case per winning argument
//! - anything else: one computed value with hydrated dependencies

use super::builder::Session;
use crate::ast::{Function, Node, VariableDef};
use crate::error::Result;
use crate::runtime::{describe_pairs, evaluate, format_number, Assignment};

impl<'r> Session<'r> {
    /// Cases for every declared variable; a failing variable is skipped
    pub(crate) fn variable_cases(&mut self, golden: &Assignment) {
        let rules = self.rules;
        for def in &rules.document().variables {
            if let Err(err) = self.variable(def, golden) {
                tracing::error!("Skipping cases for {}: {}", def.target, err);
                self.suite.push_warning(err);
            }
        }
    }

    fn variable(&mut self, def: &VariableDef, golden: &Assignment) -> Result<()> {
        self.dispatch(&def.target, &def.logic, golden, "")
    }

    fn dispatch(&mut self, target: &str, logic: &Node, base: &Assignment, prefix: &str) -> Result<()> {
        match logic {
            Node::Conditional {
                cond,
                when_true,
                when_false,
            } => self.conditional(target, cond, when_true, when_false, base, prefix),
            Node::Call {
                function: Function::Pos,
                args,
            } => match args.first() {
                Some(inner) => self.pos_balance(target, logic, inner, base, prefix),
                None => self.calculation_only(target, logic, base, prefix),
            },
            Node::Call {
                function: function @ (Function::Min | Function::Max),
                args,
            } if args.len() >= 2 => self.argument_wins(target, logic, *function, args, base, prefix),
            _ => self.calculation_only(target, logic, base, prefix),
        }
    }

    fn conditional(
        &mut self,
        target: &str,
        cond: &Node,
        when_true: &Node,
        when_false: &Node,
        base: &Assignment,
        prefix: &str,
    ) -> Result<()> {
        let rules = self.rules;

        let mut branches = Vec::with_capacity(2);
        branches.push(("Branch TRUE", when_true, self.solver.satisfying_scenarios(cond)?));
        let mut breaking = self.solver.failure_scenarios(cond)?;
        if breaking.is_empty() {
            breaking.push(Assignment::new());
        }
        branches.push(("Branch FALSE", when_false, breaking));

        for (label, value_logic, triggers) in branches {
            for trigger in triggers {
                let mut context = base.clone();
                context.extend(trigger);

                let actives = describe_pairs(&context, usize::MAX, |k, _| {
                    !base.contains_key(k) && !rules.is_parameter(k)
                });
                let full_label = if actives.is_empty() {
                    format!("{}{}", prefix, label)
                } else {
                    format!("{}{} (Trigger: {})", prefix, label, actives.join(", "))
                };

                self.dispatch(target, value_logic, &context, &format!("{} -> ", full_label))?;
            }
        }
        Ok(())
    }

    fn pos_balance(
        &mut self,
        target: &str,
        logic: &Node,
        inner: &Node,
        base: &Assignment,
        prefix: &str,
    ) -> Result<()> {
        let rules = self.rules;
        let polarity = rules.expand_polarity(inner, self.options.max_delegation_depth)?;
        if !polarity.has_negative() {
            return self.calculation_only(target, logic, base, prefix);
        }

        let unit = self.options.pos_unit;
        let positive_value = polarity.negative.len().max(1) as f64 * unit;
        let negative_value = polarity.positive.len().max(1) as f64 * unit;

        let writable = |atoms: &[String]| -> Vec<String> {
            atoms
                .iter()
                .filter(|a| !rules.is_parameter(a))
                .cloned()
                .collect()
        };
        let fixed = |atoms: &[String]| -> f64 {
            atoms.iter().filter_map(|a| rules.parameters().get(a)).sum()
        };
        let positive = writable(&polarity.positive[..]);
        let negative = writable(&polarity.negative[..]);

        // side totals at the balance point, parameters included
        let positive_total = positive.len() as f64 * positive_value + fixed(&polarity.positive[..]);
        let negative_total = negative.len() as f64 * negative_value + fixed(&polarity.negative[..]);

        let mut balanced = base.clone();
        for atom in &positive {
            balanced.insert(atom.clone(), positive_value);
        }
        for atom in &negative {
            balanced.insert(atom.clone(), negative_value);
        }

        let mut active = balanced.clone();
        if let Some(first) = positive.first() {
            *active.entry(first.clone()).or_insert(0.0) +=
                (negative_total - positive_total).max(0.0) + 1.0;
        }
        self.finalize(target, logic, &active, format!("{}POS > 0", prefix));

        let mut clamped = balanced;
        match negative.first() {
            Some(first) => {
                *clamped.entry(first.clone()).or_insert(0.0) +=
                    (positive_total - negative_total).max(0.0) + 1.0
            }
            None => {
                for atom in &positive {
                    clamped.insert(atom.clone(), 0.0);
                }
            }
        }
        self.finalize(target, logic, &clamped, format!("{}POS = 0", prefix));
        Ok(())
    }

    fn argument_wins(
        &mut self,
        target: &str,
        logic: &Node,
        function: Function,
        args: &[Node],
        base: &Assignment,
        prefix: &str,
    ) -> Result<()> {
        let rules = self.rules;
        let depth = self.options.max_delegation_depth;
        let per_argument = args
            .iter()
            .map(|arg| rules.roots(arg, depth))
            .collect::<Result<Vec<_>>>()?;

        // the MIN winner is the smallest argument
        let (high, low, bonus) = (
            self.options.minmax_winner_value,
            self.options.minmax_loser_value,
            self.options.minmax_winner_bonus,
        );
        let (winner, loser, bonus) = match function {
            Function::Min => (low, high, -bonus),
            _ => (high, low, bonus),
        };

        for (i, roots) in per_argument.iter().enumerate() {
            let mut inputs = base.clone();
            for (j, other) in per_argument.iter().enumerate() {
                if j == i {
                    continue;
                }
                for root in other.iter().filter(|r| !rules.is_parameter(r)) {
                    inputs.insert(root.clone(), loser);
                }
            }
            let writable: Vec<&String> = roots.iter().filter(|r| !rules.is_parameter(r)).collect();
            for root in &writable {
                inputs.insert((*root).clone(), winner);
            }
            if let Some(first) = writable.first() {
                *inputs.entry((*first).clone()).or_insert(0.0) += bonus;
            }

            let label = format!("{}{}: argument {} wins", prefix, function.name(), i + 1);
            self.finalize(target, logic, &inputs, label);
        }
        Ok(())
    }

    fn calculation_only(&mut self, target: &str, logic: &Node, base: &Assignment, prefix: &str) -> Result<()> {
        let rules = self.rules;
        let mut inputs = base.clone();
        for root in rules.roots(logic, self.options.max_delegation_depth)? {
            if root != target
                && !rules.is_parameter(&root)
                && rules.is_input(&root)
                && !inputs.contains_key(&root)
            {
                inputs.insert(root, self.options.hydration_value);
            }
        }
        self.finalize(target, logic, &inputs, format!("{}Calc", prefix));
        Ok(())
    }

    /// Recalculate the variable from the inputs the case exposes and emit it
    fn finalize(&mut self, target: &str, logic: &Node, inputs: &Assignment, description: String) {
        let context = self.rules.replay(inputs);
        let value = context
            .get(target)
            .copied()
            .unwrap_or_else(|| evaluate(logic, &context));
        self.emit(target, description, inputs, format_number(value));
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Function, Node, RuleDocument, VariableDef};
    use crate::error::Error;
    use crate::generator::ScenarioBuilder;
    use crate::params::Parameters;
    use crate::runtime::{format_number, RuleSet};

    fn rules_for(variables: Vec<VariableDef>) -> RuleSet {
        let document = RuleDocument {
            variables,
            ..RuleDocument::default()
        };
        RuleSet::new(
            document,
            Default::default(),
            Parameters::from_pairs([("P36", 250.0)]),
        )
        .unwrap()
    }

    fn suite_for(variables: Vec<VariableDef>) -> crate::generator::ScenarioSuite {
        let rules = rules_for(variables);
        ScenarioBuilder::with_defaults(&rules).build().unwrap()
    }

    #[test]
    fn test_calculation_hydrates_inputs() {
        let suite = suite_for(vec![VariableDef::new(
            "TOTAL",
            Node::var("C1").add(Node::var("C2")).add(Node::var("P36")),
        )]);
        let cases: Vec<_> = suite.by_category("TOTAL").collect();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].description, "Calc");
        assert_eq!(cases[0].expected, "450");
        assert_eq!(cases[0].inputs.get("C1"), Some(&100.0));
    }

    #[test]
    fn test_conditional_branches() {
        let suite = suite_for(vec![VariableDef::new(
            "FLAG",
            Node::conditional(
                Node::var("C1").gt(Node::var("P36")),
                Node::constant(1.0),
                Node::constant(0.0),
            ),
        )]);
        let cases: Vec<_> = suite.by_category("FLAG").collect();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].description, "Branch TRUE (Trigger: C1=1000) -> Calc");
        assert_eq!(cases[0].expected, "1");
        assert_eq!(cases[1].description, "Branch FALSE (Trigger: C1=0) -> Calc");
        assert_eq!(cases[1].expected, "0");
    }

    #[test]
    fn test_pos_balance_point() {
        let suite = suite_for(vec![VariableDef::new(
            "NET",
            Node::call(
                Function::Pos,
                vec![Node::var("C1").add(Node::var("C2")).sub(Node::var("C3"))],
            ),
        )]);
        let cases: Vec<_> = suite.by_category("NET").collect();
        assert_eq!(cases.len(), 2);
        // positives 100 each (+1 on the first), negative 200
        assert_eq!(cases[0].description, "POS > 0");
        assert_eq!(cases[0].expected, "1");
        assert_eq!(cases[1].description, "POS = 0");
        assert_eq!(cases[1].expected, "0");
    }

    #[test]
    fn test_pos_balance_against_parameter() {
        let suite = suite_for(vec![VariableDef::new(
            "OVER",
            Node::call(Function::Pos, vec![Node::var("C1").sub(Node::var("P36"))]),
        )]);
        let cases: Vec<_> = suite.by_category("OVER").collect();
        assert_eq!(cases[0].inputs.get("C1"), Some(&251.0));
        assert_eq!(cases[0].expected, "1");
        assert!(cases[1].inputs.is_empty());
        assert_eq!(cases[1].expected, "0");
    }

    #[test]
    fn test_pos_balance_through_derived_terms() {
        let variables = vec![
            VariableDef::new("BASE", Node::var("C104").sub(Node::var("C106"))),
            VariableDef::new(
                "NET",
                Node::call(Function::Pos, vec![Node::var("BASE").sub(Node::var("P36"))]),
            ),
        ];
        let rules = rules_for(variables);
        let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
        let cases: Vec<_> = suite.by_category("NET").collect();
        assert_eq!(cases.len(), 2);

        // the balance point sits on the inputs, never on BASE
        assert_eq!(cases[0].inputs.get("C104"), Some(&351.0));
        assert!(!cases[0].inputs.contains_key("BASE"));
        assert_eq!(cases[0].expected, "1");
        assert_eq!(cases[1].inputs.get("C106"), Some(&101.0));
        assert_eq!(cases[1].expected, "0");

        for case in cases {
            let replayed = rules.replay(&case.inputs);
            assert_eq!(format_number(replayed["NET"]), case.expected, "{:?}", case);
        }
    }

    #[test]
    fn test_max_argument_wins() {
        let suite = suite_for(vec![VariableDef::new(
            "TOP",
            Node::call(Function::Max, vec![Node::var("C1"), Node::var("Vx2")]),
        )]);
        let cases: Vec<_> = suite.by_category("TOP").collect();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].description, "MAX: argument 1 wins");
        assert_eq!(cases[0].expected, "1050");
        assert_eq!(cases[1].inputs.get("C1"), Some(&100.0));
        assert_eq!(cases[1].expected, "1050");
    }

    #[test]
    fn test_min_winner_is_the_smallest() {
        let suite = suite_for(vec![VariableDef::new(
            "LOW",
            Node::call(Function::Min, vec![Node::var("C1"), Node::var("C2")]),
        )]);
        let cases: Vec<_> = suite.by_category("LOW").collect();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].description, "MIN: argument 1 wins");
        assert_eq!(cases[0].inputs.get("C1"), Some(&50.0));
        assert_eq!(cases[0].inputs.get("C2"), Some(&1000.0));
        assert_eq!(cases[0].expected, "50");
        assert_eq!(cases[1].inputs.get("C2"), Some(&50.0));
    }

    #[test]
    fn test_cycle_skips_only_that_variable() {
        let suite = suite_for(vec![
            VariableDef::new(
                "LOOP",
                Node::conditional(
                    Node::var("LOOP").gt(Node::constant(0.0)),
                    Node::constant(1.0),
                    Node::constant(0.0),
                ),
            ),
            VariableDef::new("AFTER", Node::var("C9").mul(Node::constant(2.0))),
        ]);
        assert!(suite
            .warnings()
            .iter()
            .any(|w| matches!(w, Error::DefinitionCycle { .. })));
        assert_eq!(suite.by_category("AFTER").count(), 1);
    }
}
