//! Function-variation generator
//!
//! For every `MIN`/`MAX`/`POS` call in an expression, builds contexts that
//! make each competing side win: one per `MIN`/`MAX` argument, and for `POS`
//! one where the positive side dominates and one where the negative side
//! cancels it. Variations are deduplicated by label.

use crate::ast::{Function, Node};
use crate::error::Result;
use crate::logic::decompose_additive;
use crate::options::GeneratorOptions;
use crate::runtime::{Assignment, RuleSet};

/// A labelled context for one competing side
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    /// Description suffix, e.g. `(Arg2 of MAX wins)`
    pub label: String,
    /// Base context with the competing roots skewed
    pub context: Assignment,
}

/// Variations for every competitive call in `node`
pub fn function_variations(
    rules: &RuleSet,
    options: &GeneratorOptions,
    node: &Node,
    base: &Assignment,
) -> Result<Vec<Variation>> {
    let depth = options.max_delegation_depth;
    let mut variations = Vec::new();

    for call in node.find_calls(&[Function::Max, Function::Min, Function::Pos]) {
        let (function, args) = match call {
            Node::Call { function, args } => (*function, args),
            _ => continue,
        };

        match function {
            Function::Min | Function::Max => {
                let per_argument = args
                    .iter()
                    .map(|arg| rules.roots(arg, depth))
                    .collect::<Result<Vec<_>>>()?;
                let involved: Vec<String> = per_argument.iter().flatten().cloned().collect();

                for (i, roots) in per_argument.iter().enumerate() {
                    if roots.is_empty() {
                        continue;
                    }
                    let label = format!("(Arg{} of {} wins)", i + 1, function.name());
                    push_unique(&mut variations, label, || {
                        skew(rules, options, base, &involved, roots)
                    });
                }
            }
            Function::Pos => {
                let inner = match args.first() {
                    Some(inner) => inner,
                    None => continue,
                };
                let polarity = decompose_additive(inner);
                let positive = rules.resolve_roots(&polarity.positive, depth)?;
                let negative = rules.resolve_roots(&polarity.negative, depth)?;
                let involved: Vec<String> = positive.iter().chain(&negative).cloned().collect();

                if !positive.is_empty() {
                    push_unique(&mut variations, "(POS active)".to_string(), || {
                        skew(rules, options, base, &involved, &positive)
                    });
                }
                if !negative.is_empty() {
                    push_unique(&mut variations, "(POS cancelled)".to_string(), || {
                        skew(rules, options, base, &involved, &negative)
                    });
                }
            }
        }
    }

    Ok(variations)
}

fn push_unique<F>(variations: &mut Vec<Variation>, label: String, context: F)
where
    F: FnOnce() -> Assignment,
{
    if variations.iter().any(|v| v.label == label) {
        return;
    }
    variations.push(Variation {
        label,
        context: context(),
    });
}

/// Deflate every involved root, then inflate the winners; parameters stay put
fn skew(
    rules: &RuleSet,
    options: &GeneratorOptions,
    base: &Assignment,
    involved: &[String],
    winners: &[String],
) -> Assignment {
    let mut context = base.clone();
    for root in involved.iter().filter(|r| !rules.is_parameter(r)) {
        context.insert(root.clone(), options.deflated_value);
    }
    for root in winners.iter().filter(|r| !rules.is_parameter(r)) {
        context.insert(root.clone(), options.inflated_value);
    }
    context
}
