//! Runtime: evaluation of rule expressions and the rule-set lookup tables

mod evaluator;
mod rules;
mod value;

pub use evaluator::{evaluate, evaluate_truth};
pub use rules::RuleSet;
pub use value::{describe_pairs, format_number, from_bool, normalize, truthy, Assignment};
