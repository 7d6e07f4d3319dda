//! # Rulecase - Scenario Solver for Business Rules
//!
//! Turns declarative business rules (an entry condition, a list of derived
//! variables and a norm observation) into an exhaustive suite of test cases:
//! concrete input assignments that exercise every satisfying path, every
//! failure mode, every branch of every conditional variable and both sides
//! of every norm boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use rulecase::{Node, Parameters, RuleDocument, RuleSet, ScenarioBuilder};
//!
//! # fn main() -> rulecase::Result<()> {
//! // Vx1 > P1
//! let document = RuleDocument {
//!     entry_condition: Node::var("Vx1").gt(Node::var("P1")),
//!     ..RuleDocument::default()
//! };
//! let rules = RuleSet::new(
//!     document,
//!     Default::default(),
//!     Parameters::from_pairs([("P1", 10.0)]),
//! )?;
//!
//! let suite = ScenarioBuilder::with_defaults(&rules).build()?;
//!
//! let ok: Vec<_> = suite.by_category("Cond. OK").collect();
//! assert_eq!(ok.len(), 1);
//! assert_eq!(ok[0].inputs.get("Vx1"), Some(&1000.0));
//!
//! // zeroed inputs are left out of a case
//! let nk: Vec<_> = suite.by_category("Cond. NK").collect();
//! assert_eq!(nk.len(), 1);
//! assert!(nk[0].inputs.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RuleDocument + macros + parameters
//!         │
//!         ▼
//!      RuleSet ──► Solver (forward / combinatorics / sabotage / delegation)
//!         │               │
//!         └──────► ScenarioBuilder ──► ScenarioSuite ──► JSON
//! ```
//!
//! ### Main Components
//!
//! - [`RuleSet`] - Definition, macro and parameter tables plus the evaluator context
//! - [`Solver`] - Satisfying and failure assignments for a condition block
//! - [`ScenarioBuilder`] - Orchestrates the three case groups
//! - [`ScenarioSuite`] - Ordered, numbered test cases and collected warnings
//! - [`GeneratorOptions`] - Every tunable constant of the solvers
//!
//! ## Business Rules
//!
//! - An undefined variable evaluates to `0`
//! - Division by zero evaluates to `0`
//! - Parameters are constants: they are never written and never emitted
//!
//! ## Error Handling
//!
//! Definition cycles are caught by a depth guard and reported as
//! [`Error::DefinitionCycle`]. A cycle inside one declared variable skips
//! that variable only; see [`ScenarioSuite::warnings`].

/// Version of the rulecase library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ast;
pub mod error;
pub mod generator;
pub mod logic;
pub mod options;
pub mod params;
pub mod runtime;
pub mod solver;

// Re-export main types
pub use ast::{
    ArithOp, CompareOp, Function, LogicOp, NamingConvention, Node, NormItem, RuleDocument,
    VarKind, VariableDef,
};
pub use error::{Error, ErrorSeverity, Result};
pub use generator::{CategoryCount, ScenarioBuilder, ScenarioSuite, TestCase};
pub use logic::{extract_predicates, Predicate};
pub use options::GeneratorOptions;
pub use params::{ParameterRecord, ParameterType, Parameters};
pub use runtime::{evaluate, evaluate_truth, Assignment, RuleSet};
pub use solver::Solver;
