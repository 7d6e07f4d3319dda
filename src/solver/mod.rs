//! Symbolic scenario solver
//!
//! Finds input assignments that satisfy or falsify rule conditions.
//!
//! # Architecture
//!
//! ```text
//! condition ──► flatten AND/OR ──► predicates ──► forward solver ──┐
//!                    │                                             │
//!                    └──────────► sabotage modes ──────────────────┤
//!                                                                  ▼
//!                                                 smart set (delegation)
//!                                                   │    ▲
//!                                 conditional defs  └────┘ re-enter the solvers
//! ```
//!
//! The solver borrows the [`RuleSet`] and [`GeneratorOptions`] for the whole
//! build. Delegation and the combinatorial solvers are mutually recursive;
//! every hop carries a depth that is checked against
//! `max_delegation_depth`, so a definitional cycle surfaces as
//! [`Error::DefinitionCycle`] instead of overflowing the stack.

mod combinatorics;
mod delegation;
mod forward;
mod sabotage;
mod tables;

pub use combinatorics::{capped_product, expand_comparison};
pub use delegation::BranchIntent;
pub use tables::{boundary_value, broken_value};

use crate::error::Error;
use crate::options::GeneratorOptions;
use crate::runtime::RuleSet;

/// Scenario solver over one rule set
#[derive(Debug)]
pub struct Solver<'r> {
    rules: &'r RuleSet,
    options: &'r GeneratorOptions,
    warnings: Vec<Error>,
}

impl<'r> Solver<'r> {
    /// Create a solver
    pub fn new(rules: &'r RuleSet, options: &'r GeneratorOptions) -> Self {
        Self {
            rules,
            options,
            warnings: Vec::new(),
        }
    }

    /// Rule set being solved
    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    /// Active options
    pub fn options(&self) -> &'r GeneratorOptions {
        self.options
    }

    /// Drain the recoverable problems collected so far
    pub fn take_warnings(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.warnings)
    }

    fn warn(&mut self, warning: Error) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
