//! Test-case generation
//!
//! Turns a [`RuleSet`](crate::runtime::RuleSet) into an ordered
//! [`ScenarioSuite`]: entry-condition cases first, then per-variable cases,
//! then norm cases.

mod builder;
mod norms;
mod suite;
mod variables;
mod variations;

pub use builder::ScenarioBuilder;
pub use suite::{CategoryCount, ScenarioSuite, TestCase};
pub use variations::{function_variations, Variation};
