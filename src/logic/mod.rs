//! Logical structure analysis
//!
//! AND/OR flattening, predicate extraction, polarity decomposition and the
//! condition inventory. Everything here is pure and works on borrowed trees.

pub mod conditions;
mod flatten;
mod polarity;
mod predicates;

pub use conditions::{inventory, ConditionEntry, Section};
pub use flatten::{flatten, flatten_product};
pub use polarity::{decompose_additive, unwrap_pos, Polarity};
pub use predicates::{extract_predicates, leader, Predicate};
