//! Rule AST
//!
//! Expression trees and rule documents as produced by the (external) rule
//! parser.

mod document;
mod naming;
mod node;

pub use document::{NormItem, RuleDocument, VariableDef};
pub use naming::{default_classifier, Classifier, NamingConvention};
pub use node::{ArithOp, CompareOp, Function, LogicOp, Node, VarKind};
