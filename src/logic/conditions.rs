//! Condition inventory
//!
//! Lists every terminal comparison of a rule document with the section and
//! declared variable it belongs to, so reviewers can see what the generated
//! suite is expected to cover.

use std::fmt;

use serde::Serialize;

use crate::ast::{Node, NormItem, RuleDocument};

/// Section of a rule document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    /// Gating condition
    EntryCondition,
    /// Variables section
    Variables,
    /// Norm-Observation section
    NormObservation,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Section::EntryCondition => "Entry Condition",
            Section::Variables => "Variables",
            Section::NormObservation => "Norm Observation",
        };
        write!(f, "{}", name)
    }
}

/// One comparison found in the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionEntry {
    /// Section containing the comparison
    pub section: Section,
    /// Variable whose definition contains it, if any
    pub origin: Option<String>,
    /// Readable rendering
    pub expression: String,
}

/// Collect every comparison of `document`, in document order
pub fn inventory(document: &RuleDocument) -> Vec<ConditionEntry> {
    let mut entries = Vec::new();

    collect(&document.entry_condition, Section::EntryCondition, None, &mut entries);
    for def in &document.variables {
        collect(&def.logic, Section::Variables, Some(&def.target), &mut entries);
    }
    for item in &document.norm_observation {
        match item {
            NormItem::Condition(node) => {
                collect(node, Section::NormObservation, None, &mut entries)
            }
            NormItem::Calculation(def) => collect(
                &def.logic,
                Section::NormObservation,
                Some(&def.target),
                &mut entries,
            ),
        }
    }
    entries
}

fn collect(node: &Node, section: Section, origin: Option<&str>, out: &mut Vec<ConditionEntry>) {
    if let Node::Compare { .. } = node {
        out.push(ConditionEntry {
            section,
            origin: origin.map(str::to_string),
            expression: node.to_string(),
        });
        return;
    }
    for child in node.children() {
        collect(child, section, origin, out);
    }
}
