use serde::{Deserialize, Serialize};

use super::Node;

/// `target := logic` instruction from the Variables or Norm section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    /// Name being defined
    pub target: String,
    /// Defining expression
    pub logic: Node,
}

impl VariableDef {
    /// Create a definition
    pub fn new(target: impl Into<String>, logic: Node) -> Self {
        Self {
            target: target.into(),
            logic,
        }
    }
}

/// Item of the Norm-Observation section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NormItem {
    /// The boundary comparison of the norm
    Condition(Node),
    /// A calculated quantity reported with the norm
    Calculation(VariableDef),
}

/// Parsed rule document, as handed over by the external parser
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleDocument {
    /// Gating condition
    pub entry_condition: Node,
    /// Variables section, in declaration order
    pub variables: Vec<VariableDef>,
    /// Norm-Observation section
    pub norm_observation: Vec<NormItem>,
}

impl RuleDocument {
    /// The norm comparison. When several are present the last one wins.
    pub fn norm_condition(&self) -> Option<&Node> {
        self.norm_observation
            .iter()
            .filter_map(|item| match item {
                NormItem::Condition(node @ Node::Compare { .. }) => Some(node),
                _ => None,
            })
            .last()
    }

    /// Calculated quantities of the norm, in order
    pub fn norm_calculations(&self) -> Vec<&VariableDef> {
        self.norm_observation
            .iter()
            .filter_map(|item| match item {
                NormItem::Calculation(def) => Some(def),
                _ => None,
            })
            .collect()
    }
}
