//! Naming-convention classifier
//!
//! Rule documents distinguish inputs from parameters purely by name prefix:
//! vectors start with `Vx`, form codes are `C` followed by digits and
//! parameters are `P` followed by digits. Anything else is an internal
//! (derived) name unless the rule set knows better.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::VarKind;
use crate::error::{Error, Result};

/// Default pattern for vector inputs
pub const DEFAULT_VECTOR_PATTERN: &str = r"^Vx";
/// Default pattern for form-code inputs
pub const DEFAULT_CODE_PATTERN: &str = r"^C\d";
/// Default pattern for parameters
pub const DEFAULT_PARAMETER_PATTERN: &str = r"^P\d";

lazy_static::lazy_static! {
    static ref DEFAULT_CLASSIFIER: Classifier = Classifier {
        vector: Regex::new(DEFAULT_VECTOR_PATTERN).expect("default vector pattern compiles"),
        code: Regex::new(DEFAULT_CODE_PATTERN).expect("default code pattern compiles"),
        parameter: Regex::new(DEFAULT_PARAMETER_PATTERN)
            .expect("default parameter pattern compiles"),
    };
}

/// Classifier for the built-in `Vx` / `C\d` / `P\d` convention
pub fn default_classifier() -> &'static Classifier {
    &DEFAULT_CLASSIFIER
}

/// Configurable naming convention (regex source patterns)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    /// Pattern identifying vector inputs
    pub vector_pattern: String,
    /// Pattern identifying form-code inputs
    pub code_pattern: String,
    /// Pattern identifying parameters
    pub parameter_pattern: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            vector_pattern: DEFAULT_VECTOR_PATTERN.to_string(),
            code_pattern: DEFAULT_CODE_PATTERN.to_string(),
            parameter_pattern: DEFAULT_PARAMETER_PATTERN.to_string(),
        }
    }
}

impl NamingConvention {
    /// Compile the patterns
    pub fn compile(&self) -> Result<Classifier> {
        Ok(Classifier {
            vector: compile_pattern(&self.vector_pattern)?,
            code: compile_pattern(&self.code_pattern)?,
            parameter: compile_pattern(&self.parameter_pattern)?,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidNamingPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled naming convention
#[derive(Debug, Clone)]
pub struct Classifier {
    vector: Regex,
    code: Regex,
    parameter: Regex,
}

impl Classifier {
    /// Classify a bare name. Names matching no pattern are `Derived`.
    pub fn classify(&self, name: &str) -> VarKind {
        let name = name.trim();
        if self.vector.is_match(name) {
            VarKind::InputVector
        } else if self.code.is_match(name) {
            VarKind::InputCode
        } else if self.parameter.is_match(name) {
            VarKind::Parameter
        } else {
            VarKind::Derived
        }
    }
}
