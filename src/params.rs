//! Parameter table
//!
//! Parameters are constants supplied once per rule document from an external
//! tabular source. This module converts the raw records into the numeric map
//! the evaluator uses. Conversion failures are recovered locally: the value
//! becomes `0` and a warning is returned to the caller.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::runtime::Assignment;

/// Declared type of a parameter record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    /// Numeric value (decimal comma accepted)
    Number,
    /// Calendar date, kept out of the numeric map
    Date,
    /// Free text, kept out of the numeric map
    Text,
}

impl From<String> for ParameterType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "number" | "numero" | "número" => ParameterType::Number,
            "date" | "fecha" => ParameterType::Date,
            _ => ParameterType::Text,
        }
    }
}

impl From<ParameterType> for String {
    fn from(kind: ParameterType) -> Self {
        match kind {
            ParameterType::Number => "number",
            ParameterType::Date => "date",
            ParameterType::Text => "text",
        }
        .to_string()
    }
}

/// One raw record of the parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Parameter name (`P31`)
    #[serde(alias = "ID")]
    pub id: String,
    /// Raw value text
    #[serde(alias = "Valor")]
    pub value: String,
    /// Declared type
    #[serde(alias = "Tipo")]
    pub kind: ParameterType,
}

impl ParameterRecord {
    /// Create a record
    pub fn new(id: impl Into<String>, value: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Numeric parameter map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: Assignment,
}

/// Result of converting parameter records
#[derive(Debug, Clone, Default)]
pub struct ParameterLoad {
    /// Converted parameters
    pub parameters: Parameters,
    /// Recoverable problems found during conversion
    pub warnings: Vec<Error>,
}

impl Parameters {
    /// Build from already numeric pairs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Convert raw records
    pub fn from_records<I>(records: I) -> ParameterLoad
    where
        I: IntoIterator<Item = ParameterRecord>,
    {
        let mut load = ParameterLoad::default();
        for record in records {
            let id = record.id.trim().to_string();
            match record.kind {
                ParameterType::Number => {
                    let raw = record.value.trim();
                    let value = match raw.replace(',', ".").parse::<f64>() {
                        Ok(v) if v.is_finite() => v,
                        _ => {
                            let warning = Error::ParameterConversion {
                                id: id.clone(),
                                raw: raw.to_string(),
                            };
                            tracing::warn!("{}", warning);
                            load.warnings.push(warning);
                            0.0
                        }
                    };
                    load.parameters.values.insert(id, value);
                }
                ParameterType::Date | ParameterType::Text => {
                    tracing::debug!("Parameter {} is not numeric; excluded from evaluation", id);
                }
            }
        }
        load
    }

    /// Value of a parameter
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of numeric parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no parameter is loaded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Underlying map
    pub fn into_values(self) -> Assignment {
        self.values
    }
}
