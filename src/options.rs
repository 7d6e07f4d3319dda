//! Generation options
//!
//! Every magic number the solvers rely on lives here so a rule author can
//! tune them per document. Defaults reproduce the behaviour QA teams expect
//! from the existing suites.

use serde::{Deserialize, Serialize};

use crate::ast::NamingConvention;
use crate::error::Result;

/// Scenario generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Case ids start at `case_id_base + 1`
    pub case_id_base: u64,
    /// Seed for unbound inputs and floor for `>`/`>=` results in the forward solver
    pub baseline_value: f64,
    /// Value written to a macro delegate when the macro is switched on
    pub delegate_saturation: f64,
    /// Forward solver refinement passes (bounded, no convergence loop)
    pub refinement_passes: usize,
    /// Amount added past the threshold by proportional sabotage
    pub sabotage_margin: f64,
    /// Extra weight given to the negative side when breaking `>`/`>=`
    pub sabotage_counterweight: f64,
    /// Seed for unbound dependencies of calculation-only variable cases
    pub hydration_value: f64,
    /// Seed for unbound inputs of the norm block
    pub norm_hydration_value: f64,
    /// Value every root is deflated to in a function variation
    pub deflated_value: f64,
    /// Value the winning roots are inflated to in a function variation
    pub inflated_value: f64,
    /// Roots of losing MAX arguments in variable cases (the winner for MIN)
    pub minmax_loser_value: f64,
    /// Roots of the winning MAX argument in variable cases (the losers for MIN)
    pub minmax_winner_value: f64,
    /// Tie breaker on the first root of the winning argument (subtracted for MIN)
    pub minmax_winner_bonus: f64,
    /// Unit magnitude for POS balance-point cases
    pub pos_unit: f64,
    /// Recursion guard for delegation and root resolution
    pub max_delegation_depth: usize,
    /// Ceiling on Cartesian products per block
    pub max_scenarios_per_block: usize,
    /// Split multi-term comparisons into per-variable variants before solving
    pub expand_comparisons: bool,
    /// Naming convention for classifying unknown names
    pub naming: NamingConvention,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            case_id_base: 11_467,
            baseline_value: 1000.0,
            delegate_saturation: 1000.0,
            refinement_passes: 2,
            sabotage_margin: 2000.0,
            sabotage_counterweight: 1000.0,
            hydration_value: 100.0,
            norm_hydration_value: 1000.0,
            deflated_value: 10.0,
            inflated_value: 1000.0,
            minmax_loser_value: 100.0,
            minmax_winner_value: 1000.0,
            minmax_winner_bonus: 50.0,
            pos_unit: 100.0,
            max_delegation_depth: 64,
            max_scenarios_per_block: 512,
            expand_comparisons: true,
            naming: NamingConvention::default(),
        }
    }
}

impl GeneratorOptions {
    /// Load options from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
