//! Error types for the rulecase scenario solver

use thiserror::Error;

/// Scenario generation errors
///
/// Business-rule fallbacks (undefined variables, division by zero, `IN`
/// predicates without a breaking value) are never reported through this
/// type; they are resolved silently by the evaluator and the solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Configuration errors
    /// Recursion through the Variable-Definition Table exceeded the depth guard
    ///
    /// **Triggered by:** A definitional cycle such as `A := B`, `B := A`, or a
    /// conditional variable whose branch condition references itself.
    /// **Recovery:** Fatal for the Entry Condition and the Norm block; a
    /// declared Variable hitting it is skipped and reported as a suite warning.
    #[error("Definition cycle detected while resolving {variable} (depth {depth})")]
    DefinitionCycle {
        /// Variable being resolved when the guard tripped
        variable: String,
        /// Recursion depth reached
        depth: usize,
    },

    /// A naming-convention pattern did not compile
    #[error("Invalid naming pattern {pattern}: {reason}")]
    InvalidNamingPattern {
        /// Offending pattern
        pattern: String,
        /// Regex compiler message
        reason: String,
    },

    /// Rule document is structurally inconsistent
    ///
    /// **Triggered by:** Duplicate variable targets, or a name declared both
    /// as a macro and as a variable.
    #[error("Invalid rule document: {0}")]
    InvalidDocument(String),

    // Recoverable conditions surfaced as warnings
    /// A parameter declared numeric could not be converted
    ///
    /// **Recovery:** The parameter is loaded as 0.
    #[error("Parameter {id} is declared numeric but has value {raw:?}; using 0")]
    ParameterConversion {
        /// Parameter identifier
        id: String,
        /// Raw text that failed to convert
        raw: String,
    },

    /// A Cartesian product exceeded the configured ceiling and was truncated
    #[error("Scenario ceiling reached in {block}: kept the first {limit} combinations")]
    ScenarioCeiling {
        /// Block being expanded
        block: String,
        /// Configured ceiling
        limit: usize,
    },

    /// A sabotage combination leaves its component satisfied
    ///
    /// **Triggered by:** A component held up by terms the solver may not
    /// write, such as `Vx1 + P36 > 0`.
    /// **Recovery:** The combination is dropped; no failure case is emitted.
    #[error("Component {component} still holds under its sabotage; failure case omitted")]
    UnbreakableComponent {
        /// Component that could not be falsified
        component: String,
    },

    /// A solved case does not reproduce its label from its emitted inputs
    ///
    /// **Recovery:** The case is dropped.
    #[error("{category} case with inputs {inputs} contradicts its label; case omitted")]
    ContradictoryCase {
        /// Category the case was meant for
        category: String,
        /// Emitted inputs, rendered
        inputs: String,
    },

    // External errors
    /// JSON (de)serialisation failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Generation cannot continue for the affected block
    Fatal,
    /// The affected item is skipped, generation continues
    Recoverable,
    /// Informational, the output is still complete enough to use
    Warning,
}

impl Error {
    /// Create a definition-cycle error
    pub fn cycle(variable: impl Into<String>, depth: usize) -> Self {
        Error::DefinitionCycle {
            variable: variable.into(),
            depth,
        }
    }

    /// Create an invalid-document error with a message
    pub fn document(msg: impl Into<String>) -> Self {
        Error::InvalidDocument(msg.into())
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::InvalidNamingPattern { .. } => ErrorSeverity::Fatal,
            Error::InvalidDocument(_) => ErrorSeverity::Fatal,

            Error::DefinitionCycle { .. } => ErrorSeverity::Recoverable,
            Error::Serialization(_) => ErrorSeverity::Recoverable,

            Error::ParameterConversion { .. } => ErrorSeverity::Warning,
            Error::ScenarioCeiling { .. } => ErrorSeverity::Warning,
            Error::UnbreakableComponent { .. } => ErrorSeverity::Warning,
            Error::ContradictoryCase { .. } => ErrorSeverity::Warning,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for rulecase operations
pub type Result<T> = std::result::Result<T, Error>;
