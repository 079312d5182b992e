//! Error types for stepviz-model.

use thiserror::Error;

/// Result type for sequence validation.
pub type Result<T> = std::result::Result<T, StructuralViolation>;

/// A breach of the execution-sequence contract.
///
/// These indicate a defective generator or backend, never bad user input.
/// Positions are 0-based indices into the offending sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralViolation {
    #[error("execution sequence is empty")]
    EmptySequence,

    #[error("step at position {position} is numbered {found}, expected {expected}")]
    StepNumber {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("step at position {position} reports {found} total steps, sequence has {expected}")]
    TotalSteps {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("step at position {position} has edge {source_id} -> {target_id} referencing missing node {missing}")]
    DanglingEdge {
        position: usize,
        source_id: String,
        target_id: String,
        missing: String,
    },

    #[error("step at position {position} has duplicate node id {id}")]
    DuplicateNode { position: usize, id: String },

    #[error("step at position {position} highlights line {line}, code has {line_count} lines")]
    HighlightOutOfRange {
        position: usize,
        line: u32,
        line_count: usize,
    },
}

/// A wire name that does not match any known identity or operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what}: {name}")]
pub struct UnknownName {
    what: &'static str,
    name: String,
}

impl UnknownName {
    pub(crate) fn algorithm(name: &str) -> Self {
        Self {
            what: "algorithm",
            name: name.to_string(),
        }
    }

    pub(crate) fn operation(name: &str) -> Self {
        Self {
            what: "operation",
            name: name.to_string(),
        }
    }

    /// The name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}
