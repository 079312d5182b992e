//! Operation execution backends.

use async_trait::async_trait;
use stepviz_model::{AlgorithmKind, ExecutionSequence, Operation};
use tracing::{debug, warn};

use crate::error::BackendError;

/// Produces the execution sequence for one operation invocation.
///
/// Implementations may compute locally or call out to a remote service;
/// sessions treat them as an opaque asynchronous dependency.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn perform_operation(
        &self,
        kind: AlgorithmKind,
        operation: Operation,
        value: i64,
    ) -> Result<ExecutionSequence, BackendError>;
}

/// Runs the step generator in-process.
#[derive(Debug, Clone, Copy)]
pub struct LocalBackend {
    strict: bool,
}

impl LocalBackend {
    /// A backend that rejects operations outside the algorithm's category.
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// A backend that accepts any operation, answering unknown ones with
    /// the generic single step.
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn with_strict(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn perform_operation(
        &self,
        kind: AlgorithmKind,
        operation: Operation,
        value: i64,
    ) -> Result<ExecutionSequence, BackendError> {
        if self.strict && !kind.category().supports(operation) {
            warn!(%kind, %operation, "Rejecting unsupported operation");
            return Err(BackendError::Unsupported { kind, operation });
        }

        let sequence = stepviz_generator::generate(kind, operation, value)?;
        debug!(%kind, %operation, value, steps = sequence.len(), "Generated sequence");
        Ok(sequence)
    }
}
