//! Selection, operation input and request supersession around one
//! playback engine.

use serde::{Deserialize, Serialize};
use stepviz_model::{AlgorithmKind, ExecutionSequence, Operation, Step};
use tracing::{debug, info, warn};

use crate::backend::ExecutionBackend;
use crate::error::{BackendError, Error, Result};
use crate::playback::{PlaybackEngine, PlaybackStatus, Speed};
use crate::ticker::{Tick, TickSource};

/// User-editable operation input, clamped to `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct OperationValue(i64);

impl OperationValue {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 100;

    pub fn new(value: i64) -> Self {
        OperationValue(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Default for OperationValue {
    fn default() -> Self {
        OperationValue(42)
    }
}

impl From<i64> for OperationValue {
    fn from(value: i64) -> Self {
        OperationValue::new(value)
    }
}

impl From<OperationValue> for i64 {
    fn from(value: OperationValue) -> Self {
        value.0
    }
}

/// An operation that has been requested but whose result has not arrived.
///
/// Carries the request generation it was issued under; the result is only
/// committed if no newer request or selection happened in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperation {
    generation: u64,
    kind: AlgorithmKind,
    operation: Operation,
    value: i64,
}

impl PendingOperation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Run this request against `backend`.
    pub async fn execute(
        &self,
        backend: &dyn ExecutionBackend,
    ) -> std::result::Result<ExecutionSequence, BackendError> {
        backend
            .perform_operation(self.kind, self.operation, self.value)
            .await
    }
}

/// What happened to a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationOutcome {
    /// The sequence was loaded and playback started
    Loaded,
    /// A newer request or selection made this result stale; it was dropped
    Superseded,
}

/// One user's view of the visualizer.
pub struct Session<S: TickSource> {
    selected: Option<AlgorithmKind>,
    value: OperationValue,
    engine: PlaybackEngine<S>,
    generation: u64,
}

impl<S: TickSource> Session<S> {
    pub fn new(ticker: S) -> Self {
        Self::with_defaults(ticker, Speed::default(), OperationValue::default())
    }

    /// Create a session with an initial speed and operation value.
    pub fn with_defaults(ticker: S, speed: Speed, value: OperationValue) -> Self {
        Self {
            selected: None,
            value,
            engine: PlaybackEngine::with_speed(ticker, speed),
            generation: 0,
        }
    }

    pub fn selected(&self) -> Option<AlgorithmKind> {
        self.selected
    }

    pub fn operation_value(&self) -> OperationValue {
        self.value
    }

    pub fn engine(&self) -> &PlaybackEngine<S> {
        &self.engine
    }

    /// Latest request generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.engine.current_step()
    }

    /// Switch algorithm. Playback returns to idle and any in-flight
    /// operation for the previous selection is discarded when it lands.
    pub fn select(&mut self, kind: AlgorithmKind) {
        info!(%kind, "Selected algorithm");
        self.selected = Some(kind);
        self.generation += 1;
        self.engine.clear();
    }

    /// Set the value passed to the next operation. Kept across selections.
    pub fn set_operation_value(&mut self, value: impl Into<OperationValue>) {
        self.value = value.into();
    }

    /// Start a request for `operation` on the selected algorithm.
    ///
    /// Fails with [`Error::InvalidSelection`] and changes nothing when no
    /// algorithm is selected.
    pub fn begin_operation(&mut self, operation: Operation) -> Result<PendingOperation> {
        let kind = self.selected.ok_or(Error::InvalidSelection)?;
        self.generation += 1;
        debug!(%kind, %operation, generation = self.generation, "Operation requested");
        Ok(PendingOperation {
            generation: self.generation,
            kind,
            operation,
            value: self.value.get(),
        })
    }

    /// Commit the result of `pending`.
    ///
    /// Stale results (success or failure) are dropped as
    /// [`OperationOutcome::Superseded`]. A backend failure for the current
    /// request leaves the loaded sequence and cursor untouched.
    pub fn complete_operation(
        &mut self,
        pending: PendingOperation,
        result: std::result::Result<ExecutionSequence, BackendError>,
    ) -> Result<OperationOutcome> {
        if pending.generation != self.generation {
            debug!(
                stale = pending.generation,
                latest = self.generation,
                "Dropping superseded result"
            );
            return Ok(OperationOutcome::Superseded);
        }

        match result {
            Ok(sequence) => {
                info!(
                    kind = %pending.kind,
                    operation = %pending.operation,
                    steps = sequence.len(),
                    "Loaded sequence"
                );
                self.engine.load(sequence);
                Ok(OperationOutcome::Loaded)
            }
            Err(cause) => {
                warn!(kind = %pending.kind, operation = %pending.operation, error = %cause, "Operation failed");
                Err(Error::generation(pending.kind, pending.operation, cause))
            }
        }
    }

    /// Request, execute and commit in one call.
    pub async fn operate(
        &mut self,
        backend: &dyn ExecutionBackend,
        operation: Operation,
    ) -> Result<OperationOutcome> {
        let pending = self.begin_operation(operation)?;
        let result = pending.execute(backend).await;
        self.complete_operation(pending, result)
    }

    pub fn step_forward(&mut self) {
        self.engine.step_forward();
    }

    pub fn step_backward(&mut self) {
        self.engine.step_backward();
    }

    pub fn toggle_play(&mut self) {
        self.engine.toggle_play();
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.engine.set_speed(speed);
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Forward a timer tick to the engine.
    pub fn apply_tick(&mut self, tick: Tick) -> bool {
        self.engine.on_tick(tick)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            selected: self.selected,
            operation_value: self.value.get(),
            playback: self.engine.status(),
        }
    }
}

/// Snapshot of a session for transport controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub selected: Option<AlgorithmKind>,
    pub operation_value: i64,
    pub playback: PlaybackStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::playback::PlaybackState;
    use crate::ticker::ManualTicker;
    use async_trait::async_trait;

    struct FailingBackend;

    #[async_trait]
    impl ExecutionBackend for FailingBackend {
        async fn perform_operation(
            &self,
            _kind: AlgorithmKind,
            _operation: Operation,
            _value: i64,
        ) -> std::result::Result<ExecutionSequence, BackendError> {
            Err(BackendError::rejected("backend down"))
        }
    }

    fn session() -> Session<ManualTicker> {
        Session::new(ManualTicker::new())
    }

    fn sequence_for(kind: AlgorithmKind, op: Operation, value: i64) -> ExecutionSequence {
        stepviz_generator::generate(kind, op, value).unwrap()
    }

    #[test]
    fn operation_value_is_clamped() {
        assert_eq!(OperationValue::new(0).get(), 1);
        assert_eq!(OperationValue::new(500).get(), 100);
        assert_eq!(OperationValue::default().get(), 42);
    }

    #[tokio::test]
    async fn bst_insert_plays_to_the_end() {
        let mut session = session();
        session.select(AlgorithmKind::Bst);
        let outcome = session
            .operate(&LocalBackend::new(), Operation::Insert)
            .await
            .unwrap();
        assert_eq!(outcome, OperationOutcome::Loaded);

        let status = session.status();
        assert_eq!(status.playback.state, PlaybackState::Playing);
        assert_eq!(status.playback.cursor, 0);
        let n = status.playback.total_steps;
        assert!(n > 0);

        for _ in 0..n - 1 {
            session.step_forward();
        }
        let status = session.status();
        assert!(!status.playback.playing);
        assert_eq!(status.playback.cursor, n - 1);
    }

    #[tokio::test]
    async fn operate_without_selection_is_rejected() {
        let mut session = session();
        let err = session
            .operate(&LocalBackend::new(), Operation::Insert)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection));
        assert!(session.current_step().is_none());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn later_operation_supersedes_earlier() {
        let mut session = session();
        session.select(AlgorithmKind::Fibonacci);

        session.set_operation_value(3);
        let first = session.begin_operation(Operation::Calculate).unwrap();
        session.set_operation_value(7);
        let second = session.begin_operation(Operation::Calculate).unwrap();

        let second_seq = sequence_for(AlgorithmKind::Fibonacci, Operation::Calculate, second.value());
        let outcome = session.complete_operation(second, Ok(second_seq.clone())).unwrap();
        assert_eq!(outcome, OperationOutcome::Loaded);

        let first_seq = sequence_for(AlgorithmKind::Fibonacci, Operation::Calculate, first.value());
        let outcome = session.complete_operation(first, Ok(first_seq)).unwrap();
        assert_eq!(outcome, OperationOutcome::Superseded);

        assert_eq!(session.engine().sequence(), Some(&second_seq));
    }

    #[test]
    fn selection_discards_in_flight_result() {
        let mut session = session();
        session.select(AlgorithmKind::Bst);
        let pending = session.begin_operation(Operation::Insert).unwrap();

        session.select(AlgorithmKind::Dfs);
        let seq = sequence_for(AlgorithmKind::Bst, Operation::Insert, pending.value());
        let outcome = session.complete_operation(pending, Ok(seq)).unwrap();

        assert_eq!(outcome, OperationOutcome::Superseded);
        assert_eq!(session.engine().state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn failed_operation_preserves_state() {
        let mut session = session();
        session.select(AlgorithmKind::Bst);
        session.operate(&LocalBackend::new(), Operation::Insert).await.unwrap();
        session.step_forward();
        let before = session.engine().sequence().cloned();

        let err = session.operate(&FailingBackend, Operation::Search).await.unwrap_err();
        assert!(matches!(err, Error::GenerationFailure { .. }));
        assert_eq!(err.backend(), Some(&BackendError::rejected("backend down")));
        assert_eq!(session.engine().sequence().cloned(), before);
        assert_eq!(session.engine().cursor(), 1);
    }

    #[tokio::test]
    async fn select_resets_everything_but_value() {
        let mut session = session();
        session.set_operation_value(77);
        session.select(AlgorithmKind::QuickSort);
        session.operate(&LocalBackend::new(), Operation::Sort).await.unwrap();
        session.step_forward();

        session.select(AlgorithmKind::Bfs);
        let status = session.status();
        assert_eq!(status.playback.cursor, 0);
        assert!(!status.playback.playing);
        assert_eq!(status.playback.total_steps, 0);
        assert_eq!(status.operation_value, 77);
        assert!(session.engine().ticker().active().is_none());
    }

    #[tokio::test]
    async fn operation_uses_current_value() {
        let mut session = session();
        session.select(AlgorithmKind::Fibonacci);
        session.set_operation_value(5);
        session.operate(&LocalBackend::new(), Operation::Calculate).await.unwrap();
        assert_eq!(session.status().playback.total_steps, 6);
    }
}
