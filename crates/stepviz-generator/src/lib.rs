//! Stepviz Step Generators
//!
//! Maps `(algorithm, operation, value)` to an [`ExecutionSequence`].
//!
//! Every generator is total and deterministic: the only varying input is the
//! random source used for presentation-only values (sorting bar heights),
//! which is consulted once per sequence. Algorithms without a dedicated
//! walkthrough get a one-step generic sequence.
//!
//! # Usage
//!
//! ```
//! use stepviz_generator::generate;
//! use stepviz_model::{AlgorithmKind, Operation};
//!
//! let seq = generate(AlgorithmKind::Bst, Operation::Insert, 42).unwrap();
//! assert_eq!(seq.first().state.step, 1);
//! assert_eq!(seq.last().state.total_steps, seq.len());
//! ```

mod code;
mod dp;
mod graph;
mod sorting;
mod tree;

use rand::Rng;
use stepviz_model::{
    AlgorithmKind, Category, CodeView, ExecutionSequence, Frame, Operation, Result,
    SequenceBuilder,
};

pub use dp::MAX_CELLS;
pub use sorting::{ARRAY_SIZE, BAR_RANGE};

/// Frame count of the scripted tree and sorting walkthroughs.
pub const STEPS: usize = 8;

/// Color of settled elements: found nodes, visited vertices, sorted bars.
pub const FOUND_COLOR: &str = "#4caf50";

/// Generate the steps for `operation` on `kind`, drawing presentation-only
/// randomness from the thread-local generator.
pub fn generate(kind: AlgorithmKind, operation: Operation, value: i64) -> Result<ExecutionSequence> {
    generate_with_rng(kind, operation, value, &mut rand::thread_rng())
}

/// Generate with an explicit random source.
pub fn generate_with_rng<R: Rng>(
    kind: AlgorithmKind,
    operation: Operation,
    value: i64,
    rng: &mut R,
) -> Result<ExecutionSequence> {
    let sequence = match (kind.category(), kind) {
        (Category::Tree, AlgorithmKind::Bst) => tree::binary_search_tree(operation, value),
        (Category::Graph, AlgorithmKind::Dfs | AlgorithmKind::Bfs) => {
            graph::search(kind, operation, value)
        }
        (Category::Dp, AlgorithmKind::Fibonacci) => dp::fibonacci(value),
        (
            Category::Sorting,
            AlgorithmKind::QuickSort | AlgorithmKind::MergeSort | AlgorithmKind::HeapSort,
        ) => sorting::sort(kind, operation, rng),
        _ => fallback(kind, operation),
    };

    if let Err(violation) = &sequence {
        tracing::error!(%kind, %operation, value, %violation, "generator produced an invalid sequence");
    }
    sequence
}

/// Whether `kind` has a dedicated walkthrough rather than the generic step.
pub fn has_walkthrough(kind: AlgorithmKind) -> bool {
    matches!(
        kind,
        AlgorithmKind::Bst
            | AlgorithmKind::Dfs
            | AlgorithmKind::Bfs
            | AlgorithmKind::Fibonacci
            | AlgorithmKind::QuickSort
            | AlgorithmKind::MergeSort
            | AlgorithmKind::HeapSort
    )
}

/// Single generic step for algorithms without a walkthrough.
pub fn fallback(kind: AlgorithmKind, operation: Operation) -> Result<ExecutionSequence> {
    let mut builder = SequenceBuilder::with_capacity(1);
    builder.push(
        Frame::new(
            CodeView::cpp(code::PLACEHOLDER, vec![1]),
            format!("{kind} {operation} step 1"),
        )
        .with_message(format!("Step 1: {kind} {operation} operation")),
    );
    builder.finish()
}
