//! Array-bar walkthroughs for the comparison sorts.

use rand::Rng;
use stepviz_model::{
    AlgorithmKind, CodeView, ExecutionSequence, Frame, Operation, Result, SequenceBuilder,
    VisualNode,
};

use crate::code::{self, lines_of};
use crate::{FOUND_COLOR, STEPS};

/// Number of bars drawn.
pub const ARRAY_SIZE: usize = 10;

/// Bar heights are drawn from this range once per sequence.
pub const BAR_RANGE: std::ops::Range<i64> = 10..90;

const PIVOT_COLOR: &str = "#ff9800";

fn source(kind: AlgorithmKind) -> (&'static str, Vec<u32>) {
    match kind {
        AlgorithmKind::MergeSort => (
            code::MERGESORT,
            lines_of(
                code::MERGESORT,
                &[
                    "void mergeSort(",
                    "int mid = lo + (hi - lo) / 2;",
                    "mergeSort(a, lo, mid);",
                    "mergeSort(a, mid + 1, hi);",
                    "merge(a, lo, mid, hi);",
                    "if (left[i] <= right[j]) {",
                    "a[k++] = left[i++];",
                    "a[k++] = right[j++];",
                ],
            ),
        ),
        AlgorithmKind::HeapSort => (
            code::HEAPSORT,
            lines_of(
                code::HEAPSORT,
                &[
                    "for (int i = n / 2 - 1; i >= 0; i--)",
                    "int largest = i;",
                    "if (l < n && a[l] > a[largest])",
                    "std::swap(a[i], a[largest]);",
                    "for (int i = n - 1; i > 0; i--) {",
                    "std::swap(a[0], a[i]);",
                    "siftDown(a, i, 0);",
                ],
            ),
        ),
        _ => (
            code::QUICKSORT,
            lines_of(
                code::QUICKSORT,
                &[
                    "void quickSort(",
                    "int p = partition(a, lo, hi);",
                    "int pivot = a[hi];",
                    "for (int j = lo; j < hi; j++) {",
                    "if (a[j] < pivot) {",
                    "std::swap(a[i], a[j]);",
                    "std::swap(a[i + 1], a[hi]);",
                    "quickSort(a, lo, p - 1);",
                ],
            ),
        ),
    }
}

/// A fixed-length array walkthrough; the bar heights are drawn from `rng`
/// once and stay the same in every frame of the sequence.
pub fn sort<R: Rng>(
    kind: AlgorithmKind,
    operation: Operation,
    rng: &mut R,
) -> Result<ExecutionSequence> {
    let values: Vec<i64> = (0..ARRAY_SIZE).map(|_| rng.gen_range(BAR_RANGE)).collect();
    let (content, trace) = source(kind);
    let pivot = values[ARRAY_SIZE - 1];

    let mut builder = SequenceBuilder::with_capacity(STEPS);
    for step in 0..STEPS {
        let sorted = step * ARRAY_SIZE / STEPS;
        let nodes: Vec<VisualNode> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let node = VisualNode::new(
                    format!("arr-{i}"),
                    value,
                    80.0 + i as f64 * 60.0,
                    200.0 - value as f64 / 2.0,
                )
                .highlighted(i == step % ARRAY_SIZE || i == (step + 1) % ARRAY_SIZE);

                match operation {
                    Operation::Partition if i == ARRAY_SIZE - 1 => node.with_color(PIVOT_COLOR),
                    Operation::Partition if i <= step && value < pivot => node.with_color(FOUND_COLOR),
                    Operation::Partition => node,
                    _ if i < sorted => node.with_color(FOUND_COLOR),
                    _ => node,
                }
            })
            .collect();

        let name = kind.name();
        let description = match operation {
            Operation::Partition => format!("{name} partition step {} around pivot {pivot}", step + 1),
            _ => format!("{name} step {}", step + 1),
        };
        builder.push(
            Frame::new(CodeView::cpp(content, vec![trace[step % trace.len()]]), description)
                .with_message(format!("Step {}: {name} algorithm", step + 1))
                .with_nodes(nodes),
        );
    }
    builder.finish()
}
