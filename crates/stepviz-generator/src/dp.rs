//! Memoized Fibonacci table fill.

use stepviz_model::{
    CodeView, ExecutionSequence, Frame, NodeValue, Result, SequenceBuilder, VisualEdge,
    VisualNode,
};

use crate::code::{self, line_of};

/// Cells beyond this index are not drawn.
pub const MAX_CELLS: usize = 10;

fn cell_id(i: usize) -> String {
    format!("fib-{i}")
}

fn fib_table(len: usize) -> Vec<i64> {
    let mut memo = vec![0i64; len];
    for i in 0..len {
        memo[i] = match i {
            0 => 0,
            1 => 1,
            _ => memo[i - 1] + memo[i - 2],
        };
    }
    memo
}

/// One frame per table cell `0..=min(n, MAX_CELLS)`, filling left to right.
pub fn fibonacci(n: i64) -> Result<ExecutionSequence> {
    let last = n.clamp(0, MAX_CELLS as i64) as usize;
    let table = fib_table(last + 1);
    let headers: Vec<serde_json::Value> = (0..=last).map(|i| serde_json::json!(i)).collect();
    let base_case = line_of(code::FIBONACCI, "memo[1] = 1;");
    let recurrence = line_of(code::FIBONACCI, "memo[i] = memo[i - 1] + memo[i - 2];");

    let mut builder = SequenceBuilder::with_capacity(last + 1);
    for step in 0..=last {
        let nodes: Vec<VisualNode> = (0..=last)
            .map(|i| {
                let value = if i <= step {
                    NodeValue::Number(table[i])
                } else {
                    NodeValue::from("?")
                };
                VisualNode::new(cell_id(i), value, 100.0 + i as f64 * 60.0, 150.0)
                    .highlighted(i == step)
            })
            .collect();

        let edges = if step >= 2 {
            vec![
                VisualEdge::new(cell_id(step - 1), cell_id(step)).highlighted(true),
                VisualEdge::new(cell_id(step - 2), cell_id(step)).highlighted(true),
            ]
        } else {
            Vec::new()
        };

        let line = if step < 2 { base_case } else { recurrence };
        builder.push(
            Frame::new(CodeView::cpp(code::FIBONACCI, vec![line]), format!("Computing Fibonacci({step})"))
                .with_message(format!("Step {}: Calculating Fibonacci({step})", step + 1))
                .with_nodes(nodes)
                .with_edges(edges)
                .with_aux("headers", serde_json::Value::Array(headers.clone()))
                .with_aux("n", serde_json::json!(n)),
        );
    }
    builder.finish()
}
