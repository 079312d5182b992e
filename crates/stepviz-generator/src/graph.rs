//! Depth-first and breadth-first exploration of a fixed 4x4 grid graph.

use std::collections::VecDeque;

use stepviz_model::{
    AlgorithmKind, CodeView, ExecutionSequence, Frame, Operation, Result, SequenceBuilder,
    VisualEdge, VisualNode,
};

use crate::code::{self, line_of};
use crate::FOUND_COLOR;

const SIZE: usize = 4;

fn id(cell: usize) -> String {
    format!("{}-{}", cell / SIZE, cell % SIZE)
}

/// Neighbors in right, down, left, up order.
fn neighbors(cell: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (cell / SIZE, cell % SIZE);
    let right = (col + 1 < SIZE).then(|| cell + 1);
    let down = (row + 1 < SIZE).then(|| cell + SIZE);
    let left = (col > 0).then(|| cell - 1);
    let up = (row > 0).then(|| cell - SIZE);
    [right, down, left, up].into_iter().flatten()
}

fn grid_edges() -> Vec<VisualEdge> {
    let mut edges = Vec::new();
    for cell in 0..SIZE * SIZE {
        let (row, col) = (cell / SIZE, cell % SIZE);
        if col + 1 < SIZE {
            edges.push(VisualEdge::new(id(cell), id(cell + 1)));
        }
        if row + 1 < SIZE {
            edges.push(VisualEdge::new(id(cell), id(cell + SIZE)));
        }
    }
    edges
}

/// Visit order with the tree edge (parent) that discovered each cell.
fn depth_first(start: usize) -> Vec<(usize, Option<usize>)> {
    fn visit(cell: usize, parent: Option<usize>, seen: &mut [bool], out: &mut Vec<(usize, Option<usize>)>) {
        seen[cell] = true;
        out.push((cell, parent));
        for next in neighbors(cell) {
            if !seen[next] {
                visit(next, Some(cell), seen, out);
            }
        }
    }

    let mut seen = [false; SIZE * SIZE];
    let mut out = Vec::with_capacity(SIZE * SIZE);
    visit(start, None, &mut seen, &mut out);
    out
}

fn breadth_first(start: usize) -> Vec<(usize, Option<usize>)> {
    let mut seen = [false; SIZE * SIZE];
    let mut parent = [None; SIZE * SIZE];
    let mut frontier = VecDeque::from([start]);
    let mut out = Vec::with_capacity(SIZE * SIZE);
    seen[start] = true;

    while let Some(cell) = frontier.pop_front() {
        out.push((cell, parent[cell]));
        for next in neighbors(cell) {
            if !seen[next] {
                seen[next] = true;
                parent[next] = Some(cell);
                frontier.push_back(next);
            }
        }
    }
    out
}

/// One frame per visited vertex; `value` picks the start vertex.
pub fn search(kind: AlgorithmKind, operation: Operation, value: i64) -> Result<ExecutionSequence> {
    let start = value.rem_euclid((SIZE * SIZE) as i64) as usize;
    let (order, source, lines, label) = if kind == AlgorithmKind::Bfs {
        (
            breadth_first(start),
            code::BFS,
            [
                line_of(code::BFS, "int v = frontier.front();"),
                line_of(code::BFS, "frontier.push(next);"),
            ],
            "Breadth-First Search",
        )
    } else {
        (
            depth_first(start),
            code::DFS,
            [
                line_of(code::DFS, "seen[v] = true;"),
                line_of(code::DFS, "dfsVisit(g, next, seen);"),
            ],
            "Depth-First Search",
        )
    };
    let style = if kind == AlgorithmKind::Bfs { "breadth-first" } else { "depth-first" };

    let mut builder = SequenceBuilder::with_capacity(order.len());
    for (i, &(current, _)) in order.iter().enumerate() {
        let visited = &order[..=i];

        let nodes: Vec<VisualNode> = (0..SIZE * SIZE)
            .map(|cell| {
                let node = VisualNode::new(
                    id(cell),
                    cell as i64,
                    100.0 + (cell % SIZE) as f64 * 100.0,
                    100.0 + (cell / SIZE) as f64 * 100.0,
                )
                .highlighted(cell == current);
                if visited.iter().any(|&(v, _)| v == cell) {
                    node.with_color(FOUND_COLOR)
                } else {
                    node
                }
            })
            .collect();

        let mut edges = grid_edges();
        for &(child, parent) in visited {
            if let Some(parent) = parent {
                let (a, b) = (id(parent), id(child));
                for edge in edges.iter_mut().filter(|e| e.joins(&a, &b)) {
                    edge.highlighted = true;
                }
            }
        }

        let order_values: Vec<serde_json::Value> =
            visited.iter().map(|&(v, _)| serde_json::json!(v)).collect();

        let description = format!("Exploring node {current} in {style} order");
        builder.push(
            Frame::new(CodeView::cpp(source, vec![lines[i % lines.len()]]), description)
                .with_message(format!("Step {}: {label} {operation}", i + 1))
                .with_nodes(nodes)
                .with_edges(edges)
                .with_aux("order", serde_json::Value::Array(order_values)),
        );
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_orders_visit_every_cell_once() {
        for order in [depth_first(5), breadth_first(5)] {
            let mut cells: Vec<usize> = order.iter().map(|&(c, _)| c).collect();
            assert_eq!(cells[0], 5);
            cells.sort_unstable();
            assert_eq!(cells, (0..SIZE * SIZE).collect::<Vec<_>>());
        }
    }

    #[test]
    fn bfs_visits_by_distance() {
        let order = breadth_first(0);
        let distance = |c: usize| c / SIZE + c % SIZE;
        for pair in order.windows(2) {
            assert!(distance(pair[0].0) <= distance(pair[1].0));
        }
    }

    #[test]
    fn dfs_goes_deep_first() {
        let order: Vec<usize> = depth_first(0).iter().map(|&(c, _)| c).collect();
        assert_eq!(&order[..4], &[0, 1, 2, 3]);
    }

    #[test]
    fn start_wraps_into_grid() {
        let seq = search(AlgorithmKind::Dfs, Operation::Traverse, 42).unwrap();
        assert_eq!(seq.len(), SIZE * SIZE);
        let first = seq.first();
        let current: Vec<_> = first.state.nodes.iter().filter(|n| n.highlighted).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, id(42 % 16));
    }

    #[test]
    fn tree_edges_accumulate() {
        let seq = search(AlgorithmKind::Bfs, Operation::Traverse, 0).unwrap();
        let highlighted = |step: usize| {
            seq[step].state.edges.iter().filter(|e| e.highlighted).count()
        };
        assert_eq!(highlighted(0), 0);
        assert_eq!(highlighted(seq.len() - 1), SIZE * SIZE - 1);
    }
}
