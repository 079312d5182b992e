//! Binary search tree walkthroughs over a fixed four-node tree.

use stepviz_model::{
    CodeView, ExecutionSequence, Frame, NodeValue, Operation, Result, SequenceBuilder,
    VisualEdge, VisualNode,
};

use crate::code::{self, line_of};
use crate::{FOUND_COLOR, STEPS};

const ROOT: &str = "1";

fn base_nodes() -> Vec<VisualNode> {
    vec![
        VisualNode::new("1", 50, 400.0, 60.0),
        VisualNode::new("2", 25, 200.0, 180.0),
        VisualNode::new("3", 75, 600.0, 180.0),
        VisualNode::new("4", 15, 100.0, 300.0),
    ]
}

fn base_edges() -> Vec<VisualEdge> {
    vec![
        VisualEdge::new("1", "2"),
        VisualEdge::new("1", "3"),
        VisualEdge::new("2", "4"),
    ]
}

/// Where `value` would descend in the fixed tree: visited ids and the
/// free slot (x, y) below the last one.
fn descent(value: i64) -> (Vec<&'static str>, f64, f64) {
    if value < 25 {
        let x = if value < 15 { 50.0 } else { 150.0 };
        (vec![ROOT, "2", "4"], x, 420.0)
    } else if value < 50 {
        (vec![ROOT, "2"], 300.0, 300.0)
    } else if value < 75 {
        (vec![ROOT, "3"], 500.0, 300.0)
    } else {
        (vec![ROOT, "3"], 700.0, 300.0)
    }
}

fn highlight_path(nodes: &mut [VisualNode], edges: &mut [VisualEdge], path: &[&str]) {
    for node in nodes.iter_mut() {
        node.highlighted = path.contains(&node.id.as_str());
    }
    for pair in path.windows(2) {
        for edge in edges.iter_mut().filter(|e| e.joins(pair[0], pair[1])) {
            edge.highlighted = true;
        }
    }
}

/// How many path nodes are lit at step `i` of a root-to-leaf walk.
fn walked(i: usize, path_len: usize) -> usize {
    (i + 1).min(path_len)
}

pub fn binary_search_tree(operation: Operation, value: i64) -> Result<ExecutionSequence> {
    match operation {
        Operation::Insert => insert(value),
        Operation::Delete => delete(value),
        Operation::Search => search(value),
        Operation::Traverse => traverse(),
        other => generic_walk(other, value),
    }
}

fn frame(i: usize, highlight: u32, description: String) -> Frame {
    Frame::new(CodeView::cpp(code::BST, vec![highlight]), description.clone())
        .with_message(format!("Step {}: {}", i + 1, description))
}

fn insert(value: i64) -> Result<ExecutionSequence> {
    let (path, x, y) = descent(value);
    let parent = path[path.len() - 1];
    let trace = [
        line_of(code::BST, "void insert(T value)"),
        line_of(code::BST, "Node* insert(Node* node, T value)"),
        line_of(code::BST, "if (value < node->data) {"),
        line_of(code::BST, "node->left = insert"),
        line_of(code::BST, "if (node == nullptr) return new Node"),
        line_of(code::BST, "if (node == nullptr) return new Node"),
        line_of(code::BST, "return node;"),
        line_of(code::BST, "void insert(T value)"),
    ];

    let mut builder = SequenceBuilder::with_capacity(STEPS);
    for i in 0..STEPS {
        let mut nodes = base_nodes();
        let mut edges = base_edges();
        let placed = i >= STEPS / 2;

        highlight_path(&mut nodes, &mut edges, &path[..walked(i, path.len())]);
        if placed {
            nodes.push(VisualNode::new("5", value, x, y).highlighted(true));
            edges.push(VisualEdge::new(parent, "5").highlighted(true));
        }

        let description = format!("Inserting value {value} into the tree");
        builder.push(
            frame(i, trace[i % trace.len()], description)
                .with_nodes(nodes)
                .with_edges(edges),
        );
    }
    builder.finish()
}

fn search(value: i64) -> Result<ExecutionSequence> {
    let (path, _, _) = descent(value);
    let found = base_nodes()
        .into_iter()
        .find(|n| n.value == NodeValue::Number(value))
        .map(|n| n.id);

    // The walk stops at the matching node when there is one.
    let path: Vec<&str> = match &found {
        Some(id) => {
            let end = path.iter().position(|p| p == id).map_or(path.len(), |p| p + 1);
            path[..end].to_vec()
        }
        None => path,
    };
    let compare = line_of(code::BST, "if (cur->data == value)");
    let descend = line_of(code::BST, "cur = value < cur->data");

    let mut builder = SequenceBuilder::with_capacity(STEPS);
    for i in 0..STEPS {
        let mut nodes = base_nodes();
        let mut edges = base_edges();
        let visible = walked(i, path.len());
        highlight_path(&mut nodes, &mut edges, &path[..visible]);

        let finished = i >= path.len();
        let (line, description) = if !finished {
            let line = if i % 2 == 0 { compare } else { descend };
            (line, format!("Searching for value {value} in the tree"))
        } else if let Some(id) = &found {
            if let Some(node) = nodes.iter_mut().find(|n| &n.id == id) {
                node.color = Some(FOUND_COLOR.to_string());
            }
            (compare, format!("Found value {value} in the tree"))
        } else {
            (
                line_of(code::BST, "return false;"),
                format!("Value {value} is not in the tree"),
            )
        };

        builder.push(frame(i, line, description).with_nodes(nodes).with_edges(edges));
    }
    builder.finish()
}

fn delete(value: i64) -> Result<ExecutionSequence> {
    let (path, _, _) = descent(value);
    let target = path[path.len() - 1];
    let parent = path[path.len() - 2];
    let trace = [
        line_of(code::BST, "void remove(T value)"),
        line_of(code::BST, "if (value < node->data) node->left = remove"),
        line_of(code::BST, "else if (value > node->data) node->right = remove"),
        line_of(code::BST, "if (node->left == nullptr) return node->right;"),
        line_of(code::BST, "if (node->right == nullptr) return node->left;"),
        line_of(code::BST, "return node;"),
    ];

    let mut builder = SequenceBuilder::with_capacity(STEPS);
    for i in 0..STEPS {
        let mut nodes = base_nodes();
        let mut edges = base_edges();

        if i < STEPS / 2 {
            highlight_path(&mut nodes, &mut edges, &path[..walked(i, path.len())]);
        } else {
            // Orphaned children are re-attached to the removed node's parent.
            let children: Vec<String> = edges
                .iter()
                .filter(|e| e.source == target)
                .map(|e| e.target.clone())
                .collect();
            nodes.retain(|n| n.id != target);
            edges.retain(|e| e.source != target && e.target != target);
            for child in children {
                edges.push(VisualEdge::new(parent, child).highlighted(true));
            }
            if let Some(node) = nodes.iter_mut().find(|n| n.id == parent) {
                node.highlighted = true;
            }
        }

        let description = format!("Deleting value {value} from the tree");
        builder.push(
            frame(i, trace[i.min(trace.len() - 1)], description)
                .with_nodes(nodes)
                .with_edges(edges),
        );
    }
    builder.finish()
}

fn traverse() -> Result<ExecutionSequence> {
    const IN_ORDER: [&str; 4] = ["4", "2", "1", "3"];
    let visit = line_of(code::BST, "out.push_back(node->data)");
    let recurse = line_of(code::BST, "inorder(node->left, out)");

    let mut builder = SequenceBuilder::with_capacity(IN_ORDER.len() + 1);
    for i in 0..=IN_ORDER.len() {
        let mut nodes = base_nodes();
        let visited = &IN_ORDER[..i.min(IN_ORDER.len())];
        for node in nodes.iter_mut() {
            node.highlighted = visited.last() == Some(&node.id.as_str());
            if visited.contains(&node.id.as_str()) {
                node.color = Some(FOUND_COLOR.to_string());
            }
        }
        let order: Vec<serde_json::Value> = visited
            .iter()
            .filter_map(|id| base_nodes().into_iter().find(|n| n.id == *id))
            .map(|n| serde_json::json!(n.value))
            .collect();

        let (line, description) = if i == 0 {
            (recurse, "Traversing the tree".to_string())
        } else {
            (visit, format!("Visited {} of {} nodes in order", i, IN_ORDER.len()))
        };
        builder.push(
            frame(i, line, description)
                .with_nodes(nodes)
                .with_edges(base_edges())
                .with_aux("visited", serde_json::Value::Array(order)),
        );
    }
    builder.finish()
}

/// Operations without a dedicated tree script still walk the tree.
fn generic_walk(operation: Operation, value: i64) -> Result<ExecutionSequence> {
    let (path, _, _) = descent(value);
    let mut builder = SequenceBuilder::with_capacity(path.len());
    for i in 0..path.len() {
        let mut nodes = base_nodes();
        let mut edges = base_edges();
        highlight_path(&mut nodes, &mut edges, &path[..=i]);
        let description = format!("Performing {operation} operation");
        builder.push(
            frame(i, line_of(code::BST, "Node* cur = root;"), description)
                .with_nodes(nodes)
                .with_edges(edges),
        );
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_adds_node_from_midpoint() {
        let seq = binary_search_tree(Operation::Insert, 42).unwrap();
        assert_eq!(seq.len(), STEPS);

        for (i, step) in seq.iter().enumerate() {
            let added = step.state.node("5");
            assert_eq!(added.is_some(), i >= STEPS / 2, "step {i}");
        }
        let last = &seq.last().state;
        assert_eq!(last.node("5").map(|n| n.value.clone()), Some(NodeValue::Number(42)));
        assert!(last.edges.iter().any(|e| e.source == "2" && e.target == "5"));
    }

    #[test]
    fn insert_places_large_values_right() {
        let seq = binary_search_tree(Operation::Insert, 90).unwrap();
        let last = &seq.last().state;
        assert!(last.edges.iter().any(|e| e.source == "3" && e.target == "5"));
    }

    #[test]
    fn search_marks_existing_value() {
        let seq = binary_search_tree(Operation::Search, 15).unwrap();
        let last = &seq.last().state;
        let node = last.node("4").unwrap();
        assert_eq!(node.color.as_deref(), Some(FOUND_COLOR));
        assert!(seq.last().description.contains("Found"));
    }

    #[test]
    fn search_reports_missing_value() {
        let seq = binary_search_tree(Operation::Search, 60).unwrap();
        assert!(seq.last().description.contains("not in the tree"));
        assert!(seq.last().state.node("3").unwrap().highlighted);
    }

    #[test]
    fn delete_reattaches_children() {
        let seq = binary_search_tree(Operation::Delete, 30).unwrap();
        let last = &seq.last().state;
        assert!(last.node("2").is_none());
        assert!(last.edges.iter().any(|e| e.joins("1", "4")));
    }

    #[test]
    fn delete_leaf() {
        let seq = binary_search_tree(Operation::Delete, 80).unwrap();
        let last = &seq.last().state;
        assert!(last.node("3").is_none());
        assert_eq!(last.nodes.len(), 3);
    }

    #[test]
    fn traverse_visits_in_order() {
        let seq = binary_search_tree(Operation::Traverse, 0).unwrap();
        let visited = &seq.last().state.aux_data["visited"];
        assert_eq!(visited, &serde_json::json!([15, 25, 50, 75]));
    }
}
