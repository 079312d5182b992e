//! Visual snapshot types: nodes, edges, states, code views, steps.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ImplementationLanguage;

/// Display value of a visual node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Number(i64),
    Text(String),
}

impl From<i64> for NodeValue {
    fn from(n: i64) -> Self {
        NodeValue::Number(n)
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::Text(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        NodeValue::Text(s)
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Number(n) => write!(f, "{n}"),
            NodeValue::Text(s) => f.write_str(s),
        }
    }
}

/// A positioned element: tree node, graph vertex, DP cell or array bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    pub value: NodeValue,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
}

impl VisualNode {
    pub fn new(id: impl Into<String>, value: impl Into<NodeValue>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            x,
            y,
            color: None,
            highlighted: false,
        }
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A connection between two nodes of the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
}

impl VisualEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: None,
            color: None,
            highlighted: false,
        }
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.value = Some(weight);
        self
    }

    /// Whether this edge joins `a` and `b` in either direction.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Snapshot of the visualization at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmState {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aux_data: BTreeMap<String, serde_json::Value>,
    /// 1-based position within the owning sequence.
    pub step: usize,
    pub total_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AlgorithmState {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Source text shown next to the canvas, with the lines to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeView {
    pub content: String,
    /// 1-based line numbers.
    pub highlight_lines: Vec<u32>,
    pub language: ImplementationLanguage,
}

impl CodeView {
    pub fn cpp(content: impl Into<String>, highlight_lines: Vec<u32>) -> Self {
        Self {
            content: content.into(),
            highlight_lines,
            language: ImplementationLanguage::Cpp,
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// One immutable frame of an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub state: AlgorithmState,
    pub code: CodeView,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_value_is_untagged() {
        let n = serde_json::to_string(&NodeValue::Number(7)).unwrap();
        assert_eq!(n, "7");
        let t = serde_json::to_string(&NodeValue::from("?")).unwrap();
        assert_eq!(t, "\"?\"");

        let parsed: NodeValue = serde_json::from_str("\"F3\"").unwrap();
        assert_eq!(parsed, NodeValue::Text("F3".into()));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let node = VisualNode::new("1", 50, 400.0, 60.0);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("color").is_none());
        assert!(json.get("highlighted").is_none());

        let json = serde_json::to_value(node.highlighted(true)).unwrap();
        assert_eq!(json["highlighted"], true);
    }

    #[test]
    fn state_uses_camel_case() {
        let state = AlgorithmState {
            nodes: vec![],
            edges: vec![],
            aux_data: BTreeMap::new(),
            step: 1,
            total_steps: 1,
            message: Some("hello".into()),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["totalSteps"], 1);
        assert!(json.get("auxData").is_none());
    }

    #[test]
    fn edge_joins_either_direction() {
        let edge = VisualEdge::new("a", "b");
        assert!(edge.joins("a", "b"));
        assert!(edge.joins("b", "a"));
        assert!(!edge.joins("a", "c"));
    }

    #[test]
    fn code_view_counts_lines() {
        let code = CodeView::cpp("int a;\nint b;\n", vec![1]);
        assert_eq!(code.line_count(), 2);
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["highlightLines"][0], 1);
        assert_eq!(json["language"], "cpp");
    }
}
