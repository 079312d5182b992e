//! Validated execution sequences.

use std::collections::{BTreeMap, HashSet};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralViolation};
use crate::step::{AlgorithmState, CodeView, Step, VisualEdge, VisualNode};

/// A finite, ordered, non-empty list of steps.
///
/// Every step reports `total_steps == len()` and `step == position + 1`,
/// and every edge references nodes of its own snapshot. The only ways to
/// obtain one are [`ExecutionSequence::new`], [`SequenceBuilder::finish`] and
/// deserialization, all of which validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Step>", into = "Vec<Step>")]
pub struct ExecutionSequence {
    steps: Vec<Step>,
}

impl ExecutionSequence {
    /// Validate `steps` as a sequence.
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        validate(&steps)?;
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> &Step {
        &self.steps[0]
    }

    pub fn last(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl Index<usize> for ExecutionSequence {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a ExecutionSequence {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl TryFrom<Vec<Step>> for ExecutionSequence {
    type Error = StructuralViolation;

    fn try_from(steps: Vec<Step>) -> Result<Self> {
        Self::new(steps)
    }
}

impl From<ExecutionSequence> for Vec<Step> {
    fn from(sequence: ExecutionSequence) -> Self {
        sequence.steps
    }
}

fn validate(steps: &[Step]) -> Result<()> {
    if steps.is_empty() {
        return Err(StructuralViolation::EmptySequence);
    }

    let total = steps.len();
    for (position, step) in steps.iter().enumerate() {
        let state = &step.state;
        if state.step != position + 1 {
            return Err(StructuralViolation::StepNumber {
                position,
                expected: position + 1,
                found: state.step,
            });
        }
        if state.total_steps != total {
            return Err(StructuralViolation::TotalSteps {
                position,
                expected: total,
                found: state.total_steps,
            });
        }

        let mut ids = HashSet::with_capacity(state.nodes.len());
        for node in &state.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(StructuralViolation::DuplicateNode {
                    position,
                    id: node.id.clone(),
                });
            }
        }
        for edge in &state.edges {
            let missing = [&edge.source, &edge.target]
                .into_iter()
                .find(|id| !ids.contains(id.as_str()));
            if let Some(missing) = missing {
                return Err(StructuralViolation::DanglingEdge {
                    position,
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    missing: missing.clone(),
                });
            }
        }

        let line_count = step.code.line_count();
        if let Some(&line) = step
            .code
            .highlight_lines
            .iter()
            .find(|&&line| line == 0 || line as usize > line_count)
        {
            return Err(StructuralViolation::HighlightOutOfRange {
                position,
                line,
                line_count,
            });
        }
    }
    Ok(())
}

/// An unnumbered step, as produced by a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub aux_data: BTreeMap<String, serde_json::Value>,
    pub message: Option<String>,
    pub code: CodeView,
    pub description: String,
}

impl Frame {
    pub fn new(code: CodeView, description: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            aux_data: BTreeMap::new(),
            message: None,
            code,
            description: description.into(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<VisualNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<VisualEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_aux(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.aux_data.insert(key.into(), value);
        self
    }
}

/// Collects frames and numbers them into an [`ExecutionSequence`].
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    frames: Vec<Frame>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: Frame) -> &mut Self {
        self.frames.push(frame);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number the collected frames and validate the result.
    pub fn finish(self) -> Result<ExecutionSequence> {
        let total = self.frames.len();
        let steps = self
            .frames
            .into_iter()
            .enumerate()
            .map(|(position, frame)| Step {
                state: AlgorithmState {
                    nodes: frame.nodes,
                    edges: frame.edges,
                    aux_data: frame.aux_data,
                    step: position + 1,
                    total_steps: total,
                    message: frame.message,
                },
                code: frame.code,
                description: frame.description,
            })
            .collect();
        ExecutionSequence::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> CodeView {
        CodeView::cpp("line one\nline two\nline three", vec![2])
    }

    fn frame() -> Frame {
        Frame::new(code(), "demo")
            .with_nodes(vec![
                VisualNode::new("a", 1, 0.0, 0.0),
                VisualNode::new("b", 2, 10.0, 0.0),
            ])
            .with_edges(vec![VisualEdge::new("a", "b")])
    }

    #[test]
    fn builder_numbers_steps() {
        let mut builder = SequenceBuilder::new();
        for _ in 0..5 {
            builder.push(frame());
        }
        let seq = builder.finish().unwrap();

        assert_eq!(seq.len(), 5);
        for (i, step) in seq.iter().enumerate() {
            assert_eq!(step.state.step, i + 1);
            assert_eq!(step.state.total_steps, 5);
        }
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(
            SequenceBuilder::new().finish(),
            Err(StructuralViolation::EmptySequence)
        );
        assert_eq!(
            ExecutionSequence::new(vec![]),
            Err(StructuralViolation::EmptySequence)
        );
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut builder = SequenceBuilder::new();
        builder.push(frame());
        builder.push(frame().with_edges(vec![VisualEdge::new("a", "ghost")]));

        let err = builder.finish().unwrap_err();
        assert_eq!(
            err,
            StructuralViolation::DanglingEdge {
                position: 1,
                source_id: "a".into(),
                target_id: "ghost".into(),
                missing: "ghost".into(),
            }
        );
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut builder = SequenceBuilder::new();
        builder.push(frame().with_nodes(vec![
            VisualNode::new("a", 1, 0.0, 0.0),
            VisualNode::new("a", 2, 0.0, 0.0),
        ]).with_edges(vec![]));

        assert!(matches!(
            builder.finish(),
            Err(StructuralViolation::DuplicateNode { position: 0, .. })
        ));
    }

    #[test]
    fn highlight_outside_code_is_rejected() {
        let mut builder = SequenceBuilder::new();
        let mut bad = frame();
        bad.code.highlight_lines = vec![4];
        builder.push(bad);
        assert!(matches!(
            builder.finish(),
            Err(StructuralViolation::HighlightOutOfRange { line: 4, line_count: 3, .. })
        ));

        let mut builder = SequenceBuilder::new();
        let mut bad = frame();
        bad.code.highlight_lines = vec![0];
        builder.push(bad);
        assert!(builder.finish().is_err());
    }

    #[test]
    fn misnumbered_steps_are_rejected() {
        let mut builder = SequenceBuilder::new();
        builder.push(frame()).push(frame());
        let mut steps = builder.finish().unwrap().into_steps();

        steps[1].state.step = 3;
        assert!(matches!(
            ExecutionSequence::new(steps.clone()),
            Err(StructuralViolation::StepNumber { position: 1, expected: 2, found: 3 })
        ));

        steps[1].state.step = 2;
        steps[0].state.total_steps = 7;
        assert!(matches!(
            ExecutionSequence::new(steps),
            Err(StructuralViolation::TotalSteps { position: 0, expected: 2, found: 7 })
        ));
    }

    #[test]
    fn deserialization_validates() {
        let mut builder = SequenceBuilder::new();
        builder.push(frame());
        let seq = builder.finish().unwrap();

        let json = serde_json::to_string(&seq).unwrap();
        let parsed: ExecutionSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, seq);

        assert!(serde_json::from_str::<ExecutionSequence>("[]").is_err());
    }
}
