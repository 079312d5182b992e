//! Stepviz Step Model
//!
//! The vocabulary shared by step generators, the playback engine and any
//! presentation surface.
//!
//! # Overview
//!
//! - **Catalog**: the fixed set of algorithm identities, their categories,
//!   operations and display metadata
//! - **Step**: one immutable frame (visual snapshot, code view, description)
//! - **Sequence**: an ordered, validated list of steps for one operation
//!
//! An [`ExecutionSequence`] can only exist in a valid shape: non-empty,
//! consistently numbered, and with every edge resolving to a node of the
//! same snapshot.

mod catalog;
mod error;
mod sequence;
mod step;

pub use catalog::{
    catalog, AlgorithmInfo, AlgorithmKind, Category, Complexity, ImplementationLanguage,
    Operation,
};
pub use error::{Result, StructuralViolation, UnknownName};
pub use sequence::{ExecutionSequence, Frame, SequenceBuilder};
pub use step::{AlgorithmState, CodeView, NodeValue, Step, VisualEdge, VisualNode};
