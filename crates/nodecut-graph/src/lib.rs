//! NodeCut Graph - Node and parameter graph
//!
//! The compositing graph: typed parameters, the node capability set, the
//! built-in node catalog, and pull-based evaluation over a time-varying
//! DAG.

pub mod graph;
pub mod node;
pub mod nodes;
pub mod param;

pub use graph::{NodeGraph, NodeId};
pub use node::{EvalContext, Node, NodeInfo, ResolvedInputs};
pub use nodes::{BlendNode, MediaAudio, MediaInput, ViewerOutput};
pub use param::{ParamKind, ParamSpec, ParamValue};
