//! The compositing graph and its pull-based evaluation.
//!
//! Evaluating an output walks backward through input dependencies,
//! evaluates the ancestor set bottom-up, and feeds each node the resolved
//! values of its connected inputs. Unconnected inputs read as their set
//! literal or `Empty`; evaluation itself never fails.

use crate::node::{EvalContext, Node, ResolvedInputs};
use crate::param::ParamValue;
use nodecut_core::{NodecutError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};
use uuid::Uuid;

/// Unique identifier for a node in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A dependency edge: `from`'s output feeds `to`'s input.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    from_node: NodeId,
    from_output: String,
    to_node: NodeId,
    to_input: String,
}

/// A time-varying DAG of media and processing nodes.
pub struct NodeGraph {
    id: Uuid,
    nodes: HashMap<NodeId, Box<dyn Node>>,
    edges: Vec<Edge>,
    literals: HashMap<(NodeId, String), ParamValue>,
    revision: u64,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: HashMap::new(),
            edges: Vec::new(),
            literals: HashMap::new(),
            revision: 0,
        }
    }

    /// Stable identity of this graph, used in cache IDs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Structural revision counter. Bumped by every edit that can change
    /// the shape of the graph; feeds cache IDs.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a node, returning its identity.
    pub fn add_node(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = NodeId::new();
        debug!(node = node.info().id, "adding node");
        self.nodes.insert(id, node);
        self.revision += 1;
        id
    }

    /// Remove a node along with its edges and literals, releasing its
    /// resources.
    pub fn remove_node(&mut self, id: NodeId) {
        if let Some(mut node) = self.nodes.remove(&id) {
            node.release_resources();
            self.edges
                .retain(|e| e.from_node != id && e.to_node != id);
            self.literals.retain(|(nid, _), _| *nid != id);
            self.revision += 1;
        }
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
        self.nodes.get(&id).map(|n| n.as_ref())
    }

    /// Access a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Box<dyn Node>> {
        self.nodes.get_mut(&id)
    }

    /// Connect `from`'s output parameter to `to`'s input parameter.
    ///
    /// Fails when either slot is unknown, the kinds are incompatible, or
    /// the edge would create a cycle. An existing connection on the input
    /// is replaced.
    pub fn connect(
        &mut self,
        from: NodeId,
        output: &str,
        to: NodeId,
        input: &str,
    ) -> Result<()> {
        let from_spec = self
            .nodes
            .get(&from)
            .ok_or_else(|| NodecutError::NotFound(format!("node {:?}", from)))?
            .outputs()
            .iter()
            .find(|s| s.key == output)
            .copied()
            .ok_or_else(|| NodecutError::NotFound(format!("output '{}'", output)))?;

        let to_spec = self
            .nodes
            .get(&to)
            .ok_or_else(|| NodecutError::NotFound(format!("node {:?}", to)))?
            .inputs()
            .iter()
            .find(|s| s.key == input)
            .copied()
            .ok_or_else(|| NodecutError::NotFound(format!("input '{}'", input)))?;

        if !from_spec.kind.can_convert_to(to_spec.kind) {
            return Err(NodecutError::IncompatibleConnection(format!(
                "{:?} output cannot feed {:?} input",
                from_spec.kind, to_spec.kind
            )));
        }

        if from == to || self.reaches(to, from) {
            return Err(NodecutError::IllegalState(
                "connection would create a cycle".to_string(),
            ));
        }

        self.edges
            .retain(|e| !(e.to_node == to && e.to_input == input));
        self.edges.push(Edge {
            from_node: from,
            from_output: output.to_string(),
            to_node: to,
            to_input: input.to_string(),
        });
        self.revision += 1;
        Ok(())
    }

    /// Remove the connection feeding `to`'s input, if any.
    pub fn disconnect(&mut self, to: NodeId, input: &str) {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.to_node == to && e.to_input == input));
        if self.edges.len() != before {
            self.revision += 1;
        }
    }

    /// Set a literal value on an unconnected input.
    pub fn set_input(&mut self, node: NodeId, input: &str, value: ParamValue) -> Result<()> {
        let spec = self
            .nodes
            .get(&node)
            .ok_or_else(|| NodecutError::NotFound(format!("node {:?}", node)))?
            .inputs()
            .iter()
            .find(|s| s.key == input)
            .copied()
            .ok_or_else(|| NodecutError::NotFound(format!("input '{}'", input)))?;

        if let Some(kind) = value.kind() {
            if !kind.can_convert_to(spec.kind) {
                return Err(NodecutError::IncompatibleConnection(format!(
                    "{:?} value cannot be set on {:?} input",
                    kind, spec.kind
                )));
            }
        }

        self.literals.insert((node, input.to_string()), value);
        Ok(())
    }

    /// Whether a path of edges leads from `start` to `target`.
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for e in self.edges.iter().filter(|e| e.from_node == current) {
                queue.push_back(e.to_node);
            }
        }
        false
    }

    /// Evaluate `output` of `node` at the context's time coordinate.
    ///
    /// Pull-based: only the ancestor set of the requested output is
    /// evaluated. Any unresolvable dependency yields `Empty`; this method
    /// never fails, so the graph stays evaluable mid-edit.
    pub fn value(&mut self, node: NodeId, output: &str, ctx: &mut EvalContext<'_>) -> ParamValue {
        if !self.nodes.contains_key(&node) {
            warn!(?node, "evaluating unknown node");
            return ParamValue::Empty;
        }

        // Collect the ancestor set and which outputs of each ancestor are
        // actually needed.
        let mut needed: HashMap<NodeId, HashSet<String>> = HashMap::new();
        needed.entry(node).or_default().insert(output.to_string());
        let mut queue = VecDeque::from([node]);
        let mut visited = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for e in self.edges.iter().filter(|e| e.to_node == current) {
                needed
                    .entry(e.from_node)
                    .or_default()
                    .insert(e.from_output.clone());
                queue.push_back(e.from_node);
            }
        }

        let order = match self.topo_order(&visited) {
            Some(order) => order,
            None => {
                warn!("cycle detected during evaluation");
                return ParamValue::Empty;
            }
        };

        let mut values: HashMap<(NodeId, String), ParamValue> = HashMap::new();

        for id in order {
            let node_impl = match self.nodes.get_mut(&id) {
                Some(n) => n,
                None => continue,
            };

            let mut inputs = ResolvedInputs::new();
            for spec in node_impl.inputs().iter() {
                let edge = self
                    .edges
                    .iter()
                    .find(|e| e.to_node == id && e.to_input == spec.key);
                let value = match edge {
                    Some(e) => values
                        .get(&(e.from_node, e.from_output.clone()))
                        .cloned()
                        .unwrap_or_default(),
                    None => self
                        .literals
                        .get(&(id, spec.key.to_string()))
                        .cloned()
                        .unwrap_or_default(),
                };
                inputs.insert(spec.key, value);
            }

            let outputs: Vec<String> = needed
                .get(&id)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            for out in outputs {
                let value = node_impl.evaluate(&out, &inputs, ctx);
                values.insert((id, out), value);
            }
        }

        values
            .remove(&(node, output.to_string()))
            .unwrap_or_default()
    }

    /// Kahn's algorithm restricted to `set`; `None` on a cycle.
    fn topo_order(&self, set: &HashSet<NodeId>) -> Option<Vec<NodeId>> {
        let mut in_degree: HashMap<NodeId, usize> = set.iter().map(|&id| (id, 0)).collect();
        for e in &self.edges {
            if set.contains(&e.from_node) && set.contains(&e.to_node) {
                *in_degree.get_mut(&e.to_node).unwrap() += 1;
            }
        }

        let mut queue: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();
        queue.sort();

        let mut order = Vec::with_capacity(set.len());
        while let Some(id) = queue.pop() {
            order.push(id);
            for e in self.edges.iter().filter(|e| e.from_node == id) {
                if let Some(deg) = in_degree.get_mut(&e.to_node) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push(e.to_node);
                        queue.sort();
                    }
                }
            }
        }

        if order.len() == set.len() {
            Some(order)
        } else {
            None
        }
    }

    /// Release every node's GPU and decoder resources. Called on renderer
    /// teardown; the graph remains editable and re-evaluable afterward.
    pub fn release_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.release_resources();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{MediaAudio, ViewerOutput};
    use crate::param::{ParamKind, ParamValue};
    use nodecut_media::DecoderRegistry;

    #[test]
    fn test_connect_checks_kinds() {
        let mut graph = NodeGraph::new();
        let audio = graph.add_node(Box::new(MediaAudio::new()));
        let viewer = graph.add_node(Box::new(ViewerOutput::new()));

        // Samples output into texture input must be rejected
        let err = graph
            .connect(audio, "samples", viewer, "texture")
            .unwrap_err();
        assert!(matches!(
            err,
            NodecutError::IncompatibleConnection(_)
        ));

        graph.connect(audio, "samples", viewer, "samples").unwrap();
    }

    #[test]
    fn test_connect_rejects_cycles() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Box::new(ViewerOutput::new()));
        let b = graph.add_node(Box::new(ViewerOutput::new()));

        graph.connect(a, "texture", b, "texture").unwrap();
        let err = graph.connect(b, "texture", a, "texture").unwrap_err();
        assert!(matches!(err, NodecutError::IllegalState(_)));
        // Self-loops are cycles too
        assert!(graph.connect(a, "texture", a, "texture").is_err());
    }

    #[test]
    fn test_unconnected_output_evaluates_empty() {
        let mut graph = NodeGraph::new();
        let viewer = graph.add_node(Box::new(ViewerOutput::new()));
        let registry = DecoderRegistry::with_defaults();
        let mut ctx = EvalContext::new(&registry);

        let value = graph.value(viewer, "texture", &mut ctx);
        assert!(value.is_empty());
    }

    #[test]
    fn test_revision_bumps_on_structural_edits() {
        let mut graph = NodeGraph::new();
        let r0 = graph.revision();
        let audio = graph.add_node(Box::new(MediaAudio::new()));
        let viewer = graph.add_node(Box::new(ViewerOutput::new()));
        assert!(graph.revision() > r0);

        let r1 = graph.revision();
        graph.connect(audio, "samples", viewer, "samples").unwrap();
        assert!(graph.revision() > r1);

        let r2 = graph.revision();
        graph.disconnect(viewer, "samples");
        assert!(graph.revision() > r2);
    }

    #[test]
    fn test_set_input_checks_kinds() {
        let mut graph = NodeGraph::new();
        let viewer = graph.add_node(Box::new(ViewerOutput::new()));
        assert!(graph
            .set_input(viewer, "texture", ParamValue::Float(1.0))
            .is_err());
        assert!(graph
            .set_input(viewer, "texture", ParamValue::Empty)
            .is_ok());
    }

    #[test]
    fn test_kind_constants_are_closed_set() {
        // The catalog's connection rules rely on exact matches
        assert!(!ParamKind::Footage.can_convert_to(ParamKind::Texture));
        assert!(!ParamKind::Matrix.can_convert_to(ParamKind::Float));
    }
}
