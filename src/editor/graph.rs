//! Storage for one query graph and the primitive changes undo records
//! describe.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use super::history::{Entity, Target, UndoRecord};
use super::label::{self, Variable};

/// Predicate linking a cluster member to its aggregator node.
pub const PART_OF: &str = "part_of";

/// Identifier of a node, never reused within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Identifier of an edge, never reused within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

/// Identifier shared by an aggregator and its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub u32);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "n{}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

impl fmt::Display for ClusterId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "c{}", self.0)
	}
}

/// What a node stands for in the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// A named entity from the vocabulary.
	Entity,
	/// A bare value the search matches verbatim.
	Literal,
	/// A `?name(Type)` placeholder.
	Variable,
	/// An aggregator standing for a group of nodes.
	Cluster,
}

impl NodeKind {
	/// Kind implied by a label for nodes that are neither literals nor
	/// clusters.
	pub fn classify(label: &str) -> Self {
		if label::is_variable(label) {
			NodeKind::Variable
		} else {
			NodeKind::Entity
		}
	}
}

/// A subject or object of the query.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable handle for undo and selection.
	pub id: NodeId,
	/// Text as entered, e.g. `Metformin` or `?X(Drug)`.
	pub label: String,
	/// Derived from the label except for literals and clusters.
	pub kind: NodeKind,
	/// Cluster this node belongs to, or leads when it is an aggregator.
	pub cluster: Option<ClusterId>,
}

impl Node {
	/// Token used for this node in a query string.
	pub fn query_token(&self) -> String {
		let text = match self.kind {
			NodeKind::Variable => Variable::parse(&self.label)
				.ok()
				.flatten()
				.map(|v| v.pattern())
				.unwrap_or_else(|| self.label.trim().to_string()),
			_ => self.label.trim().to_string(),
		};
		label::quote(&text)
	}

	/// Whether this is a cluster aggregator.
	pub fn is_cluster(&self) -> bool {
		self.kind == NodeKind::Cluster
	}
}

/// A directed statement `from label to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Stable handle for undo and the edge list.
	pub id: EdgeId,
	/// Subject.
	pub from: NodeId,
	/// Object.
	pub to: NodeId,
	/// Predicate.
	pub label: String,
}

impl Edge {
	/// Whether this edge ties a member to its aggregator.
	pub fn is_membership(&self) -> bool {
		self.label == PART_OF
	}

	/// Whether `node` is either endpoint.
	pub fn touches(&self, node: NodeId) -> bool {
		self.from == node || self.to == node
	}
}

/// Node and edge collections of one query graph.
///
/// Both collections are keyed by monotonically allocated ids, so iteration
/// order is creation order and an entity restored by undo lands back in its
/// original position.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: BTreeMap<NodeId, Node>,
	edges: BTreeMap<EdgeId, Edge>,
	next_node: u32,
	next_edge: u32,
	next_cluster: u32,
}

impl Graph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Live node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	/// Live edge by id.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(&id)
	}

	/// Nodes in creation order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// Edges in creation order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values()
	}

	/// Number of live nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of live edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// True when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// First node carrying exactly this label.
	pub fn find_node(&self, label: &str) -> Option<&Node> {
		self.nodes.values().find(|n| n.label == label)
	}

	/// Edges with `node` at either end, self loops counted once.
	pub fn incident_edges(&self, node: NodeId) -> Vec<EdgeId> {
		self.edges
			.values()
			.filter(|e| e.touches(node))
			.map(|e| e.id)
			.collect()
	}

	/// Aggregator node of a cluster.
	pub fn aggregator(&self, cluster: ClusterId) -> Option<&Node> {
		self.nodes
			.values()
			.find(|n| n.is_cluster() && n.cluster == Some(cluster))
	}

	/// Non-aggregator nodes assigned to a cluster.
	pub fn members(&self, cluster: ClusterId) -> Vec<NodeId> {
		self.nodes
			.values()
			.filter(|n| !n.is_cluster() && n.cluster == Some(cluster))
			.map(|n| n.id)
			.collect()
	}

	/// Endpoint of `edge` opposite to `node`.
	pub fn opposite(&self, edge: &Edge, node: NodeId) -> Option<&Node> {
		let other = if edge.from == node { edge.to } else { edge.from };
		self.node(other)
	}

	pub(crate) fn allocate_node(&mut self) -> NodeId {
		let id = NodeId(self.next_node);
		self.next_node += 1;
		id
	}

	pub(crate) fn allocate_edge(&mut self) -> EdgeId {
		let id = EdgeId(self.next_edge);
		self.next_edge += 1;
		id
	}

	pub(crate) fn allocate_cluster(&mut self) -> ClusterId {
		let id = ClusterId(self.next_cluster);
		self.next_cluster += 1;
		id
	}

	pub(crate) fn insert_node(&mut self, node: Node) {
		self.next_node = self.next_node.max(node.id.0 + 1);
		if let Some(c) = node.cluster {
			self.next_cluster = self.next_cluster.max(c.0 + 1);
		}
		self.nodes.insert(node.id, node);
	}

	pub(crate) fn insert_edge(&mut self, edge: Edge) {
		debug_assert!(
			self.nodes.contains_key(&edge.from) && self.nodes.contains_key(&edge.to),
			"edge {} inserted before its endpoints",
			edge.id
		);
		self.next_edge = self.next_edge.max(edge.id.0 + 1);
		self.edges.insert(edge.id, edge);
	}

	fn set_label(&mut self, target: Target, text: &str) {
		match target {
			Target::Node(id) => match self.nodes.get_mut(&id) {
				Some(node) => {
					node.label = text.to_string();
					if matches!(node.kind, NodeKind::Entity | NodeKind::Variable) {
						node.kind = NodeKind::classify(text);
					}
				}
				None => debug!("relabel skipped, node {} is gone", id),
			},
			Target::Edge(id) => match self.edges.get_mut(&id) {
				Some(edge) => edge.label = text.to_string(),
				None => debug!("relabel skipped, edge {} is gone", id),
			},
		}
	}

	fn set_cluster(&mut self, id: NodeId, cluster: Option<ClusterId>) {
		match self.nodes.get_mut(&id) {
			Some(node) => node.cluster = cluster,
			None => debug!("regroup skipped, node {} is gone", id),
		}
	}

	fn create(&mut self, entity: &Entity) {
		match entity {
			Entity::Node(node) => self.insert_node(node.clone()),
			Entity::Edge(edge) => self.insert_edge(edge.clone()),
		}
	}

	fn destroy(&mut self, entity: &Entity) {
		match entity {
			Entity::Node(node) => {
				self.nodes.remove(&node.id);
			}
			Entity::Edge(edge) => {
				self.edges.remove(&edge.id);
			}
		}
	}

	/// Applies the forward effect of a record.
	pub(crate) fn apply(&mut self, record: &UndoRecord) {
		match record {
			UndoRecord::Created(entity) => self.create(entity),
			UndoRecord::Deleted(entity) => self.destroy(entity),
			UndoRecord::Relabeled { target, new, .. } => self.set_label(*target, new),
			UndoRecord::Regrouped { node, new, .. } => self.set_cluster(*node, *new),
		}
	}

	/// Applies the inverse effect of a record.
	pub(crate) fn revert(&mut self, record: &UndoRecord) {
		match record {
			UndoRecord::Created(entity) => self.destroy(entity),
			UndoRecord::Deleted(entity) => self.create(entity),
			UndoRecord::Relabeled { target, old, .. } => self.set_label(*target, old),
			UndoRecord::Regrouped { node, old, .. } => self.set_cluster(*node, *old),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: u32, label: &str, kind: NodeKind) -> Node {
		Node {
			id: NodeId(id),
			label: label.into(),
			kind,
			cluster: None,
		}
	}

	#[test]
	fn allocation_skips_past_inserted_ids() {
		let mut g = Graph::new();
		g.insert_node(node(7, "Metformin", NodeKind::Entity));
		assert_eq!(g.allocate_node(), NodeId(8));
	}

	#[test]
	fn revert_undoes_apply() {
		let mut g = Graph::new();
		let record = UndoRecord::Created(Entity::Node(node(0, "Metformin", NodeKind::Entity)));
		g.apply(&record);
		assert_eq!(g.node_count(), 1);
		g.revert(&record);
		assert!(g.is_empty());
	}

	#[test]
	fn relabel_reclassifies_entities_but_not_literals() {
		let mut g = Graph::new();
		g.insert_node(node(0, "Metformin", NodeKind::Entity));
		g.insert_node(node(1, "Tablet", NodeKind::Literal));
		g.apply(&UndoRecord::Relabeled {
			target: Target::Node(NodeId(0)),
			old: "Metformin".into(),
			new: "?X(Drug)".into(),
		});
		g.apply(&UndoRecord::Relabeled {
			target: Target::Node(NodeId(1)),
			old: "Tablet".into(),
			new: "?Y".into(),
		});
		assert_eq!(g.node(NodeId(0)).unwrap().kind, NodeKind::Variable);
		assert_eq!(g.node(NodeId(1)).unwrap().kind, NodeKind::Literal);
	}

	#[test]
	fn query_token_strips_any_and_quotes() {
		assert_eq!(
			node(0, "?X(Any)", NodeKind::Variable).query_token(),
			"?X"
		);
		assert_eq!(
			node(0, "Diabetes Mellitus", NodeKind::Entity).query_token(),
			"\"Diabetes Mellitus\""
		);
	}
}
