use crate::editor::{EdgeId, Graph, NodeId, NodeKind};

/// Node as drawn on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Editor id.
	pub id: NodeId,
	/// Displayed label.
	pub label: String,
	/// Picks the fill colour.
	pub kind: NodeKind,
	/// Drawn with a selection ring.
	pub selected: bool,
}

/// Edge as drawn on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Editor id.
	pub id: EdgeId,
	/// Subject node.
	pub source: NodeId,
	/// Object node.
	pub target: NodeId,
	/// Predicate drawn at the midpoint.
	pub label: String,
}

/// Everything the canvas draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes in editor order.
	pub nodes: Vec<GraphNode>,
	/// Edges in editor order.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Snapshot of an editor graph for drawing, marking selected nodes.
	pub fn from_graph(graph: &Graph, selected: &[NodeId]) -> Self {
		let nodes = graph
			.nodes()
			.map(|n| GraphNode {
				id: n.id,
				label: n.label.clone(),
				kind: n.kind,
				selected: selected.contains(&n.id),
			})
			.collect();
		let links = graph
			.edges()
			.map(|e| GraphLink {
				id: e.id,
				source: e.from,
				target: e.to,
				label: e.label.clone(),
			})
			.collect();
		Self { nodes, links }
	}
}
