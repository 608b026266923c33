use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::editor::{NodeId, NodeKind};

/// Reserved fill for literal nodes.
pub const LITERAL_COLOR: &str = "#FF3898";
const ENTITY_COLOR: &str = "#1f77b4";
const VARIABLE_COLOR: &str = "#2ca02c";
const CLUSTER_COLOR: &str = "#ff7f0e";

pub const NODE_RADIUS: f64 = 7.0;
pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel, in screen pixels, that turns a press into a drag.
pub const CLICK_SLOP: f64 = 3.0;

pub fn color_for(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Entity => ENTITY_COLOR,
		NodeKind::Literal => LITERAL_COLOR,
		NodeKind::Variable => VARIABLE_COLOR,
		NodeKind::Cluster => CLUSTER_COLOR,
	}
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: &'static str,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub label: String,
	pub membership: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

fn simulation() -> ForceGraph<NodeInfo, EdgeInfo> {
	ForceGraph::new(SimulationParameters {
		force_charge: 250.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: simulation(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		};
		state.sync(data);
		state
	}

	/// Rebuilds the simulation from new graph data. Nodes that survive keep
	/// their position and pinning; new nodes start on a ring.
	pub fn sync(&mut self, data: &GraphData) {
		let mut placed: HashMap<NodeId, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			placed.insert(
				node.data.user_data.id,
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut graph = simulation();
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y, is_anchor) = placed.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
				(
					(100.0 * angle.cos()) as f32,
					(100.0 * angle.sin()) as f32,
					false,
				)
			});

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id,
					label: node.label.clone(),
					color: color_for(node.kind),
					selected: node.selected,
				},
			});
			id_to_idx.insert(node.id, idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(
					src,
					tgt,
					EdgeData {
						user_data: EdgeInfo {
							label: link.label.clone(),
							membership: link.label == crate::editor::PART_OF,
						},
					},
				);
				edges.push((src, tgt));
			}
		}

		self.graph = graph;
		self.edges = edges;
		self.drag = DragState::default();
		self.hover = HoverState::default();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Editor id of a simulation node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id);
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};
	use crate::editor::EdgeId;

	fn data(labels: &[&str]) -> GraphData {
		GraphData {
			nodes: labels
				.iter()
				.enumerate()
				.map(|(i, l)| GraphNode {
					id: NodeId(i as u32),
					label: l.to_string(),
					kind: NodeKind::Entity,
					selected: false,
				})
				.collect(),
			links: vec![GraphLink {
				id: EdgeId(0),
				source: NodeId(0),
				target: NodeId(1),
				label: "treats".into(),
			}],
		}
	}

	#[test]
	fn sync_keeps_positions_of_surviving_nodes() {
		let mut state = ForceGraphState::new(&data(&["A", "B"]), 800.0, 600.0);
		let mut before = HashMap::new();
		state.graph.visit_nodes(|n| {
			before.insert(n.data.user_data.id, (n.x(), n.y()));
		});

		state.sync(&data(&["A", "B", "C"]));
		let mut after = HashMap::new();
		state.graph.visit_nodes(|n| {
			after.insert(n.data.user_data.id, (n.x(), n.y()));
		});
		assert_eq!(after.len(), 3);
		assert_eq!(after[&NodeId(0)], before[&NodeId(0)]);
		assert_eq!(after[&NodeId(1)], before[&NodeId(1)]);
	}

	#[test]
	fn literals_use_reserved_color() {
		assert_eq!(color_for(NodeKind::Literal), LITERAL_COLOR);
		assert_ne!(color_for(NodeKind::Entity), LITERAL_COLOR);
	}
}
