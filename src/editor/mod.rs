//! In-memory query graph editor.
//!
//! [`GraphEditor`] owns one graph and its undo log. Every edit is
//! validated first; a rejected edit returns an [`EditError`] and changes
//! nothing. An accepted edit is expressed as a [`Transaction`] of
//! [`UndoRecord`]s, applied to the graph and pushed onto the history, so
//! forward edits and redo go through the same code path.

mod error;
mod graph;
mod history;
mod label;
mod triples;
mod vocabulary;

use std::collections::BTreeSet;

use log::{debug, warn};

pub use error::EditError;
pub use graph::{ClusterId, Edge, EdgeId, Graph, Node, NodeId, NodeKind, PART_OF};
pub use history::{DEFAULT_HISTORY_LIMIT, Entity, History, Target, Transaction, UndoRecord};
pub use label::{EntityType, Variable};
pub use triples::{deserialize, serialize, to_triples};
pub use vocabulary::{DEFAULT_PREDICATES, Vocabulary};

use crate::config::EditorSettings;
use triples::Slot;

/// A query graph with validation and undo/redo.
pub struct GraphEditor {
	graph: Graph,
	history: History,
	vocabulary: Vocabulary,
	settings: EditorSettings,
}

impl Default for GraphEditor {
	fn default() -> Self {
		Self::new(Vocabulary::default(), EditorSettings::default())
	}
}

impl GraphEditor {
	/// Empty editor checking labels against `vocabulary`.
	pub fn new(vocabulary: Vocabulary, settings: EditorSettings) -> Self {
		Self {
			graph: Graph::new(),
			history: History::with_limit(settings.history_limit),
			vocabulary,
			settings,
		}
	}

	/// Current graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Undo and redo stacks.
	pub fn history(&self) -> &History {
		&self.history
	}

	/// Terms accepted by validation.
	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	/// Mutable vocabulary, for adding autocomplete results.
	pub fn vocabulary_mut(&mut self) -> &mut Vocabulary {
		&mut self.vocabulary
	}

	/// Settings the editor was built with.
	pub fn settings(&self) -> &EditorSettings {
		&self.settings
	}

	/// Query string for the search endpoint.
	pub fn serialize(&self) -> String {
		triples::serialize(&self.graph)
	}

	/// Contents of a triple file for the current graph.
	pub fn to_triples(&self) -> String {
		triples::to_triples(&self.graph)
	}

	/// Whether [`GraphEditor::undo`] would do anything.
	pub fn can_undo(&self) -> bool {
		self.history.can_undo()
	}

	/// Whether [`GraphEditor::redo`] would do anything.
	pub fn can_redo(&self) -> bool {
		self.history.can_redo()
	}

	/// Reverts the latest operation. False when there is none.
	pub fn undo(&mut self) -> bool {
		self.history.undo(&mut self.graph)
	}

	/// Re-applies the latest undone operation. False when there is none.
	pub fn redo(&mut self) -> bool {
		self.history.redo(&mut self.graph)
	}

	fn commit(&mut self, transaction: Transaction) {
		debug!(
			"{} ({} records)",
			transaction.operation,
			transaction.records.len()
		);
		transaction.replay(&mut self.graph);
		self.history.record(transaction);
	}

	fn node_checked(&self, id: NodeId) -> Result<&Node, EditError> {
		self.graph.node(id).ok_or(EditError::UnknownNode(id))
	}

	fn edge_checked(&self, id: EdgeId) -> Result<&Edge, EditError> {
		self.graph.edge(id).ok_or(EditError::UnknownEdge(id))
	}

	/// Normalizes an entity or variable label, or explains why it is refused.
	fn validate_label(
		&self,
		label: &str,
		entity_type: Option<EntityType>,
	) -> Result<String, EditError> {
		let label = label.trim();
		if label.is_empty() {
			return Err(EditError::EmptyLabel);
		}
		triples::check_writable(label, Slot::Entity)?;
		if let Some(mut var) = Variable::parse(label)? {
			if let (EntityType::Any, Some(t)) = (var.entity_type, entity_type) {
				var.entity_type = t;
			}
			return Ok(var.pattern());
		}
		if !self.vocabulary.knows_entity(label) {
			return Err(EditError::UnknownEntity(label.to_string()));
		}
		Ok(label.to_string())
	}

	fn validate_predicate(&self, label: &str) -> Result<String, EditError> {
		let label = label.trim();
		if label.is_empty() {
			return Err(EditError::EmptyLabel);
		}
		if label == PART_OF {
			return Err(EditError::ReservedPredicate);
		}
		triples::check_writable(label, Slot::Predicate)?;
		if self.settings.validate_predicates && !self.vocabulary.knows_predicate(label) {
			return Err(EditError::UnknownPredicate(label.to_string()));
		}
		Ok(label.to_string())
	}

	fn insert_new_node(&mut self, operation: &'static str, label: String, kind: NodeKind) -> NodeId {
		let id = self.graph.allocate_node();
		let mut txn = Transaction::new(operation);
		txn.push(UndoRecord::Created(Entity::Node(Node {
			id,
			label,
			kind,
			cluster: None,
		})));
		self.commit(txn);
		id
	}

	/// Adds an entity or variable node. `entity_type` annotates a variable
	/// that has no type of its own.
	pub fn add_node(
		&mut self,
		label: &str,
		entity_type: Option<EntityType>,
	) -> Result<NodeId, EditError> {
		let label = self
			.validate_label(label, entity_type)
			.inspect_err(|e| warn!("add node rejected: {}", e))?;
		let kind = NodeKind::classify(&label);
		Ok(self.insert_new_node("add node", label, kind))
	}

	fn validate_literal(value: &str) -> Result<String, EditError> {
		let value = value.trim();
		if value.is_empty() {
			return Err(EditError::EmptyLabel);
		}
		triples::check_writable(value, Slot::Literal)?;
		Ok(value.to_string())
	}

	/// Adds a literal value node. Literals bypass the vocabulary but must
	/// survive a save and reload of the triple file.
	pub fn add_literal(&mut self, value: &str) -> Result<NodeId, EditError> {
		let value =
			Self::validate_literal(value).inspect_err(|e| warn!("add literal rejected: {}", e))?;
		Ok(self.insert_new_node("add literal", value, NodeKind::Literal))
	}

	/// Connects `from` to `to` with a predicate.
	pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: &str) -> Result<EdgeId, EditError> {
		let label = self
			.node_checked(from)
			.and(self.node_checked(to))
			.and_then(|_| self.validate_predicate(label))
			.inspect_err(|e| warn!("add edge rejected: {}", e))?;

		let id = self.graph.allocate_edge();
		let mut txn = Transaction::new("add edge");
		txn.push(UndoRecord::Created(Entity::Edge(Edge {
			id,
			from,
			to,
			label,
		})));
		self.commit(txn);
		Ok(id)
	}

	fn relabel(&mut self, operation: &'static str, target: Target, old: String, new: String) {
		if old == new {
			return;
		}
		let mut txn = Transaction::new(operation);
		txn.push(UndoRecord::Relabeled { target, old, new });
		self.commit(txn);
	}

	/// Relabels an entity, variable or literal node. A label switching
	/// between concrete and `?` syntax changes the node kind with it.
	pub fn rename_node(&mut self, id: NodeId, label: &str) -> Result<(), EditError> {
		let (old, new) = self
			.node_checked(id)
			.and_then(|node| {
				let new = match node.kind {
					NodeKind::Cluster => return Err(EditError::ClusterNode(id)),
					NodeKind::Literal => Self::validate_literal(label)?,
					NodeKind::Entity | NodeKind::Variable => self.validate_label(label, None)?,
				};
				Ok((node.label.clone(), new))
			})
			.inspect_err(|e| warn!("rename node rejected: {}", e))?;
		self.relabel("rename node", Target::Node(id), old, new);
		Ok(())
	}

	/// Relabels a cluster aggregator.
	pub fn rename_cluster(&mut self, id: NodeId, label: &str) -> Result<(), EditError> {
		let (old, new) = self
			.node_checked(id)
			.and_then(|node| {
				if !node.is_cluster() {
					return Err(EditError::NotACluster(id));
				}
				let label = label.trim();
				if label.is_empty() {
					return Err(EditError::EmptyLabel);
				}
				triples::check_writable(label, Slot::Entity)?;
				Ok((node.label.clone(), label.to_string()))
			})
			.inspect_err(|e| warn!("rename cluster rejected: {}", e))?;
		self.relabel("rename cluster", Target::Node(id), old, new);
		Ok(())
	}

	/// Changes an edge predicate. Membership edges are fixed.
	pub fn rename_edge(&mut self, id: EdgeId, label: &str) -> Result<(), EditError> {
		let (old, new) = self
			.edge_checked(id)
			.and_then(|edge| {
				if edge.is_membership() {
					return Err(EditError::MembershipEdge(id));
				}
				Ok((edge.label.clone(), self.validate_predicate(label)?))
			})
			.inspect_err(|e| warn!("rename edge rejected: {}", e))?;
		self.relabel("rename edge", Target::Edge(id), old, new);
		Ok(())
	}

	/// Record releasing the member side of a `part_of` edge, if the member
	/// is still assigned to that edge's cluster.
	fn release_member(&self, edge: &Edge) -> Option<UndoRecord> {
		if !edge.is_membership() {
			return None;
		}
		let aggregator = self.graph.node(edge.to).filter(|n| n.is_cluster())?;
		let member = self.graph.node(edge.from)?;
		(member.cluster.is_some() && member.cluster == aggregator.cluster).then(|| {
			UndoRecord::Regrouped {
				node: member.id,
				old: member.cluster,
				new: None,
			}
		})
	}

	/// Records removing `ids` and every edge touching them. Edges shared by
	/// two of the nodes are recorded once.
	fn cascade_delete(&self, ids: &[NodeId], txn: &mut Transaction) {
		let mut seen = BTreeSet::new();
		for &id in ids {
			for edge_id in self.graph.incident_edges(id) {
				if !seen.insert(edge_id) {
					continue;
				}
				let Some(edge) = self.graph.edge(edge_id) else {
					continue;
				};
				if ids.contains(&edge.to) {
					if let Some(release) = self.release_member(edge) {
						txn.push(release);
					}
				}
				txn.push(UndoRecord::Deleted(Entity::Edge(edge.clone())));
			}
		}
		for node in ids.iter().filter_map(|id| self.graph.node(*id)) {
			txn.push(UndoRecord::Deleted(Entity::Node(node.clone())));
		}
	}

	/// Deletes a node together with every edge touching it. Deleting a
	/// cluster aggregator releases its members.
	pub fn delete_node(&mut self, id: NodeId) -> Result<(), EditError> {
		self.delete_nodes(&[id])
	}

	/// Deletes a selection of nodes and their edges as one undoable step.
	/// Every id is checked before anything is removed.
	pub fn delete_nodes(&mut self, ids: &[NodeId]) -> Result<(), EditError> {
		let mut targets: Vec<NodeId> = Vec::with_capacity(ids.len());
		for &id in ids {
			self.node_checked(id)
				.inspect_err(|e| warn!("delete rejected: {}", e))?;
			if !targets.contains(&id) {
				targets.push(id);
			}
		}

		let operation = if targets.len() == 1 { "delete node" } else { "delete nodes" };
		let mut txn = Transaction::new(operation);
		self.cascade_delete(&targets, &mut txn);
		self.commit(txn);
		Ok(())
	}

	/// Removes one edge, releasing the member of a membership edge.
	pub fn delete_edge(&mut self, id: EdgeId) -> Result<(), EditError> {
		let edge = self
			.edge_checked(id)
			.inspect_err(|e| warn!("delete edge rejected: {}", e))?
			.clone();

		let mut txn = Transaction::new("delete edge");
		if let Some(release) = self.release_member(&edge) {
			txn.push(release);
		}
		txn.push(UndoRecord::Deleted(Entity::Edge(edge)));
		self.commit(txn);
		Ok(())
	}

	/// Groups the selected nodes under a new aggregator node linked by
	/// `part_of` edges. Fewer than two distinct nodes is a no-op.
	pub fn cluster_selection(&mut self, ids: &[NodeId]) -> Result<Option<NodeId>, EditError> {
		let mut members: Vec<NodeId> = Vec::with_capacity(ids.len());
		for id in ids {
			if !members.contains(id) {
				members.push(*id);
			}
		}
		if members.len() < 2 {
			debug!("cluster selection ignored, {} node(s) selected", members.len());
			return Ok(None);
		}

		members
			.iter()
			.try_for_each(|&id| {
				let node = self.node_checked(id)?;
				if node.is_cluster() {
					Err(EditError::ClusterNode(id))
				} else if node.cluster.is_some() {
					Err(EditError::AlreadyClustered(id))
				} else {
					Ok(())
				}
			})
			.inspect_err(|e| warn!("cluster selection rejected: {}", e))?;

		let aggregator = self.graph.allocate_node();
		let cluster = self.graph.allocate_cluster();
		let mut txn = Transaction::new("cluster selection");
		txn.push(UndoRecord::Created(Entity::Node(Node {
			id: aggregator,
			label: format!("Cluster {}", cluster.0 + 1),
			kind: NodeKind::Cluster,
			cluster: Some(cluster),
		})));
		for member in members {
			txn.push(UndoRecord::Regrouped {
				node: member,
				old: None,
				new: Some(cluster),
			});
			txn.push(UndoRecord::Created(Entity::Edge(Edge {
				id: self.graph.allocate_edge(),
				from: member,
				to: aggregator,
				label: PART_OF.to_string(),
			})));
		}
		self.commit(txn);
		Ok(Some(aggregator))
	}

	fn delete_everything(&self, txn: &mut Transaction) {
		for edge in self.graph.edges() {
			txn.push(UndoRecord::Deleted(Entity::Edge(edge.clone())));
		}
		for node in self.graph.nodes() {
			txn.push(UndoRecord::Deleted(Entity::Node(node.clone())));
		}
	}

	/// Removes every node and edge as one undoable step.
	pub fn clear(&mut self) {
		let mut txn = Transaction::new("clear");
		self.delete_everything(&mut txn);
		self.commit(txn);
	}

	/// Replaces the graph with the contents of a triple file as one
	/// undoable step. Unreadable lines are skipped, so the result may be
	/// partial or empty.
	pub fn load_triples(&mut self, text: &str) {
		let loaded = triples::deserialize(text);
		let mut txn = Transaction::new("load triples");
		self.delete_everything(&mut txn);

		let mut node_ids = std::collections::HashMap::new();
		let mut cluster_ids = std::collections::HashMap::new();
		for node in loaded.nodes() {
			let id = self.graph.allocate_node();
			node_ids.insert(node.id, id);
			let cluster = node.cluster.map(|c| {
				*cluster_ids
					.entry(c)
					.or_insert_with(|| self.graph.allocate_cluster())
			});
			txn.push(UndoRecord::Created(Entity::Node(Node {
				id,
				cluster,
				..node.clone()
			})));
		}
		for edge in loaded.edges() {
			let (Some(&from), Some(&to)) = (node_ids.get(&edge.from), node_ids.get(&edge.to)) else {
				continue;
			};
			txn.push(UndoRecord::Created(Entity::Edge(Edge {
				id: self.graph.allocate_edge(),
				from,
				to,
				label: edge.label.clone(),
			})));
		}
		self.commit(txn);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn editor() -> GraphEditor {
		let vocabulary = Vocabulary::new().with_entities([
			"Metformin",
			"Diabetes Mellitus",
			"Simvastatin",
			"Aspirin",
		]);
		GraphEditor::new(vocabulary, EditorSettings::default())
	}

	fn counts(editor: &GraphEditor) -> (usize, usize, usize) {
		(
			editor.graph().node_count(),
			editor.graph().edge_count(),
			editor.history().undo_len(),
		)
	}

	#[test]
	fn invalid_labels_change_nothing() {
		let mut ed = editor();
		ed.add_node("Metformin", None).unwrap();
		let before = counts(&ed);

		assert_eq!(ed.add_node("", None), Err(EditError::EmptyLabel));
		assert!(matches!(
			ed.add_node("?", None),
			Err(EditError::MalformedVariable(_))
		));
		assert!(matches!(
			ed.add_node("NotARealEntity", None),
			Err(EditError::UnknownEntity(_))
		));
		assert_eq!(counts(&ed), before);
	}

	#[test]
	fn variable_takes_type_hint() {
		let mut ed = editor();
		let id = ed.add_node("?X", Some(EntityType::Disease)).unwrap();
		let node = ed.graph().node(id).unwrap();
		assert_eq!(node.label, "?X(Disease)");
		assert_eq!(node.kind, NodeKind::Variable);

		let explicit = ed.add_node("?Y(Drug)", Some(EntityType::Gene)).unwrap();
		assert_eq!(ed.graph().node(explicit).unwrap().label, "?Y(Drug)");
	}

	#[test]
	fn edges_need_existing_endpoints_and_known_predicates() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("?X(Disease)", None).unwrap();

		assert_eq!(
			ed.add_edge(a, NodeId(99), "treats"),
			Err(EditError::UnknownNode(NodeId(99)))
		);
		assert!(matches!(
			ed.add_edge(a, b, "cures"),
			Err(EditError::UnknownPredicate(_))
		));
		assert_eq!(ed.add_edge(a, b, "part_of"), Err(EditError::ReservedPredicate));
		assert_eq!(ed.graph().edge_count(), 0);

		ed.add_edge(a, b, "treats").unwrap();
		assert_eq!(ed.serialize(), "Metformin treats ?X(Disease).");
	}

	#[test]
	fn free_text_predicates_when_validation_is_off() {
		let settings = EditorSettings {
			validate_predicates: false,
			..EditorSettings::default()
		};
		let mut ed = GraphEditor::new(Vocabulary::new().with_entities(["Metformin"]), settings);
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_literal("Tablet").unwrap();
		ed.add_edge(a, b, "is given as").unwrap();
		assert_eq!(ed.serialize(), "Metformin \"is given as\" Tablet.");
	}

	#[test]
	fn rename_node_switches_between_entity_and_variable() {
		let mut ed = editor();
		let id = ed.add_node("Metformin", None).unwrap();
		ed.rename_node(id, "?D(Drug)").unwrap();
		assert_eq!(ed.graph().node(id).unwrap().kind, NodeKind::Variable);

		assert!(ed.undo());
		let node = ed.graph().node(id).unwrap();
		assert_eq!(node.label, "Metformin");
		assert_eq!(node.kind, NodeKind::Entity);

		assert!(matches!(
			ed.rename_node(id, "Unobtainium"),
			Err(EditError::UnknownEntity(_))
		));
	}

	#[test]
	fn renaming_to_the_same_label_records_nothing() {
		let mut ed = editor();
		let id = ed.add_node("Metformin", None).unwrap();
		ed.rename_node(id, " Metformin ").unwrap();
		assert_eq!(ed.history().undo_len(), 1);
	}

	#[test]
	fn cascade_delete_removes_incident_edges_only() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Diabetes Mellitus", None).unwrap();
		let c = ed.add_node("Aspirin", None).unwrap();
		ed.add_edge(a, b, "treats").unwrap();
		ed.add_edge(c, b, "treats").unwrap();
		ed.add_edge(a, c, "interacts").unwrap();

		let touching = ed.graph().incident_edges(a).len();
		let before = ed.graph().edge_count();
		ed.delete_node(a).unwrap();
		assert_eq!(ed.graph().edge_count(), before - touching);
		assert_eq!(ed.serialize(), "Aspirin treats \"Diabetes Mellitus\".");

		assert!(ed.undo());
		assert_eq!(ed.graph().edge_count(), before);
		assert_eq!(
			ed.serialize(),
			"Metformin treats \"Diabetes Mellitus\". Aspirin treats \"Diabetes Mellitus\". Metformin interacts Aspirin."
		);
	}

	#[test]
	fn deleting_a_selection_is_one_undo_step() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Aspirin", None).unwrap();
		let tablet = ed.add_literal("Tablet").unwrap();
		ed.add_edge(a, tablet, "treats").unwrap();
		ed.add_edge(b, tablet, "treats").unwrap();
		ed.add_edge(a, b, "interacts").unwrap();
		let query = ed.serialize();
		let depth = ed.history().undo_len();

		ed.delete_nodes(&[a, b, a]).unwrap();
		assert_eq!(ed.graph().node_count(), 1);
		assert_eq!(ed.graph().edge_count(), 0);
		assert_eq!(ed.history().undo_len(), depth + 1);

		assert!(ed.undo());
		assert_eq!(ed.graph().node_count(), 3);
		assert_eq!(ed.serialize(), query);
		assert!(ed.redo());
		assert_eq!(ed.serialize(), "");
	}

	#[test]
	fn deleting_a_selection_with_a_stale_id_removes_nothing() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Aspirin", None).unwrap();
		ed.add_edge(a, b, "interacts").unwrap();
		let before = counts(&ed);

		assert_eq!(
			ed.delete_nodes(&[a, NodeId(42), b]),
			Err(EditError::UnknownNode(NodeId(42)))
		);
		assert_eq!(counts(&ed), before);
	}

	#[test]
	fn text_the_triple_file_cannot_hold_is_refused() {
		let settings = EditorSettings {
			validate_predicates: false,
			..EditorSettings::default()
		};
		let mut ed = GraphEditor::new(Vocabulary::new().with_entities(["Metformin"]), settings);
		let a = ed.add_node("Metformin", None).unwrap();
		let dose = ed.add_literal("10 mg").unwrap();
		let before = counts(&ed);

		for value in ["?x(drug)", "?X(Any)", "<5 mg>", "10\tmg", "two\nlines"] {
			assert!(
				matches!(ed.add_literal(value), Err(EditError::Unwritable(_))),
				"{:?}",
				value
			);
			assert!(matches!(ed.rename_node(dose, value), Err(EditError::Unwritable(_))));
		}
		for predicate in ["<treats>", "co\toccurs"] {
			assert!(matches!(
				ed.add_edge(a, dose, predicate),
				Err(EditError::Unwritable(_))
			));
		}
		assert_eq!(counts(&ed), before);

		ed.add_edge(a, dose, "given at").unwrap();
		let reloaded = triples::deserialize(&ed.to_triples());
		assert_eq!(triples::serialize(&reloaded), ed.serialize());
	}

	#[test]
	fn single_node_clustering_is_a_noop() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let before = counts(&ed);
		assert_eq!(ed.cluster_selection(&[a]), Ok(None));
		assert_eq!(ed.cluster_selection(&[a, a]), Ok(None));
		assert_eq!(counts(&ed), before);
	}

	#[test]
	fn clustering_two_nodes_adds_aggregator_and_two_edges() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Simvastatin", None).unwrap();
		let (nodes, edges, _) = counts(&ed);

		let aggregator = ed.cluster_selection(&[a, b]).unwrap().unwrap();
		assert_eq!(ed.graph().node_count(), nodes + 1);
		assert_eq!(ed.graph().edge_count(), edges + 2);

		let agg = ed.graph().node(aggregator).unwrap();
		assert_eq!(agg.kind, NodeKind::Cluster);
		let cluster = agg.cluster.unwrap();
		assert_eq!(ed.graph().members(cluster), vec![a, b]);
		assert!(ed.graph().edges().all(|e| e.is_membership() && e.to == aggregator));

		assert_eq!(
			ed.cluster_selection(&[a, b]),
			Err(EditError::AlreadyClustered(a))
		);
	}

	#[test]
	fn deleting_aggregator_releases_members_and_undo_restores_them() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Simvastatin", None).unwrap();
		let aggregator = ed.cluster_selection(&[a, b]).unwrap().unwrap();
		let cluster = ed.graph().node(aggregator).unwrap().cluster;

		ed.delete_node(aggregator).unwrap();
		assert_eq!(ed.graph().edge_count(), 0);
		assert!(ed.graph().nodes().all(|n| n.cluster.is_none()));

		assert!(ed.undo());
		assert_eq!(ed.graph().node(a).unwrap().cluster, cluster);
		assert_eq!(ed.graph().node(b).unwrap().cluster, cluster);
		assert_eq!(ed.graph().edge_count(), 2);
	}

	#[test]
	fn deleting_membership_edge_releases_member() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Simvastatin", None).unwrap();
		ed.cluster_selection(&[a, b]).unwrap();
		let edge = ed.graph().incident_edges(a)[0];

		assert_eq!(ed.rename_edge(edge, "treats"), Err(EditError::MembershipEdge(edge)));
		ed.delete_edge(edge).unwrap();
		assert_eq!(ed.graph().node(a).unwrap().cluster, None);
		assert!(ed.graph().node(b).unwrap().cluster.is_some());
	}

	#[test]
	fn cluster_rename_rules() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Simvastatin", None).unwrap();
		let aggregator = ed.cluster_selection(&[a, b]).unwrap().unwrap();

		assert_eq!(ed.rename_node(aggregator, "Statins"), Err(EditError::ClusterNode(aggregator)));
		assert_eq!(ed.rename_cluster(a, "Statins"), Err(EditError::NotACluster(a)));
		ed.rename_cluster(aggregator, "Lipid drugs").unwrap();
		assert_eq!(
			ed.serialize(),
			"Metformin part_of \"Lipid drugs\". Simvastatin part_of \"Lipid drugs\"."
		);
	}

	#[test]
	fn clear_is_undoable() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Diabetes Mellitus", None).unwrap();
		ed.add_edge(a, b, "treats").unwrap();
		let query = ed.serialize();

		ed.clear();
		assert!(ed.graph().is_empty());
		assert!(ed.undo());
		assert_eq!(ed.serialize(), query);
	}

	#[test]
	fn clearing_an_empty_graph_records_nothing() {
		let mut ed = editor();
		ed.clear();
		assert!(!ed.can_undo());
	}

	#[test]
	fn new_edit_after_undo_discards_redo() {
		let mut ed = editor();
		ed.add_node("Metformin", None).unwrap();
		ed.undo();
		assert!(ed.can_redo());
		ed.add_node("Aspirin", None).unwrap();
		assert!(!ed.can_redo());
		assert!(!ed.redo());
	}

	#[test]
	fn load_replaces_graph_and_undo_brings_it_back() {
		let mut ed = editor();
		let a = ed.add_node("Aspirin", None).unwrap();
		let b = ed.add_node("?X(Disease)", None).unwrap();
		ed.add_edge(a, b, "treats").unwrap();
		let before = ed.serialize();

		ed.load_triples(
			"<Metformin>\ttreats\t<Diabetes Mellitus>\t.\n<Metformin>\tadministered\tTablet\t.",
		);
		assert_eq!(
			ed.serialize(),
			"Metformin treats \"Diabetes Mellitus\". Metformin administered Tablet."
		);
		assert_eq!(ed.graph().node_count(), 3);
		// loaded ids never collide with the replaced ones
		assert!(ed.graph().node(a).is_none());

		assert!(ed.undo());
		assert_eq!(ed.serialize(), before);
		assert!(ed.redo());
		assert_eq!(ed.graph().edge_count(), 2);
	}

	#[test]
	fn undo_all_then_redo_all_restores_query() {
		let mut ed = editor();
		let a = ed.add_node("Metformin", None).unwrap();
		let b = ed.add_node("Diabetes Mellitus", None).unwrap();
		let c = ed.add_literal("Tablet").unwrap();
		let e = ed.add_edge(a, b, "treats").unwrap();
		ed.add_edge(a, c, "administered").unwrap();
		ed.rename_edge(e, "associated").unwrap();
		ed.cluster_selection(&[a, b]).unwrap();
		ed.delete_node(c).unwrap();
		let query = ed.serialize();
		let steps = ed.history().undo_len();

		for _ in 0..steps {
			assert!(ed.undo());
		}
		assert!(ed.graph().is_empty());
		for _ in 0..steps {
			assert!(ed.redo());
		}
		assert_eq!(ed.serialize(), query);
	}
}
