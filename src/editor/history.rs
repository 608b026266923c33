//! Linear undo/redo over edit transactions.

use std::collections::VecDeque;

use log::debug;

use super::graph::{ClusterId, Edge, EdgeId, Graph, Node, NodeId};

/// Transactions kept on the undo stack unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// A node or an edge, as captured by an undo record.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
	/// A full node snapshot.
	Node(Node),
	/// A full edge snapshot.
	Edge(Edge),
}

/// What a relabel touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
	/// A node label.
	Node(NodeId),
	/// An edge label.
	Edge(EdgeId),
}

/// One reversible change. Each variant holds both directions, so the same
/// record serves undo and redo.
#[derive(Clone, Debug, PartialEq)]
pub enum UndoRecord {
	/// The entity was inserted.
	Created(Entity),
	/// The entity was removed.
	Deleted(Entity),
	/// A label changed from `old` to `new`.
	Relabeled {
		/// Node or edge whose label changed.
		target: Target,
		/// Label before the change.
		old: String,
		/// Label after the change.
		new: String,
	},
	/// Cluster membership changed from `old` to `new`.
	Regrouped {
		/// Member whose cluster changed.
		node: NodeId,
		/// Cluster before the change.
		old: Option<ClusterId>,
		/// Cluster after the change.
		new: Option<ClusterId>,
	},
}

/// The records produced by one user-visible operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
	/// Name used in log lines.
	pub operation: &'static str,
	/// Changes in the order they were applied.
	pub records: Vec<UndoRecord>,
}

impl Transaction {
	/// An empty transaction.
	pub fn new(operation: &'static str) -> Self {
		Self {
			operation,
			records: Vec::new(),
		}
	}

	/// Appends a record.
	pub fn push(&mut self, record: UndoRecord) {
		self.records.push(record);
	}

	/// True when the operation changed nothing.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Re-applies every record in insertion order.
	pub fn replay(&self, graph: &mut Graph) {
		for record in &self.records {
			graph.apply(record);
		}
	}

	/// Inverts every record, newest first, so dependent entities come back
	/// before the entities that reference them.
	pub fn rewind(&self, graph: &mut Graph) {
		for record in self.records.iter().rev() {
			graph.revert(record);
		}
	}
}

/// Undo and redo stacks of one editor.
#[derive(Clone, Debug)]
pub struct History {
	undo: VecDeque<Transaction>,
	redo: Vec<Transaction>,
	limit: usize,
}

impl Default for History {
	fn default() -> Self {
		Self::with_limit(DEFAULT_HISTORY_LIMIT)
	}
}

impl History {
	/// Empty history keeping at most `limit` transactions, at least one.
	pub fn with_limit(limit: usize) -> Self {
		Self {
			undo: VecDeque::new(),
			redo: Vec::new(),
			limit: limit.max(1),
		}
	}

	/// Records a finished transaction and discards the redo branch.
	pub fn record(&mut self, transaction: Transaction) {
		if transaction.is_empty() {
			return;
		}
		self.redo.clear();
		self.undo.push_back(transaction);
		while self.undo.len() > self.limit {
			if let Some(dropped) = self.undo.pop_front() {
				debug!("history full, dropping '{}'", dropped.operation);
			}
		}
	}

	/// Rewinds the newest transaction onto `graph`. False when there is
	/// nothing to undo.
	pub fn undo(&mut self, graph: &mut Graph) -> bool {
		let Some(transaction) = self.undo.pop_back() else {
			return false;
		};
		debug!("undo '{}'", transaction.operation);
		transaction.rewind(graph);
		self.redo.push(transaction);
		true
	}

	/// Replays the last undone transaction. False when there is nothing
	/// to redo.
	pub fn redo(&mut self, graph: &mut Graph) -> bool {
		let Some(transaction) = self.redo.pop() else {
			return false;
		};
		debug!("redo '{}'", transaction.operation);
		transaction.replay(graph);
		self.undo.push_back(transaction);
		true
	}

	/// Whether [`History::undo`] would do anything.
	pub fn can_undo(&self) -> bool {
		!self.undo.is_empty()
	}

	/// Whether [`History::redo`] would do anything.
	pub fn can_redo(&self) -> bool {
		!self.redo.is_empty()
	}

	/// Transactions available to undo.
	pub fn undo_len(&self) -> usize {
		self.undo.len()
	}

	/// Transactions available to redo.
	pub fn redo_len(&self) -> usize {
		self.redo.len()
	}

	/// Forgets both stacks.
	pub fn clear(&mut self) {
		self.undo.clear();
		self.redo.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::editor::graph::NodeKind;

	fn created(id: u32) -> Transaction {
		let mut txn = Transaction::new("add node");
		txn.push(UndoRecord::Created(Entity::Node(Node {
			id: NodeId(id),
			label: format!("N{}", id),
			kind: NodeKind::Entity,
			cluster: None,
		})));
		txn
	}

	#[test]
	fn empty_transactions_are_not_recorded() {
		let mut history = History::default();
		history.record(Transaction::new("noop"));
		assert!(!history.can_undo());
	}

	#[test]
	fn new_transaction_discards_redo_branch() {
		let mut graph = Graph::new();
		let mut history = History::default();
		for id in 0..2 {
			let txn = created(id);
			txn.replay(&mut graph);
			history.record(txn);
		}
		assert!(history.undo(&mut graph));
		assert!(history.can_redo());

		let txn = created(5);
		txn.replay(&mut graph);
		history.record(txn);
		assert!(!history.can_redo());
		assert_eq!(graph.node_count(), 2);
	}

	#[test]
	fn limit_drops_oldest() {
		let mut graph = Graph::new();
		let mut history = History::with_limit(2);
		for id in 0..3 {
			let txn = created(id);
			txn.replay(&mut graph);
			history.record(txn);
		}
		assert_eq!(history.undo_len(), 2);
		assert!(history.undo(&mut graph));
		assert!(history.undo(&mut graph));
		assert!(!history.undo(&mut graph));
		// the first node outlived its dropped record
		assert_eq!(graph.node_count(), 1);
	}

	#[test]
	fn undo_and_redo_on_empty_stacks_report_nothing() {
		let mut graph = Graph::new();
		let mut history = History::default();
		assert!(!history.undo(&mut graph));
		assert!(!history.redo(&mut graph));
	}
}
