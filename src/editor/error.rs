//! Validation errors raised by [`GraphEditor`](super::GraphEditor).

use thiserror::Error;

use super::graph::{EdgeId, NodeId};

/// Reasons an edit is refused. A refused edit leaves the graph and the
/// undo log untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The label is empty or only whitespace.
	#[error("label must not be empty")]
	EmptyLabel,

	/// A `?` label that is not `?name` or `?name(Type)`.
	#[error("'{0}' is not a valid variable, expected ?name or ?name(Type)")]
	MalformedVariable(String),

	/// A variable annotation naming no [`EntityType`](super::EntityType).
	#[error("unknown entity type '{0}'")]
	UnknownEntityType(String),

	/// A concrete label missing from the vocabulary.
	#[error("'{0}' is not a known entity")]
	UnknownEntity(String),

	/// An edge label missing from the predicate vocabulary.
	#[error("'{0}' is not a known predicate")]
	UnknownPredicate(String),

	/// `part_of` used outside of clustering.
	#[error("'part_of' is reserved for clusters")]
	ReservedPredicate,

	/// Text the triple file cannot hold as-is: tabs or line breaks, a
	/// leading `?` on a literal, or a `<...>` wrapper.
	#[error("'{0}' cannot be stored in a triple file")]
	Unwritable(String),

	/// No live node has this id.
	#[error("node {0} does not exist")]
	UnknownNode(NodeId),

	/// No live edge has this id.
	#[error("edge {0} does not exist")]
	UnknownEdge(EdgeId),

	/// A cluster aggregator passed where a plain node is expected.
	#[error("node {0} is a cluster, rename it as a cluster")]
	ClusterNode(NodeId),

	/// `rename_cluster` on a plain node.
	#[error("node {0} is not a cluster")]
	NotACluster(NodeId),

	/// Clusters do not nest and a node joins at most one.
	#[error("node {0} already belongs to a cluster")]
	AlreadyClustered(NodeId),

	/// `part_of` edges keep their label.
	#[error("cluster membership edges cannot be renamed")]
	MembershipEdge(EdgeId),
}
