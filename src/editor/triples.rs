//! Text forms of a query graph.
//!
//! Two formats are involved:
//!
//! - the flat query string sent to the search endpoint,
//!   `Metformin treats "Diabetes Mellitus". Metformin administered Tablet.`
//! - the tab-separated triple file used to save and load graphs, one
//!   `subject \t predicate \t object \t .` statement per line, where
//!   entity tokens are wrapped in `<` `>` and literal tokens are bare.

use std::collections::HashMap;

use log::debug;

use super::error::EditError;
use super::graph::{ClusterId, Edge, Graph, Node, NodeId, NodeKind, PART_OF};
use super::label;

const STATEMENT_SEPARATOR: &str = ". ";
const TERMINATOR: &str = ".";

/// Renders the graph as a search query string, one statement per edge in
/// creation order.
pub fn serialize(graph: &Graph) -> String {
	let statements: Vec<String> = graph
		.edges()
		.filter_map(|edge| {
			let subject = graph.node(edge.from)?;
			let object = graph.node(edge.to)?;
			Some(format!(
				"{} {} {}",
				subject.query_token(),
				label::quote(edge.label.trim()),
				object.query_token()
			))
		})
		.collect();

	if statements.is_empty() {
		return String::new();
	}
	let mut query = statements.join(STATEMENT_SEPARATOR);
	query.push_str(TERMINATOR);
	query
}

/// Position a piece of text takes in a triple file line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
	/// Written as `<text>`.
	Entity,
	/// Written bare.
	Predicate,
	/// Written bare and read back as a literal.
	Literal,
}

/// Refuses text that [`deserialize`] would not read back unchanged.
pub(crate) fn check_writable(text: &str, slot: Slot) -> Result<(), EditError> {
	let unwritable = text.contains(['\t', '\n', '\r'])
		|| (slot != Slot::Entity && text.starts_with('<') && text.ends_with('>'))
		|| (slot == Slot::Literal && label::is_variable(text));
	if unwritable {
		return Err(EditError::Unwritable(text.to_string()));
	}
	Ok(())
}

fn flatten(text: &str) -> String {
	text.trim().replace(['\t', '\n', '\r'], " ")
}

fn file_token(node: &Node) -> String {
	match node.kind {
		NodeKind::Literal => flatten(&node.label),
		_ => format!("<{}>", flatten(&node.label)),
	}
}

/// Writes the graph in the tab-separated triple file format.
pub fn to_triples(graph: &Graph) -> String {
	let mut out = String::new();
	for edge in graph.edges() {
		let (Some(subject), Some(object)) = (graph.node(edge.from), graph.node(edge.to)) else {
			continue;
		};
		out.push_str(&file_token(subject));
		out.push('\t');
		out.push_str(&flatten(&edge.label));
		out.push('\t');
		out.push_str(&file_token(object));
		out.push('\t');
		out.push_str(TERMINATOR);
		out.push('\n');
	}
	out
}

/// A token read from the triple file.
#[derive(Debug, PartialEq)]
enum Token<'a> {
	Entity(&'a str),
	Literal(&'a str),
}

impl<'a> Token<'a> {
	fn read(field: &'a str) -> Option<Self> {
		let field = field.trim();
		let token = match field.strip_prefix('<').and_then(|f| f.strip_suffix('>')) {
			Some(inner) => Token::Entity(inner.trim()),
			None => Token::Literal(field),
		};
		(!token.text().is_empty()).then_some(token)
	}

	fn text(&self) -> &'a str {
		match self {
			Token::Entity(text) | Token::Literal(text) => *text,
		}
	}

	fn kind(&self) -> NodeKind {
		match self {
			Token::Entity(text) => NodeKind::classify(text),
			Token::Literal(text) if label::is_variable(text) => NodeKind::Variable,
			Token::Literal(_) => NodeKind::Literal,
		}
	}
}

#[derive(Default)]
struct Loader {
	graph: Graph,
	by_label: HashMap<String, NodeId>,
	clusters: HashMap<String, (NodeId, ClusterId)>,
}

impl Loader {
	fn resolve(&mut self, token: &Token<'_>) -> NodeId {
		let text = token.text();
		if let Some(&(id, _)) = self.clusters.get(text) {
			return id;
		}
		if let Some(&id) = self.by_label.get(text) {
			return id;
		}
		let id = self.graph.allocate_node();
		self.graph.insert_node(Node {
			id,
			label: text.to_string(),
			kind: token.kind(),
			cluster: None,
		});
		self.by_label.insert(text.to_string(), id);
		id
	}

	fn resolve_cluster(&mut self, token: &Token<'_>) -> (NodeId, ClusterId) {
		let text = token.text();
		if let Some(&found) = self.clusters.get(text) {
			return found;
		}
		let id = self.graph.allocate_node();
		let cluster = self.graph.allocate_cluster();
		self.graph.insert_node(Node {
			id,
			label: text.to_string(),
			kind: NodeKind::Cluster,
			cluster: Some(cluster),
		});
		self.clusters.insert(text.to_string(), (id, cluster));
		(id, cluster)
	}

	fn statement(&mut self, line: &str) -> bool {
		let fields: Vec<&str> = line.split('\t').collect();
		let [subject, predicate, object, _terminator] = fields.as_slice() else {
			return false;
		};
		let (Some(subject), Some(object)) = (Token::read(subject), Token::read(object)) else {
			return false;
		};
		let predicate = Token::read(predicate).map(|p| p.text().to_string());
		let Some(predicate) = predicate else {
			return false;
		};

		let from = self.resolve(&subject);
		let to = if predicate == PART_OF {
			let (aggregator, cluster) = self.resolve_cluster(&object);
			if let Some(member) = self.graph.node(from).filter(|n| !n.is_cluster()).cloned() {
				self.graph.insert_node(Node {
					cluster: Some(cluster),
					..member
				});
			}
			aggregator
		} else {
			self.resolve(&object)
		};

		let id = self.graph.allocate_edge();
		self.graph.insert_edge(Edge {
			id,
			from,
			to,
			label: predicate,
		});
		true
	}
}

/// Reads a triple file into a fresh graph.
///
/// Loading is best-effort: lines that do not split into exactly four
/// tab-separated fields, or whose subject, predicate or object is empty,
/// are skipped.
pub fn deserialize(text: &str) -> Graph {
	let mut loader = Loader::default();
	for (number, line) in text.lines().enumerate() {
		let line = line.trim_end_matches('\r');
		if line.trim().is_empty() {
			continue;
		}
		if !loader.statement(line) {
			debug!("skipping unparseable triple line {}: {:?}", number + 1, line);
		}
	}
	loader.graph
}
