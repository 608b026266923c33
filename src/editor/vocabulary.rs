//! Entity and predicate terms the editor accepts.

use std::collections::{BTreeSet, HashSet};

use super::graph::PART_OF;

/// Predicates the search backend understands out of the box.
pub const DEFAULT_PREDICATES: &[&str] = &[
	"administered",
	"associated",
	"decreases",
	"induces",
	"inhibits",
	"interacts",
	"metabolises",
	"method",
	"treats",
];

/// Known entity names and predicates, matched case-insensitively.
#[derive(Clone, Debug)]
pub struct Vocabulary {
	entities: HashSet<String>,
	predicates: BTreeSet<String>,
}

impl Default for Vocabulary {
	fn default() -> Self {
		Self {
			entities: HashSet::new(),
			predicates: DEFAULT_PREDICATES.iter().map(|p| p.to_string()).collect(),
		}
	}
}

fn normalize(term: &str) -> String {
	term.trim().to_lowercase()
}

impl Vocabulary {
	/// Default predicates and no entities.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Vocabulary::extend_entities`].
	pub fn with_entities<I, S>(mut self, terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.extend_entities(terms);
		self
	}

	/// Adds entity names, e.g. from autocomplete suggestions.
	pub fn extend_entities<I, S>(&mut self, terms: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.entities.extend(
			terms
				.into_iter()
				.map(|t| normalize(t.as_ref()))
				.filter(|t| !t.is_empty()),
		);
	}

	/// Adds a predicate. `part_of` stays reserved.
	pub fn add_predicate(&mut self, predicate: &str) {
		let predicate = normalize(predicate);
		if !predicate.is_empty() && predicate != PART_OF {
			self.predicates.insert(predicate);
		}
	}

	/// Case-insensitive entity lookup.
	pub fn knows_entity(&self, term: &str) -> bool {
		self.entities.contains(&normalize(term))
	}

	/// Case-insensitive predicate lookup.
	pub fn knows_predicate(&self, predicate: &str) -> bool {
		self.predicates.contains(&normalize(predicate))
	}

	/// Known predicates in sorted order.
	pub fn predicates(&self) -> impl Iterator<Item = &str> {
		self.predicates.iter().map(String::as_str)
	}

	/// Number of distinct entity terms.
	pub fn entity_count(&self) -> usize {
		self.entities.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entity_lookup_ignores_case_and_padding() {
		let vocab = Vocabulary::new().with_entities(["Metformin"]);
		assert!(vocab.knows_entity("  metformin "));
		assert!(!vocab.knows_entity("Aspirin"));
	}

	#[test]
	fn part_of_never_joins_the_predicates() {
		let mut vocab = Vocabulary::new();
		vocab.add_predicate("part_of");
		assert!(!vocab.knows_predicate("part_of"));
		assert!(vocab.knows_predicate("Treats"));
	}
}
