use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;

/// Document collection searched by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
	/// PubMed abstracts.
	Pubmed,
	/// PubMed Central full texts.
	Pmc,
	/// TRIP database.
	Trip,
	/// ZB MED collections.
	Zbmed,
}

impl DataSource {
	/// Value of the `data_source` parameter.
	pub fn as_str(self) -> &'static str {
		match self {
			DataSource::Pubmed => "pubmed",
			DataSource::Pmc => "pmc",
			DataSource::Trip => "trip",
			DataSource::Zbmed => "zbmed",
		}
	}
}

/// How the backend orders matching documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
	/// Most recent first.
	Newest,
	/// Oldest first.
	Oldest,
	/// Backend relevance score.
	Relevance,
}

impl Ranking {
	/// Value of the `outer_ranking` parameter.
	pub fn as_str(self) -> &'static str {
		match self {
			Ranking::Newest => "newest",
			Ranking::Oldest => "oldest",
			Ranking::Relevance => "relevance",
		}
	}
}

/// Query and filters for one search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
	/// Query string built from the graph.
	pub query: String,
	/// Collection to search.
	pub data_source: DataSource,
	/// Document order.
	pub ranking: Ranking,
	/// Zero-based page.
	pub page: usize,
	/// Entries per page.
	pub page_size: usize,
	/// Earliest publication year.
	pub year_start: Option<u16>,
	/// Latest publication year.
	pub year_end: Option<u16>,
	/// Text the title must contain.
	pub title_filter: Option<String>,
	/// Restricts results to a classification.
	pub classification: Option<String>,
}

impl SearchParams {
	/// Default filters for `query`.
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			data_source: DataSource::Pubmed,
			ranking: Ranking::Newest,
			page: 0,
			page_size: DEFAULT_PAGE_SIZE,
			year_start: None,
			year_end: None,
			title_filter: None,
			classification: None,
		}
	}

	/// Query-string pairs in the order the endpoint documents them.
	pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![
			("query", self.query.clone()),
			("data_source", self.data_source.as_str().to_string()),
			("outer_ranking", self.ranking.as_str().to_string()),
			("start_pos", (self.page * self.page_size).to_string()),
			("end_pos", ((self.page + 1) * self.page_size).to_string()),
		];
		if let Some(year) = self.year_start {
			pairs.push(("year_start", year.to_string()));
		}
		if let Some(year) = self.year_end {
			pairs.push(("year_end", year.to_string()));
		}
		if let Some(title) = self.title_filter.as_deref().map(str::trim) {
			if !title.is_empty() {
				pairs.push(("title_filter", title.to_string()));
			}
		}
		if let Some(class) = self.classification.as_deref().map(str::trim) {
			if !class.is_empty() {
				pairs.push(("classification_filter", class.to_string()));
			}
		}
		pairs
	}
}

/// A single matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Backend id, a number or a string.
	pub docid: serde_json::Value,
	/// Title, possibly empty.
	#[serde(default)]
	pub title: String,
	/// Author list as one string.
	#[serde(default)]
	pub authors: String,
	/// Journal name.
	#[serde(default)]
	pub journals: String,
	/// Publication year.
	#[serde(default)]
	pub year: Option<i32>,
	/// Publication month.
	#[serde(default)]
	pub month: Option<i32>,
	/// DOI without the resolver prefix.
	#[serde(default)]
	pub doi: Option<String>,
	/// Collection the document came from.
	#[serde(default)]
	pub collection: Option<String>,
	/// Extraction ids backing the match, used for provenance lookups.
	#[serde(default)]
	pub prov_ids: Vec<serde_json::Value>,
}

impl Document {
	/// The id as text, without JSON quoting.
	pub fn id_text(&self) -> String {
		match &self.docid {
			serde_json::Value::String(s) => s.clone(),
			other => other.to_string(),
		}
	}
}

/// One entity bound to a query variable in an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
	/// Display name.
	pub entity_name: String,
	/// Entity category.
	#[serde(default)]
	pub entity_type: Option<String>,
	/// Vocabulary id.
	#[serde(default)]
	pub entity_id: Option<String>,
}

/// Search results as returned by the backend: a recursive union tagged by
/// its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchResult {
	/// One document.
	Doc(Document),
	/// Flat list of results.
	DocList {
		/// Listed results.
		#[serde(default)]
		docs: Vec<SearchResult>,
	},
	/// Documents grouped by one variable substitution.
	Aggregate {
		/// Variables of the query, in order.
		#[serde(default)]
		var_names: Vec<String>,
		/// Binding of each variable.
		#[serde(default)]
		var_subs: BTreeMap<String, Substitution>,
		/// Documents in the group, counted by the backend.
		#[serde(default)]
		size: usize,
		/// Documents of the group.
		#[serde(default)]
		docs: Vec<SearchResult>,
	},
	/// List of aggregates.
	AggregateList {
		/// Listed aggregates.
		#[serde(default)]
		results: Vec<SearchResult>,
	},
	/// Any tag this client does not know.
	#[serde(other)]
	Unrecognized,
}

impl SearchResult {
	/// Number of documents reachable from this node.
	pub fn document_count(&self) -> usize {
		match self {
			SearchResult::Doc(_) => 1,
			SearchResult::DocList { docs } | SearchResult::Aggregate { docs, .. } => {
				docs.iter().map(SearchResult::document_count).sum()
			}
			SearchResult::AggregateList { results } => {
				results.iter().map(SearchResult::document_count).sum()
			}
			SearchResult::Unrecognized => 0,
		}
	}

	/// Number of entries the backend paged over: documents of a list,
	/// groups of an aggregate list.
	pub fn page_entries(&self) -> usize {
		match self {
			SearchResult::DocList { docs } => docs.len(),
			SearchResult::AggregateList { results } => results.len(),
			SearchResult::Doc(_) | SearchResult::Aggregate { .. } => 1,
			SearchResult::Unrecognized => 0,
		}
	}
}

/// Response envelope of the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	/// Query as the backend understood it.
	#[serde(default)]
	pub query_translation: Option<String>,
	/// Whether the backend truncated the result set.
	#[serde(default)]
	pub query_limit_hit: bool,
	/// Result tree.
	pub results: SearchResult,
}

/// Autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
	/// Suggested entity name.
	pub term: String,
	/// Entity category.
	#[serde(default)]
	pub entity_type: Option<String>,
	/// Vocabulary id.
	#[serde(default)]
	pub entity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SuggestionEnvelope {
	#[serde(default)]
	pub terms: Vec<Suggestion>,
}

/// User actions posted to the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedbackEvent {
	/// A search was run.
	Searched {
		/// Query string sent.
		query: String,
	},
	/// A result link was opened.
	ResultClicked {
		/// Document id.
		document: String,
		/// Query that produced the result.
		query: String,
	},
	/// An evidence sentence was rated.
	ExtractionRated {
		/// Document id.
		document: String,
		/// Rated sentence.
		extraction: String,
		/// 1 for up, -1 for down.
		rating: i8,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_nested_aggregate_list() {
		let json = r#"{
			"query_translation": "Metformin treats ?X(Disease)",
			"results": {
				"type": "aggregate_list",
				"results": [{
					"type": "aggregate",
					"var_names": ["X"],
					"var_subs": {"X": {"entity_name": "Diabetes Mellitus", "entity_type": "Disease"}},
					"size": 2,
					"docs": [
						{"type": "doc", "docid": 123, "title": "A"},
						{"type": "doc_list", "docs": [{"type": "doc", "docid": "PMC9", "title": "B"}]}
					]
				}]
			}
		}"#;
		let response: SearchResponse = serde_json::from_str(json).unwrap();
		assert_eq!(response.results.document_count(), 2);
		assert_eq!(response.results.page_entries(), 1);

		let SearchResult::AggregateList { results } = &response.results else {
			panic!("expected aggregate list");
		};
		let SearchResult::Aggregate { var_subs, .. } = &results[0] else {
			panic!("expected aggregate");
		};
		assert_eq!(var_subs["X"].entity_name, "Diabetes Mellitus");
	}

	#[test]
	fn paging_counts_groups_not_documents() {
		let group = r#"{"type": "aggregate", "var_names": [], "var_subs": {}, "size": 3,
			"docs": [{"type": "doc", "docid": 1}, {"type": "doc", "docid": 2}, {"type": "doc", "docid": 3}]}"#;
		let json = format!(r#"{{"type": "aggregate_list", "results": [{0}, {0}]}}"#, group);
		let result: SearchResult = serde_json::from_str(&json).unwrap();
		assert_eq!(result.document_count(), 6);
		assert_eq!(result.page_entries(), 2);
	}

	#[test]
	fn unknown_tags_decode_as_unrecognized() {
		let json = r#"{"type": "doc_list", "docs": [{"type": "hologram"}, {"type": "doc", "docid": 1}]}"#;
		let result: SearchResult = serde_json::from_str(json).unwrap();
		let SearchResult::DocList { docs } = result else {
			panic!("expected doc list");
		};
		assert_eq!(docs[0], SearchResult::Unrecognized);
		assert_eq!(docs[1].document_count(), 1);
	}

	#[test]
	fn document_ids_render_without_quotes() {
		let doc: Document = serde_json::from_str(r#"{"docid": "PMC42"}"#).unwrap();
		assert_eq!(doc.id_text(), "PMC42");
		let doc: Document = serde_json::from_str(r#"{"docid": 42}"#).unwrap();
		assert_eq!(doc.id_text(), "42");
	}

	#[test]
	fn pagination_maps_to_positions() {
		let mut params = SearchParams::new("Metformin treats ?X(Disease).");
		params.page = 2;
		params.title_filter = Some("  ".into());
		params.year_start = Some(2010);
		let pairs = params.to_pairs();
		assert!(pairs.contains(&("start_pos", "60".to_string())));
		assert!(pairs.contains(&("end_pos", "90".to_string())));
		assert!(pairs.contains(&("year_start", "2010".to_string())));
		assert!(!pairs.iter().any(|(k, _)| *k == "title_filter"));
	}

	#[test]
	fn feedback_events_are_tagged() {
		let json = serde_json::to_value(FeedbackEvent::Searched {
			query: "Metformin".into(),
		})
		.unwrap();
		assert_eq!(json["event"], "searched");
		assert_eq!(json["query"], "Metformin");
	}
}
