//! Search backend models and client.

mod client;
mod explain;
mod sequence;
mod types;

pub use client::{ApiClient, ApiError};
pub use explain::{Explanation, Role, Segment, Span};
pub use sequence::{RequestSequence, Ticket};
pub use types::{
	DataSource, Document, FeedbackEvent, Ranking, SearchParams, SearchResponse, SearchResult,
	Substitution, Suggestion,
};
