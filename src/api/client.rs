use log::{debug, error};
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::explain::Explanation;
use super::types::{FeedbackEvent, SearchParams, SearchResponse, Suggestion, SuggestionEnvelope};
use crate::config::ApiConfig;

/// Failures of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
	/// An endpoint did not resolve to a URL.
	#[error("invalid endpoint url: {0}")]
	Url(String),

	/// Transport failure.
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// Non-success HTTP status.
	#[error("server answered with status {0}")]
	Status(u16),

	/// Body did not match the expected shape.
	#[error("unexpected response body: {0}")]
	Decode(#[from] serde_json::Error),

	/// The graph has no statements to search for.
	#[error("subject and object must not be empty")]
	EmptyQuery,
}

fn resolve(base: &str, path: &str) -> Result<Url, ApiError> {
	let base = Url::parse(base).map_err(|e| ApiError::Url(format!("{}: {}", base, e)))?;
	base.join(path)
		.map_err(|e| ApiError::Url(format!("{}: {}", path, e)))
}

#[derive(Serialize)]
struct ProvenanceRequest<'a> {
	document_id: &'a str,
	prov_ids: &'a [serde_json::Value],
}

/// Thin client for the search backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	config: ApiConfig,
}

impl ApiClient {
	/// Client for the endpoints in `config`.
	pub fn new(config: ApiConfig) -> Self {
		Self {
			http: Client::new(),
			config,
		}
	}

	/// Endpoints in use.
	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
		resolve(&self.config.base_url, path)
	}

	async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
		let status = response.status();
		if !status.is_success() {
			return Err(ApiError::Status(status.as_u16()));
		}
		let body = response.text().await?;
		Ok(serde_json::from_str(&body)?)
	}

	/// Runs a search. An empty query is refused without a network call.
	pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ApiError> {
		if params.query.trim().is_empty() {
			return Err(ApiError::EmptyQuery);
		}
		let url = self.endpoint(&self.config.search_url)?;
		debug!("search {:?} page {}", params.query, params.page);
		let response = self.http.get(url).query(&params.to_pairs()).send().await?;
		Self::decode(response).await
	}

	/// Entity names starting with `prefix`. A blank prefix yields nothing.
	pub async fn autocomplete(&self, prefix: &str) -> Result<Vec<Suggestion>, ApiError> {
		let prefix = prefix.trim();
		if prefix.is_empty() {
			return Ok(Vec::new());
		}
		let url = self.endpoint(&self.config.autocomplete_url)?;
		let response = self.http.get(url).query(&[("term", prefix)]).send().await?;
		let envelope: SuggestionEnvelope = Self::decode(response).await?;
		Ok(envelope.terms)
	}

	/// Sentences supporting a document match.
	pub async fn provenance(
		&self,
		document_id: &str,
		prov_ids: &[serde_json::Value],
	) -> Result<Vec<Explanation>, ApiError> {
		let url = self.endpoint(&self.config.provenance_url)?;
		let response = self
			.http
			.post(url)
			.json(&ProvenanceRequest {
				document_id,
				prov_ids,
			})
			.send()
			.await?;
		Self::decode(response).await
	}

	/// Posts an analytics event. Failures are logged and dropped.
	pub async fn feedback(&self, event: FeedbackEvent) {
		let result = match self.endpoint(&self.config.feedback_url) {
			Ok(url) => self.http.post(url).json(&event).send().await.map(|_| ()),
			Err(e) => {
				error!("feedback endpoint misconfigured: {}", e);
				return;
			}
		};
		if let Err(e) = result {
			debug!("feedback not recorded: {}", e);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints_resolve_against_base() {
		let base = "https://search.example.org/app/";
		assert_eq!(
			resolve(base, "/query").unwrap().as_str(),
			"https://search.example.org/query"
		);
		assert_eq!(
			resolve(base, "explain").unwrap().as_str(),
			"https://search.example.org/app/explain"
		);
	}

	#[test]
	fn bad_base_url_is_reported() {
		assert!(matches!(resolve("not a url", "/query"), Err(ApiError::Url(_))));
	}
}
