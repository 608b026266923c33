use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::api::{
	ApiClient, Document, Explanation, FeedbackEvent, SearchResponse, SearchResult, Substitution,
};

/// Page-wide handle on the API client.
pub type ClientHandle = StoredValue<ApiClient, LocalStorage>;

fn placeholder(value: &str) -> String {
	if value.trim().is_empty() {
		"-".to_string()
	} else {
		value.to_string()
	}
}

fn render_explanation(explanation: Explanation, document: String, client: ClientHandle) -> impl IntoView {
	let sentence = explanation.sentence.clone();
	let rated = RwSignal::new(false);
	let rate = move |rating: i8| {
		let api = client.get_value();
		let event = FeedbackEvent::ExtractionRated {
			document: document.clone(),
			extraction: sentence.clone(),
			rating,
		};
		rated.set(true);
		spawn_local(async move { api.feedback(event).await });
	};
	let (up, down) = (rate.clone(), rate);
	let segments = explanation
		.highlight()
		.into_iter()
		.map(|segment| match segment.role {
			Some(role) => view! { <span class=role.css_class()>{segment.text}</span> }.into_any(),
			None => segment.text.into_any(),
		})
		.collect_view();
	view! {
		<li class="explanation">
			{segments}
			<button class="rate" disabled=move || rated.get() on:click=move |_| up(1)>"+"</button>
			<button class="rate" disabled=move || rated.get() on:click=move |_| down(-1)>"-"</button>
		</li>
	}
}

/// Evidence panel of one document.
#[derive(Clone, Debug, PartialEq)]
enum Evidence {
	Hidden,
	Loading,
	Loaded(Result<Vec<Explanation>, String>),
}

impl Evidence {
	/// State after a click on the toggle, and whether to start a request.
	/// Clicks while a request is in flight are ignored.
	fn toggled(&self) -> (Evidence, bool) {
		match self {
			Evidence::Hidden => (Evidence::Loading, true),
			Evidence::Loading => (Evidence::Loading, false),
			Evidence::Loaded(_) => (Evidence::Hidden, false),
		}
	}
}

#[component]
fn DocumentRow(doc: Document, client: ClientHandle, query: String) -> impl IntoView {
	let doc_id = doc.id_text();
	let evidence = RwSignal::new(Evidence::Hidden);
	let prov_ids = doc.prov_ids.clone();
	let has_provenance = !prov_ids.is_empty();

	let explain_id = doc_id.clone();
	let rated_id = doc_id.clone();
	let explain = move |_| {
		let (next, fetch) = evidence.with_untracked(Evidence::toggled);
		evidence.set(next);
		if !fetch {
			return;
		}
		let api = client.get_value();
		let (id, prov) = (explain_id.clone(), prov_ids.clone());
		spawn_local(async move {
			let outcome = api.provenance(&id, &prov).await.map_err(|e| {
				error!("provenance for {} failed: {}", id, e);
				"Could not load the evidence, please try again.".to_string()
			});
			evidence.set(Evidence::Loaded(outcome));
		});
	};

	let clicked_id = doc_id.clone();
	let on_open = move |_| {
		let api = client.get_value();
		let event = FeedbackEvent::ResultClicked {
			document: clicked_id.clone(),
			query: query.clone(),
		};
		spawn_local(async move { api.feedback(event).await });
	};

	let link = doc
		.doi
		.as_deref()
		.map(|doi| format!("https://doi.org/{}", doi))
		.unwrap_or_else(|| format!("https://pubmed.ncbi.nlm.nih.gov/{}", doc_id));
	let year = doc.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into());

	view! {
		<div class="document">
			<a class="title" href=link target="_blank" on:click=on_open>
				{placeholder(&doc.title)}
			</a>
			<div class="meta">
				<span class="authors">{placeholder(&doc.authors)}</span>
				" | "
				<span class="journal">{placeholder(&doc.journals)}</span>
				" | "
				<span class="year">{year}</span>
			</div>
			{has_provenance
				.then(|| {
					view! {
						<button
							class="explain"
							disabled=move || evidence.with(|e| *e == Evidence::Loading)
							on:click=explain
						>
							"Evidence"
						</button>
					}
				})}
			{move || {
				match evidence.get() {
					Evidence::Hidden => ().into_any(),
					Evidence::Loading => view! { <p class="loading">"Loading evidence…"</p> }.into_any(),
					Evidence::Loaded(Ok(sentences)) => {
						view! {
							<ul class="explanations">
								{sentences
									.into_iter()
									.map(|e| render_explanation(e, rated_id.clone(), client))
									.collect_view()}
							</ul>
						}
							.into_any()
					}
					Evidence::Loaded(Err(msg)) => view! { <p class="notice">{msg}</p> }.into_any(),
				}
			}}
		</div>
	}
}

fn substitution_label(var_names: &[String], var_subs: &BTreeMap<String, Substitution>) -> String {
	var_names
		.iter()
		.map(|name| {
			let value = var_subs
				.get(name)
				.map(|s| s.entity_name.as_str())
				.unwrap_or("-");
			format!("{}: {}", name, value)
		})
		.collect::<Vec<_>>()
		.join(", ")
}

#[component]
fn AggregateGroup(
	label: String,
	size: usize,
	docs: Vec<SearchResult>,
	client: ClientHandle,
	query: String,
) -> impl IntoView {
	let open = RwSignal::new(false);
	let children = docs
		.into_iter()
		.map(|doc| render_result(doc, client, query.clone()))
		.collect_view();

	view! {
		<div class="aggregate">
			<button class="aggregate-toggle" on:click=move |_| open.update(|o| *o = !*o)>
				{move || if open.get() { "▾ " } else { "▸ " }}
				{label}
				{format!(" ({})", size)}
			</button>
			<div class="aggregate-docs" class:hidden=move || !open.get()>
				{children}
			</div>
		</div>
	}
}

/// Renders one node of the result tree. Unknown result types render
/// nothing.
pub fn render_result(result: SearchResult, client: ClientHandle, query: String) -> AnyView {
	match result {
		SearchResult::Doc(doc) => view! { <DocumentRow doc=doc client=client query=query /> }.into_any(),
		SearchResult::DocList { docs } => view! {
			<div class="doc-list">
				{docs
					.into_iter()
					.map(|d| render_result(d, client, query.clone()))
					.collect_view()}
			</div>
		}
		.into_any(),
		SearchResult::Aggregate {
			var_names,
			var_subs,
			size,
			docs,
		} => {
			let label = substitution_label(&var_names, &var_subs);
			let size = if size == 0 { docs.len() } else { size };
			view! {
				<AggregateGroup label=label size=size docs=docs client=client query=query />
			}.into_any()
		}
		SearchResult::AggregateList { results } => view! {
			<div class="aggregate-list">
				{results
					.into_iter()
					.map(|r| render_result(r, client, query.clone()))
					.collect_view()}
			</div>
		}
		.into_any(),
		SearchResult::Unrecognized => {
			error!("ERROR - does not recognize result type");
			().into_any()
		}
	}
}

/// Result listing with paging.
#[component]
pub fn ResultList(
	#[prop(into)] response: Signal<Option<SearchResponse>>,
	page: RwSignal<usize>,
	page_size: usize,
	client: ClientHandle,
	on_page: Callback<usize>,
) -> impl IntoView {
	view! {
		<div class="results">
			{move || {
				response
					.get()
					.map(|r| {
						let query = r.query_translation.clone().unwrap_or_default();
						let translation = placeholder(&query);
						let count = r.results.document_count();
						let has_next = r.results.page_entries() >= page_size;
						view! {
							<p class="query-translation">{translation}</p>
							<p class="result-count">{format!("{} documents on this page", count)}</p>
							{render_result(r.results, client, query)}
							<div class="pager">
								<button
									disabled=move || page.get() == 0
									on:click=move |_| on_page.run(page.get_untracked().saturating_sub(1))
								>
									"Previous"
								</button>
								<span>{move || format!("Page {}", page.get() + 1)}</span>
								<button
									disabled=!has_next
									on:click=move |_| on_page.run(page.get_untracked() + 1)
								>
									"Next"
								</button>
							</div>
						}
					})
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn evidence_toggle_ignores_clicks_while_loading() {
		let (loading, fetch) = Evidence::Hidden.toggled();
		assert_eq!(loading, Evidence::Loading);
		assert!(fetch);

		assert_eq!(loading.toggled(), (Evidence::Loading, false));
		assert_eq!(
			Evidence::Loaded(Ok(Vec::new())).toggled(),
			(Evidence::Hidden, false)
		);
	}

	#[test]
	fn empty_metadata_shows_a_dash() {
		assert_eq!(placeholder("  "), "-");
		assert_eq!(placeholder("Lancet"), "Lancet");
	}
}
