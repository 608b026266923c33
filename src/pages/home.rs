use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

use crate::api::{
	ApiClient, ApiError, DataSource, FeedbackEvent, Ranking, RequestSequence, SearchParams,
	SearchResponse, Suggestion,
};
use crate::components::edge_list::EdgeList;
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::components::results::{ClientHandle, ResultList};
use crate::components::toolbar::EditorToolbar;
use crate::components::triple_panel::TriplePanel;
use crate::config::{ApiConfig, EditorSettings};
use crate::editor::{GraphEditor, NodeId, Vocabulary};

const MIN_PREFIX: usize = 2;

fn parse_year(text: &str) -> Option<u16> {
	text.trim().parse().ok()
}

/// Query builder page: graph editor, search filters and results.
#[component]
pub fn Home() -> impl IntoView {
	let config = ApiConfig::from_document();
	let page_size = config.page_size;
	let client: ClientHandle = StoredValue::new_local(ApiClient::new(config));
	let searches = StoredValue::new_local(RequestSequence::new());
	let completions = StoredValue::new_local(RequestSequence::new());

	let editor = RwSignal::new(GraphEditor::new(
		Vocabulary::default(),
		EditorSettings::default(),
	));
	let selection: RwSignal<Vec<NodeId>> = RwSignal::new(Vec::new());
	let notice: RwSignal<Option<String>> = RwSignal::new(None);
	let suggestions: RwSignal<Vec<Suggestion>> = RwSignal::new(Vec::new());

	let filters = RwSignal::new(SearchParams::new(""));
	let page = RwSignal::new(0usize);
	let response: RwSignal<Option<SearchResponse>> = RwSignal::new(None);
	let loading = RwSignal::new(false);
	let search_error: RwSignal<Option<String>> = RwSignal::new(None);

	let graph_data =
		Memo::new(move |_| editor.with(|e| selection.with(|s| GraphData::from_graph(e.graph(), s))));

	let on_node_click = Callback::new(move |id: NodeId| {
		selection.update(|s| {
			if let Some(pos) = s.iter().position(|x| *x == id) {
				s.remove(pos);
			} else {
				s.push(id);
			}
		});
	});

	let on_label_input = Callback::new(move |prefix: String| {
		if prefix.trim().chars().count() < MIN_PREFIX || prefix.trim_start().starts_with('?') {
			return;
		}
		let ticket = completions.with_value(|seq| seq.issue());
		let api = client.get_value();
		spawn_local(async move {
			match api.autocomplete(&prefix).await {
				Ok(_) if !completions.with_value(|seq| seq.is_current(ticket)) => {
					debug!("dropping stale suggestions for {:?}", prefix);
				}
				Ok(terms) => {
					editor.update(|e| {
						e.vocabulary_mut()
							.extend_entities(terms.iter().map(|t| t.term.as_str()))
					});
					suggestions.set(terms);
				}
				Err(e) => debug!("autocomplete failed: {}", e),
			}
		});
	});

	let run_search = move |target_page: usize| {
		let query = editor.with_untracked(|e| e.serialize());
		if query.is_empty() {
			notice.set(Some(ApiError::EmptyQuery.to_string()));
			return;
		}
		let mut params = filters.get_untracked();
		params.query = query.clone();
		params.page = target_page;
		params.page_size = page_size;

		let ticket = searches.with_value(|seq| seq.issue());
		page.set(target_page);
		loading.set(true);
		let api = client.get_value();
		spawn_local(async move {
			let outcome = api.search(&params).await;
			if !searches.with_value(|seq| seq.is_current(ticket)) {
				debug!("dropping superseded response for {:?}", params.query);
				return;
			}
			loading.set(false);
			match outcome {
				Ok(found) => {
					search_error.set(None);
					response.set(Some(found));
				}
				Err(e) => {
					error!("search failed: {}", e);
					search_error.set(Some("The search failed, please try again.".into()));
				}
			}
		});

		let api = client.get_value();
		spawn_local(async move { api.feedback(FeedbackEvent::Searched { query }).await });
	};
	let on_page = Callback::new(move |target: usize| run_search(target));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="query-builder">
				<div class="graph-pane">
					<ForceGraphCanvas data=graph_data on_node_click=on_node_click />
				</div>
				<div class="side-pane">
					<EditorToolbar
						editor=editor
						selection=selection
						notice=notice
						suggestions=suggestions
						on_label_input=on_label_input
					/>
					<EdgeList editor=editor notice=notice />
					<TriplePanel editor=editor selection=selection />
				</div>
			</div>

			<form class="search-form" on:submit=move |ev| {
				ev.prevent_default();
				run_search(0);
			}>
				<select on:change=move |ev| {
					let source = match event_target_value(&ev).as_str() {
						"pmc" => DataSource::Pmc,
						"trip" => DataSource::Trip,
						"zbmed" => DataSource::Zbmed,
						_ => DataSource::Pubmed,
					};
					filters.update(|f| f.data_source = source);
				}>
					<option value="pubmed">"PubMed"</option>
					<option value="pmc">"PubMed Central"</option>
					<option value="trip">"TRIP"</option>
					<option value="zbmed">"ZB MED"</option>
				</select>
				<select on:change=move |ev| {
					let ranking = match event_target_value(&ev).as_str() {
						"oldest" => Ranking::Oldest,
						"relevance" => Ranking::Relevance,
						_ => Ranking::Newest,
					};
					filters.update(|f| f.ranking = ranking);
				}>
					<option value="newest">"Newest first"</option>
					<option value="oldest">"Oldest first"</option>
					<option value="relevance">"Relevance"</option>
				</select>
				<input
					type="number"
					placeholder="from year"
					on:change=move |ev| filters.update(|f| f.year_start = parse_year(&event_target_value(&ev)))
				/>
				<input
					type="number"
					placeholder="to year"
					on:change=move |ev| filters.update(|f| f.year_end = parse_year(&event_target_value(&ev)))
				/>
				<input
					type="text"
					placeholder="title contains"
					on:change=move |ev| {
						let text = event_target_value(&ev);
						filters.update(|f| f.title_filter = Some(text).filter(|t| !t.trim().is_empty()));
					}
				/>
				<label>
					<input
						type="checkbox"
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							filters.update(|f| f.classification = checked.then(|| "pharmaceutical".to_string()));
						}
					/>
					"pharmaceutical technology only"
				</label>
				<button type="submit" disabled=move || loading.get()>
					"Search"
				</button>
			</form>

			{move || search_error.get().map(|msg| view! { <p class="notice">{msg}</p> })}
			{move || loading.get().then(|| view! { <p class="loading">"Searching…"</p> })}
			<ResultList
				response=response
				page=page
				page_size=page_size
				client=client
				on_page=on_page
			/>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn year_inputs_accept_only_numbers() {
		assert_eq!(parse_year(" 2012 "), Some(2012));
		assert_eq!(parse_year(""), None);
		assert_eq!(parse_year("twenty"), None);
	}
}
