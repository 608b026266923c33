use leptos::prelude::*;

use super::toolbar::report;
use crate::editor::{EdgeId, GraphEditor};

#[derive(Clone, PartialEq)]
struct EdgeRow {
	id: EdgeId,
	subject: String,
	predicate: String,
	object: String,
	membership: bool,
}

fn rows(editor: &GraphEditor) -> Vec<EdgeRow> {
	let graph = editor.graph();
	graph
		.edges()
		.map(|e| {
			let label = |id| graph.node(id).map(|n| n.label.clone()).unwrap_or_default();
			EdgeRow {
				id: e.id,
				subject: label(e.from),
				predicate: e.label.clone(),
				object: label(e.to),
				membership: e.is_membership(),
			}
		})
		.collect()
}

/// Statements of the graph with per-edge rename and delete.
#[component]
pub fn EdgeList(editor: RwSignal<GraphEditor>, notice: RwSignal<Option<String>>) -> impl IntoView {
	let edges = Memo::new(move |_| editor.with(rows));

	view! {
		<ul class="edge-list">
			{move || {
				edges
					.get()
					.into_iter()
					.map(|row| {
						let id = row.id;
						let draft = RwSignal::new(row.predicate.clone());
						let rename = move |_| {
							let text = draft.get_untracked();
							let outcome = editor.try_update(|e| e.rename_edge(id, &text));
							report(notice, outcome);
						};
						let delete = move |_| {
							let outcome = editor.try_update(|e| e.delete_edge(id));
							report(notice, outcome);
						};
						view! {
							<li class:membership=row.membership>
								<span class="subject">{row.subject}</span>
								<input
									type="text"
									disabled=row.membership
									prop:value=move || draft.get()
									on:input=move |ev| draft.set(event_target_value(&ev))
									on:change=rename
								/>
								<span class="object">{row.object}</span>
								<button on:click=delete>"×"</button>
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}
