use leptos::prelude::*;

use crate::api::Suggestion;
use crate::editor::{EditError, EntityType, GraphEditor, NodeId, NodeKind};

/// Shows the outcome of an edit: the error message on rejection, nothing
/// on success.
pub fn report<T>(notice: RwSignal<Option<String>>, outcome: Option<Result<T, EditError>>) -> Option<T> {
	match outcome? {
		Ok(value) => {
			notice.set(None);
			Some(value)
		}
		Err(e) => {
			notice.set(Some(e.to_string()));
			None
		}
	}
}

/// Drops selected ids whose node no longer exists.
pub fn prune_selection(editor: RwSignal<GraphEditor>, selection: RwSignal<Vec<NodeId>>) {
	let alive: Vec<NodeId> = editor.with_untracked(|e| {
		selection
			.get_untracked()
			.into_iter()
			.filter(|id| e.graph().node(*id).is_some())
			.collect()
	});
	selection.set(alive);
}

/// Buttons and inputs for editing the query graph.
#[component]
pub fn EditorToolbar(
	editor: RwSignal<GraphEditor>,
	selection: RwSignal<Vec<NodeId>>,
	notice: RwSignal<Option<String>>,
	#[prop(into)] suggestions: Signal<Vec<Suggestion>>,
	#[prop(optional)] on_label_input: Option<Callback<String>>,
) -> impl IntoView {
	let label = RwSignal::new(String::new());
	let literal = RwSignal::new(false);
	let entity_type = RwSignal::new(EntityType::Any);
	let predicate = RwSignal::new(String::new());

	let add_node = move |_| {
		let text = label.get_untracked();
		let hint = Some(entity_type.get_untracked()).filter(|t| *t != EntityType::Any);
		let outcome = editor.try_update(|e| {
			if literal.get_untracked() {
				e.add_literal(&text)
			} else {
				e.add_node(&text, hint)
			}
		});
		if report(notice, outcome).is_some() {
			label.set(String::new());
		}
	};

	let connect = move |_| {
		let selected = selection.get_untracked();
		let [from, to] = selected.as_slice() else {
			notice.set(Some("select exactly two nodes, source first".into()));
			return;
		};
		let (from, to) = (*from, *to);
		let text = predicate.get_untracked();
		let outcome = editor.try_update(|e| e.add_edge(from, to, &text));
		if report(notice, outcome).is_some() {
			selection.set(Vec::new());
		}
	};

	let rename = move |_| {
		let selected = selection.get_untracked();
		let [id] = selected.as_slice() else {
			notice.set(Some("select one node to rename".into()));
			return;
		};
		let id = *id;
		let text = label.get_untracked();
		let outcome = editor.try_update(|e| {
			match e.graph().node(id).map(|n| n.kind) {
				Some(NodeKind::Cluster) => e.rename_cluster(id, &text),
				_ => e.rename_node(id, &text),
			}
		});
		report(notice, outcome);
	};

	let delete = move |_| {
		let selected = selection.get_untracked();
		let outcome = editor.try_update(|e| e.delete_nodes(&selected));
		report(notice, outcome);
		prune_selection(editor, selection);
	};

	let cluster = move |_| {
		let selected = selection.get_untracked();
		let outcome = editor.try_update(|e| e.cluster_selection(&selected));
		if let Some(Some(aggregator)) = report(notice, outcome) {
			selection.set(vec![aggregator]);
		}
	};

	let undo = move |_| {
		editor.update(|e| {
			e.undo();
		});
		prune_selection(editor, selection);
	};
	let redo = move |_| {
		editor.update(|e| {
			e.redo();
		});
		prune_selection(editor, selection);
	};
	let clear = move |_| {
		editor.update(|e| e.clear());
		selection.set(Vec::new());
		notice.set(None);
	};

	let predicates =
		move || editor.with(|e| e.vocabulary().predicates().map(String::from).collect::<Vec<_>>());

	view! {
		<div class="editor-toolbar">
			<div class="toolbar-row">
				<input
					type="text"
					list="entity-suggestions"
					placeholder="Metformin, ?X(Drug), ..."
					prop:value=move || label.get()
					on:input=move |ev| {
						let text = event_target_value(&ev);
						label.set(text.clone());
						if let Some(cb) = on_label_input {
							cb.run(text);
						}
					}
				/>
				<datalist id="entity-suggestions">
					{move || {
						suggestions
							.get()
							.into_iter()
							.map(|s| view! { <option value=s.term></option> })
							.collect_view()
					}}
				</datalist>
				<select on:change=move |ev| {
					entity_type.set(event_target_value(&ev).parse().unwrap_or(EntityType::Any))
				}>
					{EntityType::ALL
						.iter()
						.map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> })
						.collect_view()}
				</select>
				<label>
					<input
						type="checkbox"
						prop:checked=move || literal.get()
						on:change=move |ev| literal.set(event_target_checked(&ev))
					/>
					"literal"
				</label>
				<button on:click=add_node>"Add node"</button>
				<button on:click=rename>"Rename"</button>
			</div>
			<div class="toolbar-row">
				<input
					type="text"
					list="predicate-suggestions"
					placeholder="treats"
					prop:value=move || predicate.get()
					on:input=move |ev| predicate.set(event_target_value(&ev))
				/>
				<datalist id="predicate-suggestions">
					{move || {
						predicates()
							.into_iter()
							.map(|p| view! { <option value=p></option> })
							.collect_view()
					}}
				</datalist>
				<button on:click=connect>"Connect"</button>
				<button on:click=cluster>"Cluster"</button>
				<button on:click=delete>"Delete"</button>
			</div>
			<div class="toolbar-row">
				<button on:click=undo disabled=move || !editor.with(|e| e.can_undo())>
					"Undo"
				</button>
				<button on:click=redo disabled=move || !editor.with(|e| e.can_redo())>
					"Redo"
				</button>
				<button on:click=clear>"Clear"</button>
				<span class="selection-count">
					{move || format!("{} selected", selection.with(|s| s.len()))}
				</span>
			</div>
			{move || notice.get().map(|msg| view! { <p class="notice">{msg}</p> })}
		</div>
	}
}
