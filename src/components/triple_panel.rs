use leptos::prelude::*;

use super::toolbar::prune_selection;
use crate::editor::{GraphEditor, NodeId};

/// Load and save of the tab-separated triple file, plus a preview of the
/// query string that will be searched.
#[component]
pub fn TriplePanel(editor: RwSignal<GraphEditor>, selection: RwSignal<Vec<NodeId>>) -> impl IntoView {
	let text = RwSignal::new(String::new());

	let load = move |_| {
		let contents = text.get_untracked();
		editor.update(|e| e.load_triples(&contents));
		prune_selection(editor, selection);
		log::info!(
			"loaded {} triples",
			editor.with_untracked(|e| e.graph().edge_count())
		);
	};
	let save = move |_| text.set(editor.with_untracked(|e| e.to_triples()));

	view! {
		<div class="triple-panel">
			<textarea
				rows="6"
				placeholder="<Metformin>\ttreats\t<Diabetes Mellitus>\t."
				prop:value=move || text.get()
				on:input=move |ev| text.set(event_target_value(&ev))
			></textarea>
			<div class="toolbar-row">
				<button on:click=load>"Load"</button>
				<button on:click=save>"Save"</button>
			</div>
			<code class="query-preview">{move || editor.with(|e| e.serialize())}</code>
		</div>
	}
}
