//! The graph surface: canvas, legend and detail panel sharing one selection.

use leptos::prelude::*;

use super::detail_panel::DetailPanel;
use super::force_graph::ForceGraphCanvas;
use super::legend::Legend;
use crate::dataset::Dataset;

/// Interactive view over a validated dataset.
///
/// Owns the selection: the canvas writes it on node and background clicks,
/// the detail panel reads the selected entity and clears it on close.
#[component]
pub fn GraphView(
	/// Validated data to display.
	dataset: Dataset,
) -> impl IntoView {
	let selected = RwSignal::new(None::<String>);

	let graph = dataset.graph().clone();
	let graph_signal = Signal::derive(move || graph.clone());
	let (entities, relationships) = (
		dataset.entity_legend().to_vec(),
		dataset.relationship_legend().to_vec(),
	);

	let dataset = StoredValue::new(dataset);
	let entity = Signal::derive(move || {
		selected
			.get()
			.and_then(|id| dataset.with_value(|d| d.entity(&id).cloned()))
	});
	let on_close = Callback::new(move |_| selected.set(None));

	view! {
		<div class="graph-canvas">
			<ForceGraphCanvas data=graph_signal selected=selected />
			<Legend entities=entities relationships=relationships />
		</div>
		<DetailPanel entity=entity on_close=on_close />
	}
}
