use ecosystem_graph::components::detail_panel::{DetailView, EMPTY_MESSAGE, FieldValue, project};
use ecosystem_graph::components::force_graph::{Emphasis, EntityKind, ForceGraphState, ScaleConfig};
use ecosystem_graph::{Dataset, stats_label};
use pretty_assertions::assert_eq;

const BOARD: &str = "trello:board:689ce1b0c9307ea4cb627687";

fn sample() -> Dataset {
	Dataset::embedded().unwrap()
}

#[test]
fn test_embedded_dataset_loads() {
	let dataset = sample();
	assert_eq!(dataset.graph().nodes.len(), 10);
	assert_eq!(dataset.relationships().len(), 12);
	assert_eq!(stats_label(dataset.summary()), "10 entities • 12 relationships");

	for link in dataset.relationships() {
		assert!(dataset.contains(&link.source), "{} source", link.id);
		assert!(dataset.contains(&link.target), "{} target", link.id);
	}
}

#[test]
fn test_click_select_project_and_close() {
	let dataset = sample();
	let mut state = ForceGraphState::new(dataset.graph(), 800.0, 600.0);
	let scale = ScaleConfig::default();
	state.fit_view(&scale.zoom);

	// Click the board at its on-screen center.
	let (sx, sy) = state.node_screen_position(BOARD).unwrap();
	let idx = state.node_at_position(sx, sy, &scale).unwrap();
	assert_eq!(state.node_id(idx), Some(BOARD));
	assert!(state.select_node(BOARD));

	let styles = state.style_map();
	assert_eq!(styles[BOARD], Emphasis::Selected);
	assert_eq!(
		styles.values().filter(|e| **e == Emphasis::Selected).count(),
		1
	);

	let entity = dataset.entity(BOARD);
	assert_eq!(entity.map(|e| &e.kind), Some(&EntityKind::Board));
	let DetailView::Entity(detail) = project(entity) else {
		panic!("expected entity detail");
	};
	assert_eq!(detail.title, "Olivia");
	assert_eq!(detail.badge.kind, "board");
	assert_eq!(detail.observation_count, 10);
	assert_eq!(detail.fields[0].label, "Trello ID");
	assert_eq!(
		detail.fields[0].value,
		FieldValue::Mono("689ce1b0c9307ea4cb627687".to_string())
	);
	assert!(detail.fields.iter().any(|f| f.label == "URL"));

	// Closing the panel clears the canvas selection too.
	state.clear_selection();
	assert_eq!(state.selected(), None);
	assert!(state.style_map().values().all(|e| *e == Emphasis::Plain));
	let selected = state.selected().and_then(|id| dataset.entity(id));
	assert_eq!(
		project(selected),
		DetailView::Empty {
			message: EMPTY_MESSAGE
		}
	);
}

#[test]
fn test_selecting_unknown_id_keeps_current_selection() {
	let dataset = sample();
	let mut state = ForceGraphState::new(dataset.graph(), 800.0, 600.0);
	assert!(state.select_node(BOARD));
	assert!(!state.select_node("trello:card:missing"));
	assert_eq!(state.selected(), Some(BOARD));
}

#[test]
fn test_background_click_hits_nothing() {
	let dataset = sample();
	let mut state = ForceGraphState::new(dataset.graph(), 800.0, 600.0);
	let scale = ScaleConfig::default();
	state.fit_view(&scale.zoom);
	assert_eq!(state.node_at_position(-500.0, -500.0, &scale), None);
}
