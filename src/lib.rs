//! ecosystem-graph: interactive view of entities extracted from webhook events.
//!
//! This crate provides a WASM-based page that renders boards, lists, cards,
//! members and attachments as a graph, with a clickable detail panel and a
//! legend. The dataset is compiled in and can be replaced by the host page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info};

pub mod components;
pub mod dataset;

use components::detail_panel::source_label;

pub use components::force_graph::{Entity, EntityKind, ForceGraphCanvas, GraphData, Relationship};
pub use components::graph_view::GraphView;
pub use dataset::{Dataset, DatasetError, DatasetSummary};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ecosystem-graph: logging initialized");
}

/// Header badge text, e.g. `10 entities • 12 relationships`.
pub fn stats_label(summary: DatasetSummary) -> String {
	let plural = |n: usize, one: &str, many: &str| {
		format!("{n} {}", if n == 1 { one } else { many })
	};
	format!(
		"{} • {}",
		plural(summary.entities, "entity", "entities"),
		plural(summary.relationships, "relationship", "relationships")
	)
}

/// Header badge for a source system: its initial and `<Name> Connected`.
pub fn connected_badge(source: &str) -> (String, String) {
	let name = source_label(source);
	let initial = name.chars().next().map(String::from).unwrap_or_default();
	(initial, format!("{name} Connected"))
}

/// Main application component.
/// Loads and validates the dataset, then renders the page shell around the graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let content = match Dataset::load() {
		Ok(dataset) => {
			let summary = dataset.summary();
			let badges: Vec<_> = dataset.sources().into_iter().map(connected_badge).collect();
			info!(
				"ecosystem-graph: loaded {} entities, {} relationships",
				summary.entities, summary.relationships
			);
			view! {
				<header class="header">
					<div class="header-content">
						<div>
							<h1 class="header-title">
								<span class="icon">"🧠"</span>
								"Information Ecosystem"
							</h1>
							<p class="header-subtitle">
								"Entities extracted from webhook events • Click nodes to explore"
							</p>
						</div>
						<div class="header-stats">
							{badges
								.into_iter()
								.map(|(initial, text)| {
									view! {
										<div class="header-badge">
											<span class="badge-icon">{initial}</span>
											<span>{text}</span>
										</div>
									}
								})
								.collect_view()}
							<div class="header-divider" />
							<div class="header-badge">
								<span class="status-indicator">"●"</span>
								<span>{stats_label(summary)}</span>
							</div>
						</div>
					</div>
				</header>
				<div class="graph-container">
					<GraphView dataset=dataset />
				</div>
			}
			.into_any()
		}
		Err(e) => {
			error!("ecosystem-graph: dataset rejected: {}", e);
			view! {
				<div class="load-error">
					<h2>"The graph could not be loaded"</h2>
					<p>{e.to_string()}</p>
				</div>
			}
			.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="MarketSense Information Ecosystem" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="Graph-based view of interconnected information nodes" />

		<main class="page-container">{content}</main>
	}
}
