//! Static color and line-style key shown over the graph.

use leptos::prelude::*;

use crate::dataset::{EdgeLegendEntry, EntityLegendEntry, LegendShape, LineStyle};

/// Inline style for an entity swatch.
pub fn entity_swatch_style(entry: &EntityLegendEntry) -> String {
	let radius = match entry.shape {
		LegendShape::Circle => "50%",
		LegendShape::Square => "2px",
	};
	match &entry.border {
		Some(border) => format!(
			"background-color: {}; border: 1px solid {}; border-radius: {radius};",
			entry.color, border
		),
		None => format!("background-color: {}; border-radius: {radius};", entry.color),
	}
}

/// CSS class and inline style for a relationship swatch. Dashed lines draw
/// with a border so the dashes pick up the color.
pub fn edge_swatch(entry: &EdgeLegendEntry) -> (&'static str, String) {
	match entry.style {
		LineStyle::Solid => ("legend-line", format!("background-color: {};", entry.color)),
		LineStyle::Dashed => ("legend-line dashed", format!("border-color: {};", entry.color)),
	}
}

/// Both legend tables, rendered unconditionally.
#[component]
pub fn Legend(
	/// Entity color key rows.
	entities: Vec<EntityLegendEntry>,
	/// Relationship line key rows.
	relationships: Vec<EdgeLegendEntry>,
) -> impl IntoView {
	view! {
		<div class="legend">
			<div class="legend-title">"Entities"</div>
			<div class="legend-items">
				{entities
					.into_iter()
					.map(|entry| {
						let style = entity_swatch_style(&entry);
						view! {
							<div class="legend-item">
								<div class="legend-dot" style=style />
								<span class="legend-label">{entry.label}</span>
							</div>
						}
					})
					.collect_view()}
			</div>
			<div class="legend-title spaced">"Relationships"</div>
			<div class="legend-items">
				{relationships
					.into_iter()
					.map(|entry| {
						let (class, style) = edge_swatch(&entry);
						view! {
							<div class="legend-item">
								<div class=class style=style />
								<span class="legend-label">{entry.label}</span>
							</div>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dataset::Dataset;

	#[test]
	fn card_swatch_carries_its_border() {
		let dataset = Dataset::embedded().unwrap();
		let card = dataset
			.entity_legend()
			.iter()
			.find(|e| e.label == "Card")
			.unwrap();
		assert_eq!(
			entity_swatch_style(card),
			"background-color: #f4f5f7; border: 1px solid #dfe1e6; border-radius: 50%;"
		);
	}

	#[test]
	fn updated_by_swatch_is_dashed() {
		let dataset = Dataset::embedded().unwrap();
		let swatches: Vec<_> = dataset
			.relationship_legend()
			.iter()
			.map(|e| (e.label.as_str(), edge_swatch(e).0))
			.collect();
		assert_eq!(
			swatches,
			vec![
				("Contains", "legend-line"),
				("In List", "legend-line"),
				("Updated By", "legend-line dashed"),
				("Has Attachment", "legend-line"),
			]
		);
	}
}
