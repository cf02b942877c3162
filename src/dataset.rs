//! The compiled-in entity dataset and its legend tables.
//!
//! The dataset is authored as JSON next to the crate and embedded at build time.
//! Every load goes through [`Dataset::validate`], so a dataset that reaches the
//! view is known to have unique ids and no dangling edges.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::force_graph::{Color, Entity, GraphData, GraphNode, Relationship};

const EMBEDDED_JSON: &str = include_str!("../data/ecosystem.json");

/// Text of a `<script id="graph-data">` element, if the host page provides one.
fn page_dataset_json() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Reasons a dataset is rejected at load time.
#[derive(Debug, Error)]
pub enum DatasetError {
	/// The document is not valid JSON or does not match the dataset shape.
	#[error("dataset is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// Two nodes share an id.
	#[error("entity id `{0}` appears more than once")]
	DuplicateEntity(String),
	/// An entity claims to have been seen in no events.
	#[error("entity `{0}` has an observation count of zero")]
	ZeroObservations(String),
	/// An edge endpoint names an entity that is not in the node list.
	#[error("relationship `{edge}` references missing {end} entity `{missing}`")]
	DanglingEdge {
		/// Id of the offending relationship.
		edge: String,
		/// `source` or `target`.
		end: &'static str,
		/// The id that was not found.
		missing: String,
	},
	/// Two edges share an id.
	#[error("relationship id `{0}` appears more than once")]
	DuplicateRelationship(String),
	/// A legend table repeats a label.
	#[error("{table} legend lists `{label}` more than once")]
	DuplicateLegendLabel {
		/// `entity` or `relationship`.
		table: &'static str,
		/// The repeated label.
		label: String,
	},
	/// A legend swatch color is not a `#rrggbb` or `#rgb` hex color.
	#[error("{table} legend entry `{label}` has invalid color `{color}`")]
	InvalidLegendColor {
		/// `entity` or `relationship`.
		table: &'static str,
		/// Label of the offending row.
		label: String,
		/// The color as written.
		color: String,
	},
}

/// Swatch shape for an entity legend row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendShape {
	/// Round dot.
	#[default]
	Circle,
	/// Rounded square.
	Square,
}

/// Line style for a relationship legend row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
	/// Continuous line.
	#[default]
	Solid,
	/// Dashed line.
	Dashed,
}

/// One row of the entity color key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntityLegendEntry {
	/// Swatch fill as a hex color.
	pub color: String,
	/// Kind name shown next to the swatch.
	pub label: String,
	/// Swatch outline as a hex color, for light fills.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub border: Option<String>,
	/// Swatch shape.
	#[serde(default)]
	pub shape: LegendShape,
}

/// One row of the relationship style key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EdgeLegendEntry {
	/// Solid or dashed swatch line.
	#[serde(default)]
	pub style: LineStyle,
	/// Line color as a hex color.
	pub color: String,
	/// Relationship name shown next to the swatch.
	pub label: String,
}

/// Both legend tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LegendTables {
	/// Entity color key.
	pub entities: Vec<EntityLegendEntry>,
	/// Relationship line key.
	pub relationships: Vec<EdgeLegendEntry>,
}

#[derive(Deserialize)]
struct DatasetFile {
	nodes: Vec<GraphNode>,
	links: Vec<Relationship>,
	#[serde(default)]
	legend: LegendTables,
}

/// Entity and relationship totals, shown in the page header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatasetSummary {
	/// Number of nodes.
	pub entities: usize,
	/// Number of edges.
	pub relationships: usize,
}

/// Immutable, validated graph data plus legends.
#[derive(Clone, Debug)]
pub struct Dataset {
	graph: GraphData,
	legend: LegendTables,
	index: HashMap<String, usize>,
}

impl Dataset {
	/// The dataset shipped inside the binary.
	pub fn embedded() -> Result<Self, DatasetError> {
		Self::from_json(EMBEDDED_JSON)
	}

	/// The page-provided dataset, or the embedded one.
	///
	/// An override that is not valid JSON is ignored with a warning. An override
	/// that parses but fails validation is an error: a corrupt graph is never shown.
	pub fn load() -> Result<Self, DatasetError> {
		if let Some(json) = page_dataset_json() {
			match Self::from_json(&json) {
				Ok(dataset) => {
					info!("dataset: using override from page");
					return Ok(dataset);
				}
				Err(DatasetError::Parse(e)) => {
					warn!("dataset: ignoring unparsable page override: {}", e);
				}
				Err(e) => return Err(e),
			}
		}
		Self::embedded()
	}

	/// Parse and validate a dataset document.
	pub fn from_json(json: &str) -> Result<Self, DatasetError> {
		let file: DatasetFile = serde_json::from_str(json)?;
		Self::new(
			GraphData {
				nodes: file.nodes,
				links: file.links,
			},
			file.legend,
		)
	}

	/// Build a dataset from parts, failing on the first integrity violation.
	pub fn new(graph: GraphData, legend: LegendTables) -> Result<Self, DatasetError> {
		let index = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.entity.id.clone(), i))
			.collect();
		let dataset = Self {
			graph,
			legend,
			index,
		};
		dataset.validate()?;
		debug!(
			"dataset: validated {} entities, {} relationships",
			dataset.graph.nodes.len(),
			dataset.graph.links.len()
		);
		Ok(dataset)
	}

	/// Check id uniqueness, edge referential integrity, legend label uniqueness
	/// and legend colors.
	pub fn validate(&self) -> Result<(), DatasetError> {
		let mut seen = HashSet::new();
		for node in &self.graph.nodes {
			if !seen.insert(node.entity.id.as_str()) {
				return Err(DatasetError::DuplicateEntity(node.entity.id.clone()));
			}
			if node.entity.observation_count == 0 {
				return Err(DatasetError::ZeroObservations(node.entity.id.clone()));
			}
		}

		let mut edge_ids = HashSet::new();
		for link in &self.graph.links {
			if !edge_ids.insert(link.id.as_str()) {
				return Err(DatasetError::DuplicateRelationship(link.id.clone()));
			}
			for (end, id) in [("source", &link.source), ("target", &link.target)] {
				if !seen.contains(id.as_str()) {
					return Err(DatasetError::DanglingEdge {
						edge: link.id.clone(),
						end,
						missing: id.clone(),
					});
				}
			}
		}

		unique_labels("entity", self.legend.entities.iter().map(|e| &e.label))?;
		unique_labels(
			"relationship",
			self.legend.relationships.iter().map(|e| &e.label),
		)?;
		for entry in &self.legend.entities {
			legend_color("entity", &entry.label, &entry.color)?;
			if let Some(border) = &entry.border {
				legend_color("entity", &entry.label, border)?;
			}
		}
		for entry in &self.legend.relationships {
			legend_color("relationship", &entry.label, &entry.color)?;
		}
		Ok(())
	}

	/// Nodes and links, in authored order.
	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	/// Every entity, in authored order.
	pub fn entities(&self) -> impl Iterator<Item = &Entity> {
		self.graph.nodes.iter().map(|node| &node.entity)
	}

	/// Every relationship, in authored order.
	pub fn relationships(&self) -> &[Relationship] {
		&self.graph.links
	}

	/// Distinct source systems the entities come from, sorted (`["trello"]`).
	pub fn sources(&self) -> Vec<&str> {
		self.entities()
			.map(Entity::source)
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// Look up an entity by its namespaced id.
	pub fn entity(&self, id: &str) -> Option<&Entity> {
		self.index.get(id).map(|&i| &self.graph.nodes[i].entity)
	}

	/// Whether an entity with this id exists.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Rows of the entity color key.
	pub fn entity_legend(&self) -> &[EntityLegendEntry] {
		&self.legend.entities
	}

	/// Rows of the relationship line key.
	pub fn relationship_legend(&self) -> &[EdgeLegendEntry] {
		&self.legend.relationships
	}

	/// Counts derived from the loaded collections.
	pub fn summary(&self) -> DatasetSummary {
		DatasetSummary {
			entities: self.graph.nodes.len(),
			relationships: self.graph.links.len(),
		}
	}
}

fn legend_color(table: &'static str, label: &str, color: &str) -> Result<(), DatasetError> {
	Color::from_hex(color)
		.map(|_| ())
		.ok_or_else(|| DatasetError::InvalidLegendColor {
			table,
			label: label.to_string(),
			color: color.to_string(),
		})
}

fn unique_labels<'a>(
	table: &'static str,
	labels: impl Iterator<Item = &'a String>,
) -> Result<(), DatasetError> {
	let mut seen = HashSet::new();
	for label in labels {
		if !seen.insert(label.as_str()) {
			return Err(DatasetError::DuplicateLegendLabel {
				table,
				label: label.clone(),
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::EntityKind;

	fn minimal(nodes: &str, links: &str) -> String {
		format!(r#"{{ "nodes": [{nodes}], "links": [{links}] }}"#)
	}

	fn node(id: &str) -> String {
		format!(
			r#"{{ "id": "{id}", "kind": "card", "label": "x", "externalId": "x",
				"lastObservedAt": "2025-12-20T04:12:39.481Z", "observationCount": 1 }}"#
		)
	}

	#[test]
	fn embedded_dataset_has_sample_shape() {
		let dataset = Dataset::embedded().unwrap();
		assert_eq!(
			dataset.summary(),
			DatasetSummary {
				entities: 10,
				relationships: 12
			}
		);

		let count = |kind: EntityKind| dataset.entities().filter(|e| e.kind == kind).count();
		assert_eq!(count(EntityKind::Board), 1);
		assert_eq!(count(EntityKind::List), 2);
		assert_eq!(count(EntityKind::Card), 4);
		assert_eq!(count(EntityKind::Member), 1);
		assert_eq!(count(EntityKind::Attachment), 2);

		assert_eq!(dataset.entity_legend().len(), 5);
		assert_eq!(dataset.relationship_legend().len(), 4);
	}

	#[test]
	fn every_embedded_edge_resolves() {
		let dataset = Dataset::embedded().unwrap();
		for link in dataset.relationships() {
			assert!(dataset.contains(&link.source), "{} source", link.id);
			assert!(dataset.contains(&link.target), "{} target", link.id);
		}
	}

	#[test]
	fn dangling_edge_names_the_edge_and_endpoint() {
		let json = minimal(
			&node("a"),
			r#"{ "id": "e1", "source": "a", "target": "ghost", "relationKind": "contains" }"#,
		);
		match Dataset::from_json(&json) {
			Err(DatasetError::DanglingEdge { edge, end, missing }) => {
				assert_eq!(edge, "e1");
				assert_eq!(end, "target");
				assert_eq!(missing, "ghost");
			}
			other => panic!("expected dangling edge, got {other:?}"),
		}
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let json = minimal(&format!("{},{}", node("a"), node("a")), "");
		assert!(matches!(
			Dataset::from_json(&json),
			Err(DatasetError::DuplicateEntity(id)) if id == "a"
		));
	}

	#[test]
	fn duplicate_legend_labels_are_rejected() {
		let json = r##"{ "nodes": [], "links": [], "legend": {
			"entities": [
				{ "color": "#000", "label": "Board" },
				{ "color": "#fff", "label": "Board" }
			],
			"relationships": []
		} }"##;
		assert!(matches!(
			Dataset::from_json(json),
			Err(DatasetError::DuplicateLegendLabel { table: "entity", .. })
		));
	}

	#[test]
	fn legend_colors_must_be_hex() {
		let json = r##"{ "nodes": [], "links": [], "legend": {
			"entities": [{ "color": "#f4f5f7", "label": "Card", "border": "grey" }],
			"relationships": []
		} }"##;
		match Dataset::from_json(json) {
			Err(DatasetError::InvalidLegendColor {
				table,
				label,
				color,
			}) => {
				assert_eq!((table, label.as_str(), color.as_str()), ("entity", "Card", "grey"));
			}
			other => panic!("expected invalid color, got {other:?}"),
		}

		let json = r##"{ "nodes": [], "links": [], "legend": {
			"entities": [],
			"relationships": [{ "color": "0079bf", "label": "Contains" }]
		} }"##;
		assert!(matches!(
			Dataset::from_json(json),
			Err(DatasetError::InvalidLegendColor { table: "relationship", .. })
		));
	}

	#[test]
	fn sources_are_distinct() {
		assert_eq!(Dataset::embedded().unwrap().sources(), vec!["trello"]);
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(
			Dataset::from_json("{ nodes"),
			Err(DatasetError::Parse(_))
		));
	}
}
