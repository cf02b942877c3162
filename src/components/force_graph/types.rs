//! Graph data structures for input to the force graph component.
//!
//! Entities and relationships deserialize from the camelCase JSON the dataset
//! is authored in. Kinds are open: anything outside the known set lands in an
//! `Other` variant instead of failing the parse.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of domain object an [`Entity`] stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
	/// A Trello board.
	Board,
	/// A list on a board.
	List,
	/// A card in a list.
	Card,
	/// A person who acted on cards.
	Member,
	/// A file attached to a card.
	Attachment,
	/// A kind this build does not know about yet. Rendered with fallback styling.
	Other(String),
}

impl EntityKind {
	/// Name as written in the dataset.
	pub fn as_str(&self) -> &str {
		match self {
			EntityKind::Board => "board",
			EntityKind::List => "list",
			EntityKind::Card => "card",
			EntityKind::Member => "member",
			EntityKind::Attachment => "attachment",
			EntityKind::Other(name) => name,
		}
	}
}

impl From<String> for EntityKind {
	fn from(value: String) -> Self {
		match value.as_str() {
			"board" => EntityKind::Board,
			"list" => EntityKind::List,
			"card" => EntityKind::Card,
			"member" => EntityKind::Member,
			"attachment" => EntityKind::Attachment,
			_ => EntityKind::Other(value),
		}
	}
}

impl From<EntityKind> for String {
	fn from(kind: EntityKind) -> Self {
		kind.as_str().to_string()
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Presentation category of a [`Relationship`]. Never used for traversal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
	/// Board to list.
	Contains,
	/// Card to the list holding it.
	InList,
	/// Card to the member who last changed it.
	UpdatedBy,
	/// Card to one of its attachments.
	HasAttachment,
	/// A relation this build does not know about yet. Drawn in neutral grey.
	Other(String),
}

impl RelationKind {
	/// Name as written in the dataset.
	pub fn as_str(&self) -> &str {
		match self {
			RelationKind::Contains => "contains",
			RelationKind::InList => "inList",
			RelationKind::UpdatedBy => "updatedBy",
			RelationKind::HasAttachment => "hasAttachment",
			RelationKind::Other(name) => name,
		}
	}
}

impl From<String> for RelationKind {
	fn from(value: String) -> Self {
		match value.as_str() {
			"contains" => RelationKind::Contains,
			"inList" => RelationKind::InList,
			"updatedBy" => RelationKind::UpdatedBy,
			"hasAttachment" => RelationKind::HasAttachment,
			_ => RelationKind::Other(value),
		}
	}
}

impl From<RelationKind> for String {
	fn from(kind: RelationKind) -> Self {
		kind.as_str().to_string()
	}
}

/// A domain object observed through webhook events.
///
/// Optional fields are displayed whenever they are set, regardless of `kind`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	/// Namespaced as `<source>:<entityKind>:<externalId>`.
	pub id: String,
	/// What kind of object this is.
	pub kind: EntityKind,
	/// Display name.
	pub label: String,
	/// Identifier in the originating system.
	pub external_id: String,
	/// Web address of the object.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Short link code (boards and cards).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub short_link: Option<String>,
	/// Per-board card number (cards only).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_number: Option<u64>,
	/// Login name (members only).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Avatar image address (members only).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	/// Attachment file name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_name: Option<String>,
	/// Attachment download address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_url: Option<String>,
	/// RFC 3339 timestamp of the most recent supporting event.
	pub last_observed_at: String,
	/// Number of webhook events that mentioned this entity. Always positive.
	pub observation_count: u32,
	/// Source payload fields kept verbatim.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub raw_metadata: Option<Map<String, Value>>,
}

impl Entity {
	/// Source system namespace taken from the id prefix (`trello` for `trello:card:…`).
	pub fn source(&self) -> &str {
		self.id.split(':').next().unwrap_or_default()
	}
}

/// Seed position handed to the layout simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

/// A node in the graph: an entity plus its optional authored placement.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// The entity this node draws.
	#[serde(flatten)]
	pub entity: Entity,
	/// Layout seed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
}

/// A directed, typed edge between two entities.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	/// Unique edge id.
	pub id: String,
	/// Source entity id.
	pub source: String,
	/// Target entity id.
	pub target: String,
	/// Styling category.
	pub relation_kind: RelationKind,
	/// Caption drawn at the edge midpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// Every node.
	pub nodes: Vec<GraphNode>,
	/// Every edge.
	pub links: Vec<Relationship>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_kinds_deserialize_as_other() {
		let kind: EntityKind = serde_json::from_str("\"unknown_future_kind\"").unwrap();
		assert_eq!(kind, EntityKind::Other("unknown_future_kind".into()));
		assert_eq!(kind.as_str(), "unknown_future_kind");

		let rel: RelationKind = serde_json::from_str("\"mentions\"").unwrap();
		assert_eq!(rel, RelationKind::Other("mentions".into()));
	}

	#[test]
	fn known_kinds_keep_their_wire_names() {
		let kind: EntityKind = serde_json::from_str("\"attachment\"").unwrap();
		assert_eq!(kind, EntityKind::Attachment);
		assert_eq!(
			serde_json::to_string(&RelationKind::HasAttachment).unwrap(),
			"\"hasAttachment\""
		);
	}

	#[test]
	fn graph_node_flattens_entity_fields() {
		let node: GraphNode = serde_json::from_str(
			r#"{
				"id": "trello:member:abc",
				"kind": "member",
				"label": "Ada",
				"externalId": "abc",
				"username": "ada",
				"lastObservedAt": "2025-12-20T04:12:39.481Z",
				"observationCount": 3,
				"position": { "x": 10, "y": 20 }
			}"#,
		)
		.unwrap();

		assert_eq!(node.entity.username.as_deref(), Some("ada"));
		assert_eq!(node.entity.short_link, None);
		assert_eq!(node.entity.source(), "trello");
		assert_eq!(node.position, Some(Position { x: 10.0, y: 20.0 }));
	}
}
