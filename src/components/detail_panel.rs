//! Side panel describing the selected entity.
//!
//! [`project`] turns "selected entity or none" into a [`DetailView`], a plain
//! value that the component renders. Fields are shown whenever they are set on
//! the entity, independent of its kind, so new kinds display without changes.

use leptos::prelude::*;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use super::force_graph::{Color, Entity, kind_style};

/// Placeholder shown while nothing is selected.
pub const EMPTY_MESSAGE: &str = "Click a node to explore its information";

/// How a field value is presented.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
	/// Plain text.
	Text(String),
	/// Identifiers, rendered in a monospace face.
	Mono(String),
	/// A link opened in a new tab.
	Link {
		/// Target address.
		href: String,
		/// Link text.
		text: String,
	},
	/// An inline image.
	Image {
		/// Image address.
		src: String,
		/// Alternative text.
		alt: String,
	},
}

/// One labelled row of the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailField {
	/// Row caption, e.g. `Short Link`.
	pub label: String,
	/// Row content.
	pub value: FieldValue,
}

impl DetailField {
	fn new(label: impl Into<String>, value: FieldValue) -> Self {
		Self {
			label: label.into(),
			value,
		}
	}
}

/// Kind indicator at the top of the panel, colored like the node on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct KindBadge {
	/// Kind name, e.g. `board`.
	pub kind: String,
	/// Accent color of the kind.
	pub color: Color,
	/// Emoji for the kind.
	pub icon: &'static str,
}

/// Panel content for a selected entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDetail {
	/// Kind indicator.
	pub badge: KindBadge,
	/// The entity label.
	pub title: String,
	/// External id first, then whichever optional fields are set.
	pub fields: Vec<DetailField>,
	/// Number of supporting events.
	pub observation_count: u32,
	/// Formatted time of the latest supporting event.
	pub last_observed: String,
	/// Pretty-printed raw metadata, present only when non-empty.
	pub raw_metadata: Option<String>,
	/// Display name of the source system, e.g. `Trello`.
	pub source: String,
}

/// Everything the panel displays for one selection state.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailView {
	/// Nothing is selected.
	Empty {
		/// Placeholder text.
		message: &'static str,
	},
	/// The selected entity.
	Entity(Box<EntityDetail>),
}

/// Project the selected entity (or none) into panel content.
pub fn project(entity: Option<&Entity>) -> DetailView {
	let Some(entity) = entity else {
		return DetailView::Empty {
			message: EMPTY_MESSAGE,
		};
	};
	let style = kind_style(&entity.kind);
	let source = source_label(entity.source());

	let mut fields = vec![DetailField::new(
		format!("{source} ID"),
		FieldValue::Mono(entity.external_id.clone()),
	)];
	if let Some(url) = &entity.url {
		fields.push(DetailField::new(
			"URL",
			FieldValue::Link {
				href: url.clone(),
				text: url.clone(),
			},
		));
	}
	if let Some(short_link) = &entity.short_link {
		fields.push(DetailField::new(
			"Short Link",
			FieldValue::Mono(short_link.clone()),
		));
	}
	if let Some(number) = entity.sequence_number {
		fields.push(DetailField::new("Card #", FieldValue::Text(number.to_string())));
	}
	if let Some(username) = &entity.username {
		fields.push(DetailField::new(
			"Username",
			FieldValue::Text(format!("@{username}")),
		));
	}
	if let Some(avatar) = &entity.avatar_url {
		fields.push(DetailField::new(
			"Avatar",
			FieldValue::Image {
				src: avatar.clone(),
				alt: entity.label.clone(),
			},
		));
	}
	if let Some(file_name) = &entity.file_name {
		fields.push(DetailField::new(
			"File Name",
			FieldValue::Text(file_name.clone()),
		));
	}
	if let Some(file_url) = &entity.file_url {
		fields.push(DetailField::new(
			"Download",
			FieldValue::Link {
				href: file_url.clone(),
				text: "📥 Download File".to_string(),
			},
		));
	}

	let raw_metadata = entity
		.raw_metadata
		.as_ref()
		.filter(|raw| !raw.is_empty())
		.and_then(|raw| serde_json::to_string_pretty(raw).ok());

	DetailView::Entity(Box::new(EntityDetail {
		badge: KindBadge {
			kind: entity.kind.to_string(),
			color: style.accent,
			icon: style.icon,
		},
		title: entity.label.clone(),
		fields,
		observation_count: entity.observation_count,
		last_observed: format_timestamp(&entity.last_observed_at),
		raw_metadata,
		source,
	}))
}

/// Format an RFC 3339 timestamp as `Dec 20, 2025, 4:12:39 AM UTC`.
/// Values that do not parse are returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
	let format = format_description!(
		"[month repr:short] [day padding:none], [year], [hour repr:12 padding:none]:[minute]:[second] [period] UTC"
	);
	OffsetDateTime::parse(raw, &Rfc3339)
		.ok()
		.and_then(|ts| ts.to_offset(UtcOffset::UTC).format(&format).ok())
		.unwrap_or_else(|| raw.to_string())
}

/// Display name of a source namespace: `trello` becomes `Trello`.
pub fn source_label(source: &str) -> String {
	let mut chars = source.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => "Unknown".to_string(),
	}
}

fn field_view(field: DetailField) -> AnyView {
	let value = match field.value {
		FieldValue::Text(text) => view! { <p class="detail-value">{text}</p> }.into_any(),
		FieldValue::Mono(text) => view! { <p class="detail-value mono">{text}</p> }.into_any(),
		FieldValue::Link { href, text } => view! {
			<a href=href target="_blank" rel="noopener noreferrer" class="detail-value detail-link">
				{text}
			</a>
		}
		.into_any(),
		FieldValue::Image { src, alt } => {
			view! { <img src=src alt=alt class="detail-avatar" /> }.into_any()
		}
	};
	view! {
		<div class="detail-field">
			<span class="detail-label">{field.label}</span>
			{value}
		</div>
	}
	.into_any()
}

fn entity_view(detail: EntityDetail, on_close: Callback<()>) -> AnyView {
	let color = detail.badge.color;
	let icon_style = format!(
		"background-color: {}; border: 2px solid {};",
		color.with_alpha(0.125).to_css(),
		color.to_css()
	);
	let badge_style = format!(
		"background-color: {}; color: {};",
		color.with_alpha(0.19).to_css(),
		color.to_css()
	);

	view! {
		<div class="detail-content">
			<div class="detail-header">
				<div class="detail-header-info">
					<div class="detail-icon" style=icon_style>{detail.badge.icon}</div>
					<div>
						<h3 class="detail-title">{detail.title}</h3>
						<span class="detail-badge" style=badge_style>{detail.badge.kind}</span>
					</div>
				</div>
				<button class="detail-close" title="Close" on:click=move |_| on_close.run(())>
					"✕"
				</button>
			</div>
			<div class="detail-divider" />
			<div>{detail.fields.into_iter().map(field_view).collect_view()}</div>
			<div class="detail-divider" />
			<div class="detail-grid">
				<div class="detail-field">
					<span class="detail-label">"Events"</span>
					<p class="detail-value strong">{detail.observation_count}</p>
				</div>
				<div class="detail-field">
					<span class="detail-label">"Last Seen"</span>
					<p class="detail-value">{detail.last_observed}</p>
				</div>
			</div>
			{detail.raw_metadata.map(|raw| view! {
				<details class="detail-raw">
					<summary>"Raw Metadata"</summary>
					<pre>{raw}</pre>
				</details>
			})}
			<div class="detail-source">
				<span class="source-icon">{detail.source.chars().next().unwrap_or('?').to_string()}</span>
				<span>{format!("Source: {}", detail.source)}</span>
			</div>
		</div>
	}
	.into_any()
}

/// Panel showing the fields of `entity`, or a placeholder when it is `None`.
#[component]
pub fn DetailPanel(
	/// The selected entity, if any.
	#[prop(into)]
	entity: Signal<Option<Entity>>,
	/// Invoked by the close button.
	on_close: Callback<()>,
) -> impl IntoView {
	let content = Memo::new(move |_| entity.with(|e| project(e.as_ref())));

	view! {
		<aside class="detail-panel">
			<div class="detail-panel-header">
				<h2>"Node Details"</h2>
			</div>
			{move || match content.get() {
				DetailView::Empty { message } => view! {
					<div class="detail-empty">
						<div class="icon">"🧠"</div>
						<p>{message}</p>
					</div>
				}
				.into_any(),
				DetailView::Entity(detail) => entity_view(*detail, on_close),
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::force_graph::{EntityKind, FALLBACK_COLOR};
	use crate::dataset::Dataset;

	fn card() -> Entity {
		Entity {
			id: "trello:card:6942fa2837f9e2949dc8d42f".into(),
			kind: EntityKind::Card,
			label: "NY Geo Blog #384".into(),
			external_id: "6942fa2837f9e2949dc8d42f".into(),
			url: None,
			short_link: Some("tVUvANfc".into()),
			sequence_number: Some(384),
			username: None,
			avatar_url: None,
			file_name: None,
			file_url: None,
			last_observed_at: "2025-12-19T23:10:42.941Z".into(),
			observation_count: 3,
			raw_metadata: None,
		}
	}

	fn detail(view: DetailView) -> EntityDetail {
		match view {
			DetailView::Entity(detail) => *detail,
			DetailView::Empty { .. } => panic!("expected entity detail"),
		}
	}

	fn labels(detail: &EntityDetail) -> Vec<&str> {
		detail.fields.iter().map(|f| f.label.as_str()).collect()
	}

	#[test]
	fn nothing_selected_shows_only_the_placeholder() {
		assert_eq!(
			project(None),
			DetailView::Empty {
				message: EMPTY_MESSAGE
			}
		);
	}

	#[test]
	fn card_shows_short_link_but_not_username() {
		let detail = detail(project(Some(&card())));
		assert_eq!(labels(&detail), vec!["Trello ID", "Short Link", "Card #"]);
		assert_eq!(
			detail.fields[1].value,
			FieldValue::Mono("tVUvANfc".into())
		);
		assert_eq!(detail.raw_metadata, None);
	}

	#[test]
	fn presence_not_kind_decides_fields() {
		let mut entity = card();
		entity.username = Some("oliviashorter".into());
		let detail = detail(project(Some(&entity)));
		assert!(labels(&detail).contains(&"Username"));
		let username = detail.fields.iter().find(|f| f.label == "Username").unwrap();
		assert_eq!(username.value, FieldValue::Text("@oliviashorter".into()));
	}

	#[test]
	fn projection_is_repeatable() {
		let dataset = Dataset::embedded().unwrap();
		for entity in dataset.entities() {
			let first = project(Some(entity));
			let second = project(Some(entity));
			assert_eq!(first, second);
			assert_eq!(format!("{first:?}"), format!("{second:?}"));
		}
	}

	#[test]
	fn board_detail_matches_dataset() {
		let dataset = Dataset::embedded().unwrap();
		let board = dataset
			.entity("trello:board:689ce1b0c9307ea4cb627687")
			.unwrap();
		let detail = detail(project(Some(board)));

		assert_eq!(detail.title, "Olivia");
		assert_eq!(detail.badge.kind, "board");
		assert_eq!(detail.badge.icon, "📋");
		assert_eq!(
			detail.fields[0].value,
			FieldValue::Mono("689ce1b0c9307ea4cb627687".into())
		);
		assert_eq!(labels(&detail), vec!["Trello ID", "URL", "Short Link"]);
		assert_eq!(detail.observation_count, 10);
		assert_eq!(detail.last_observed, "Dec 20, 2025, 4:12:39 AM UTC");
		assert_eq!(detail.source, "Trello");
		assert_eq!(
			detail.raw_metadata.as_deref(),
			Some("{\n  \"idOrganization\": \"60fdabeeb8bdd3530a9d1f1e\",\n  \"permissionLevel\": \"private\"\n}")
		);
	}

	#[test]
	fn attachment_fields_in_order() {
		let dataset = Dataset::embedded().unwrap();
		let attachment = dataset
			.entity("trello:attachment:6945db6b49734494238be32e")
			.unwrap();
		let detail = detail(project(Some(attachment)));
		assert_eq!(labels(&detail), vec!["Trello ID", "File Name", "Download"]);
		assert!(matches!(
			&detail.fields[2].value,
			FieldValue::Link { text, .. } if text == "📥 Download File"
		));
	}

	#[test]
	fn unknown_kind_gets_fallback_badge() {
		let mut entity = card();
		entity.kind = EntityKind::Other("unknown_future_kind".into());
		let detail = detail(project(Some(&entity)));
		assert_eq!(detail.badge.color, FALLBACK_COLOR);
		assert_eq!(detail.badge.kind, "unknown_future_kind");
	}

	#[test]
	fn empty_raw_metadata_is_hidden() {
		let mut entity = card();
		entity.raw_metadata = Some(Default::default());
		assert_eq!(detail(project(Some(&entity))).raw_metadata, None);
	}

	#[test]
	fn timestamps() {
		assert_eq!(
			format_timestamp("2025-12-19T13:00:00.000Z"),
			"Dec 19, 2025, 1:00:00 PM UTC"
		);
		assert_eq!(
			format_timestamp("2025-12-20T05:12:39+01:00"),
			"Dec 20, 2025, 4:12:39 AM UTC"
		);
		assert_eq!(format_timestamp("yesterday"), "yesterday");
	}
}
