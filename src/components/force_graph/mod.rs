//! Entity graph canvas.
//!
//! Renders the entity graph on an HTML canvas with:
//! - Layout delegated to the `force_graph` simulation, seeded from authored positions
//! - Click-to-select with an outlined, pulsing emphasis on the selected node
//! - Pan, zoom, node dragging, zoom/fit controls and a minimap
//! - Per-kind node styling with a neutral fallback for unknown kinds
//!
//! # Example
//!
//! ```ignore
//! use ecosystem_graph::components::force_graph::{ForceGraphCanvas, GraphData};
//!
//! let selected = RwSignal::new(None::<String>);
//! view! { <ForceGraphCanvas data=data.into() selected=selected /> }
//! ```

mod component;
mod render;
mod scale;
mod state;
mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use scale::{ScaleConfig, ZoomConfig};
pub use state::{Emphasis, ForceGraphState};
pub use theme::{Color, FALLBACK_COLOR, KindStyle, kind_style};
pub use types::{Entity, EntityKind, GraphData, GraphNode, Position, RelationKind, Relationship};
