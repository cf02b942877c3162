//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, view
//! transforms for pan/zoom, the single selected node and smoothed hover rings.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::scale::{ScaleConfig, ScaledValues, ZoomConfig};
use super::theme::{EdgeStyle, KindStyle, kind_style, relation_style};
use super::types::{EntityKind, GraphData};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// Entity id.
	pub id: String,
	pub kind: EntityKind,
	pub label: String,
	pub style: KindStyle,
}

impl NodeInfo {
	/// Drawn radius in world units.
	pub fn radius(&self) -> f64 {
		self.style.diameter / 2.0
	}
}

/// A connector resolved to simulation indices.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub style: EdgeStyle,
	pub label: Option<String>,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped by [`ZoomConfig`].
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Set once the pointer leaves the click tolerance.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Set once the pointer leaves the click tolerance.
	pub moved: bool,
}

/// Visual emphasis of a node, as handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// Drawn with its kind style only.
	Plain,
	/// Outlined, glowing and drawn above every other node.
	Selected,
}

/// The single selected entity, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
	selected: Option<String>,
	/// Clock reading when the current selection was made; drives the pulse.
	selected_at: f64,
}

impl SelectionState {
	/// Id of the selected entity.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Select `id`, replacing any previous selection. Returns whether the id changed.
	pub fn select(&mut self, id: &str, now: f64) -> bool {
		let changed = self.selected.as_deref() != Some(id);
		self.selected = Some(id.to_string());
		self.selected_at = now;
		changed
	}

	/// Drop the selection. Returns whether anything was selected.
	pub fn clear(&mut self) -> bool {
		self.selected.take().is_some()
	}

	/// Emphasis of the node with entity id `id`.
	pub fn emphasis(&self, id: &str) -> Emphasis {
		if self.selected.as_deref() == Some(id) {
			Emphasis::Selected
		} else {
			Emphasis::Plain
		}
	}

	/// Progress through the selection pulse in `0.0..1.0`, or `None` once it has played.
	pub fn pulse_progress(&self, now: f64, duration: f64) -> Option<f64> {
		self.selected.as_ref()?;
		let t = (now - self.selected_at) / duration;
		(0.0..1.0).contains(&t).then_some(t)
	}
}

/// Minimum time (seconds) a hover ring is held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;

/// Simulated time (seconds) after which the view is fitted to the settled layout.
const SETTLE_TIME: f64 = 3.0;

/// Smoothed hover rings. Each node fades its ring in and out with exponential
/// easing, and keeps it for a short hold time so skimming the edge of a node
/// does not flicker.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered_node: Option<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
	hold_timer: HashMap<DefaultNodeIdx, f64>,
}

impl HoverState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		if let Some(idx) = node {
			self.hold_timer.insert(idx, MIN_HOLD_TIME);
		}
	}

	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		if let Some(idx) = self.hovered_node {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}

		let hovered = self.hovered_node;
		self.hold_timer.retain(|idx, timer| {
			if hovered == Some(*idx) {
				return true;
			}
			*timer -= dt;
			*timer > 0.0
		});

		let holds = &self.hold_timer;
		self.intensity.retain(|idx, value| {
			if hovered == Some(*idx) {
				return true;
			}
			if holds.get(idx).copied().unwrap_or(0.0) <= 0.0 {
				*value *= fade_out;
			}
			*value > 0.005
		});
	}

	pub fn intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}
}

/// Axis-aligned world-space bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Core graph state combining physics simulation with interaction tracking.
///
/// Created once when the component mounts, then mutated each frame by the
/// animation loop and by pointer events.
pub struct ForceGraphState {
	pub(crate) graph: ForceGraph<NodeInfo, ()>,
	pub(crate) transform: ViewTransform,
	pub(crate) drag: DragState,
	pub(crate) pan: PanState,
	pub(crate) hover: HoverState,
	pub(crate) selection: SelectionState,
	pub(crate) width: f64,
	pub(crate) height: f64,
	/// Seconds since mount.
	pub(crate) clock: f64,
	/// Cleared by the settle fit and by any manual pan, zoom or drag.
	pub(crate) auto_fit: bool,
	edges: Vec<EdgeInfo>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, String>,
}

impl ForceGraphState {
	/// Build the simulation from `data` for a `width` x `height` canvas.
	///
	/// Authored positions seed the layout; nodes without one are placed on a circle.
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 600.0,
			force_spring: 0.02,
			force_max: 60.0,
			node_speed: 2000.0,
			damping_factor: 0.85,
		});
		let mut id_to_idx = HashMap::new();
		let mut idx_to_id = HashMap::new();

		// Authored positions are re-centred on the world origin.
		let placed: Vec<_> = data.nodes.iter().filter_map(|n| n.position).collect();
		let (cx, cy) = if placed.is_empty() {
			(0.0, 0.0)
		} else {
			let n = placed.len() as f64;
			(
				placed.iter().map(|p| p.x).sum::<f64>() / n,
				placed.iter().map(|p| p.y).sum::<f64>() / n,
			)
		};

		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y) = match node.position {
				Some(p) => (p.x - cx, p.y - cy),
				None => {
					let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
					(250.0 * angle.cos(), 250.0 * angle.sin())
				}
			};
			let entity = &node.entity;
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: entity.id.clone(),
					kind: entity.kind.clone(),
					label: entity.label.clone(),
					style: kind_style(&entity.kind),
				},
			});
			id_to_idx.insert(entity.id.clone(), idx);
			idx_to_id.insert(idx, entity.id.clone());
		}

		let mut edges = Vec::new();
		for link in &data.links {
			match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				(Some(&source), Some(&target)) => {
					graph.add_edge(source, target, EdgeData::default());
					edges.push(EdgeInfo {
						source,
						target,
						style: relation_style(&link.relation_kind),
						label: link.label.clone(),
					});
				}
				_ => warn!("graph: skipping relationship {} with unknown endpoint", link.id),
			}
		}

		Self {
			graph,
			edges,
			id_to_idx,
			idx_to_id,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selection: SelectionState::default(),
			width,
			height,
			clock: 0.0,
			auto_fit: true,
		}
	}

	pub(crate) fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	/// Entity id of the node at simulation index `idx`.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.idx_to_id.get(&idx).map(String::as_str)
	}

	/// Select the node with entity id `id`. Unknown ids leave the state untouched.
	pub fn select_node(&mut self, id: &str) -> bool {
		if !self.id_to_idx.contains_key(id) {
			warn!("graph: ignoring selection of unknown node {id}");
			return false;
		}
		debug!("graph: selected {id}");
		self.selection.select(id, self.clock);
		true
	}

	/// Id of the selected entity, if any.
	pub fn selected(&self) -> Option<&str> {
		self.selection.selected()
	}

	/// Remove the selection, if any. Safe to call repeatedly.
	pub fn clear_selection(&mut self) {
		if self.selection.clear() {
			debug!("graph: selection cleared");
		}
	}

	/// Emphasis for every node, keyed by entity id.
	pub fn style_map(&self) -> HashMap<String, Emphasis> {
		self.id_to_idx
			.keys()
			.map(|id| (id.clone(), self.selection.emphasis(id)))
			.collect()
	}

	/// Convert a canvas point to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Convert a world point to canvas coordinates.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// World position of every node, keyed by simulation index.
	pub(crate) fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	/// Screen position of the node with entity id `id`.
	pub fn node_screen_position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.id_to_idx.get(id)?;
		let (gx, gy) = *self.positions().get(&idx)?;
		Some(self.graph_to_screen(gx, gy))
	}

	/// Topmost node under the screen point, if any.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit_radius = node.data.user_data.radius() + scale.hit_slop;
			if (dx * dx + dy * dy).sqrt() < hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// World bounds of all nodes including their radii.
	pub(crate) fn bounds(&self) -> Option<Bounds> {
		let mut bounds: Option<Bounds> = None;
		self.graph.visit_nodes(|node| {
			let r = node.data.user_data.radius();
			let (x, y) = (node.x() as f64, node.y() as f64);
			let b = bounds.get_or_insert(Bounds {
				min_x: x - r,
				min_y: y - r,
				max_x: x + r,
				max_y: y + r,
			});
			b.min_x = b.min_x.min(x - r);
			b.min_y = b.min_y.min(y - r);
			b.max_x = b.max_x.max(x + r);
			b.max_y = b.max_y.max(y + r);
		});
		bounds
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64, zoom: &ZoomConfig) {
		self.auto_fit = false;
		let new_k = zoom.clamp(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom around the canvas center.
	pub fn zoom_center(&mut self, factor: f64, zoom: &ZoomConfig) {
		self.zoom_at(factor, self.width / 2.0, self.height / 2.0, zoom);
	}

	/// Fit every node into the canvas with the configured padding.
	pub fn fit_view(&mut self, zoom: &ZoomConfig) {
		let Some(bounds) = self.bounds() else {
			return;
		};
		let pad = 1.0 + zoom.fit_padding;
		let (w, h) = (bounds.width().max(1.0) * pad, bounds.height().max(1.0) * pad);
		let k = zoom.clamp((self.width / w).min(self.height / h));
		let (cx, cy) = bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// Fit the view once the simulation has had time to spread the seeded layout.
	/// Returns whether the fit happened on this call.
	pub fn settle_fit(&mut self, zoom: &ZoomConfig) -> bool {
		if !self.auto_fit || self.clock < SETTLE_TIME {
			return false;
		}
		self.fit_view(zoom);
		self.auto_fit = false;
		true
	}

	/// Mark `node` as hovered, or nothing when `None`.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover.set_hover(node);
	}

	/// Advance the simulation, the clock and the hover transitions by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.clock += dt as f64;
		self.hover.tick(dt as f64);
	}

	/// Track a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dataset::Dataset;

	const BOARD: &str = "trello:board:689ce1b0c9307ea4cb627687";
	const MEMBER: &str = "trello:member:689f817644d49c78f58c78a8";

	fn state() -> ForceGraphState {
		let dataset = Dataset::embedded().unwrap();
		let mut state = ForceGraphState::new(dataset.graph(), 1200.0, 800.0);
		state.fit_view(&ScaleConfig::default().zoom);
		state
	}

	fn selected_count(state: &ForceGraphState) -> usize {
		state
			.style_map()
			.values()
			.filter(|e| **e == Emphasis::Selected)
			.count()
	}

	#[test]
	fn starts_with_nothing_selected() {
		let state = state();
		assert_eq!(state.selected(), None);
		assert_eq!(selected_count(&state), 0);
		assert_eq!(state.style_map().len(), 10);
		assert_eq!(state.edges().len(), 12);
	}

	#[test]
	fn selecting_another_node_moves_the_emphasis() {
		let mut state = state();
		assert!(state.select_node(BOARD));
		assert!(state.select_node(MEMBER));

		let styles = state.style_map();
		assert_eq!(styles[MEMBER], Emphasis::Selected);
		assert_eq!(styles[BOARD], Emphasis::Plain);
		assert_eq!(selected_count(&state), 1);
	}

	#[test]
	fn clearing_twice_matches_clearing_once() {
		let mut state = state();
		state.select_node(BOARD);
		state.clear_selection();
		let once = state.selection.clone();
		state.clear_selection();
		assert_eq!(state.selection, once);
		assert_eq!(state.selected(), None);
		assert_eq!(selected_count(&state), 0);
	}

	#[test]
	fn unknown_id_is_ignored() {
		let mut state = state();
		state.select_node(BOARD);
		assert!(!state.select_node("trello:card:does-not-exist"));
		assert_eq!(state.selected(), Some(BOARD));
	}

	#[test]
	fn pulse_plays_once_after_selection() {
		let mut state = state();
		state.select_node(BOARD);
		assert_eq!(state.selection.pulse_progress(state.clock, 0.6), Some(0.0));
		for _ in 0..20 {
			state.tick(0.05);
		}
		assert!(state.selection.pulse_progress(state.clock, 0.6).is_none());
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = state();
		let (sx, sy) = state.node_screen_position(BOARD).unwrap();
		let idx = state
			.node_at_position(sx, sy, &ScaleConfig::default())
			.unwrap();
		assert_eq!(state.node_id(idx), Some(BOARD));
		assert!(
			state
				.node_at_position(-5000.0, -5000.0, &ScaleConfig::default())
				.is_none()
		);
	}

	#[test]
	fn fit_view_keeps_zoom_in_range() {
		let state = state();
		let zoom = ScaleConfig::default().zoom;
		assert!(state.transform.k >= zoom.min_k && state.transform.k <= zoom.max_k);
		let bounds = state.bounds().unwrap();
		let (cx, cy) = bounds.center();
		let (sx, sy) = state.graph_to_screen(cx, cy);
		assert!((sx - 600.0).abs() < 1e-6 && (sy - 400.0).abs() < 1e-6);
	}

	#[test]
	fn zoom_keeps_anchor_point_fixed() {
		let mut state = state();
		let zoom = ScaleConfig::default().zoom;
		state.transform.k = 1.0;
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom_at(1.1, 300.0, 200.0, &zoom);
		let after = state.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn reselecting_keeps_a_single_emphasis() {
		let mut state = state();
		assert!(state.select_node(BOARD));
		assert!(state.select_node(BOARD));
		assert_eq!(selected_count(&state), 1);
		assert_eq!(state.style_map()[BOARD], Emphasis::Selected);
	}

	#[test]
	fn view_is_refit_once_the_layout_settles() {
		let mut state = state();
		let zoom = ScaleConfig::default().zoom;
		let mut fits = 0;
		let mut fitted = false;
		for _ in 0..400 {
			state.tick(0.016);
			if state.settle_fit(&zoom) {
				fits += 1;
				fitted = state.positions().values().all(|&(gx, gy)| {
					let (sx, sy) = state.graph_to_screen(gx, gy);
					(0.0..=state.width).contains(&sx) && (0.0..=state.height).contains(&sy)
				});
			}
		}
		assert_eq!(fits, 1);
		assert!(fitted);
	}

	#[test]
	fn manual_zoom_cancels_the_settle_fit() {
		let mut state = state();
		let zoom = ScaleConfig::default().zoom;
		state.zoom_center(1.2, &zoom);
		let k = state.transform.k;
		for _ in 0..400 {
			state.tick(0.016);
			assert!(!state.settle_fit(&zoom));
		}
		assert_eq!(state.transform.k, k);
	}

	#[test]
	fn hover_ring_fades_in_and_out() {
		let mut hover = HoverState::default();
		let state = state();
		let idx = state.id_to_idx[BOARD];
		hover.set_hover(Some(idx));
		for _ in 0..30 {
			hover.tick(0.016);
		}
		assert!(hover.intensity(idx) > 0.9);
		hover.set_hover(None);
		for _ in 0..200 {
			hover.tick(0.016);
		}
		assert_eq!(hover.intensity(idx), 0.0);
	}
}
