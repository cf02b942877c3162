//! Zoom-dependent sizing and zoom limits.
//!
//! Sizes are expressed in world units (the graph's own coordinate system) and
//! drawn after the canvas transform is applied, so a world-unit value grows on
//! screen as the user zooms in. Some elements should not: hit slop and label
//! legibility are tuned in screen pixels via [`ScaleBehavior`].

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Allowed zoom range and step sizes.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
	/// Furthest zoom out.
	pub min_k: f64,
	/// Furthest zoom in.
	pub max_k: f64,
	/// Multiplier applied per wheel notch.
	pub wheel_step: f64,
	/// Multiplier applied per zoom button press.
	pub button_step: f64,
	/// Fraction of the fitted bounds added as margin by "fit view".
	pub fit_padding: f64,
}

impl ZoomConfig {
	/// Clamp a zoom factor into `min_k..=max_k`.
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min_k, self.max_k)
	}
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Zoom limits and steps.
	pub zoom: ZoomConfig,
	/// Extra hit radius around each node.
	pub hit_slop: f64,
	/// How `hit_slop` scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Node label font sizes come from the kind style; this bounds them on screen.
	pub label_behavior: ScaleBehavior,
	/// Edge caption font size in pixels.
	pub edge_label_size: f64,
	/// Edge captions are skipped below this zoom level.
	pub edge_label_min_k: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// Gap between a node's border and its selection outline.
	pub ring_offset: f64,
	/// Pointer travel (screen pixels) beyond which a press counts as a drag.
	pub click_tolerance: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			zoom: ZoomConfig {
				min_k: 0.3,
				max_k: 2.0,
				wheel_step: 1.1,
				button_step: 1.2,
				fit_padding: 0.3,
			},
			hit_slop: 4.0,
			hit_behavior: ScaleBehavior::Screen,
			label_behavior: ScaleBehavior::Clamped {
				min_screen: 7.0,
				max_screen: 22.0,
			},
			edge_label_size: 10.0,
			edge_label_min_k: 0.5,
			arrow_size: 7.0,
			ring_offset: 2.0,
			click_tolerance: 4.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub hit_slop: f64,
	pub arrow_size: f64,
	pub ring_offset: f64,
	pub edge_label_font: String,
	pub show_edge_labels: bool,
	label_behavior: ScaleBehavior,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			hit_slop: config.hit_behavior.apply(config.hit_slop, k),
			arrow_size: ScaleBehavior::World.apply(config.arrow_size, k),
			ring_offset: config.ring_offset,
			edge_label_font: format!("{}px sans-serif", config.edge_label_size),
			show_edge_labels: k >= config.edge_label_min_k,
			label_behavior: config.label_behavior.clone(),
		}
	}

	/// World-space font size for a node label of the given base size.
	pub fn label_font_px(&self, base_size: f64) -> f64 {
		self.label_behavior.apply(base_size, self.k)
	}

	/// CSS font for a node label with the given base size and weight.
	pub fn label_font(&self, base_size: f64, weight: u16) -> String {
		format!("{weight} {:.2}px sans-serif", self.label_font_px(base_size))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_is_clamped_to_configured_range() {
		let zoom = ScaleConfig::default().zoom;
		assert_eq!(zoom.clamp(0.01), 0.3);
		assert_eq!(zoom.clamp(5.0), 2.0);
		assert_eq!(zoom.clamp(1.0), 1.0);
	}

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(4.0, 2.0), 2.0);
		assert_eq!(ScaleBehavior::World.apply(4.0, 2.0), 4.0);
	}

	#[test]
	fn clamped_labels_stay_legible_when_zoomed_out() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 7.0,
			max_screen: 22.0,
		};
		// 11 world units at k=0.3 would be 3.3px on screen; clamp lifts it to 7px.
		let world = behavior.apply(11.0, 0.3);
		assert!((world * 0.3 - 7.0).abs() < 1e-9);
		assert_eq!(behavior.apply(11.0, 1.0), 11.0);
	}

	#[test]
	fn edge_labels_hide_when_zoomed_far_out() {
		let config = ScaleConfig::default();
		assert!(!ScaledValues::new(&config, 0.3).show_edge_labels);
		assert!(ScaledValues::new(&config, 1.0).show_edge_labels);
	}
}
