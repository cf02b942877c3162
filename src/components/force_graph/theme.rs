//! Visual theming for the force graph.
//!
//! Holds the per-kind style lookups shared by the canvas, the detail panel and
//! the minimap, plus canvas-wide style configuration.

use super::types::{EntityKind, RelationKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color from channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color from channels and opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parse `#rrggbb` or the `#rgb` shorthand.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#').filter(|d| d.is_ascii())?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match digits.len() {
			6 => Some(Self::rgb(
				channel(&digits[0..2])?,
				channel(&digits[2..4])?,
				channel(&digits[4..6])?,
			)),
			3 => {
				let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
				Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
			}
			_ => None,
		}
	}

	/// The same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Neutral grey for kinds this build does not recognise.
pub const FALLBACK_COLOR: Color = Color::rgb(0x6b, 0x72, 0x80);

/// How a node of a given [`EntityKind`] is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct KindStyle {
	/// Diameter in world units.
	pub diameter: f64,
	/// Gradient stops, top-left to bottom-right.
	pub fill: (Color, Color),
	/// Outline stroke.
	pub border: Color,
	/// Label color.
	pub text: Color,
	/// Identifying color used for badges and legend swatches.
	pub accent: Color,
	/// Label font size in world units.
	pub font_size: f64,
	/// Label CSS font weight.
	pub font_weight: u16,
	/// Emoji shown on the detail panel badge.
	pub icon: &'static str,
}

/// Style lookup keyed by entity kind. Unknown kinds get a neutral default.
pub fn kind_style(kind: &EntityKind) -> KindStyle {
	let white = Color::rgb(255, 255, 255);
	match kind {
		EntityKind::Board => KindStyle {
			diameter: 100.0,
			fill: (Color::rgb(0x00, 0x79, 0xbf), Color::rgb(0x02, 0x6a, 0xa7)),
			border: Color::rgb(0x00, 0x4a, 0x75),
			text: white,
			accent: Color::rgb(0x00, 0x79, 0xbf),
			font_size: 13.0,
			font_weight: 600,
			icon: "📋",
		},
		EntityKind::List => KindStyle {
			diameter: 80.0,
			fill: (Color::rgb(0x5b, 0xa4, 0xcf), Color::rgb(0x29, 0x8f, 0xca)),
			border: Color::rgb(0x1a, 0x6f, 0xb0),
			text: white,
			accent: Color::rgb(0x5b, 0xa4, 0xcf),
			font_size: 11.0,
			font_weight: 500,
			icon: "📁",
		},
		EntityKind::Card => KindStyle {
			diameter: 70.0,
			fill: (Color::rgb(0xff, 0xff, 0xff), Color::rgb(0xf4, 0xf5, 0xf7)),
			border: Color::rgb(0xdf, 0xe1, 0xe6),
			text: Color::rgb(0x17, 0x2b, 0x4d),
			accent: Color::rgb(0xdf, 0xe1, 0xe6),
			font_size: 11.0,
			font_weight: 500,
			icon: "🎴",
		},
		EntityKind::Member => KindStyle {
			diameter: 60.0,
			fill: (Color::rgb(0xff, 0x74, 0x52), Color::rgb(0xff, 0x56, 0x30)),
			border: Color::rgb(0xde, 0x35, 0x0b),
			text: white,
			accent: Color::rgb(0xff, 0x56, 0x30),
			font_size: 11.0,
			font_weight: 500,
			icon: "👤",
		},
		EntityKind::Attachment => KindStyle {
			diameter: 55.0,
			fill: (Color::rgb(0x36, 0xb3, 0x7e), Color::rgb(0x00, 0x87, 0x5a)),
			border: Color::rgb(0x00, 0x66, 0x44),
			text: white,
			accent: Color::rgb(0x36, 0xb3, 0x7e),
			font_size: 10.0,
			font_weight: 500,
			icon: "📎",
		},
		EntityKind::Other(_) => KindStyle {
			diameter: 60.0,
			fill: (FALLBACK_COLOR.lighten(0.15), FALLBACK_COLOR),
			border: Color::rgb(0x4b, 0x55, 0x63),
			text: white,
			accent: FALLBACK_COLOR,
			font_size: 11.0,
			font_weight: 500,
			icon: "◆",
		},
	}
}

/// The identifying color of a kind, shared by nodes, badges and the legend.
pub fn kind_color(kind: &EntityKind) -> Color {
	kind_style(kind).accent
}

/// Minimap dot color. Cards use a darker grey so they stay visible on the mask.
pub fn minimap_color(kind: &EntityKind) -> Color {
	match kind {
		EntityKind::Card => Color::rgb(0x9c, 0xa3, 0xaf),
		other => kind_color(other),
	}
}

/// Connector style for a relation kind.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: Color,
	/// Stroke width in screen pixels.
	pub width: f64,
	/// `(dash, gap)` in screen pixels; `None` for a solid line.
	pub dash: Option<(f64, f64)>,
}

pub fn relation_style(kind: &RelationKind) -> EdgeStyle {
	match kind {
		RelationKind::Contains => EdgeStyle {
			color: Color::rgb(0x00, 0x79, 0xbf),
			width: 2.0,
			dash: None,
		},
		RelationKind::InList => EdgeStyle {
			color: Color::rgb(0x5b, 0xa4, 0xcf),
			width: 1.5,
			dash: None,
		},
		RelationKind::UpdatedBy => EdgeStyle {
			color: Color::rgb(0xff, 0x56, 0x30),
			width: 1.0,
			dash: Some((4.0, 2.0)),
		},
		RelationKind::HasAttachment => EdgeStyle {
			color: Color::rgb(0x36, 0xb3, 0x7e),
			width: 1.5,
			dash: None,
		},
		RelationKind::Other(_) => EdgeStyle {
			color: FALLBACK_COLOR,
			width: 1.0,
			dash: None,
		},
	}
}

/// Dotted grid behind the graph.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub dot_color: Color,
	/// Grid spacing in world units.
	pub dot_gap: f64,
	/// Dot radius in screen pixels.
	pub dot_size: f64,
}

/// Emphasis drawn around the selected node.
#[derive(Clone, Debug)]
pub struct SelectionStyle {
	pub outline: Color,
	/// Outline width in screen pixels.
	pub outline_width: f64,
	/// Soft glow radius in screen pixels.
	pub glow_radius: f64,
	pub glow_alpha: f64,
	/// Length of the pulse played when a node is selected, in seconds.
	pub pulse_duration: f64,
	/// Peak radius growth during the pulse (0.08 = 8%).
	pub pulse_scale: f64,
}

/// Overview panel in the bottom-right corner.
#[derive(Clone, Debug)]
pub struct MinimapStyle {
	pub enabled: bool,
	pub width: f64,
	pub height: f64,
	/// Distance from the canvas edges in pixels.
	pub margin: f64,
	pub background: Color,
	/// Dims everything outside the current viewport.
	pub mask: Color,
	pub viewport_border: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub selection: SelectionStyle,
	pub minimap: MinimapStyle,
	pub hover_ring: Color,
	pub edge_label: Color,
	pub edge_label_background: Color,
}

impl Theme {
	/// Dark slate canvas with Trello-colored nodes.
	pub fn default_theme() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(0x0b, 0x12, 0x20),
				dot_color: Color::rgb(0x37, 0x41, 0x51),
				dot_gap: 20.0,
				dot_size: 1.0,
			},
			selection: SelectionStyle {
				outline: Color::rgb(0x63, 0x66, 0xf1),
				outline_width: 3.0,
				glow_radius: 20.0,
				glow_alpha: 0.5,
				pulse_duration: 0.6,
				pulse_scale: 0.08,
			},
			minimap: MinimapStyle {
				enabled: true,
				width: 200.0,
				height: 150.0,
				margin: 15.0,
				background: Color::rgb(0x11, 0x18, 0x27),
				mask: Color::rgba(0, 0, 0, 0.7),
				viewport_border: Color::rgba(255, 255, 255, 0.4),
			},
			hover_ring: Color::rgb(255, 255, 255),
			edge_label: Color::rgb(0xd1, 0xd5, 0xdb),
			edge_label_background: Color::rgba(0x0b, 0x12, 0x20, 0.85),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_kind_uses_fallback_color() {
		let kind = EntityKind::Other("unknown_future_kind".into());
		assert_eq!(kind_color(&kind), FALLBACK_COLOR);
		assert_eq!(minimap_color(&kind), FALLBACK_COLOR);
		assert_eq!(kind_style(&kind).diameter, 60.0);
	}

	#[test]
	fn kind_sizes_descend_from_board_to_attachment() {
		let sizes: Vec<f64> = [
			EntityKind::Board,
			EntityKind::List,
			EntityKind::Card,
			EntityKind::Member,
			EntityKind::Attachment,
		]
		.iter()
		.map(|k| kind_style(k).diameter)
		.collect();
		assert!(sizes.windows(2).all(|w| w[0] > w[1]), "{sizes:?}");
	}

	#[test]
	fn only_updated_by_is_dashed() {
		assert_eq!(relation_style(&RelationKind::UpdatedBy).dash, Some((4.0, 2.0)));
		assert_eq!(relation_style(&RelationKind::Contains).dash, None);
		assert_eq!(relation_style(&RelationKind::Other("x".into())).color, FALLBACK_COLOR);
	}

	#[test]
	fn hex_parsing() {
		assert_eq!(Color::from_hex("#0079bf"), Some(Color::rgb(0, 0x79, 0xbf)));
		assert_eq!(Color::from_hex("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(Color::from_hex("0079bf"), None);
		assert_eq!(Color::from_hex("#zzzzzz"), None);
		assert_eq!(Color::rgb(0xdf, 0xe1, 0xe6).to_css(), "#dfe1e6");
		assert_eq!(Color::rgba(0, 0, 0, 0.7).to_css(), "rgba(0, 0, 0, 0.7)");
	}
}
