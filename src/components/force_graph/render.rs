//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background and dot grid (screen space)
//! 2. Connectors, arrowheads and captions (world space)
//! 3. Plain nodes, then the selected node on top (world space)
//! 4. Minimap overlay (screen space)

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{Emphasis, ForceGraphState, NodeInfo};
use super::theme::{Theme, minimap_color};

fn ease_out(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);
	let positions = state.positions();

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme, &positions);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.minimap.enabled {
		draw_minimap(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let gap = bg.dot_gap * state.transform.k;
	if gap < 4.0 {
		return;
	}
	let (ox, oy) = (
		state.transform.x.rem_euclid(gap),
		state.transform.y.rem_euclid(gap),
	);
	ctx.set_fill_style_str(&bg.dot_color.to_css());
	let size = bg.dot_size * state.transform.k.max(0.5);
	let mut y = oy;
	while y < state.height {
		let mut x = ox;
		while x < state.width {
			ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
			x += gap;
		}
		y += gap;
	}
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let radii: HashMap<DefaultNodeIdx, f64> = {
		let mut out = HashMap::new();
		state.graph.visit_nodes(|node| {
			out.insert(node.index(), node.data.user_data.radius());
		});
		out
	};

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		let r1 = radii.get(&edge.source).copied().unwrap_or(0.0);
		let r2 = radii.get(&edge.target).copied().unwrap_or(0.0);
		if dist <= r1 + r2 + scale.arrow_size {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = (x1 + ux * r1, y1 + uy * r1);
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);

		let color = edge.style.color.to_css();
		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(edge.style.width);
		match edge.style.dash {
			Some((dash, gap)) => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
			}
			None => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(back_x, back_y);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);
		ctx.set_fill_style_str(&color);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(label) = edge.label.as_deref().filter(|_| scale.show_edge_labels) {
			draw_edge_label(ctx, scale, theme, label, (sx + back_x) / 2.0, (sy + back_y) / 2.0);
		}
	}
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	label: &str,
	x: f64,
	y: f64,
) {
	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let width = ctx
		.measure_text(label)
		.map(|m| m.width())
		.unwrap_or(label.len() as f64 * 5.0);
	let (pad_x, height) = (4.0, 14.0);
	ctx.set_fill_style_str(&theme.edge_label_background.to_css());
	ctx.fill_rect(
		x - width / 2.0 - pad_x,
		y - height / 2.0,
		width + pad_x * 2.0,
		height,
	);
	ctx.set_fill_style_str(&theme.edge_label.to_css());
	let _ = ctx.fill_text(label, x, y);
}

/// Node indices in paint order, taken from the style map: plain nodes first,
/// then the selected node so it is drawn on top.
fn paint_order(state: &ForceGraphState) -> Vec<(DefaultNodeIdx, Emphasis)> {
	let styles = state.style_map();
	let mut order = Vec::new();
	state.graph.visit_nodes(|node| {
		let emphasis = styles
			.get(&node.data.user_data.id)
			.copied()
			.unwrap_or(Emphasis::Plain);
		order.push((node.index(), emphasis));
	});
	order.sort_by_key(|&(_, emphasis)| emphasis == Emphasis::Selected);
	order
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let mut nodes = HashMap::new();
	state.graph.visit_nodes(|node| {
		nodes.insert(
			node.index(),
			(node.x() as f64, node.y() as f64, node.data.user_data.clone()),
		);
	});

	for (idx, emphasis) in paint_order(state) {
		let Some((x, y, info)) = nodes.get(&idx) else {
			continue;
		};
		match emphasis {
			Emphasis::Plain => {
				let hover = state.hover.intensity(idx);
				draw_node(ctx, scale, theme, info, *x, *y, 1.0, hover);
			}
			Emphasis::Selected => draw_selected_node(state, ctx, scale, theme, info, *x, *y),
		}
	}
}

fn draw_selected_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	info: &NodeInfo,
	x: f64,
	y: f64,
) {
	let style = &theme.selection;
	let pulse = state
		.selection
		.pulse_progress(state.clock, style.pulse_duration);
	let grow = pulse
		.map(|t| 1.0 + style.pulse_scale * (PI * ease_out(t)).sin())
		.unwrap_or(1.0);
	let radius = info.radius() * grow;

	// Soft glow behind the node.
	let glow_outer = radius + style.glow_radius;
	if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius, x, y, glow_outer) {
		let _ = gradient.add_color_stop(
			0.0,
			&style.outline.with_alpha(style.glow_alpha).to_css(),
		);
		let _ = gradient.add_color_stop(1.0, &style.outline.with_alpha(0.0).to_css());
		ctx.begin_path();
		let _ = ctx.arc(x, y, glow_outer, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}

	draw_node(ctx, scale, theme, info, x, y, grow, 0.0);

	ctx.begin_path();
	let _ = ctx.arc(
		x,
		y,
		radius + scale.ring_offset + style.outline_width / 2.0,
		0.0,
		2.0 * PI,
	);
	ctx.set_stroke_style_str(&style.outline.to_css());
	ctx.set_line_width(style.outline_width);
	ctx.stroke();

	// Expanding ring while the pulse plays.
	if let Some(t) = pulse {
		let eased = ease_out(t);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + style.glow_radius * eased, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&style.outline.with_alpha(0.6 * (1.0 - eased)).to_css());
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	info: &NodeInfo,
	x: f64,
	y: f64,
	grow: f64,
	hover: f64,
) {
	let style = &info.style;
	let radius = info.radius() * grow;

	let gradient = ctx.create_linear_gradient(x - radius, y - radius, x + radius, y + radius);
	let _ = gradient.add_color_stop(0.0, &style.fill.0.to_css());
	let _ = gradient.add_color_stop(1.0, &style.fill.1.to_css());
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();

	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(2.0);
	ctx.stroke();

	if hover > 0.01 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.hover_ring.with_alpha(0.6 * hover).to_css());
		ctx.set_line_width(1.5);
		ctx.stroke();
	}

	draw_node_label(ctx, scale, info, x, y, radius);
}

/// Centred label, word-wrapped to fit inside the circle.
fn draw_node_label(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	info: &NodeInfo,
	x: f64,
	y: f64,
	radius: f64,
) {
	let style = &info.style;
	ctx.set_font(&scale.label_font(style.font_size, style.font_weight));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&style.text.to_css());

	let max_width = radius * 1.6;
	let measure = |s: &str| {
		ctx.measure_text(s)
			.map(|m| m.width())
			.unwrap_or(s.len() as f64 * style.font_size * 0.6)
	};
	let mut lines: Vec<String> = Vec::new();
	for word in info.label.split_whitespace() {
		match lines.last_mut() {
			Some(line) if measure(&format!("{line} {word}")) <= max_width => {
				line.push(' ');
				line.push_str(word);
			}
			_ => lines.push(word.to_string()),
		}
	}

	let line_height = scale.label_font_px(style.font_size) * 1.15;
	let top = y - line_height * (lines.len() as f64 - 1.0) / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x, top + line_height * i as f64);
	}
}

fn draw_minimap(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.minimap;
	let Some(bounds) = state.bounds() else {
		return;
	};
	let (mw, mh) = (style.width, style.height);
	let (left, top) = (
		state.width - mw - style.margin,
		state.height - mh - style.margin,
	);
	if left < 0.0 || top < 0.0 {
		return;
	}

	// Fit the union of the graph and the current viewport.
	let (vx0, vy0) = state.screen_to_graph(0.0, 0.0);
	let (vx1, vy1) = state.screen_to_graph(state.width, state.height);
	let (wx0, wy0) = (bounds.min_x.min(vx0), bounds.min_y.min(vy0));
	let (wx1, wy1) = (bounds.max_x.max(vx1), bounds.max_y.max(vy1));
	let s = (mw / (wx1 - wx0).max(1.0)).min(mh / (wy1 - wy0).max(1.0));
	let (ox, oy) = (
		left + (mw - (wx1 - wx0) * s) / 2.0,
		top + (mh - (wy1 - wy0) * s) / 2.0,
	);
	let to_map = |gx: f64, gy: f64| (ox + (gx - wx0) * s, oy + (gy - wy0) * s);

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(left, top, mw, mh);

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (mx, my) = to_map(node.x() as f64, node.y() as f64);
		ctx.begin_path();
		let _ = ctx.arc(mx, my, (info.radius() * s).max(1.5), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&minimap_color(&info.kind).to_css());
		ctx.fill();
	});

	let (rx0, ry0) = to_map(vx0, vy0);
	let (rx1, ry1) = to_map(vx1, vy1);
	let (rx0, ry0) = (rx0.clamp(left, left + mw), ry0.clamp(top, top + mh));
	let (rx1, ry1) = (rx1.clamp(left, left + mw), ry1.clamp(top, top + mh));

	ctx.set_fill_style_str(&style.mask.to_css());
	ctx.fill_rect(left, top, mw, ry0 - top);
	ctx.fill_rect(left, ry1, mw, top + mh - ry1);
	ctx.fill_rect(left, ry0, rx0 - left, ry1 - ry0);
	ctx.fill_rect(rx1, ry0, left + mw - rx1, ry1 - ry0);

	ctx.set_stroke_style_str(&style.viewport_border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(rx0, ry0, rx1 - rx0, ry1 - ry0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dataset::Dataset;

	const BOARD: &str = "trello:board:689ce1b0c9307ea4cb627687";
	const MEMBER: &str = "trello:member:689f817644d49c78f58c78a8";

	fn state() -> ForceGraphState {
		ForceGraphState::new(Dataset::embedded().unwrap().graph(), 800.0, 600.0)
	}

	#[test]
	fn nothing_selected_paints_every_node_plain() {
		let order = paint_order(&state());
		assert_eq!(order.len(), 10);
		assert!(order.iter().all(|&(_, e)| e == Emphasis::Plain));
	}

	#[test]
	fn selected_node_is_painted_last() {
		let mut state = state();
		state.select_node(BOARD);
		state.select_node(MEMBER);
		let order = paint_order(&state);
		let selected: Vec<_> = order
			.iter()
			.filter(|&&(_, e)| e == Emphasis::Selected)
			.collect();
		assert_eq!(selected.len(), 1);
		let &(last, emphasis) = order.last().unwrap();
		assert_eq!(emphasis, Emphasis::Selected);
		assert_eq!(state.node_id(last), Some(MEMBER));
	}
}
