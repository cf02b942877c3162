//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for selection, node dragging, panning, and zooming. An animation
//! loop runs via `requestAnimationFrame`, advancing the layout simulation and
//! redrawing each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::GraphData;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Canvas size: the viewport when fullscreen, otherwise explicit dimensions or the parent's.
fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let window = web_sys::window();
		let dim = |v: Option<JsValue>| v.and_then(|v| v.as_f64());
		return (
			dim(window.as_ref().and_then(|w| w.inner_width().ok())).unwrap_or(800.0),
			dim(window.as_ref().and_then(|w| w.inner_height().ok())).unwrap_or(600.0),
		);
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Bring the simulation's selection in line with the externally owned signal.
fn sync_selection(state: &mut ForceGraphState, wanted: Option<&str>) -> Option<Option<String>> {
	match wanted {
		Some(id) if state.selected() != Some(id) => {
			if state.select_node(id) {
				None
			} else {
				// Rejected id: report the selection that is actually in effect.
				Some(state.selected().map(str::to_string))
			}
		}
		Some(_) => None,
		None => {
			state.clear_selection();
			None
		}
	}
}

/// Renders an interactive entity graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. `selected` holds the id of
/// the selected entity: clicking a node writes its id, clicking empty canvas
/// writes `None`, and external writes (e.g. closing a detail panel) restyle
/// the canvas to match. The component sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport.
#[component]
pub fn ForceGraphCanvas(
	/// Nodes and links to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Id of the selected entity, shared with the rest of the view.
	selected: RwSignal<Option<String>>,
	/// Fill the viewport instead of the parent element.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = measure(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("graph: canvas 2d context unavailable");
			return;
		};

		let data = data.get();
		let scale = ScaleConfig::default();
		let mut state = ForceGraphState::new(&data, w, h);
		state.fit_view(&scale.zoom);
		sync_selection(&mut state, selected.get_untracked().as_deref());
		info!(
			"graph: mounted {} nodes, {} edges at {}x{}",
			data.nodes.len(),
			state.edges().len(),
			w,
			h
		);

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale,
			theme: Theme::default(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				c.state.settle_fit(&c.scale.zoom);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_sync = context.clone();
	Effect::new(move |_| {
		let wanted = selected.get();
		let correction = context_sync
			.borrow_mut()
			.as_mut()
			.and_then(|c| sync_selection(&mut c.state, wanted.as_deref()));
		if let Some(actual) = correction {
			selected.set(actual);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				c.state.drag.active = true;
				c.state.drag.moved = false;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.moved = false;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let tolerance = c.scale.click_tolerance;
			if c.state.drag.active {
				let (dx, dy) = (x - c.state.drag.start_x, y - c.state.drag.start_y);
				if !c.state.drag.moved && dx.hypot(dy) > tolerance {
					c.state.drag.moved = true;
					c.state.auto_fit = false;
				}
				if let (Some(idx), true) = (c.state.drag.node_idx, c.state.drag.moved) {
					let k = c.state.transform.k;
					let (nx, ny) = (
						c.state.drag.node_start_x + (dx / k) as f32,
						c.state.drag.node_start_y + (dy / k) as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				let (dx, dy) = (x - c.state.pan.start_x, y - c.state.pan.start_y);
				if !c.state.pan.moved && dx.hypot(dy) > tolerance {
					c.state.pan.moved = true;
				}
				if c.state.pan.moved {
					c.state.auto_fit = false;
					c.state.transform.x = c.state.pan.transform_start_x + dx;
					c.state.transform.y = c.state.pan.transform_start_y + dy;
				}
			} else {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				c.state.set_hover(hovered);
				let cursor = if hovered.is_some() { "pointer" } else { "grab" };
				let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active && !c.state.drag.moved {
				let id = c
					.state
					.drag
					.node_idx
					.and_then(|idx| c.state.node_id(idx))
					.map(str::to_string);
				if let Some(id) = id {
					if c.state.select_node(&id) {
						clicked = Some(Some(id));
					}
				}
			} else if c.state.pan.active && !c.state.pan.moved {
				c.state.clear_selection();
				clicked = Some(None);
			}
			c.state.drag = Default::default();
			c.state.pan = Default::default();
		}
		if let Some(value) = clicked {
			selected.set(value);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag = Default::default();
			c.state.pan = Default::default();
			c.state.set_hover(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let step = c.scale.zoom.wheel_step;
			let factor = if ev.delta_y() > 0.0 { 1.0 / step } else { step };
			c.state.zoom_at(factor, x, y, &c.scale.zoom);
		}
	};

	let control = move |action: fn(&mut GraphContext)| {
		let context = context.clone();
		move |_: MouseEvent| {
			if let Some(ref mut c) = *context.borrow_mut() {
				action(c);
			}
		}
	};
	let zoom_in = control(|c| {
		let step = c.scale.zoom.button_step;
		c.state.zoom_center(step, &c.scale.zoom);
	});
	let zoom_out = control(|c| {
		let step = c.scale.zoom.button_step;
		c.state.zoom_center(1.0 / step, &c.scale.zoom);
	});
	let fit = control(|c| c.state.fit_view(&c.scale.zoom));

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		<div class="graph-controls">
			<button title="Zoom in" on:click=zoom_in>"+"</button>
			<button title="Zoom out" on:click=zoom_out>"−"</button>
			<button title="Fit view" on:click=fit>"⤢"</button>
		</div>
	}
}
