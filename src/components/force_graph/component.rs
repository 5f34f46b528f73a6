//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates the canvas and one toggle button per custom-node
//! catalog entry, translates mouse and wheel input into [`GraphEvent`]s, and
//! runs an animation loop via `requestAnimationFrame` that ticks the layout
//! and redraws each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::controller::{Effect as GraphEffect, GraphEvent, InteractionController};
use super::render;
use super::state::{DragState, PanState, PointerState};
use super::theme::Theme;
use super::types::GraphDescription;

/// Assumed frame length for the layout tick.
const FRAME_SECONDS: f64 = 0.016;

/// Graph session plus the canvas it draws on and what the pointer holds.
struct GraphContext {
	controller: InteractionController,
	ctx: CanvasRenderingContext2d,
	pointer: PointerState,
}

/// Label width in world units, measured with the label font.
fn label_measure<'a>(
	ctx: &'a CanvasRenderingContext2d,
	controller: &InteractionController,
) -> impl Fn(&str) -> f64 + 'a {
	ctx.set_font(&controller.view().config().node.label_font());
	move |text: &str| ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Viewport size below the header.
fn viewport_size(window: &Window, inset: f64) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, (h - inset).max(0.0)))
}

/// Mouse position relative to the canvas.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn open_in_new_tab(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(e) = window.open_with_url_and_target(url, "_blank") {
		warn!("Could not open {url}: {e:?}");
	}
}

/// Renders an interactive force-directed graph with custom-node toggles.
///
/// The canvas sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport below the header and resize with
/// the window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphDescription>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
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
		let config = GraphConfig::default();
		let inset = config.header_inset;

		let (w, h) = if fullscreen {
			viewport_size(&window, inset).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("Canvas 2d context unavailable, graph not rendered");
			return;
		};

		*context_init.borrow_mut() = Some(GraphContext {
			controller: InteractionController::new(&data.get(), config, Theme::default(), w, h),
			ctx,
			pointer: PointerState::Idle,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().and_then(|win| viewport_size(&win, inset))
				else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.controller.view_mut().camera.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.controller.dispatch(GraphEvent::Tick { dt: FRAME_SECONDS });
				render::render(c.controller.view(), &c.ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = context_md.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};

		let view = c.controller.view();
		let measure = label_measure(&c.ctx, &c.controller);
		let label = view.label_at(x, y, measure).map(str::to_owned);
		let node = view.node_at(x, y).map(str::to_owned);

		c.pointer = if let Some(id) = label {
			PointerState::Label(id)
		} else if let Some(id) = node {
			let (gx, gy) = view.camera.screen_to_graph(x, y);
			let Some((nx, ny)) = view.position(&id) else {
				return;
			};
			c.controller.dispatch(GraphEvent::DragStart {
				id: id.clone(),
				x: nx,
				y: ny,
			});
			PointerState::Node(DragState {
				node_id: id,
				start_x: x,
				start_y: y,
				offset_x: nx - gx,
				offset_y: ny - gy,
				moved: false,
			})
		} else {
			let t = view.camera.transform;
			PointerState::Pan(PanState {
				start_x: x,
				start_y: y,
				transform_start_x: t.x,
				transform_start_y: t.y,
			})
		};
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = context_mm.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};

		match &mut c.pointer {
			PointerState::Node(drag) => {
				let threshold = c.controller.view().config().drag_threshold;
				let (dx, dy) = (x - drag.start_x, y - drag.start_y);
				if !drag.moved && (dx * dx + dy * dy).sqrt() > threshold {
					drag.moved = true;
				}
				if drag.moved {
					let (gx, gy) = c.controller.view().camera.screen_to_graph(x, y);
					let event = GraphEvent::Drag {
						id: drag.node_id.clone(),
						x: gx + drag.offset_x,
						y: gy + drag.offset_y,
					};
					c.controller.dispatch(event);
				}
			}
			PointerState::Pan(pan) => {
				let (px, py) = (
					pan.transform_start_x + (x - pan.start_x),
					pan.transform_start_y + (y - pan.start_y),
				);
				c.controller.view_mut().camera.pan_to(px, py);
			}
			PointerState::Label(_) => {}
			PointerState::Idle => {
				let measure = label_measure(&c.ctx, &c.controller);
				let cursor = c.controller.view().cursor_at(x, y, measure);
				if let Some(canvas) = canvas_ref.get() {
					let canvas: HtmlCanvasElement = canvas.into();
					let _ = web_sys::HtmlElement::style(&canvas)
						.set_property("cursor", cursor.as_css());
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = canvas_point(canvas_ref, &ev);
		let effect = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			match std::mem::take(&mut c.pointer) {
				PointerState::Node(drag) => {
					c.controller.dispatch(GraphEvent::DragEnd {
						id: drag.node_id.clone(),
					});
					if !drag.moved {
						c.controller.dispatch(GraphEvent::NodeClick { id: drag.node_id });
					}
					None
				}
				PointerState::Label(id) => {
					let released_on = point.and_then(|(x, y)| {
						c.controller
							.view()
							.label_at(x, y, label_measure(&c.ctx, &c.controller))
							.map(str::to_owned)
					});
					if released_on.as_deref() == Some(id.as_str()) {
						c.controller.dispatch(GraphEvent::LabelClick { id })
					} else {
						None
					}
				}
				PointerState::Pan(_) | PointerState::Idle => None,
			}
		};
		if let Some(GraphEffect::OpenLink(url)) = effect {
			open_in_new_tab(&url);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let PointerState::Node(drag) = std::mem::take(&mut c.pointer) {
				c.controller.dispatch(GraphEvent::DragEnd { id: drag.node_id });
			}
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let zoom = c.controller.view().config().zoom.clone();
			let factor = if ev.delta_y() > 0.0 {
				1.0 / zoom.wheel_step
			} else {
				zoom.wheel_step
			};
			c.controller.view_mut().camera.zoom_at(x, y, factor, &zoom);
		}
	};

	let buttons = data.with_untracked(|d| {
		d.custom_nodes
			.names()
			.map(String::from)
			.collect::<Vec<_>>()
	});
	let buttons = buttons
		.into_iter()
		.map(|name| {
			let context_bt = context.clone();
			let label = name.clone();
			let on_click = move |_: MouseEvent| {
				if let Some(ref mut c) = *context_bt.borrow_mut() {
					c.controller.dispatch(GraphEvent::ToggleCustomNode { name: name.clone() });
				}
			};
			view! { <button on:click=on_click>{label}</button> }
		})
		.collect_view();

	view! {
		<div id="buttons" class="custom-node-buttons">{buttons}</div>
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block;"
		/>
	}
}
