//! Canvas rendering for the force graph.
//!
//! Draws in three passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Link lines (world space)
//! 3. Node circles, then labels on top

use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::theme::Theme;
use super::view::ViewBinder;

/// Renders the complete scene to the canvas.
pub fn render(view: &ViewBinder, ctx: &CanvasRenderingContext2d) {
	let theme = view.theme();
	let camera = &view.camera;
	let positions = view.positions();

	draw_background(ctx, theme, camera.width, camera.height);

	ctx.save();
	let _ = ctx.translate(camera.transform.x, camera.transform.y);
	let _ = ctx.scale(camera.transform.k, camera.transform.k);

	draw_links(view, ctx, &positions);
	draw_nodes(view, ctx, &positions);
	draw_labels(view, ctx, &positions);

	ctx.restore();
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
	let bg = &theme.background;
	if bg.use_gradient {
		if let Ok(gradient) = ctx.create_radial_gradient(
			width / 2.0,
			height / 2.0,
			0.0,
			width / 2.0,
			height / 2.0,
			width.max(height) * 0.8,
		) {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill_rect(0.0, 0.0, width, height);
			return;
		}
	}
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_links(
	view: &ViewBinder,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<String, (f64, f64)>,
) {
	ctx.set_line_width(view.theme().link.width);
	for visual in view.links() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (
			positions.get(&visual.link.source),
			positions.get(&visual.link.target),
		) else {
			continue;
		};
		ctx.set_stroke_style_str(&visual.stroke.to_css());
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(
	view: &ViewBinder,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<String, (f64, f64)>,
) {
	let radius = view.config().node.radius;
	for visual in view.nodes() {
		let Some(&(x, y)) = positions.get(&visual.id) else {
			continue;
		};
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&visual.style.fill.to_css());
		ctx.fill();
	}
}

fn draw_labels(
	view: &ViewBinder,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<String, (f64, f64)>,
) {
	let node = &view.config().node;
	ctx.set_font(&node.label_font());
	ctx.set_fill_style_str(&view.theme().label.to_css());
	for visual in view.nodes() {
		let Some(&(x, y)) = positions.get(&visual.id) else {
			continue;
		};
		let _ = ctx.fill_text(&visual.id, x + node.label_offset.0, y + node.label_offset.1);
	}
}
