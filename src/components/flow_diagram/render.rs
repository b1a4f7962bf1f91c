use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::routing::Path;
use super::sequencer::Emphasis;
use super::state::DiagramView;
use super::types::{Connector, Node};

const BACKGROUND: &str = "#050814";
const GRID: &str = "rgba(100, 116, 139, 0.03)";
const GRID_STEP: f64 = 40.0;
const CORNER: f64 = 8.0;
/// Distance the dash pattern travels in one flow cycle.
const DASH_TRAVEL: f64 = 30.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

pub fn render(view: &DiagramView, ctx: &CanvasRenderingContext2d) {
	let canvas = view.diagram.canvas;
	let r = view.pixel_ratio;
	let _ = ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);

	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, canvas.width, canvas.height);
	draw_grid(view, ctx);
	draw_connectors(view, ctx);
	draw_nodes(view, ctx);
}

fn draw_grid(view: &DiagramView, ctx: &CanvasRenderingContext2d) {
	let canvas = view.diagram.canvas;
	ctx.set_stroke_style_str(GRID);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	let mut x = 0.0;
	while x <= canvas.width {
		ctx.move_to(x, 0.0);
		ctx.line_to(x, canvas.height);
		x += GRID_STEP;
	}
	let mut y = 0.0;
	while y <= canvas.height {
		ctx.move_to(0.0, y);
		ctx.line_to(canvas.width, y);
		y += GRID_STEP;
	}
	ctx.stroke();
}

fn trace(ctx: &CanvasRenderingContext2d, path: &Path) {
	ctx.begin_path();
	for (i, p) in path.points.iter().enumerate() {
		if i == 0 {
			ctx.move_to(p.x, p.y);
		} else {
			ctx.line_to(p.x, p.y);
		}
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64, gap: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
}

fn draw_connectors(view: &DiagramView, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(view.highlight_t);
	let shown = view.shown();
	ctx.set_line_cap("round");
	ctx.set_line_join("round");

	for (conn, path) in view.diagram.routes() {
		let emphasis = shown.connector_emphasis(conn);
		let (width, alpha) = match emphasis {
			Emphasis::Highlighted => (lerp(2.5, 5.0, t), 0.85),
			Emphasis::Dimmed => (2.5, lerp(0.85, 0.25, t)),
			Emphasis::Normal => (2.5, 0.85),
		};
		let cycle = view
			.diagram
			.flow(&conn.flow)
			.map_or(2.0, |f| f.cycle_secs)
			.max(0.1);
		let dash_offset = -((view.flow_time / cycle) % 1.0) * DASH_TRAVEL;

		if emphasis == Emphasis::Highlighted && t > 0.01 {
			ctx.set_global_alpha(0.4 * t);
			ctx.set_stroke_style_str(&conn.color);
			ctx.set_line_width(8.0);
			if conn.dashed {
				set_dash(ctx, 6.0, 4.0);
			} else {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
			trace(ctx, path);
			ctx.stroke();
		}

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&conn.color);
		ctx.set_line_width(width);
		if conn.dashed {
			set_dash(ctx, 8.0, 6.0);
		} else {
			set_dash(ctx, 10.0, 5.0);
		}
		ctx.set_line_dash_offset(dash_offset);
		trace(ctx, path);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		draw_arrowhead(ctx, conn, path);
		ctx.set_global_alpha(1.0);
	}

	// Labels go on top of every line.
	for (conn, path) in view.diagram.routes() {
		let label_alpha = match shown.connector_emphasis(conn) {
			Emphasis::Highlighted => lerp(0.7, 1.0, t),
			_ => 0.7,
		};
		ctx.set_global_alpha(label_alpha);
		draw_label(ctx, conn, path);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, conn: &Connector, path: &Path) {
	let tip = path.end();
	let heading = path.end_heading();
	ctx.save();
	let _ = ctx.translate(tip.x, tip.y);
	let _ = ctx.rotate(heading);
	ctx.set_fill_style_str(&conn.color);
	ctx.begin_path();
	ctx.move_to(0.0, -4.0);
	ctx.line_to(8.0, 0.0);
	ctx.line_to(0.0, 4.0);
	ctx.close_path();
	ctx.fill();
	ctx.restore();
}

fn draw_label(ctx: &CanvasRenderingContext2d, conn: &Connector, path: &Path) {
	let at = path.label_anchor();
	rounded_rect(ctx, at.x - 50.0, at.y - 11.0, 100.0, 22.0, 11.0);
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.9)");
	ctx.fill();
	ctx.set_stroke_style_str(&conn.color);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(&conn.color);
	ctx.set_font("600 10px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&conn.label, at.x, at.y);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(view: &DiagramView, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(view.highlight_t);
	let shown = view.shown();

	for (idx, node) in view.diagram.nodes().iter().enumerate() {
		let emphasis = shown.node_emphasis(&node.id);
		let (alpha, scale) = match emphasis {
			Emphasis::Highlighted => (1.0, lerp(1.0, 1.03, t)),
			Emphasis::Dimmed => (lerp(1.0, 0.3, t), 1.0),
			Emphasis::Normal => (1.0, 1.0),
		};
		let hovered = view.hover == Some(idx);

		ctx.save();
		let b = node.bounds;
		let (cx, cy) = (b.x + b.width / 2.0, b.y + b.height / 2.0);
		let _ = ctx.translate(cx, cy);
		let _ = ctx.scale(scale, scale);
		let _ = ctx.translate(-cx, -cy);
		ctx.set_global_alpha(alpha);

		if emphasis == Emphasis::Highlighted && t > 0.01 {
			ctx.set_shadow_color(&node.category.rgba(0.3 * t));
			ctx.set_shadow_blur(25.0 * t);
		} else {
			ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
			ctx.set_shadow_blur(14.0);
			ctx.set_shadow_offset_y(6.0);
		}
		rounded_rect(ctx, b.x, b.y, b.width, b.height, CORNER);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill();
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_y(0.0);
		ctx.set_shadow_color("transparent");

		ctx.set_fill_style_str(&node.category.rgba(if hovered { 0.12 } else { 0.05 }));
		ctx.fill();
		ctx.set_stroke_style_str(&node.category.color());
		ctx.set_line_width(2.0);
		ctx.stroke();

		draw_node_text(ctx, node);
		ctx.restore();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node_text(ctx: &CanvasRenderingContext2d, node: &Node) {
	let b = node.bounds;
	let (left, mut y) = (b.x + 12.0, b.y + 20.0);
	let accent = node.category.color();
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");

	ctx.set_fill_style_str(&accent);
	ctx.set_font("700 14px sans-serif");
	let _ = ctx.fill_text(&node.title, left, y);

	y += 14.0;
	ctx.set_fill_style_str("#94A3B8");
	ctx.set_font("600 9px sans-serif");
	let _ = ctx.fill_text(&node.subtitle.to_uppercase(), left, y);

	ctx.set_font("11px sans-serif");
	for bullet in &node.bullets {
		y += 14.0;
		ctx.set_global_alpha(ctx.global_alpha() * 0.6);
		ctx.set_fill_style_str(&accent);
		ctx.begin_path();
		let _ = ctx.arc(left + 2.0, y - 4.0, 1.5, 0.0, 2.0 * PI);
		ctx.fill();
		ctx.set_global_alpha(ctx.global_alpha() / 0.6);

		ctx.set_fill_style_str("#E2E8F0");
		let _ = ctx.fill_text(bullet, left + 10.0, y);
	}
}
