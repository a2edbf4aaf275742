use std::f64::consts::FRAC_PI_2;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use super::geometry::{Path, Segment};
use super::scene::{EdgeVisual, GlyphPart, LABEL_FONT_PX, LABEL_LINE_HEIGHT, NodeVisual, entrance_alpha};
use super::state::{DiagramState, EdgeEmphasis};
use super::types::LabelSide;

const BACKGROUND: &str = "#111827";
const LAYER_STROKE: &str = "#4b5563";
const LAYER_LABEL: &str = "#9ca3af";
const EDGE_STROKE: &str = "#999";
const EDGE_STROKE_HOT: &str = "#38bdf8";
const EDGE_LABEL: &str = "#cbd5e1";
const EDGE_LABEL_HOT: &str = "#e0f2fe";
const BODY_FILL: &str = "#1f2937";
const BODY_STROKE: &str = "#9ca3af";
const TITLE_FILL: &str = "#f3f4f6";
const SUBTITLE_FILL: &str = "#9ca3af";
const GLOW_BLUR: f64 = 7.0;
const ARROW_SIZE: f64 = 10.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<(f64, f64)>) {
	let pattern = match dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&pattern);
}

fn trace(ctx: &CanvasRenderingContext2d, path: &Path) {
	ctx.begin_path();
	for seg in &path.segments {
		match *seg {
			Segment::MoveTo(p) => ctx.move_to(p.x, p.y),
			Segment::LineTo(p) => ctx.line_to(p.x, p.y),
			Segment::CubicTo(c1, c2, p) => ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
			Segment::Close => ctx.close_path(),
		}
	}
}

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_layers(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_layers(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	for layer in &state.scene.layers {
		ctx.set_stroke_style_str(LAYER_STROKE);
		ctx.set_line_width(2.0);
		set_dash(ctx, Some((8.0, 8.0)));
		ctx.stroke_rect(layer.x, layer.y, layer.width, layer.height);
		set_dash(ctx, None);

		ctx.save();
		ctx.set_fill_style_str(LAYER_LABEL);
		ctx.set_font("bold 14px Inter, sans-serif");
		ctx.set_text_baseline("middle");
		let _ = ctx.translate(layer.label_anchor.x, layer.label_anchor.y);
		match layer.label_side {
			LabelSide::Top => ctx.set_text_align("start"),
			LabelSide::Left => {
				let _ = ctx.rotate(FRAC_PI_2);
				ctx.set_text_align("end");
			}
		}
		let _ = ctx.fill_text(&layer.label, 0.0, 0.0);
		ctx.restore();
	}
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	for (i, edge) in state.scene.edges.iter().enumerate() {
		if edge.path.is_empty() {
			continue;
		}
		let fade = ease_out_cubic(entrance_alpha(state.elapsed_ms, edge.delay_ms));
		let alpha = fade * state.edge_opacity(i);
		if alpha <= 0.0 {
			continue;
		}
		let hot = state.edge_emphasis(i) == EdgeEmphasis::Emphasized;
		ctx.save();
		ctx.set_global_alpha(alpha);
		if hot {
			ctx.set_shadow_color(EDGE_STROKE_HOT);
			ctx.set_shadow_blur(GLOW_BLUR);
		}
		draw_edge(edge, hot, ctx);
		ctx.restore();
	}
}

fn draw_edge(edge: &EdgeVisual, hot: bool, ctx: &CanvasRenderingContext2d) {
	let stroke = if hot { EDGE_STROKE_HOT } else { EDGE_STROKE };
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(1.5);
	trace(ctx, &edge.path);
	ctx.stroke();

	if let Some((from, tip)) = edge.path.end_tangent() {
		let (dx, dy) = (tip.x - from.x, tip.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		let (ux, uy) = (dx / dist, dy / dist);
		let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.set_fill_style_str(stroke);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}

	let Some(label) = &edge.label else {
		return;
	};
	ctx.set_shadow_blur(0.0);
	ctx.set_font(&format!("{LABEL_FONT_PX}px Inter, sans-serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_line_width(3.0);
	ctx.set_stroke_style_str(BACKGROUND);
	ctx.set_fill_style_str(if hot { EDGE_LABEL_HOT } else { EDGE_LABEL });
	for (n, line) in label.lines.iter().enumerate() {
		let y = label.anchor.y + n as f64 * LABEL_LINE_HEIGHT;
		let _ = ctx.stroke_text(line, label.anchor.x, y);
		let _ = ctx.fill_text(line, label.anchor.x, y);
	}
}

fn draw_nodes(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	for (i, node) in state.scene.nodes.iter().enumerate() {
		let fade = ease_out_cubic(entrance_alpha(state.elapsed_ms, node.delay_ms));
		let alpha = fade * state.node_opacity(i);
		if alpha <= 0.0 {
			continue;
		}
		ctx.save();
		ctx.set_global_alpha(alpha);
		let center = node.center();
		let _ = ctx.translate(center.x, center.y);
		if state.is_glowing(i) {
			ctx.set_shadow_color(node.color);
			ctx.set_shadow_blur(GLOW_BLUR);
		}
		draw_node(node, ctx);
		ctx.restore();
	}
}

fn draw_node(node: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(node.color);
	ctx.set_line_width(2.0);
	set_dash(ctx, node.ring_dashed.then_some((6.0, 3.0)));
	trace(ctx, &node.ring);
	ctx.stroke();
	set_dash(ctx, None);

	for part in &node.glyph {
		match part {
			GlyphPart::Body(path) => {
				trace(ctx, path);
				ctx.set_fill_style_str(BODY_FILL);
				ctx.fill();
				ctx.set_stroke_style_str(BODY_STROKE);
				ctx.set_line_width(1.5);
				ctx.stroke();
			}
			GlyphPart::Icon { svg, scale } => {
				let Ok(icon) = Path2d::new_with_path_string(svg) else {
					continue;
				};
				ctx.save();
				let _ = ctx.scale(*scale, *scale);
				ctx.set_fill_style_str(node.color);
				ctx.fill_with_path_2d(&icon);
				ctx.restore();
			}
		}
	}

	ctx.set_shadow_blur(0.0);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	let (title_y, subtitle_y) = node.title_offsets();
	ctx.set_font("500 12px Inter, sans-serif");
	ctx.set_fill_style_str(TITLE_FILL);
	let _ = ctx.fill_text(&node.node.id, 0.0, title_y);
	if let (Some(subtitle), Some(y)) = (&node.node.subtitle, subtitle_y) {
		ctx.set_font("9px Inter, sans-serif");
		ctx.set_fill_style_str(SUBTITLE_FILL);
		let _ = ctx.fill_text(subtitle, 0.0, y);
	}
}
