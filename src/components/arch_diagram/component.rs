use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::scene::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::state::{DiagramState, TOOLTIP_WIDTH, Tooltip};
use super::types::{DiagramData, DiagramNode};

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((CANVAS_WIDTH, CANVAS_HEIGHT))
}

fn pointer_position(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = canvas?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas rendering of an architecture diagram.
///
/// Clicking a node writes it to `selected`; writing `None` back closes the selection.
#[component]
pub fn ArchDiagramCanvas(
	#[prop(into)] data: Signal<DiagramData>,
	selected: RwSignal<Option<DiagramNode>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let tooltip = RwSignal::new(None::<Tooltip>);
	let state: Rc<RefCell<Option<DiagramState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d canvas context unavailable; diagram not rendered");
			return;
		};
		*state_init.borrow_mut() = Some(DiagramState::new(&data.get(), w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let last_frame = Rc::new(Cell::new(None::<f64>));
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last_frame.replace(Some(now)).map_or(0.0, |prev| (now - prev) / 1000.0);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt.clamp(0.0, 0.1));
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// The host clears the selection by writing `None`.
	let state_sel = state.clone();
	Effect::new(move |_| {
		if selected.get().is_none() {
			if let Some(ref mut s) = *state_sel.borrow_mut() {
				s.close();
			}
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
			s.move_pointer(x, y);
			tooltip.set(s.tooltip());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
		tooltip.set(None);
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref.get(), &ev) else {
			return;
		};
		let picked = state_click
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.node_at_position(x, y).and_then(|idx| s.select(idx)));
		if let Some(node) = picked {
			debug!("selected {}", node.id);
			selected.set(Some(node));
		}
	};

	view! {
		<div class="arch-diagram" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="arch-diagram-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				style:display="block"
				style:cursor=move || if tooltip.with(Option::is_some) { "pointer" } else { "default" }
			/>
			{move || {
				tooltip
					.get()
					.map(|tip| {
						view! {
							<div
								class="diagram-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; max-width: {}px; pointer-events: none;",
									tip.x,
									tip.y,
									TOOLTIP_WIDTH,
								)
							>
								<h4 class="font-bold text-cyan-400 mb-1">{tip.title}</h4>
								<p class="text-gray-300 text-xs">{tip.description}</p>
							</div>
						}
					})
			}}
		</div>
	}
}
