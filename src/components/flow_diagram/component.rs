use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::controller::Controller;
use super::render;
use super::sequencer::Action;
use super::state::DiagramView;
use super::types::Point;

/// Map a mouse event into diagram coordinates, undoing any CSS scaling.
fn diagram_point(canvas: &HtmlCanvasElement, ev: &MouseEvent, width: f64, height: f64) -> Point {
	let rect = canvas.get_bounding_client_rect();
	let (sx, sy) = (
		if rect.width() > 0.0 { width / rect.width() } else { 1.0 },
		if rect.height() > 0.0 { height / rect.height() } else { 1.0 },
	);
	Point::new(
		(ev.client_x() as f64 - rect.left()) * sx,
		(ev.client_y() as f64 - rect.top()) * sy,
	)
}

#[component]
pub fn FlowDiagramCanvas(controller: Controller) -> impl IntoView {
	let diagram = controller.diagram();
	let (width, height) = (diagram.canvas.width, diagram.canvas.height);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view_state: Rc<RefCell<Option<DiagramView>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let (view_init, animate_init) = (view_state.clone(), animate.clone());
	let highlight = controller.state();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let ratio = window.device_pixel_ratio().max(1.0);
		canvas.set_width((width * ratio) as u32);
		canvas.set_height((height * ratio) as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("Canvas 2d context unavailable");
			return;
		};
		*view_init.borrow_mut() = Some(DiagramView::new(diagram, ratio));

		let (view_anim, animate_inner) = (view_init.clone(), animate_init.clone());
		let last_frame = Rc::new(RefCell::new(None::<f64>));
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last_frame
				.borrow_mut()
				.replace(now)
				.map_or(0.016, |prev| ((now - prev) / 1000.0).clamp(0.0, 0.1));
			if let Some(ref mut v) = *view_anim.borrow_mut() {
				highlight.with_untracked(|s| v.observe(s));
				v.tick(dt);
				render::render(v, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let view_click = view_state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let p = diagram_point(&canvas, &ev, width, height);
		let hit = view_click
			.borrow()
			.as_ref()
			.and_then(|v| v.node_at_position(p));
		if let Some(idx) = hit {
			controller.dispatch(Action::ClickNode(diagram.nodes()[idx].id.clone()));
		}
	};

	let view_mm = view_state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let p = diagram_point(&canvas, &ev, width, height);
		if let Some(ref mut v) = *view_mm.borrow_mut() {
			let hovered = v.node_at_position(p);
			if v.set_hover(hovered) {
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", v.cursor());
			}
		}
	};

	let view_ml = view_state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut v) = *view_ml.borrow_mut() {
			v.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-diagram-canvas"
			on:click=on_click
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style=format!("display: block; width: {width}px; max-width: 100%; height: auto;")
		/>
	}
}

