use super::layout::Diagram;
use super::sequencer::HighlightState;
use super::types::Point;

/// Seconds for an emphasis change to settle.
const EASE_SECS: f64 = 0.2;

/// Per-canvas animation state. Owns nothing the sequencer owns; it only
/// remembers what is being drawn so emphasis can fade in and out.
pub struct DiagramView {
	pub diagram: &'static Diagram,
	/// Device pixels per diagram unit.
	pub pixel_ratio: f64,
	/// Seconds since the view started; drives the flowing dash offset.
	pub flow_time: f64,
	/// 0 = no emphasis, 1 = fully emphasised.
	pub highlight_t: f64,
	pub hover: Option<usize>,
	/// Highlight being drawn; lags the sequencer while fading out.
	shown: HighlightState,
	target_active: bool,
}

impl DiagramView {
	pub fn new(diagram: &'static Diagram, pixel_ratio: f64) -> Self {
		Self {
			diagram,
			pixel_ratio,
			flow_time: 0.0,
			highlight_t: 0.0,
			hover: None,
			shown: HighlightState::default(),
			target_active: false,
		}
	}

	pub fn shown(&self) -> &HighlightState {
		&self.shown
	}

	/// Sync with the latest sequencer snapshot.
	pub fn observe(&mut self, state: &HighlightState) {
		self.target_active = state.active().is_some();
		// Keep the last active snapshot on screen until it has faded out.
		if self.target_active && &self.shown != state {
			self.shown = state.clone();
		}
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let target = if self.target_active { 1.0 } else { 0.0 };
		let step = dt / EASE_SECS;
		self.highlight_t = if target > self.highlight_t {
			(self.highlight_t + step).min(target)
		} else {
			(self.highlight_t - step).max(target)
		};
		if !self.target_active && self.highlight_t == 0.0 {
			self.shown = HighlightState::default();
		}
	}

	pub fn node_at_position(&self, p: Point) -> Option<usize> {
		let node = self.diagram.node_at(p)?;
		self.diagram.nodes().iter().position(|n| n.id == node.id)
	}

	/// Returns true if the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hover == node {
			return false;
		}
		self.hover = node;
		true
	}

	/// CSS cursor for the canvas: a pointer over clickable nodes.
	pub fn cursor(&self) -> &'static str {
		if self.hover.is_some() { "pointer" } else { "default" }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_diagram::layout::builtin;
	use crate::components::flow_diagram::sequencer::Action;
	use crate::components::flow_diagram::types::FlowCategory;

	fn view() -> DiagramView {
		DiagramView::new(builtin().unwrap(), 1.0)
	}

	#[test]
	fn emphasis_eases_in_and_fades_out() {
		let mut view = view();
		let (active, _) = HighlightState::default().reduce(
			view.diagram,
			Action::SelectFlow(FlowCategory::new("sky")),
		);

		view.observe(&active);
		view.tick(0.1);
		assert!((view.highlight_t - 0.5).abs() < 1e-9);
		view.tick(0.5);
		assert_eq!(view.highlight_t, 1.0);

		view.observe(&HighlightState::default());
		view.tick(0.1);
		assert_eq!(view.shown(), &active);
		view.tick(0.5);
		assert_eq!(view.highlight_t, 0.0);
		assert_eq!(view.shown(), &HighlightState::default());
	}

	#[test]
	fn hover_tracks_node_under_pointer() {
		let mut view = view();
		let idx = view.node_at_position(Point::new(800.0, 150.0));
		assert_eq!(idx.map(|i| view.diagram.nodes()[i].id.as_str()), Some("host"));
		assert!(view.set_hover(idx));
		assert_eq!(view.cursor(), "pointer");
		assert!(!view.set_hover(idx));
		assert!(view.set_hover(None));
		assert_eq!(view.cursor(), "default");
	}

	#[test]
	fn empty_canvas_keeps_default_cursor() {
		let mut view = view();
		let miss = view.node_at_position(Point::new(5.0, 5.0));
		assert_eq!(miss, None);
		assert!(!view.set_hover(miss));
		assert_eq!(view.cursor(), "default");
	}
}
