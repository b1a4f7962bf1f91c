use leptos::prelude::*;
use log::error;

use super::layout::Diagram;
use super::sequencer::{Action, Effect, HighlightState};

/// Single writer for the highlight state. Applies the reducer and performs
/// the timer effects it asks for. `Copy`, so it can be moved into any
/// event handler or timer callback.
#[derive(Clone, Copy)]
pub struct Controller {
	diagram: &'static Diagram,
	state: RwSignal<HighlightState>,
	timer: StoredValue<Option<TimeoutHandle>>,
}

impl Controller {
	pub fn new(diagram: &'static Diagram) -> Self {
		Self {
			diagram,
			state: RwSignal::new(HighlightState::default()),
			timer: StoredValue::new(None),
		}
	}

	pub fn diagram(&self) -> &'static Diagram {
		self.diagram
	}

	pub fn state(&self) -> ReadSignal<HighlightState> {
		self.state.read_only()
	}

	pub fn dispatch(self, action: Action) {
		let effect = self
			.state
			.try_update(|state| {
				let (next, effect) = state.reduce(self.diagram, action);
				*state = next;
				effect
			})
			.flatten();

		match effect {
			Some(Effect::Schedule { run, after }) => {
				match set_timeout_with_handle(move || self.dispatch(Action::Advance { run }), after) {
					Ok(handle) => self.timer.set_value(Some(handle)),
					Err(e) => {
						error!("Failed to schedule auto-play step: {e:?}");
						self.dispatch(Action::Stop);
					}
				}
			}
			Some(Effect::Cancel) => {
				if let Some(handle) = self.timer.try_update_value(Option::take).flatten() {
					handle.clear();
				}
			}
			None => {}
		}
	}
}
