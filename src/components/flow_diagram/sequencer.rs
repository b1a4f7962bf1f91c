//! Highlight state machine.
//!
//! [`HighlightState`] is an immutable snapshot; [`HighlightState::reduce`]
//! maps a snapshot and an [`Action`] to the next snapshot plus an optional
//! [`Effect`] for the caller to perform (arming or clearing the auto-play
//! timer). Time never enters the reducer, so tests step auto-play by feeding
//! `Advance` actions directly.

use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info};

use super::layout::Diagram;
use super::types::{Connector, FlowCategory};

/// Input to the reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
	/// Legend click on a flow category.
	SelectFlow(FlowCategory),
	/// Click on a node, by id.
	ClickNode(String),
	/// Start the timed walk through every category.
	PlayAll,
	/// Timer expiry for the auto-play run with this token.
	Advance {
		/// Token of the run that armed the timer.
		run: u64,
	},
	/// Abort a running auto-play.
	Stop,
}

/// Timer work requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
	/// Dispatch `Advance { run }` after `after` has elapsed.
	Schedule {
		/// Run token to echo back.
		run: u64,
		/// Delay before the step.
		after: Duration,
	},
	/// Drop the pending auto-play timer.
	Cancel,
}

/// Position of a running auto-play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoPlay {
	/// Token distinguishing this run from earlier, cancelled ones.
	pub run: u64,
	/// Index into the playback sequence.
	pub step: usize,
}

/// Coarse view of a [`HighlightState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode<'a> {
	/// Nothing highlighted.
	Idle,
	/// A category picked by the user.
	CategoryActive(&'a FlowCategory),
	/// Auto-play at the given step.
	AutoPlaying(usize),
}

/// How the presentation layer should draw a node or connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// No category active.
	Normal,
	/// Part of the active category.
	Highlighted,
	/// A category is active and this is not part of it.
	Dimmed,
}

/// Snapshot of what is highlighted. `Default` is the idle state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
	active: Option<FlowCategory>,
	highlighted: BTreeSet<String>,
	auto_play: Option<AutoPlay>,
	/// Number of auto-play runs started so far; the next run's token.
	runs: u64,
}

/// Union of the endpoint ids of every connector in `flow`.
pub fn involved_nodes(diagram: &Diagram, flow: &FlowCategory) -> BTreeSet<String> {
	diagram
		.connectors()
		.iter()
		.filter(|c| &c.flow == flow)
		.flat_map(|c| [c.from.clone(), c.to.clone()])
		.collect()
}

impl HighlightState {
	/// Active category, if any.
	pub fn active(&self) -> Option<&FlowCategory> {
		self.active.as_ref()
	}

	/// Ids of the nodes taking part in the active category.
	pub fn highlighted(&self) -> &BTreeSet<String> {
		&self.highlighted
	}

	/// Whether input is locked by a running auto-play.
	pub fn is_auto_playing(&self) -> bool {
		self.auto_play.is_some()
	}

	/// Running auto-play, if any.
	pub fn auto_play(&self) -> Option<AutoPlay> {
		self.auto_play
	}

	/// Current state-machine state.
	pub fn mode(&self) -> Mode<'_> {
		match (&self.auto_play, &self.active) {
			(Some(play), _) => Mode::AutoPlaying(play.step),
			(None, Some(flow)) => Mode::CategoryActive(flow),
			(None, None) => Mode::Idle,
		}
	}

	/// Emphasis for a node.
	pub fn node_emphasis(&self, node_id: &str) -> Emphasis {
		if self.highlighted.contains(node_id) {
			Emphasis::Highlighted
		} else if self.active.is_some() {
			Emphasis::Dimmed
		} else {
			Emphasis::Normal
		}
	}

	/// Emphasis for a connector.
	pub fn connector_emphasis(&self, connector: &Connector) -> Emphasis {
		match &self.active {
			Some(flow) if flow == &connector.flow => Emphasis::Highlighted,
			Some(_) => Emphasis::Dimmed,
			None => Emphasis::Normal,
		}
	}

	/// Next snapshot for `action`, plus the timer work it requires.
	pub fn reduce(&self, diagram: &Diagram, action: Action) -> (Self, Option<Effect>) {
		match (action, self.auto_play) {
			(Action::SelectFlow(_) | Action::ClickNode(_) | Action::PlayAll, Some(_)) => {
				debug!("Input ignored during auto-play");
				(self.clone(), None)
			}
			(Action::SelectFlow(flow), None) => (self.toggle(diagram, flow), None),
			(Action::ClickNode(id), None) => {
				// First connector in registry order decides the category.
				match diagram.connectors().iter().find(|c| c.touches(&id)) {
					Some(conn) => (self.toggle(diagram, conn.flow.clone()), None),
					None => (self.clone(), None),
				}
			}
			(Action::PlayAll, None) => {
				let run = self.runs + 1;
				info!("Auto-play run {run} started");
				self.play_step(diagram, run, 0)
			}
			(Action::Advance { run }, Some(play)) if play.run == run => {
				self.play_step(diagram, run, play.step + 1)
			}
			(Action::Advance { run }, _) => {
				debug!("Stale auto-play tick for run {run}");
				(self.clone(), None)
			}
			(Action::Stop, Some(play)) => {
				info!("Auto-play run {} stopped at step {}", play.run, play.step);
				(self.idle(), Some(Effect::Cancel))
			}
			(Action::Stop, None) => (self.clone(), None),
		}
	}

	fn toggle(&self, diagram: &Diagram, flow: FlowCategory) -> Self {
		if self.active.as_ref() == Some(&flow) {
			debug!("Flow '{flow}' deselected");
			return self.idle();
		}
		debug!("Flow '{flow}' selected");
		Self {
			highlighted: involved_nodes(diagram, &flow),
			active: Some(flow),
			auto_play: None,
			runs: self.runs,
		}
	}

	fn play_step(&self, diagram: &Diagram, run: u64, step: usize) -> (Self, Option<Effect>) {
		let playback = &diagram.playback;
		let Some(flow) = playback.sequence.get(step) else {
			info!("Auto-play run {run} finished");
			return (
				Self {
					runs: run,
					..self.idle()
				},
				None,
			);
		};
		debug!("Auto-play run {run} step {step}: '{flow}'");
		let next = Self {
			active: Some(flow.clone()),
			highlighted: involved_nodes(diagram, flow),
			auto_play: Some(AutoPlay { run, step }),
			runs: run,
		};
		(
			next,
			Some(Effect::Schedule {
				run,
				after: playback.step(),
			}),
		)
	}

	fn idle(&self) -> Self {
		Self {
			runs: self.runs,
			..Self::default()
		}
	}
}
