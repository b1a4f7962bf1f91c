use leptos::prelude::*;

use super::controller::Controller;
use super::sequencer::Action;
use super::types::NodeCategory;

/// Node-category key, clickable flow entries and the play-all button.
#[component]
pub fn Legend(controller: Controller) -> impl IntoView {
	let state = controller.state();
	let playing = move || state.with(|s| s.is_auto_playing());

	let node_types = NodeCategory::ALL
		.into_iter()
		.map(|category| {
			view! {
				<div class="legend-item">
					<span class="legend-swatch" style:background-color=category.color() />
					<span>{category.label()}</span>
				</div>
			}
		})
		.collect_view();

	let flows = controller
		.diagram()
		.flows()
		.iter()
		.map(|flow| {
			let (key, key_click) = (flow.key.clone(), flow.key.clone());
			let (color, glow) = (flow.color.clone(), flow.color.clone());
			let is_active = move || state.with(|s| s.active() == Some(&key));
			let (active_class, active_glow) = (is_active.clone(), is_active.clone());
			let faded = move || state.with(|s| s.active().is_some()) && !is_active();
			view! {
				<div
					class="legend-item legend-flow"
					class:active=active_class
					style:opacity=move || if faded() { "0.4" } else { "1" }
					on:click=move |_| controller.dispatch(Action::SelectFlow(key_click.clone()))
				>
					<span
						class="legend-line"
						style:background-color=color
						style:box-shadow=move || {
							if active_glow() { format!("0 0 6px {glow}") } else { "none".to_string() }
						}
					/>
					<span>{flow.label.clone()}</span>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="legend">
			<div class="legend-group">
				<h4>"Nodes"</h4>
				<div class="legend-items">{node_types}</div>
			</div>
			<div class="legend-group">
				<h4>"Flows"</h4>
				<div class="legend-items">{flows}</div>
			</div>
		</div>
		<button
			class="play-all"
			class:playing=playing
			on:click=move |_| {
				let action = if playing() { Action::Stop } else { Action::PlayAll };
				controller.dispatch(action);
			}
		>
			{move || if playing() { "■ Stop" } else { "▶ Play All Flows" }}
		</button>
	}
}
