use leptos::prelude::*;

use crate::components::flow_diagram::{Controller, FlowDiagramCanvas, Legend, builtin};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let diagram = builtin().map(|diagram| {
		let controller = Controller::new(diagram);
		view! {
			<div class="diagram-frame">
				<div class="diagram-overlay">
					<h1>{diagram.title.clone()}</h1>
					<p class="subtitle">{diagram.subtitle.clone()}</p>
				</div>
				<Legend controller=controller />
				<FlowDiagramCanvas controller=controller />
			</div>
		}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="diagram-page">{diagram}</div>
		</ErrorBoundary>
	}
}
