//! Interactive architecture flow diagram: a Leptos client-side app that draws
//! fixed nodes and orthogonally routed connectors on a canvas and highlights
//! one flow category at a time.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

pub use crate::components::flow_diagram::{error, layout, routing, sequencer, types};

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Route browser console output through `log` and report panics there too.
/// Safe to call more than once.
pub fn init_logging() {
	if console_log::init_with_level(Level::Debug).is_ok() {
		info!("Console logging ready");
	}
	console_error_panic_hook::set_once();
}

/// Root view: document metadata plus a router with the diagram at `/` and a
/// not-found page for every other path.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Architecture Flow Diagram" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
