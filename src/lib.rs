//! linkgraph: interactive force-directed graph viewer.
//!
//! This crate provides a WASM page that loads a graph description selected by
//! the URL fragment and renders it with physics-based layout, pan/zoom,
//! click-to-highlight, and toggleable custom nodes.

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, GraphDescription, GraphStore, InteractionController, LoadError,
	fetch_description, parse_description, resource_for_fragment, resource_from_location,
};

#[cfg(test)]
use wasm_bindgen_test as _;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("linkgraph: logging initialized");
}

/// Main application component.
///
/// Fetches the description named by the URL fragment. Once loading
/// succeeded it fills in the header and document title and renders the graph.
/// A failed load is logged and leaves the page as served. Changing the
/// fragment reloads the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph, set_graph) = signal(None::<GraphDescription>);
	let resource = resource_from_location();
	spawn_local(async move {
		match fetch_description(&resource).await {
			Ok(description) => set_graph.set(Some(description)),
			Err(e) => error!("linkgraph: {e}"),
		}
	});

	let _ = window_event_listener(ev::hashchange, |_| {
		if let Some(window) = web_sys::window() {
			let _ = window.location().reload();
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{move || {
			graph
				.get()
				.map(|data| {
					let title = data.header.title().to_string();
					let description = data.header.description().to_string();
					view! {
						<Title text=title.clone() />
						<header class="graph-header">
							<h1 id="title">{title}</h1>
							<p id="description">{description}</p>
						</header>
						<ForceGraphCanvas data=data fullscreen=true />
					}
				})
		}}
	}
}
