//! Resolves, fetches and parses the graph description, and turns it into the
//! initial [`GraphStore`].

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::error::LoadError;
use super::store::{GraphStore, Node};
use super::types::GraphDescription;

/// Resource loaded when the URL has no fragment.
pub const DEFAULT_RESOURCE: &str = "assets/json/graph.json";

/// Map a URL fragment (with or without the leading `#`) to a JSON resource.
pub fn resource_for_fragment(fragment: &str) -> String {
	let name = fragment.strip_prefix('#').unwrap_or(fragment);
	if name.is_empty() {
		DEFAULT_RESOURCE.to_string()
	} else {
		format!("assets/json/{name}.json")
	}
}

/// Resource selected by the current page location.
pub fn resource_from_location() -> String {
	let hash = web_sys::window()
		.and_then(|w| w.location().hash().ok())
		.unwrap_or_default();
	resource_for_fragment(&hash)
}

/// Parse a graph description from JSON text.
pub fn parse_description(text: &str) -> Result<GraphDescription, LoadError> {
	Ok(serde_json::from_str(text)?)
}

fn js_error(value: JsValue) -> LoadError {
	let message = value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"));
	LoadError::Request(message)
}

/// Fetch and parse a graph description with the browser's `fetch`.
pub async fn fetch_description(url: &str) -> Result<GraphDescription, LoadError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;

	let window = web_sys::window().ok_or_else(|| LoadError::Request("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;

	if !response.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or_else(|| LoadError::Request("response body is not text".into()))?;

	let description = parse_description(&text)?;
	info!(
		"Loaded JSON file: {url} ({} nodes, {} custom nodes)",
		description.nodes.len(),
		description.custom_nodes.len()
	);
	Ok(description)
}

impl GraphDescription {
	/// Build the initial store, one `add_node` per declared node in order.
	///
	/// Duplicate ids are logged and skipped. The custom-node catalog is not
	/// instantiated.
	pub fn build_store(&self) -> GraphStore {
		let mut store = GraphStore::new();
		for spec in &self.nodes {
			if let Err(e) = store.add_node(Node::from(spec.clone())) {
				warn!("Skipping node: {e}");
			}
		}
		store
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"header": { "title": "Sample" },
		"nodes": [
			{ "id": "a", "group": 1, "targets": ["b"], "link": "https://example.org/a" },
			{ "id": "b", "group": 2, "targets": ["c"] },
			{ "id": "c", "group": 3, "targets": [] },
			{ "id": "a", "group": 9, "targets": ["c"] }
		],
		"customNodes": { "x": ["a"] }
	}"#;

	#[test]
	fn fragment_selects_resource() {
		assert_eq!(resource_for_fragment(""), DEFAULT_RESOURCE);
		assert_eq!(resource_for_fragment("#"), DEFAULT_RESOURCE);
		assert_eq!(resource_for_fragment("#people"), "assets/json/people.json");
		assert_eq!(resource_for_fragment("people"), "assets/json/people.json");
	}

	#[test]
	fn parses_and_builds_store() {
		let desc = parse_description(SAMPLE).unwrap();
		assert_eq!(desc.header.title(), "Sample");
		assert_eq!(desc.header.description(), super::super::types::DEFAULT_DESCRIPTION);

		let store = desc.build_store();
		let ids: Vec<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(store.node("a").unwrap().group, 1);
		assert_eq!(store.links().count(), 2);
		// Catalog is recorded, not instantiated.
		assert!(!store.contains("x"));
		assert_eq!(desc.custom_nodes.targets("x"), Some(&["a".to_string()][..]));
	}

	#[test]
	fn malformed_body_is_parse_error() {
		assert!(matches!(parse_description("{ not json"), Err(LoadError::Parse(_))));
		assert!(matches!(
			parse_description(r#"{"nodes": [{"id": 3, "group": 1}]}"#),
			Err(LoadError::Parse(_))
		));
	}
}
