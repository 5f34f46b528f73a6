//! User-facing graph operations.
//!
//! The controller owns the store, the custom-node registry and catalog, and
//! the [`ViewBinder`]. Shape-changing operations mutate the store and then
//! sync the view; highlight and drag only touch the view.
//!
//! DOM handlers talk to it through [`GraphEvent`]s, each carrying only the
//! entity it concerns.

use log::{debug, error, info, warn};

use super::config::GraphConfig;
use super::error::GraphError;
use super::state::Highlight;
use super::store::{CustomNodeRegistry, GraphStore, Node};
use super::theme::Theme;
use super::types::{CustomNodeCatalog, GraphDescription};
use super::view::ViewBinder;

/// A named input event, already resolved to the entity it targets.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// Press on a node at graph position `(x, y)`.
	DragStart {
		/// Node id.
		id: String,
		/// Graph-space x.
		x: f64,
		/// Graph-space y.
		y: f64,
	},
	/// Pointer moved while a node is held.
	Drag {
		/// Node id.
		id: String,
		/// New graph-space x.
		x: f64,
		/// New graph-space y.
		y: f64,
	},
	/// Held node released.
	DragEnd {
		/// Node id.
		id: String,
	},
	/// Press and release on a node without dragging it.
	NodeClick {
		/// Node id.
		id: String,
	},
	/// Press and release on a node's label.
	LabelClick {
		/// Node id.
		id: String,
	},
	/// Toggle button of a catalog entry pressed.
	ToggleCustomNode {
		/// Catalog entry name.
		name: String,
	},
	/// Animation frame, `dt` in seconds.
	Tick {
		/// Seconds since the previous frame.
		dt: f64,
	},
}

/// Work the page must do on the controller's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
	/// Open this URL in a new tab.
	OpenLink(String),
}

/// Graph session: store, registry, catalog and view, scoped to one page.
pub struct InteractionController {
	store: GraphStore,
	registry: CustomNodeRegistry,
	catalog: CustomNodeCatalog,
	view: ViewBinder,
	active_drags: usize,
}

impl InteractionController {
	/// Build the initial graph from a description and bind the view to it.
	pub fn new(
		description: &GraphDescription,
		config: GraphConfig,
		theme: Theme,
		width: f64,
		height: f64,
	) -> Self {
		let store = description.build_store();
		let mut view = ViewBinder::new(config, theme, width, height);
		view.sync(&store);
		Self {
			store,
			registry: CustomNodeRegistry::default(),
			catalog: description.custom_nodes.clone(),
			view,
			active_drags: 0,
		}
	}

	/// The logical graph.
	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	/// Custom nodes currently instantiated.
	pub fn registry(&self) -> &CustomNodeRegistry {
		&self.registry
	}

	/// Custom nodes that can be toggled.
	pub fn catalog(&self) -> &CustomNodeCatalog {
		&self.catalog
	}

	/// The drawn scene.
	pub fn view(&self) -> &ViewBinder {
		&self.view
	}

	/// The drawn scene, for camera moves that bypass the store.
	pub fn view_mut(&mut self) -> &mut ViewBinder {
		&mut self.view
	}

	/// Flip a custom node between present and absent.
	pub fn toggle_custom_node(&mut self, name: &str) -> Result<(), GraphError> {
		if self.registry.contains(name) {
			self.remove_custom_node(name)
		} else {
			self.create_custom_node(name)
		}
	}

	/// Instantiate a catalog entry as a node linked to its targets.
	///
	/// Fails without touching the graph if the name is not in the catalog or
	/// a node with that id already exists.
	pub fn create_custom_node(&mut self, name: &str) -> Result<(), GraphError> {
		let Some(targets) = self.catalog.targets(name) else {
			let err = GraphError::UnknownCustomNode(name.to_string());
			error!("{err}");
			return Err(err);
		};
		let node = Node::custom(name, targets.to_vec());
		if let Err(err) = self.store.add_node(node) {
			warn!("Custom node \"{name}\" already exists.");
			return Err(err);
		}
		self.registry.mark_present(name);
		info!("Created custom node \"{name}\".");
		self.view.sync(&self.store);
		Ok(())
	}

	/// Remove an instantiated custom node. Initial nodes are never removed.
	pub fn remove_custom_node(&mut self, name: &str) -> Result<(), GraphError> {
		if !self.registry.clear(name) {
			let err = GraphError::NotInstantiated(name.to_string());
			warn!("{err}");
			return Err(err);
		}
		self.store.remove_node(name);
		info!("Removed custom node \"{name}\".");
		self.view.sync(&self.store);
		Ok(())
	}

	/// Color `id` and its neighbours, reset everything else, and zoom onto it.
	pub fn highlight_connections(&mut self, id: &str) {
		debug!("Highlighting connections for node \"{id}\".");
		let highlight = Highlight::new(id, &self.store);
		self.view.set_highlight(Some(highlight), &self.store);
		if let Some((x, y)) = self.view.position(id) {
			let zoom = self.view.config().zoom.clone();
			self.view.camera.focus(x, y, &zoom);
		}
	}

	/// URL behind a node's label.
	pub fn open_link(&self, id: &str) -> Option<String> {
		self.store.node(id).and_then(|n| n.link.clone())
	}

	/// Pin the node where it is and warm the layout if nothing else is held.
	pub fn drag_started(&mut self, id: &str, x: f64, y: f64) {
		if !self.view.pin(id, x, y) {
			return;
		}
		if self.active_drags == 0 {
			let target = self.view.config().energy.drag_target;
			self.view.energy.heat(target);
		}
		self.active_drags += 1;
	}

	/// Move a held node.
	pub fn dragged(&mut self, id: &str, x: f64, y: f64) {
		self.view.pin(id, x, y);
	}

	/// Unpin the node and let the layout cool once no drag remains.
	pub fn drag_ended(&mut self, id: &str) {
		if !self.view.unpin(id) {
			return;
		}
		self.active_drags = self.active_drags.saturating_sub(1);
		if self.active_drags == 0 {
			self.view.energy.cool();
		}
	}

	/// Route an event to its handler.
	///
	/// Rejected custom-node toggles are already logged and are dropped here.
	pub fn dispatch(&mut self, event: GraphEvent) -> Option<Effect> {
		match event {
			GraphEvent::DragStart { id, x, y } => self.drag_started(&id, x, y),
			GraphEvent::Drag { id, x, y } => self.dragged(&id, x, y),
			GraphEvent::DragEnd { id } => self.drag_ended(&id),
			GraphEvent::NodeClick { id } => self.highlight_connections(&id),
			GraphEvent::LabelClick { id } => return self.open_link(&id).map(Effect::OpenLink),
			GraphEvent::ToggleCustomNode { name } => {
				let _ = self.toggle_custom_node(&name);
			}
			GraphEvent::Tick { dt } => self.view.tick(dt),
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::loader::parse_description;
	use crate::components::force_graph::store::Link;

	const SCENARIO: &str = r#"{
		"nodes": [
			{ "id": "a", "group": 0, "targets": ["b"], "link": "https://example.org/a" },
			{ "id": "b", "group": 1, "targets": ["c"] },
			{ "id": "c", "group": 2, "targets": [] }
		],
		"customNodes": { "x": ["a"], "y": ["b", "c"], "b": ["a"] }
	}"#;

	fn controller() -> InteractionController {
		let desc = parse_description(SCENARIO).unwrap();
		InteractionController::new(&desc, GraphConfig::default(), Theme::default(), 800.0, 600.0)
	}

	fn ids(c: &InteractionController) -> Vec<&str> {
		c.store().nodes().iter().map(|n| n.id.as_str()).collect()
	}

	fn links(c: &InteractionController) -> Vec<Link> {
		c.store().links().cloned().collect()
	}

	fn assert_view_matches_store(c: &InteractionController) {
		assert_eq!(c.view().nodes().len(), c.store().nodes().len());
		assert_eq!(c.view().links().len(), c.store().links().count());
		assert_eq!(c.view().positions().len(), c.store().nodes().len());
	}

	#[test]
	fn toggle_scenario() {
		let mut c = controller();
		let original = c.store().clone();

		c.toggle_custom_node("x").unwrap();
		assert_eq!(ids(&c), ["a", "b", "c", "x"]);
		assert_eq!(
			links(&c),
			[Link::new("a", "b"), Link::new("b", "c"), Link::new("x", "a")]
		);
		assert!(c.registry().contains("x"));
		assert_eq!(c.store().node("x").unwrap().group, 4);
		assert_view_matches_store(&c);

		c.toggle_custom_node("x").unwrap();
		assert_eq!(c.store(), &original);
		assert!(!c.registry().contains("x"));
		assert_view_matches_store(&c);
	}

	#[test]
	fn repeated_toggles_keep_links_pointing_at_custom_node() {
		let desc = parse_description(
			r#"{
				"nodes": [
					{ "id": "a", "group": 0, "targets": ["b", "x"] },
					{ "id": "b", "group": 1 }
				],
				"customNodes": { "x": ["b"] }
			}"#,
		)
		.unwrap();
		let mut c =
			InteractionController::new(&desc, GraphConfig::default(), Theme::default(), 800.0, 600.0);
		let original = c.store().clone();
		assert_eq!(links(&c), [Link::new("a", "b")]);

		for _ in 0..2 {
			c.toggle_custom_node("x").unwrap();
			assert_eq!(
				links(&c),
				[Link::new("a", "b"), Link::new("a", "x"), Link::new("x", "b")]
			);
			assert_view_matches_store(&c);

			c.toggle_custom_node("x").unwrap();
			assert_eq!(c.store(), &original);
			assert_eq!(links(&c), [Link::new("a", "b")]);
			assert_view_matches_store(&c);
		}
	}

	#[test]
	fn create_twice_equals_create_once() {
		let mut c = controller();
		c.create_custom_node("y").unwrap();
		let once = c.store().clone();
		assert_eq!(
			c.create_custom_node("y"),
			Err(GraphError::DuplicateNode("y".into()))
		);
		assert_eq!(c.store(), &once);
		assert_view_matches_store(&c);
	}

	#[test]
	fn create_then_remove_restores() {
		let mut c = controller();
		let original = c.store().clone();
		c.create_custom_node("y").unwrap();
		assert_eq!(c.store().links().count(), 4);
		c.remove_custom_node("y").unwrap();
		assert_eq!(c.store(), &original);
		assert_view_matches_store(&c);
	}

	#[test]
	fn unknown_and_clashing_entries_are_noops() {
		let mut c = controller();
		let original = c.store().clone();
		assert_eq!(
			c.toggle_custom_node("nope"),
			Err(GraphError::UnknownCustomNode("nope".into()))
		);
		// Catalog entry named like an initial node.
		assert_eq!(
			c.toggle_custom_node("b"),
			Err(GraphError::DuplicateNode("b".into()))
		);
		assert!(!c.registry().contains("b"));
		assert_eq!(
			c.remove_custom_node("a"),
			Err(GraphError::NotInstantiated("a".into()))
		);
		assert_eq!(c.store(), &original);
	}

	#[test]
	fn highlight_is_not_additive() {
		let mut c = controller();
		let theme = Theme::default();
		c.highlight_connections("a");
		let lit: Vec<&str> = c
			.view()
			.nodes()
			.iter()
			.filter(|v| v.style.fill == theme.highlight)
			.map(|v| v.id.as_str())
			.collect();
		assert_eq!(lit, ["a", "b"]);

		c.highlight_connections("c");
		let lit: Vec<&str> = c
			.view()
			.nodes()
			.iter()
			.filter(|v| v.style.fill == theme.highlight)
			.map(|v| v.id.as_str())
			.collect();
		assert_eq!(lit, ["b", "c"]);
		let lit_links: Vec<String> = c
			.view()
			.links()
			.iter()
			.filter(|v| v.stroke == theme.highlight)
			.map(|v| v.key())
			.collect();
		assert_eq!(lit_links, ["b-c"]);
		assert!(c.view().camera.is_animating());
	}

	#[test]
	fn highlight_follows_custom_node_links() {
		let mut c = controller();
		let theme = Theme::default();
		c.highlight_connections("a");
		c.toggle_custom_node("x").unwrap();
		let x = c.view().nodes().iter().find(|v| v.id == "x").unwrap();
		assert_eq!(x.style.fill, theme.highlight);
		c.toggle_custom_node("x").unwrap();
		assert_eq!(c.view().highlight().map(Highlight::focus), Some("a"));
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut c = controller();
		c.dispatch(GraphEvent::DragStart {
			id: "b".into(),
			x: 5.0,
			y: 5.0,
		});
		assert!(c.view().is_pinned("b"));
		c.dispatch(GraphEvent::Drag {
			id: "b".into(),
			x: 30.0,
			y: -10.0,
		});
		for _ in 0..50 {
			c.dispatch(GraphEvent::Tick { dt: 0.016 });
		}
		assert_eq!(c.view().position("b"), Some((30.0, -10.0)));
		assert!(c.view().energy.is_running());

		c.dispatch(GraphEvent::DragEnd { id: "b".into() });
		assert!(!c.view().is_pinned("b"));
	}

	#[test]
	fn drag_keeps_layout_warm_until_release() {
		let mut c = controller();
		c.drag_started("a", 0.0, 0.0);
		for _ in 0..2000 {
			c.dispatch(GraphEvent::Tick { dt: 0.016 });
		}
		assert!(c.view().energy.is_running());
		c.drag_ended("a");
		for _ in 0..2000 {
			c.dispatch(GraphEvent::Tick { dt: 0.016 });
		}
		assert!(!c.view().energy.is_running());
	}

	#[test]
	fn label_click_opens_link_only_when_present() {
		let mut c = controller();
		assert_eq!(
			c.dispatch(GraphEvent::LabelClick { id: "a".into() }),
			Some(Effect::OpenLink("https://example.org/a".into()))
		);
		assert_eq!(c.dispatch(GraphEvent::LabelClick { id: "b".into() }), None);
	}

	#[test]
	fn toggle_event_routes_to_toggle() {
		let mut c = controller();
		c.dispatch(GraphEvent::ToggleCustomNode { name: "x".into() });
		assert!(c.store().contains("x"));
		c.dispatch(GraphEvent::ToggleCustomNode { name: "x".into() });
		assert!(!c.store().contains("x"));
	}
}
