//! Canonical in-memory graph: nodes, the links derived from them, and the
//! registry of instantiated custom nodes.
//!
//! The store knows nothing about drawing or layout. Positions and pins live
//! in the simulation owned by [`ViewBinder`](super::view::ViewBinder); links
//! refer to their endpoints by id, never by simulation index.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::error::GraphError;
use super::types::NodeSpec;

/// Group assigned to nodes created from the custom-node catalog.
pub const CUSTOM_GROUP: i64 = 4;

/// A graph vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	/// Unique id, also the label text.
	pub id: String,
	/// Palette group.
	pub group: i64,
	/// Ids this node links to, in order.
	pub targets: Vec<String>,
	/// External URL opened from the label.
	pub link: Option<String>,
}

impl Node {
	/// A catalog node: custom group, no external link.
	pub fn custom(id: impl Into<String>, targets: Vec<String>) -> Self {
		Self {
			id: id.into(),
			group: CUSTOM_GROUP,
			targets,
			link: None,
		}
	}
}

impl From<NodeSpec> for Node {
	fn from(spec: NodeSpec) -> Self {
		Self {
			id: spec.id,
			group: spec.group,
			targets: spec.targets,
			link: spec.link,
		}
	}
}

/// A directed edge, identified by its ordered endpoint ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
	/// Id of the node that listed the target.
	pub source: String,
	/// Id the source points at.
	pub target: String,
}

impl Link {
	/// Link from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Whether either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

impl fmt::Display for Link {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.source, self.target)
	}
}

/// Insertion-ordered graph with unique node ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphStore {
	nodes: Vec<Node>,
	links: Vec<Link>,
}

impl GraphStore {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a node and one link per distinct target, in target order.
	///
	/// Rejects duplicate ids without touching the store. A target listed
	/// twice yields a single link, since a link is its endpoint pair.
	pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
		if self.contains(&node.id) {
			return Err(GraphError::DuplicateNode(node.id));
		}
		let mut seen = HashSet::new();
		for target in &node.targets {
			if seen.insert(target.as_str()) {
				self.links.push(Link::new(node.id.clone(), target.clone()));
			}
		}
		self.nodes.push(node);
		Ok(())
	}

	/// Remove a node. No link touching it stays visible.
	///
	/// Links the node sourced are deleted. Links other nodes point at it are
	/// kept but hidden by [`links`](Self::links), exactly as before the node
	/// first existed, so removing a node undoes adding it.
	pub fn remove_node(&mut self, id: &str) -> Option<Node> {
		let pos = self.nodes.iter().position(|n| n.id == id)?;
		let node = self.nodes.remove(pos);
		self.links.retain(|l| l.source != id);
		Some(node)
	}

	/// All nodes, in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Links whose endpoints are both present, in insertion order.
	pub fn links(&self) -> impl Iterator<Item = &Link> {
		self.links
			.iter()
			.filter(|l| self.contains(&l.source) && self.contains(&l.target))
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Whether a node with this id exists.
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}

	/// `id` plus every node joined to it by a visible link, in either direction.
	///
	/// Empty if `id` is not in the store.
	pub fn neighbors(&self, id: &str) -> HashSet<String> {
		let mut set = HashSet::new();
		if !self.contains(id) {
			return set;
		}
		set.insert(id.to_string());
		for link in self.links() {
			if link.source == id {
				set.insert(link.target.clone());
			} else if link.target == id {
				set.insert(link.source.clone());
			}
		}
		set
	}
}

/// Custom nodes currently instantiated in the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomNodeRegistry {
	present: BTreeSet<String>,
}

impl CustomNodeRegistry {
	/// Whether `name` is instantiated.
	pub fn contains(&self, name: &str) -> bool {
		self.present.contains(name)
	}

	/// Record `name` as instantiated.
	pub fn mark_present(&mut self, name: impl Into<String>) {
		self.present.insert(name.into());
	}

	/// Returns whether the entry was set.
	pub fn clear(&mut self, name: &str) -> bool {
		self.present.remove(name)
	}

	/// Instantiated names, sorted.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.present.iter().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, targets: &[&str]) -> Node {
		Node {
			id: id.into(),
			group: 0,
			targets: targets.iter().map(|t| t.to_string()).collect(),
			link: None,
		}
	}

	fn assert_consistent(store: &GraphStore) {
		let ids: HashSet<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), store.nodes().len(), "duplicate node ids");
		for link in store.links() {
			assert!(ids.contains(link.source.as_str()), "dangling source in {link}");
			assert!(ids.contains(link.target.as_str()), "dangling target in {link}");
		}
	}

	#[test]
	fn add_node_derives_links_in_target_order() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &[])).unwrap();
		store.add_node(node("b", &[])).unwrap();
		store.add_node(node("c", &["b", "a"])).unwrap();
		let links: Vec<String> = store.links().map(|l| l.to_string()).collect();
		assert_eq!(links, ["c-b", "c-a"]);
	}

	#[test]
	fn duplicate_add_is_rejected_and_leaves_store_unchanged() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &[])).unwrap();
		store.add_node(node("b", &["a"])).unwrap();
		let before = store.clone();
		assert_eq!(
			store.add_node(node("a", &["b"])),
			Err(GraphError::DuplicateNode("a".into()))
		);
		assert_eq!(store, before);
	}

	#[test]
	fn forward_references_become_visible_when_target_arrives() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &["b"])).unwrap();
		assert_eq!(store.links().count(), 0);
		store.add_node(node("b", &[])).unwrap();
		assert_eq!(store.links().collect::<Vec<_>>(), [&Link::new("a", "b")]);
	}

	#[test]
	fn remove_node_hides_links_in_both_directions() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &["b"])).unwrap();
		store.add_node(node("b", &["c"])).unwrap();
		store.add_node(node("c", &[])).unwrap();
		let removed = store.remove_node("b").unwrap();
		assert_eq!(removed.id, "b");
		assert_eq!(store.links().count(), 0);
		assert_eq!(store.nodes().len(), 2);
		assert_consistent(&store);

		store.add_node(node("b", &[])).unwrap();
		let links: Vec<String> = store.links().map(|l| l.to_string()).collect();
		assert_eq!(links, ["a-b"]);
	}

	#[test]
	fn add_then_remove_restores_store_with_pending_references() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &["b", "x"])).unwrap();
		store.add_node(node("b", &[])).unwrap();
		let before = store.clone();

		for _ in 0..2 {
			store.add_node(node("x", &["b"])).unwrap();
			let links: Vec<String> = store.links().map(|l| l.to_string()).collect();
			assert_eq!(links, ["a-b", "a-x", "x-b"]);
			store.remove_node("x").unwrap();
			assert_eq!(store, before);
		}
	}

	#[test]
	fn repeated_target_yields_one_link() {
		let mut store = GraphStore::new();
		store.add_node(node("b", &[])).unwrap();
		store.add_node(node("a", &["b", "b"])).unwrap();
		let links: Vec<String> = store.links().map(|l| l.to_string()).collect();
		assert_eq!(links, ["a-b"]);
		assert_eq!(store.node("a").map(|n| n.targets.len()), Some(2));
	}

	#[test]
	fn remove_absent_is_noop() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &[])).unwrap();
		let before = store.clone();
		assert!(store.remove_node("zz").is_none());
		assert_eq!(store, before);
	}

	#[test]
	fn mixed_sequence_keeps_invariants() {
		let mut store = GraphStore::new();
		let ops: [(&str, &[&str], bool); 10] = [
			("a", &["b", "c"], true),
			("b", &["a"], true),
			("a", &["x"], true),
			("c", &[], true),
			("b", &[], false),
			("d", &["a", "b", "c"], true),
			("b", &["d"], true),
			("a", &[], false),
			("a", &["d"], true),
			("d", &[], false),
		];
		for (id, targets, add) in ops {
			if add {
				let _ = store.add_node(node(id, targets));
			} else {
				store.remove_node(id);
			}
			assert_consistent(&store);
		}
		let ids: Vec<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["c", "b", "a"]);
	}

	#[test]
	fn neighbors_follow_both_directions() {
		let mut store = GraphStore::new();
		store.add_node(node("a", &["b"])).unwrap();
		store.add_node(node("b", &["c"])).unwrap();
		store.add_node(node("c", &[])).unwrap();
		store.add_node(node("d", &[])).unwrap();
		let n = store.neighbors("b");
		assert_eq!(n.len(), 3);
		assert!(n.contains("a") && n.contains("b") && n.contains("c"));
		assert!(store.neighbors("missing").is_empty());
	}

	#[test]
	fn registry_flip() {
		let mut registry = CustomNodeRegistry::default();
		assert!(!registry.contains("x"));
		registry.mark_present("x");
		assert!(registry.contains("x"));
		assert!(registry.clear("x"));
		assert!(!registry.clear("x"));
	}
}
