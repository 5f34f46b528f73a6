//! Graph description structures as read from the JSON resource.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Title shown when the description has none.
pub const DEFAULT_TITLE: &str = "Dynamic Graph";
/// Subtitle shown when the description has none.
pub const DEFAULT_DESCRIPTION: &str = "Explore dynamic relationships.";

/// Page header text.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Header {
	/// Optional page title.
	pub title: Option<String>,
	/// Optional page subtitle.
	pub description: Option<String>,
}

impl Header {
	/// Title text, or the fixed fallback when absent.
	pub fn title(&self) -> &str {
		self.title.as_deref().unwrap_or(DEFAULT_TITLE)
	}

	/// Description text, or the fixed fallback when absent.
	pub fn description(&self) -> &str {
		self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
	}
}

/// A node as declared in the description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeSpec {
	/// Unique identifier. Also used as the label text.
	pub id: String,
	/// Integer category, selects the palette color.
	pub group: i64,
	/// Ids this node links to, in order.
	#[serde(default)]
	pub targets: Vec<String>,
	/// Optional external URL opened when the label is clicked.
	pub link: Option<String>,
}

/// One catalog entry: a custom node name and the ids it links to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomNodeEntry {
	/// Name of the custom node, also its node id once created.
	pub name: String,
	/// Ids the custom node links to.
	pub targets: Vec<String>,
}

/// Custom nodes available for toggling, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomNodeCatalog {
	entries: Vec<CustomNodeEntry>,
}

impl CustomNodeCatalog {
	/// Look up the targets of a catalog entry.
	pub fn targets(&self, name: &str) -> Option<&[String]> {
		self.entries
			.iter()
			.find(|e| e.name == name)
			.map(|e| e.targets.as_slice())
	}

	/// Entry names in document order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|e| e.name.as_str())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the catalog has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl FromIterator<(String, Vec<String>)> for CustomNodeCatalog {
	fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
		let mut catalog = Self::default();
		for (name, targets) in iter {
			// Later keys win, matching JSON object semantics.
			match catalog.entries.iter_mut().find(|e| e.name == name) {
				Some(entry) => entry.targets = targets,
				None => catalog.entries.push(CustomNodeEntry { name, targets }),
			}
		}
		catalog
	}
}

impl<'de> Deserialize<'de> for CustomNodeCatalog {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct CatalogVisitor;

		impl<'de> Visitor<'de> for CatalogVisitor {
			type Value = CustomNodeCatalog;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a map of custom node names to target id lists")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
				let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
				while let Some(pair) = map.next_entry::<String, Vec<String>>()? {
					pairs.push(pair);
				}
				Ok(pairs.into_iter().collect())
			}
		}

		deserializer.deserialize_map(CatalogVisitor)
	}
}

/// Complete graph description: header, nodes and custom-node catalog.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDescription {
	/// Page header; both fields fall back when absent.
	#[serde(default)]
	pub header: Header,
	/// Initial nodes, in load order.
	pub nodes: Vec<NodeSpec>,
	/// Toggleable nodes, read from `customNodes`.
	#[serde(default)]
	pub custom_nodes: CustomNodeCatalog,
}
