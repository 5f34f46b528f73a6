//! Error types for loading graph descriptions and mutating the graph.

use thiserror::Error;

/// Failure to obtain the initial graph description.
///
/// Any variant aborts the initial render; nothing is drawn.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The request could not be issued or the network call failed.
	#[error("request for graph description failed: {0}")]
	Request(String),
	/// The server answered with a non-success status.
	#[error("failed to load JSON: {url} (status {status})")]
	Status {
		/// Resource that was requested.
		url: String,
		/// HTTP status code returned.
		status: u16,
	},
	/// The body is not a valid graph description.
	#[error("malformed graph description: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Rejected graph mutation. The store is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	/// A node with this id is already in the graph.
	#[error("node \"{0}\" already exists")]
	DuplicateNode(String),
	/// The custom-node catalog has no entry with this name.
	#[error("no linked nodes found for custom node: {0}")]
	UnknownCustomNode(String),
	/// The custom node is not currently instantiated.
	#[error("custom node \"{0}\" is not present")]
	NotInstantiated(String),
}
