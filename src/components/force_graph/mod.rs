//! Force-directed graph viewer with toggleable custom nodes.
//!
//! Renders a graph description on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Pan, zoom, and node dragging interactions
//! - Click-to-highlight of a node's connections, with a zoom onto it
//! - One toggle button per custom node in the description's catalog
//!
//! The logical graph lives in [`GraphStore`]. [`ViewBinder`] reconciles the
//! drawn scene against it after every change, and [`InteractionController`]
//! is the only thing that mutates either.
//!
//! # Example
//!
//! ```ignore
//! use linkgraph::{ForceGraphCanvas, parse_description};
//!
//! let data = parse_description(r#"{
//!     "nodes": [
//!         { "id": "a", "group": 1, "targets": ["b"] },
//!         { "id": "b", "group": 2, "targets": [] }
//!     ],
//!     "customNodes": { "x": ["a"] }
//! }"#)?;
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
pub mod config;
mod controller;
mod error;
mod loader;
mod render;
mod state;
mod store;
pub mod theme;
mod types;
mod view;

pub use component::ForceGraphCanvas;
pub use config::GraphConfig;
pub use controller::{Effect, GraphEvent, InteractionController};
pub use error::{GraphError, LoadError};
pub use loader::{
	DEFAULT_RESOURCE, fetch_description, parse_description, resource_for_fragment,
	resource_from_location,
};
pub use state::{Camera, Highlight, ViewTransform};
pub use store::{CUSTOM_GROUP, CustomNodeRegistry, GraphStore, Link, Node};
pub use theme::{Cursor, NodeStyle, Theme, link_stroke_for, style_for};
pub use types::{CustomNodeCatalog, GraphDescription, Header, NodeSpec};
pub use view::{Energy, LinkVisual, NodeVisual, SyncReport, ViewBinder};
