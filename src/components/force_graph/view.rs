//! Keeps the drawn scene congruent with the [`GraphStore`].
//!
//! Every sync runs three phases keyed by stable identity: node visuals by
//! node id, link visuals by `source-target`.
//!
//! 1. exit: visuals whose entity is gone are dropped
//! 2. enter: new entities get a visual with their derived style
//! 3. update: surviving visuals are kept and restyled
//!
//! Afterwards the full node and link sequences are registered with a fresh
//! `force_graph` simulation. Positions and pins of surviving nodes carry
//! over, so re-registering never visibly moves anything.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::fmt;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::debug;

use super::config::{EnergyConfig, GraphConfig, LayoutConfig};
use super::state::{Camera, Highlight};
use super::store::{GraphStore, Link};
use super::theme::{Color, Cursor, NodeStyle, Theme, link_stroke_for, style_for};

/// Per-node metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeInfo {
	pub id: String,
}

/// Circle and label drawn for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Node id.
	pub id: String,
	/// Current fill and cursor.
	pub style: NodeStyle,
}

/// Line drawn for one link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
	/// The link drawn.
	pub link: Link,
	/// Current stroke color.
	pub stroke: Color,
}

impl LinkVisual {
	/// Reconciliation key, `source-target`.
	pub fn key(&self) -> String {
		self.link.to_string()
	}
}

/// What one [`ViewBinder::sync`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
	/// Node visuals created.
	pub nodes_entered: usize,
	/// Node visuals dropped.
	pub nodes_exited: usize,
	/// Link visuals created.
	pub links_entered: usize,
	/// Link visuals dropped.
	pub links_exited: usize,
}

impl SyncReport {
	/// Whether the sync changed nothing.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

impl fmt::Display for SyncReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"nodes +{}/-{}, links +{}/-{}",
			self.nodes_entered, self.nodes_exited, self.links_entered, self.links_exited
		)
	}
}

/// Simulation "temperature".
///
/// Alpha scales how far nodes move per tick and decays toward its target.
/// Once it falls below the minimum the simulation stops stepping until
/// restarted.
#[derive(Clone, Debug)]
pub struct Energy {
	alpha: f64,
	alpha_target: f64,
	running: bool,
	config: EnergyConfig,
}

impl Energy {
	/// Hot and at rest target, as after a restart.
	pub fn new(config: EnergyConfig) -> Self {
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			config,
		}
	}

	/// Full reheat after the graph shape changed.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
		self.running = true;
	}

	/// Change the resting target and resume stepping.
	pub fn heat(&mut self, target: f64) {
		self.alpha_target = target;
		self.running = true;
	}

	/// Let alpha decay back toward rest.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Advance one tick; `None` when at rest.
	pub fn step(&mut self) -> Option<f64> {
		if !self.running {
			return None;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		Some(self.alpha)
	}

	/// Current alpha.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the next tick will move the layout.
	pub fn is_running(&self) -> bool {
		self.running
	}
}

/// Initial position for a node entering the layout.
///
/// Next to its first already-placed target if any, otherwise on a ring around
/// the origin.
fn seed_position(
	index: usize,
	count: usize,
	targets: &[String],
	placed: &HashMap<String, (f32, f32, bool)>,
	layout: &LayoutConfig,
) -> (f32, f32) {
	let angle = index as f64 * 2.0 * PI / count.max(1) as f64;
	match targets.iter().find_map(|t| placed.get(t)) {
		Some(&(tx, ty, _)) => (
			(tx as f64 + layout.seed_offset * angle.cos()) as f32,
			(ty as f64 + layout.seed_offset * angle.sin()) as f32,
		),
		None => (
			(layout.seed_radius * angle.cos()) as f32,
			(layout.seed_radius * angle.sin()) as f32,
		),
	}
}

/// Scene state: visuals, simulation, energy and camera.
pub struct ViewBinder {
	simulation: ForceGraph<NodeInfo, ()>,
	indices: HashMap<String, DefaultNodeIdx>,
	nodes: Vec<NodeVisual>,
	links: Vec<LinkVisual>,
	highlight: Option<Highlight>,
	/// Layout temperature.
	pub energy: Energy,
	/// Pan and zoom.
	pub camera: Camera,
	config: GraphConfig,
	theme: Theme,
}

impl ViewBinder {
	/// An empty scene for a viewport of `width` by `height` pixels.
	pub fn new(config: GraphConfig, theme: Theme, width: f64, height: f64) -> Self {
		Self {
			simulation: ForceGraph::new(config.layout.parameters()),
			indices: HashMap::new(),
			nodes: Vec::new(),
			links: Vec::new(),
			highlight: None,
			energy: Energy::new(config.energy.clone()),
			camera: Camera::new(width, height),
			config,
			theme,
		}
	}

	/// Reconcile visuals with `store`, re-register the layout and reheat it.
	pub fn sync(&mut self, store: &GraphStore) -> SyncReport {
		let mut report = SyncReport::default();

		if let Some(h) = self.highlight.as_mut() {
			if store.contains(h.focus()) {
				h.refresh(store);
			} else {
				self.highlight = None;
			}
		}

		let before = self.nodes.len();
		self.nodes.retain(|v| store.contains(&v.id));
		report.nodes_exited = before - self.nodes.len();

		let live: HashSet<&Link> = store.links().collect();
		let before = self.links.len();
		self.links.retain(|v| live.contains(&v.link));
		report.links_exited = before - self.links.len();

		let mut existing: HashMap<String, NodeVisual> =
			self.nodes.drain(..).map(|v| (v.id.clone(), v)).collect();
		self.nodes = store
			.nodes()
			.iter()
			.map(|node| {
				let style = style_for(node, self.highlight.as_ref(), &self.theme);
				match existing.remove(&node.id) {
					Some(visual) => NodeVisual { style, ..visual },
					None => {
						report.nodes_entered += 1;
						NodeVisual {
							id: node.id.clone(),
							style,
						}
					}
				}
			})
			.collect();

		let mut existing: HashMap<Link, LinkVisual> =
			self.links.drain(..).map(|v| (v.link.clone(), v)).collect();
		self.links = store
			.links()
			.map(|link| {
				let stroke = link_stroke_for(link, self.highlight.as_ref(), &self.theme);
				match existing.remove(link) {
					Some(visual) => LinkVisual { stroke, ..visual },
					None => {
						report.links_entered += 1;
						LinkVisual {
							link: link.clone(),
							stroke,
						}
					}
				}
			})
			.collect();

		self.reregister(store);
		self.energy.restart();
		debug!("Synced view: {report}");
		report
	}

	/// Replace the simulation with one holding the current visuals.
	fn reregister(&mut self, store: &GraphStore) {
		let mut placed: HashMap<String, (f32, f32, bool)> = HashMap::new();
		self.simulation.visit_nodes(|node| {
			placed.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let layout = &self.config.layout;
		let mut simulation = ForceGraph::new(layout.parameters());
		let mut indices = HashMap::with_capacity(self.nodes.len());
		let count = self.nodes.len();

		for (i, visual) in self.nodes.iter().enumerate() {
			let (x, y, is_anchor) = match placed.get(&visual.id) {
				Some(&p) => p,
				None => {
					let targets = store.node(&visual.id).map(|n| n.targets.as_slice());
					let (x, y) = seed_position(i, count, targets.unwrap_or_default(), &placed, layout);
					placed.insert(visual.id.clone(), (x, y, false));
					(x, y, false)
				}
			};
			let idx = simulation.add_node(NodeData {
				x,
				y,
				mass: layout.node_mass,
				is_anchor,
				user_data: NodeInfo {
					id: visual.id.clone(),
				},
			});
			indices.insert(visual.id.clone(), idx);
		}

		for visual in &self.links {
			if let (Some(&src), Some(&tgt)) = (
				indices.get(&visual.link.source),
				indices.get(&visual.link.target),
			) {
				// Self-links are drawn but exert no force.
				if src != tgt {
					simulation.add_edge(src, tgt, EdgeData::default());
				}
			}
		}

		self.simulation = simulation;
		self.indices = indices;
	}

	/// Set or clear the highlight and restyle every visual. Nothing is
	/// entered or exited and the layout is untouched.
	pub fn set_highlight(&mut self, highlight: Option<Highlight>, store: &GraphStore) {
		self.highlight = highlight;
		for visual in &mut self.nodes {
			if let Some(node) = store.node(&visual.id) {
				visual.style = style_for(node, self.highlight.as_ref(), &self.theme);
			}
		}
		for visual in &mut self.links {
			visual.stroke = link_stroke_for(&visual.link, self.highlight.as_ref(), &self.theme);
		}
	}

	/// The active highlight, if any.
	pub fn highlight(&self) -> Option<&Highlight> {
		self.highlight.as_ref()
	}

	/// Node visuals in store order.
	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	/// Link visuals in store order.
	pub fn links(&self) -> &[LinkVisual] {
		&self.links
	}

	/// Geometry and physics settings.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Colors in use.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Graph-space positions of every node in the layout.
	pub fn positions(&self) -> HashMap<String, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.indices.len());
		self.simulation.visit_nodes(|node| {
			out.insert(
				node.data.user_data.id.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		out
	}

	/// Graph-space position of one node.
	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = *self.indices.get(id)?;
		let mut found = None;
		self.simulation.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Fix a node at `(x, y)`. Returns false if it is not in the layout.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(&idx) = self.indices.get(id) else {
			return false;
		};
		self.simulation.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
		true
	}

	/// Release a pinned node back to the forces.
	pub fn unpin(&mut self, id: &str) -> bool {
		let Some(&idx) = self.indices.get(id) else {
			return false;
		};
		self.simulation.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = false;
			}
		});
		true
	}

	/// Whether the node is held in place.
	pub fn is_pinned(&self, id: &str) -> bool {
		let Some(&idx) = self.indices.get(id) else {
			return false;
		};
		let mut pinned = false;
		self.simulation.visit_nodes(|node| {
			if node.index() == idx {
				pinned = node.data.is_anchor;
			}
		});
		pinned
	}

	/// Advance layout and camera by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if let Some(alpha) = self.energy.step() {
			self.simulation.update((dt * alpha) as f32);
		}
		self.camera.advance(dt);
	}

	/// Topmost node whose circle contains the screen point.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<&str> {
		let (gx, gy) = self.camera.screen_to_graph(sx, sy);
		let positions = self.positions();
		let r = self.config.node.radius;
		self.nodes.iter().rev().find_map(|v| {
			let &(x, y) = positions.get(&v.id)?;
			let (dx, dy) = (x - gx, y - gy);
			(dx * dx + dy * dy <= r * r).then_some(v.id.as_str())
		})
	}

	/// Topmost node whose label contains the screen point.
	///
	/// `measure` returns the label's width in world units.
	pub fn label_at(&self, sx: f64, sy: f64, measure: impl Fn(&str) -> f64) -> Option<&str> {
		let (gx, gy) = self.camera.screen_to_graph(sx, sy);
		let positions = self.positions();
		let node = &self.config.node;
		self.nodes.iter().rev().find_map(|v| {
			let &(x, y) = positions.get(&v.id)?;
			let left = x + node.label_offset.0;
			let baseline = y + node.label_offset.1;
			let inside = gx >= left
				&& gx <= left + measure(&v.id)
				&& gy >= baseline - node.label_size
				&& gy <= baseline + node.label_size * 0.25;
			inside.then_some(v.id.as_str())
		})
	}

	/// Pointer to show at a screen point: the hovered label's cursor, if any.
	pub fn cursor_at(&self, sx: f64, sy: f64, measure: impl Fn(&str) -> f64) -> Cursor {
		self.label_at(sx, sy, measure)
			.and_then(|id| self.nodes.iter().find(|v| v.id == id))
			.map_or(Cursor::Default, |v| v.style.cursor)
	}
}
