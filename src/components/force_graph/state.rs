//! Camera, highlight and pointer-tracking state.
//!
//! None of this touches the graph store. The camera owns the pan/zoom
//! transform and its focus animation; [`Highlight`] is the adjacency set of a
//! clicked node; the pointer structs remember an in-progress press so the
//! canvas can tell drags, pans and clicks apart.

use std::collections::HashSet;

use super::config::ZoomConfig;
use super::store::GraphStore;

/// Ease-in-out curve on `[0, 1]`.
pub(crate) fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, other: Self, t: f64) -> Self {
		Self {
			x: self.x + (other.x - self.x) * t,
			y: self.y + (other.y - self.y) * t,
			k: self.k + (other.k - self.k) * t,
		}
	}
}

/// Animated move of the camera toward a target transform.
#[derive(Clone, Debug)]
struct ZoomTransition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

/// Viewport size plus the transform mapping graph space to screen space.
#[derive(Clone, Debug)]
pub struct Camera {
	/// Current transform, mid-transition if one is running.
	pub transform: ViewTransform,
	/// Viewport width in screen pixels.
	pub width: f64,
	/// Viewport height in screen pixels.
	pub height: f64,
	transition: Option<ZoomTransition>,
}

impl Camera {
	/// Graph origin at the viewport center, unit scale.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			transition: None,
		}
	}

	/// Map a canvas point to graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Transform that centers `(x, y)` at `k`.
	pub fn centered_on(&self, x: f64, y: f64, k: f64) -> ViewTransform {
		ViewTransform {
			x: self.width / 2.0 - k * x,
			y: self.height / 2.0 - k * y,
			k,
		}
	}

	/// Start animating toward a view centered on `(x, y)` at the focus scale.
	pub fn focus(&mut self, x: f64, y: f64, zoom: &ZoomConfig) {
		let to = self.centered_on(x, y, zoom.clamp(zoom.focus_scale));
		self.transition = Some(ZoomTransition {
			from: self.transform,
			to,
			elapsed: 0.0,
			duration: zoom.focus_duration,
		});
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, zoom: &ZoomConfig) {
		self.transition = None;
		let new_k = zoom.clamp(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Set the translation directly, cancelling any transition.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		self.transition = None;
		self.transform.x = x;
		self.transform.y = y;
	}

	/// Advance the focus animation. Returns whether it is still running.
	pub fn advance(&mut self, dt: f64) -> bool {
		let Some(tr) = self.transition.as_mut() else {
			return false;
		};
		tr.elapsed += dt;
		let t = if tr.duration > 0.0 {
			(tr.elapsed / tr.duration).min(1.0)
		} else {
			1.0
		};
		if t >= 1.0 {
			self.transform = tr.to;
			self.transition = None;
			return false;
		}
		self.transform = tr.from.lerp(tr.to, smooth_step(t));
		true
	}

	/// Whether a focus transition is still running.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Track a new viewport size. The transform is left alone.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// A clicked node and everything adjacent to it.
///
/// Built from scratch on every highlight, so nothing from an earlier
/// highlight carries over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
	focus: String,
	connected: HashSet<String>,
}

impl Highlight {
	/// Highlight `focus` and its current neighbours in `store`.
	pub fn new(focus: impl Into<String>, store: &GraphStore) -> Self {
		let focus = focus.into();
		let connected = store.neighbors(&focus);
		Self { focus, connected }
	}

	/// The clicked node.
	pub fn focus(&self) -> &str {
		&self.focus
	}

	/// The focus itself or one of its neighbours.
	pub fn is_connected(&self, id: &str) -> bool {
		self.connected.contains(id)
	}

	/// Recompute adjacency against the current links.
	pub fn refresh(&mut self, store: &GraphStore) {
		self.connected = store.neighbors(&self.focus);
	}
}

/// Tracks an in-progress node press, which becomes a drag once it moves.
#[derive(Clone, Debug)]
pub(crate) struct DragState {
	pub node_id: String,
	/// Screen position of the press.
	pub start_x: f64,
	pub start_y: f64,
	/// Node position minus pointer position, in graph space.
	pub offset_x: f64,
	pub offset_y: f64,
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub(crate) struct PanState {
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Whatever the primary button is currently holding.
#[derive(Clone, Debug, Default)]
pub(crate) enum PointerState {
	#[default]
	Idle,
	Node(DragState),
	/// Pressed on a node's label; a release on the same label is a click.
	Label(String),
	Pan(PanState),
}
