//! Tunable constants for layout, energy, camera and node geometry.
//!
//! All values are compile-time defaults. Distances are in world units unless
//! noted as screen pixels.

use force_graph::SimulationParameters;

/// Node and label geometry.
#[derive(Clone, Debug)]
pub struct NodeConfig {
	/// Circle radius in world units.
	pub radius: f64,
	/// Label font size.
	pub label_size: f64,
	/// Label baseline offset from the node center.
	pub label_offset: (f64, f64),
}

impl NodeConfig {
	/// Canvas font string for labels.
	pub fn label_font(&self) -> String {
		format!("{}px sans-serif", self.label_size)
	}
}

/// Pan/zoom limits and the focus animation.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
	/// Smallest allowed scale.
	pub min_scale: f64,
	/// Largest allowed scale.
	pub max_scale: f64,
	/// Scale applied when focusing a highlighted node.
	pub focus_scale: f64,
	/// Focus transition length in seconds.
	pub focus_duration: f64,
	/// Scale factor per wheel notch.
	pub wheel_step: f64,
}

impl ZoomConfig {
	/// Bound a scale to `[min_scale, max_scale]`.
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min_scale, self.max_scale)
	}
}

/// Physics parameters handed to `force_graph`.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Attraction along each edge.
	pub force_spring: f32,
	/// Cap on the force applied to a node per step.
	pub force_max: f32,
	/// Velocity scale of the integration step.
	pub node_speed: f32,
	/// Velocity kept between steps.
	pub damping_factor: f32,
	/// Mass given to every node.
	pub node_mass: f32,
	/// Radius of the ring new unconnected nodes are placed on.
	pub seed_radius: f64,
	/// Distance from its first target at which a new node is placed.
	pub seed_offset: f64,
}

impl LayoutConfig {
	/// The simulation parameters `force_graph` expects.
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Simulation energy schedule. Alpha moves toward its target by `alpha_decay`
/// per tick and the simulation rests once alpha drops below `alpha_min`.
#[derive(Clone, Debug)]
pub struct EnergyConfig {
	/// Alpha below which the simulation stops stepping.
	pub alpha_min: f64,
	/// Fraction of the gap to the target closed per tick.
	pub alpha_decay: f64,
	/// Target held while at least one node is dragged.
	pub drag_target: f64,
}

/// Complete viewer configuration.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	/// Node geometry.
	pub node: NodeConfig,
	/// Camera limits.
	pub zoom: ZoomConfig,
	/// Force parameters.
	pub layout: LayoutConfig,
	/// Energy schedule.
	pub energy: EnergyConfig,
	/// Screen pixels reserved above the canvas for the header and buttons.
	pub header_inset: f64,
	/// Screen pixels the pointer must travel before a press becomes a drag.
	pub drag_threshold: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			node: NodeConfig {
				radius: 14.0,
				label_size: 20.0,
				label_offset: (12.0, 3.0),
			},
			zoom: ZoomConfig {
				min_scale: 0.5,
				max_scale: 5.0,
				focus_scale: 2.0,
				focus_duration: 0.75,
				wheel_step: 1.1,
			},
			layout: LayoutConfig {
				force_charge: 500.0,
				force_spring: 0.05,
				force_max: 100.0,
				node_speed: 3000.0,
				damping_factor: 0.9,
				node_mass: 10.0,
				seed_radius: 100.0,
				seed_offset: 40.0,
			},
			energy: EnergyConfig {
				alpha_min: 0.001,
				// Reaches alpha_min from 1.0 in about 300 ticks.
				alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
				drag_target: 0.3,
			},
			header_inset: 120.0,
			drag_threshold: 3.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_clamps_to_extent() {
		let zoom = GraphConfig::default().zoom;
		assert_eq!(zoom.clamp(0.1), 0.5);
		assert_eq!(zoom.clamp(9.0), 5.0);
		assert_eq!(zoom.clamp(2.0), 2.0);
	}
}
