//! Visual theming for the force graph, and the pure style derivation used by
//! every sync and highlight.

use super::state::Highlight;
use super::store::{Link, Node};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS color string: hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Categorical palette indexed by node group.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Colors in palette order.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// The ten-color categorical scheme (d3 `schemeCategory10`).
	pub fn category10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x1f, 0x77, 0xb4), // Blue
				Color::rgb(0xff, 0x7f, 0x0e), // Orange
				Color::rgb(0x2c, 0xa0, 0x2c), // Green
				Color::rgb(0xd6, 0x27, 0x28), // Red
				Color::rgb(0x94, 0x67, 0xbd), // Purple
				Color::rgb(0x8c, 0x56, 0x4b), // Brown
				Color::rgb(0xe3, 0x77, 0xc2), // Pink
				Color::rgb(0x7f, 0x7f, 0x7f), // Gray
				Color::rgb(0xbc, 0xbd, 0x22), // Olive
				Color::rgb(0x17, 0xbe, 0xcf), // Cyan
			],
		}
	}

	/// Color for a group, wrapping negative groups as well.
	pub fn for_group(&self, group: i64) -> Color {
		let len = self.colors.len() as i64;
		self.colors[group.rem_euclid(len) as usize]
	}
}

/// Background fill behind the scene.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Link line style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Stroke of a link outside any highlight.
	pub color: Color,
	/// Stroke width in world units.
	pub width: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Default link stroke.
	pub link: LinkStyle,
	/// Fill and stroke used for highlighted nodes and links.
	pub highlight: Color,
	/// Label text color.
	pub label: Color,
	/// Node fills by group.
	pub palette: NodePalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgb(0x99, 0x99, 0x99),
				width: 1.0,
			},
			highlight: Color::rgb(0xff, 0xcc, 0x00),
			label: Color::rgb(255, 255, 255),
			palette: NodePalette::category10(),
		}
	}
}

/// Pointer shown over a node's label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	/// Plain arrow.
	Default,
	/// The label opens an external link.
	Pointer,
}

impl Cursor {
	/// CSS `cursor` value.
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Pointer => "pointer",
		}
	}
}

/// Derived appearance of a node visual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Circle fill.
	pub fill: Color,
	/// Pointer over the label.
	pub cursor: Cursor,
}

/// Appearance of `node` under the current highlight.
pub fn style_for(node: &Node, highlight: Option<&Highlight>, theme: &Theme) -> NodeStyle {
	let fill = match highlight {
		Some(h) if h.is_connected(&node.id) => theme.highlight,
		_ => theme.palette.for_group(node.group),
	};
	let cursor = if node.link.is_some() {
		Cursor::Pointer
	} else {
		Cursor::Default
	};
	NodeStyle { fill, cursor }
}

/// Stroke color of `link` under the current highlight.
pub fn link_stroke_for(link: &Link, highlight: Option<&Highlight>, theme: &Theme) -> Color {
	match highlight {
		Some(h) if link.touches(h.focus()) => theme.highlight,
		_ => theme.link.color,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::store::GraphStore;

	fn node(id: &str, group: i64, targets: &[&str], link: Option<&str>) -> Node {
		Node {
			id: id.into(),
			group,
			targets: targets.iter().map(|t| t.to_string()).collect(),
			link: link.map(Into::into),
		}
	}

	#[test]
	fn palette_wraps_by_group() {
		let theme = Theme::default();
		let a = style_for(&node("a", 3, &[], None), None, &theme);
		let b = style_for(&node("b", 13, &[], None), None, &theme);
		let c = style_for(&node("c", -7, &[], None), None, &theme);
		assert_eq!(a.fill, theme.palette.colors[3]);
		assert_eq!(b.fill, a.fill);
		assert_eq!(c.fill, a.fill);
	}

	#[test]
	fn cursor_reflects_link() {
		let theme = Theme::default();
		let linked = style_for(&node("a", 0, &[], Some("https://x.org")), None, &theme);
		let plain = style_for(&node("b", 0, &[], None), None, &theme);
		assert_eq!(linked.cursor, Cursor::Pointer);
		assert_eq!(plain.cursor.as_css(), "default");
	}

	#[test]
	fn highlight_colors_adjacent_only() {
		let theme = Theme::default();
		let mut store = GraphStore::new();
		store.add_node(node("a", 0, &["b"], None)).unwrap();
		store.add_node(node("b", 1, &["c"], None)).unwrap();
		store.add_node(node("c", 2, &[], None)).unwrap();
		let h = Highlight::new("a", &store);

		let fills: Vec<Color> = store
			.nodes()
			.iter()
			.map(|n| style_for(n, Some(&h), &theme).fill)
			.collect();
		assert_eq!(fills, [theme.highlight, theme.highlight, theme.palette.colors[2]]);

		let strokes: Vec<Color> = store
			.links()
			.map(|l| link_stroke_for(l, Some(&h), &theme))
			.collect();
		assert_eq!(strokes, [theme.highlight, theme.link.color]);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(0xff, 0xcc, 0x00).to_css(), "#ffcc00");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
