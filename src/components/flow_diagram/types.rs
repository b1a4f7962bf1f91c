//! Data model: node boxes, connectors and flow categories.

use std::fmt;

use serde::Deserialize;

use super::routing::RouteKind;

/// A position in diagram coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	/// Horizontal, growing rightward.
	pub x: f64,
	/// Vertical, growing downward.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// One side of a [`Rect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	/// Minimum x.
	Left,
	/// Maximum x.
	Right,
	/// Minimum y.
	Top,
	/// Maximum y.
	Bottom,
}

/// Axis-aligned box in diagram coordinates; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// Midpoint of the given side.
	pub fn edge_point(&self, side: Side) -> Point {
		match side {
			Side::Left => Point::new(self.x, self.y + self.height / 2.0),
			Side::Right => Point::new(self.x + self.width, self.y + self.height / 2.0),
			Side::Top => Point::new(self.x + self.width / 2.0, self.y),
			Side::Bottom => Point::new(self.x + self.width / 2.0, self.y + self.height),
		}
	}

	/// Whether `p` lies inside the box or on its border.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}
}

/// Kind of component a node stands for; decides its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	/// The runtime hosting everything else.
	Host,
	/// Host-side service.
	Service,
	/// UI panel talking to services.
	Webview,
	/// Persistent project data.
	Data,
	/// Files shipped with the host.
	Assets,
}

impl NodeCategory {
	/// Every category, in legend order.
	pub const ALL: [NodeCategory; 5] = [
		NodeCategory::Host,
		NodeCategory::Service,
		NodeCategory::Webview,
		NodeCategory::Data,
		NodeCategory::Assets,
	];

	/// Legend label.
	pub fn label(self) -> &'static str {
		match self {
			NodeCategory::Host => "Host",
			NodeCategory::Service => "Services",
			NodeCategory::Webview => "Webviews",
			NodeCategory::Data => "Data",
			NodeCategory::Assets => "Assets",
		}
	}

	/// Border color as an RGB triple.
	pub fn rgb(self) -> (u8, u8, u8) {
		match self {
			NodeCategory::Host => (96, 165, 250),
			NodeCategory::Service => (45, 212, 191),
			NodeCategory::Webview => (167, 139, 250),
			NodeCategory::Data => (52, 211, 153),
			NodeCategory::Assets => (161, 161, 170),
		}
	}

	/// Opaque border color as a CSS color string.
	pub fn color(self) -> String {
		self.rgba(1.0)
	}

	/// Border color at the given opacity.
	pub fn rgba(self, alpha: f64) -> String {
		let (r, g, b) = self.rgb();
		format!("rgba({r}, {g}, {b}, {alpha})")
	}
}

/// Key of a flow category, e.g. `sky` or `emerald`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct FlowCategory(String);

impl FlowCategory {
	/// Category with the given key.
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// The key as written in the configuration.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for FlowCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A fixed box on the diagram.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	/// Unique id that connectors refer to.
	pub id: String,
	/// Heading drawn in the category color.
	pub title: String,
	/// Small caption under the title.
	pub subtitle: String,
	/// One line each, listed under the caption.
	#[serde(default)]
	pub bullets: Vec<String>,
	/// Component kind.
	pub category: NodeCategory,
	/// Position and size.
	#[serde(flatten)]
	pub bounds: Rect,
}

/// A directed flow between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Connector {
	/// Unique connector id.
	pub id: String,
	/// Source node id.
	pub from: String,
	/// Destination node id.
	pub to: String,
	/// Text of the label pill.
	pub label: String,
	/// Stroke color.
	pub color: String,
	/// Category this connector belongs to.
	pub flow: FlowCategory,
	/// Background supply line, drawn with a sparser dash.
	#[serde(default)]
	pub dashed: bool,
	/// Signed lane-separation hint; parallel connectors use distinct offsets.
	#[serde(default)]
	pub offset: f64,
}

impl Connector {
	/// Whether `node_id` is either endpoint.
	pub fn touches(&self, node_id: &str) -> bool {
		self.from == node_id || self.to == node_id
	}
}

/// Legend entry and routing policy for one flow category.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FlowDef {
	/// Category key connectors refer to.
	pub key: FlowCategory,
	/// Legend text.
	pub label: String,
	/// Legend swatch color.
	pub color: String,
	/// Route template for every connector in this category.
	pub route: RouteKind,
	/// Seconds for the dash pattern to travel one full cycle.
	#[serde(default = "default_cycle_secs")]
	pub cycle_secs: f64,
}

fn default_cycle_secs() -> f64 {
	2.0
}
