//! Diagram configuration: node geometry, routing rails, flow registry and
//! playback order, loaded once from `assets/diagram.json`.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use std::time::Duration;

use log::{error, info};
use serde::Deserialize;

use super::error::{ConfigError, Result};
use super::routing::{self, Path, RouteKind};
use super::types::{Connector, FlowCategory, FlowDef, Node, Point};

const BUILTIN_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/diagram.json"));

static BUILTIN: LazyLock<Result<Diagram>> = LazyLock::new(|| {
	let diagram = Diagram::from_json(BUILTIN_JSON);
	match &diagram {
		Ok(d) => info!(
			"Diagram loaded: {} nodes, {} connectors, {} flows",
			d.nodes.len(),
			d.connectors.len(),
			d.flows.len()
		),
		Err(e) => error!("Diagram configuration rejected: {e}"),
	}
	diagram
});

/// The bundled diagram, parsed and validated on first access.
pub fn builtin() -> Result<&'static Diagram> {
	BUILTIN.as_ref().map_err(Clone::clone)
}

/// Fixed corridor and lane coordinates that keep parallel routes apart.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RoutingRails {
	/// x of the vertical corridor used by left-to-right routes.
	pub right_corridor: f64,
	/// x of the lane left-column services drop through to reach the data layer.
	pub left_service_lane: f64,
	/// x of the vertical corridor used by right-to-left routes.
	pub right_service_lane: f64,
	/// y of the horizontal bus above the data layer.
	pub data_bus: f64,
	/// Exit points left of this x belong to the first service column.
	pub column_split: f64,
}

/// Logical drawing area in diagram units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct CanvasSize {
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

/// "Play all" order and pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Playback {
	/// Categories in the order they are shown.
	pub sequence: Vec<FlowCategory>,
	/// How long each category stays active, in milliseconds.
	pub step_ms: u64,
}

impl Playback {
	/// Per-step duration.
	pub fn step(&self) -> Duration {
		Duration::from_millis(self.step_ms)
	}
}

#[derive(Debug, Deserialize)]
struct DiagramConfig {
	title: String,
	#[serde(default)]
	subtitle: String,
	canvas: CanvasSize,
	rails: RoutingRails,
	flows: Vec<FlowDef>,
	playback: Playback,
	nodes: Vec<Node>,
	connectors: Vec<Connector>,
}

/// Validated diagram with every connector already routed.
#[derive(Debug)]
pub struct Diagram {
	/// Page heading.
	pub title: String,
	/// Line under the heading.
	pub subtitle: String,
	/// Drawing area.
	pub canvas: CanvasSize,
	/// Rails every path was routed with.
	pub rails: RoutingRails,
	/// Auto-play configuration.
	pub playback: Playback,
	flows: Vec<FlowDef>,
	nodes: Vec<Node>,
	connectors: Vec<Connector>,
	node_index: HashMap<String, usize>,
	paths: Vec<Path>,
}

impl Diagram {
	/// Parse, validate and route a JSON configuration document.
	pub fn from_json(src: &str) -> Result<Self> {
		let config: DiagramConfig = serde_json::from_str(src)?;
		Self::from_config(config)
	}

	fn from_config(config: DiagramConfig) -> Result<Self> {
		let mut node_index = HashMap::with_capacity(config.nodes.len());
		for (i, node) in config.nodes.iter().enumerate() {
			if node.bounds.width <= 0.0 || node.bounds.height <= 0.0 {
				return Err(ConfigError::DegenerateNode(node.id.clone()));
			}
			if node_index.insert(node.id.clone(), i).is_some() {
				return Err(ConfigError::DuplicateNode(node.id.clone()));
			}
		}

		let mut routes: HashMap<&FlowCategory, RouteKind> = HashMap::new();
		for flow in &config.flows {
			if routes.insert(&flow.key, flow.route).is_some() {
				return Err(ConfigError::DuplicateFlow(flow.key.clone()));
			}
		}

		if config.playback.sequence.is_empty() {
			return Err(ConfigError::EmptyPlayback);
		}
		if config.playback.step_ms == 0 {
			return Err(ConfigError::ZeroStepDuration);
		}
		if let Some(flow) = config
			.playback
			.sequence
			.iter()
			.find(|f| !routes.contains_key(f))
		{
			return Err(ConfigError::UnknownPlaybackFlow(flow.clone()));
		}

		let mut connector_ids = HashSet::new();
		let mut paths = Vec::with_capacity(config.connectors.len());
		for conn in &config.connectors {
			if !connector_ids.insert(conn.id.as_str()) {
				return Err(ConfigError::DuplicateConnector(conn.id.clone()));
			}
			let lookup = |id: &str| {
				node_index
					.get(id)
					.map(|&i| &config.nodes[i])
					.ok_or_else(|| ConfigError::UnknownNode {
						connector: conn.id.clone(),
						node: id.to_string(),
					})
			};
			let (from, to) = (lookup(&conn.from)?, lookup(&conn.to)?);
			let route = *routes.get(&conn.flow).ok_or_else(|| ConfigError::UnknownFlow {
				connector: conn.id.clone(),
				flow: conn.flow.clone(),
			})?;
			paths.push(routing::generate_path(
				&from.bounds,
				&to.bounds,
				route,
				conn.offset,
				&config.rails,
			));
		}

		Ok(Self {
			title: config.title,
			subtitle: config.subtitle,
			canvas: config.canvas,
			rails: config.rails,
			playback: config.playback,
			flows: config.flows,
			nodes: config.nodes,
			connectors: config.connectors,
			node_index,
			paths,
		})
	}

	/// Nodes in declaration order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Connectors in registry order.
	pub fn connectors(&self) -> &[Connector] {
		&self.connectors
	}

	/// Flow definitions in legend order.
	pub fn flows(&self) -> &[FlowDef] {
		&self.flows
	}

	/// Flow definition by key.
	pub fn flow(&self, key: &FlowCategory) -> Option<&FlowDef> {
		self.flows.iter().find(|f| &f.key == key)
	}

	/// Each connector paired with its precomputed path, in registry order.
	pub fn routes(&self) -> impl Iterator<Item = (&Connector, &Path)> {
		self.connectors.iter().zip(&self.paths)
	}

	/// Precomputed path of a connector by id.
	pub fn path(&self, connector_id: &str) -> Option<&Path> {
		self.routes()
			.find(|(c, _)| c.id == connector_id)
			.map(|(_, p)| p)
	}

	/// Route between two nodes by id using this diagram's rails.
	pub fn route_between(&self, from: &str, to: &str, kind: RouteKind, offset: f64) -> Result<Path> {
		let node = |id: &str| self.node(id).ok_or_else(|| ConfigError::MissingNode(id.to_string()));
		Ok(routing::generate_path(
			&node(from)?.bounds,
			&node(to)?.bounds,
			kind,
			offset,
			&self.rails,
		))
	}

	/// Topmost node whose box contains `p`.
	pub fn node_at(&self, p: Point) -> Option<&Node> {
		self.nodes.iter().rev().find(|n| n.bounds.contains(p))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_diagram::types::Side;

	fn diagram() -> &'static Diagram {
		builtin().expect("bundled diagram is valid")
	}

	fn minimal(nodes: &str, connectors: &str, flows: &str, sequence: &str, step_ms: u64) -> String {
		format!(
			r#"{{
				"title": "t",
				"canvas": {{ "width": 100, "height": 100 }},
				"rails": {{ "right_corridor": 1, "left_service_lane": 1, "right_service_lane": 1, "data_bus": 1, "column_split": 1 }},
				"flows": [{flows}],
				"playback": {{ "sequence": [{sequence}], "step_ms": {step_ms} }},
				"nodes": [{nodes}],
				"connectors": [{connectors}]
			}}"#
		)
	}

	const NODE_A: &str = r#"{"id":"a","title":"A","subtitle":"","category":"service","x":0,"y":0,"width":10,"height":10}"#;
	const NODE_B: &str = r#"{"id":"b","title":"B","subtitle":"","category":"webview","x":50,"y":0,"width":10,"height":10}"#;
	const FLOW_SKY: &str = r##"{"key":"sky","label":"Control","color":"#38BDF8","route":"left-to-right"}"##;

	fn connector(id: &str, from: &str, to: &str, flow: &str) -> String {
		format!(r##"{{"id":"{id}","from":"{from}","to":"{to}","label":"l","color":"#fff","flow":"{flow}"}}"##)
	}

	#[test]
	fn builtin_loads_and_routes_every_connector() {
		let d = diagram();
		assert_eq!(d.nodes().len(), 14);
		assert_eq!(d.connectors().len(), 12);
		assert_eq!(d.routes().count(), 12);
		assert_eq!(d.playback.step(), Duration::from_millis(1800));
		assert_eq!(d.title, "VS Code Extension Architecture");
	}

	#[test]
	fn every_route_is_anchored_on_its_endpoints() {
		let d = diagram();
		for (conn, path) in d.routes() {
			let from = d.node(&conn.from).unwrap();
			let to = d.node(&conn.to).unwrap();
			let flow = d.flow(&conn.flow).unwrap();
			assert_eq!(path.route, flow.route);
			assert_eq!(path.start(), routing::exit_point(&from.bounds, flow.route), "{}", conn.id);
			assert_eq!(
				path.end(),
				routing::entry_point(&to.bounds, flow.route, conn.offset),
				"{}",
				conn.id
			);
			for pair in path.points.windows(2) {
				let (a, b) = (pair[0], pair[1]);
				assert!(
					(a.x == b.x) != (a.y == b.y),
					"{}: {a:?} -> {b:?} is not axis-aligned",
					conn.id
				);
			}
		}
	}

	#[test]
	fn launcher_to_setup_leaves_right_edge_midpoint() {
		let d = diagram();
		let path = d.path("conn-launcher-setup").unwrap();
		assert_eq!(path.route, RouteKind::LeftToRight);
		assert_eq!(path.start(), Point::new(230.0, 422.5));
		assert_eq!(
			path.end(),
			d.node("setup-webview").unwrap().bounds.edge_point(Side::Left)
		);
	}

	#[test]
	fn route_between_matches_precomputed_path() {
		let d = diagram();
		let routed = d
			.route_between("launcher", "setup-webview", RouteKind::LeftToRight, -40.0)
			.unwrap();
		assert_eq!(&routed, d.path("conn-launcher-setup").unwrap());
		assert_eq!(
			d.route_between("launcher", "nowhere", RouteKind::LeftToRight, 0.0),
			Err(ConfigError::MissingNode("nowhere".into()))
		);
	}

	#[test]
	fn node_at_hit_tests_boxes() {
		let d = diagram();
		assert_eq!(d.node_at(Point::new(100.0, 400.0)).map(|n| n.id.as_str()), Some("launcher"));
		assert!(d.node_at(Point::new(5.0, 5.0)).is_none());
	}

	#[test]
	fn rejects_dangling_connector_endpoint() {
		let src = minimal(
			NODE_A,
			&connector("c1", "a", "ghost", "sky"),
			FLOW_SKY,
			r#""sky""#,
			100,
		);
		assert_eq!(
			Diagram::from_json(&src).unwrap_err(),
			ConfigError::UnknownNode {
				connector: "c1".into(),
				node: "ghost".into()
			}
		);
	}

	#[test]
	fn rejects_duplicate_ids() {
		let nodes = format!("{NODE_A},{NODE_A}");
		let src = minimal(&nodes, "", FLOW_SKY, r#""sky""#, 100);
		assert_eq!(
			Diagram::from_json(&src).unwrap_err(),
			ConfigError::DuplicateNode("a".into())
		);

		let nodes = format!("{NODE_A},{NODE_B}");
		let conns = format!(
			"{},{}",
			connector("c1", "a", "b", "sky"),
			connector("c1", "b", "a", "sky")
		);
		let src = minimal(&nodes, &conns, FLOW_SKY, r#""sky""#, 100);
		assert_eq!(
			Diagram::from_json(&src).unwrap_err(),
			ConfigError::DuplicateConnector("c1".into())
		);
	}

	#[test]
	fn rejects_unknown_flows() {
		let nodes = format!("{NODE_A},{NODE_B}");
		let src = minimal(&nodes, &connector("c1", "a", "b", "teal"), FLOW_SKY, r#""sky""#, 100);
		assert!(matches!(
			Diagram::from_json(&src),
			Err(ConfigError::UnknownFlow { .. })
		));

		let src = minimal(&nodes, "", FLOW_SKY, r#""sky","teal""#, 100);
		assert_eq!(
			Diagram::from_json(&src).unwrap_err(),
			ConfigError::UnknownPlaybackFlow(FlowCategory::new("teal"))
		);
	}

	#[test]
	fn rejects_bad_playback() {
		let src = minimal(NODE_A, "", FLOW_SKY, r#""sky""#, 0);
		assert_eq!(Diagram::from_json(&src).unwrap_err(), ConfigError::ZeroStepDuration);

		let src = minimal(NODE_A, "", FLOW_SKY, "", 100);
		assert_eq!(Diagram::from_json(&src).unwrap_err(), ConfigError::EmptyPlayback);
	}

	#[test]
	fn rejects_degenerate_node_and_bad_json() {
		let node = r#"{"id":"z","title":"Z","subtitle":"","category":"data","x":0,"y":0,"width":0,"height":10}"#;
		let src = minimal(node, "", FLOW_SKY, r#""sky""#, 100);
		assert_eq!(
			Diagram::from_json(&src).unwrap_err(),
			ConfigError::DegenerateNode("z".into())
		);
		assert!(matches!(Diagram::from_json("{"), Err(ConfigError::Parse(_))));
	}
}
