//! Orthogonal connector routing between fixed boxes.
//!
//! Every route kind is a fixed template: leave the source through one side,
//! run along one or two rails, enter the destination through another side.
//! Offsets spread parallel connectors of the same kind into separate lanes.

use serde::Deserialize;

use super::layout::RoutingRails;
use super::types::{Point, Rect, Side};

/// Horizontal stub before the first bend of a corridor route.
const STUB: f64 = 30.0;
/// Drop below a service before turning toward its lane.
const LANE_DROP: f64 = 25.0;
/// Distance between the lanes of adjacent service columns.
const COLUMN_LANE_GAP: f64 = 50.0;
const LANE_SPREAD: f64 = 12.0;
/// Spread of entry ports along the destination's top side.
const PORT_SPREAD: f64 = 20.0;
/// Straight approach above a top-side entry.
const APPROACH: f64 = 20.0;
const DETOUR_DROP: f64 = 30.0;
const DETOUR_JOG: f64 = 20.0;
/// How far below the data bus background routes travel.
const DETOUR_BELOW_BUS: f64 = 60.0;
const DETOUR_OVERSHOOT: f64 = 60.0;

/// Route template a connector follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
	/// Right side out, left side in, through the right corridor.
	LeftToRight,
	/// Left side out, right side in, through the service lane.
	RightToLeft,
	/// Bottom out, top in, down onto the data bus.
	DownToData,
	/// Bottom out, top in, below the data bus so primary flows stay uncrossed.
	ViaBus,
}

impl RouteKind {
	/// Side of the source the route leaves through.
	pub fn exit_side(self) -> Side {
		match self {
			RouteKind::LeftToRight => Side::Right,
			RouteKind::RightToLeft => Side::Left,
			RouteKind::DownToData | RouteKind::ViaBus => Side::Bottom,
		}
	}

	/// Side of the destination the route enters through.
	pub fn entry_side(self) -> Side {
		match self {
			RouteKind::LeftToRight => Side::Left,
			RouteKind::RightToLeft => Side::Right,
			RouteKind::DownToData | RouteKind::ViaBus => Side::Top,
		}
	}
}

/// Point where a route of `kind` leaves its source box.
pub fn exit_point(from: &Rect, kind: RouteKind) -> Point {
	from.edge_point(kind.exit_side())
}

/// Point where a route of `kind` enters its destination box.
///
/// Data-layer drops land on ports spread along the top side so that several
/// services feeding the same store arrive side by side.
pub fn entry_point(to: &Rect, kind: RouteKind, offset: f64) -> Point {
	let edge = to.edge_point(kind.entry_side());
	match kind {
		RouteKind::DownToData => Point::new(edge.x + offset * PORT_SPREAD, edge.y),
		_ => edge,
	}
}

/// A routed connector as an ordered list of waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
	/// Template the waypoints were built from.
	pub route: RouteKind,
	/// Never empty; consecutive points share one coordinate.
	pub points: Vec<Point>,
}

impl Path {
	/// First waypoint, on the source's exit side.
	pub fn start(&self) -> Point {
		self.points[0]
	}

	/// Last waypoint, on the destination's entry side.
	pub fn end(&self) -> Point {
		self.points[self.points.len() - 1]
	}

	/// Where the connector label sits: the waypoint 60% of the way along the list.
	pub fn label_anchor(&self) -> Point {
		let idx = (self.points.len() as f64 * 0.6).floor() as usize;
		self.points[idx.min(self.points.len() - 1)]
	}

	/// Direction of the final segment in radians, for orienting the arrowhead.
	pub fn end_heading(&self) -> f64 {
		let end = self.end();
		let prev = if self.points.len() >= 2 {
			self.points[self.points.len() - 2]
		} else {
			end
		};
		(end.y - prev.y).atan2(end.x - prev.x)
	}
}

/// Route from `from` to `to`.
///
/// Pure: the result depends only on the arguments. The first waypoint is
/// [`exit_point`], the last is [`entry_point`], and consecutive waypoints
/// differ in exactly one coordinate.
pub fn generate_path(
	from: &Rect,
	to: &Rect,
	kind: RouteKind,
	offset: f64,
	rails: &RoutingRails,
) -> Path {
	let start = exit_point(from, kind);
	let end = entry_point(to, kind, offset);
	let mut points = vec![start];
	let mut push = |p: Point| {
		// Zero offsets collapse some bends onto their neighbours.
		if points.last() != Some(&p) {
			points.push(p);
		}
	};

	match kind {
		RouteKind::LeftToRight => {
			let corridor = rails.right_corridor + offset * 2.0;
			let lane_y = start.y + offset * 0.5;
			push(Point::new(start.x + STUB, start.y));
			push(Point::new(start.x + STUB, lane_y));
			push(Point::new(corridor, lane_y));
			push(Point::new(corridor, end.y));
			push(Point::new(end.x - STUB, end.y));
		}
		RouteKind::RightToLeft => {
			let corridor = rails.right_service_lane + offset * 2.0;
			let (out_y, in_y) = (start.y + offset * 0.5, end.y + offset * 0.5);
			push(Point::new(start.x - STUB, start.y));
			push(Point::new(start.x - STUB, out_y));
			push(Point::new(corridor, out_y));
			push(Point::new(corridor, in_y));
			push(Point::new(end.x + STUB, in_y));
			push(Point::new(end.x + STUB, end.y));
		}
		RouteKind::DownToData => {
			let column_lane = if start.x < rails.column_split {
				rails.left_service_lane
			} else {
				rails.left_service_lane + COLUMN_LANE_GAP
			};
			let lane = column_lane + offset * LANE_SPREAD;
			let drop_y = start.y + LANE_DROP;
			push(Point::new(start.x, drop_y));
			push(Point::new(lane, drop_y));
			push(Point::new(lane, rails.data_bus));
			push(Point::new(end.x, rails.data_bus));
			push(Point::new(end.x, end.y - APPROACH));
		}
		RouteKind::ViaBus => {
			let drop_y = start.y + DETOUR_DROP;
			let jog_x = start.x - DETOUR_JOG;
			let bus_y = rails.data_bus + DETOUR_BELOW_BUS;
			let rise_x = end.x + DETOUR_OVERSHOOT;
			push(Point::new(start.x, drop_y));
			push(Point::new(jog_x, drop_y));
			push(Point::new(jog_x, bus_y));
			push(Point::new(rise_x, bus_y));
			push(Point::new(rise_x, end.y - APPROACH));
			push(Point::new(end.x, end.y - APPROACH));
		}
	}
	push(end);

	Path {
		route: kind,
		points,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RAILS: RoutingRails = RoutingRails {
		right_corridor: 1100.0,
		left_service_lane: 540.0,
		right_service_lane: 1000.0,
		data_bus: 800.0,
		column_split: 200.0,
	};

	fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
		Rect {
			x,
			y,
			width,
			height,
		}
	}

	const KINDS: [RouteKind; 4] = [
		RouteKind::LeftToRight,
		RouteKind::RightToLeft,
		RouteKind::DownToData,
		RouteKind::ViaBus,
	];

	fn assert_orthogonal(path: &Path) {
		for pair in path.points.windows(2) {
			let dx = pair[0].x != pair[1].x;
			let dy = pair[0].y != pair[1].y;
			assert!(
				dx ^ dy,
				"{:?} segment {:?} -> {:?} is not axis-aligned",
				path.route,
				pair[0],
				pair[1]
			);
		}
	}

	#[test]
	fn left_to_right_starts_on_right_edge_and_uses_corridor() {
		let launcher = rect(50.0, 380.0, 180.0, 85.0);
		let setup = rect(1300.0, 260.0, 180.0, 85.0);
		let path = generate_path(&launcher, &setup, RouteKind::LeftToRight, -40.0, &RAILS);

		assert_eq!(path.start(), Point::new(230.0, 422.5));
		assert_eq!(path.end(), Point::new(1300.0, 302.5));
		assert!(path.points.iter().any(|p| p.x == 1020.0));
		assert_orthogonal(&path);
	}

	#[test]
	fn zero_offset_collapses_duplicate_bend() {
		let launcher = rect(50.0, 380.0, 180.0, 85.0);
		let agent = rect(1300.0, 380.0, 180.0, 85.0);
		let path = generate_path(&launcher, &agent, RouteKind::LeftToRight, 0.0, &RAILS);

		assert_eq!(
			path.points,
			vec![
				Point::new(230.0, 422.5),
				Point::new(260.0, 422.5),
				Point::new(1100.0, 422.5),
				Point::new(1270.0, 422.5),
				Point::new(1300.0, 422.5),
			]
		);
	}

	#[test]
	fn right_to_left_enters_right_edge() {
		let setup = rect(1300.0, 260.0, 180.0, 85.0);
		let terminal = rect(270.0, 620.0, 180.0, 85.0);
		let path = generate_path(&setup, &terminal, RouteKind::RightToLeft, 30.0, &RAILS);

		assert_eq!(path.start(), Point::new(1300.0, 302.5));
		assert_eq!(path.end(), Point::new(450.0, 662.5));
		assert!(path.points.iter().any(|p| p.x == 1060.0));
		assert_orthogonal(&path);
	}

	#[test]
	fn down_to_data_picks_lane_by_column() {
		let data = rect(50.0, 850.0, 400.0, 85.0);
		let left = generate_path(
			&rect(50.0, 500.0, 180.0, 85.0),
			&data,
			RouteKind::DownToData,
			-1.0,
			&RAILS,
		);
		let right = generate_path(
			&rect(270.0, 500.0, 180.0, 85.0),
			&data,
			RouteKind::DownToData,
			0.0,
			&RAILS,
		);

		assert_eq!(left.points[2].x, 528.0);
		assert_eq!(right.points[2].x, 590.0);
		assert_eq!(left.end(), Point::new(230.0, 850.0));
		assert_eq!(right.end(), Point::new(250.0, 850.0));
		assert!(left.points.iter().any(|p| p.y == RAILS.data_bus));
		assert_orthogonal(&left);
		assert_orthogonal(&right);
	}

	#[test]
	fn via_bus_travels_below_the_bus() {
		let assets = rect(1300.0, 850.0, 180.0, 85.0);
		let artifacts = rect(270.0, 500.0, 180.0, 85.0);
		let path = generate_path(&assets, &artifacts, RouteKind::ViaBus, 0.0, &RAILS);

		assert_eq!(path.start(), Point::new(1390.0, 935.0));
		assert_eq!(path.end(), Point::new(360.0, 500.0));
		assert!(path.points.iter().any(|p| p.y == 860.0));
		assert_orthogonal(&path);
	}

	#[test]
	fn every_kind_is_orthogonal_and_anchored_for_any_offset() {
		let a = rect(50.0, 260.0, 180.0, 85.0);
		let b = rect(1300.0, 500.0, 180.0, 85.0);
		for kind in KINDS {
			for offset in [-60.0, -1.0, 0.0, 0.5, 25.0, 60.0] {
				let path = generate_path(&a, &b, kind, offset, &RAILS);
				assert!(!path.points.is_empty());
				assert_eq!(path.start(), exit_point(&a, kind));
				assert_eq!(path.end(), entry_point(&b, kind, offset));
				assert_orthogonal(&path);
			}
		}
	}

	#[test]
	fn generation_is_deterministic() {
		let a = rect(270.0, 380.0, 180.0, 85.0);
		let b = rect(1300.0, 500.0, 180.0, 85.0);
		for kind in KINDS {
			assert_eq!(
				generate_path(&a, &b, kind, 25.0, &RAILS),
				generate_path(&a, &b, kind, 25.0, &RAILS)
			);
		}
	}

	#[test]
	fn label_and_heading_follow_waypoints() {
		let path = Path {
			route: RouteKind::LeftToRight,
			points: vec![
				Point::new(0.0, 0.0),
				Point::new(10.0, 0.0),
				Point::new(10.0, 10.0),
				Point::new(20.0, 10.0),
				Point::new(20.0, 30.0),
			],
		};
		assert_eq!(path.label_anchor(), Point::new(20.0, 10.0));
		assert!((path.end_heading() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

		let single = Path {
			route: RouteKind::ViaBus,
			points: vec![Point::new(5.0, 5.0)],
		};
		assert_eq!(single.label_anchor(), Point::new(5.0, 5.0));
		assert_eq!(single.end_heading(), 0.0);
	}
}
