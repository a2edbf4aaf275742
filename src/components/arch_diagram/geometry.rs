//! Pure 2D geometry for the diagram: hexagon outlines, edge routing and path measurement.

use serde::{Deserialize, Serialize};

use super::types::CurveStyle;

/// Distance from a node centre inside which an edge must not end.
pub const TRIM_CLEARANCE: f64 = 40.0;

/// Segments used when flattening one cubic for measurement.
const CUBIC_STEPS: usize = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	pub fn offset(self, dx: f64, dy: f64) -> Point {
		Point::new(self.x + dx, self.y + dy)
	}

	fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
	MoveTo(Point),
	LineTo(Point),
	CubicTo(Point, Point, Point),
	Close,
}

/// A path in logical canvas coordinates. An empty path means "do not draw".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
	pub segments: Vec<Segment>,
}

impl Path {
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	pub fn start(&self) -> Option<Point> {
		match self.segments.first()? {
			Segment::MoveTo(p) => Some(*p),
			_ => None,
		}
	}

	pub fn end(&self) -> Option<Point> {
		self.flatten().last().copied()
	}

	/// Direction of travel at the end of the path, as (from, to).
	pub fn end_tangent(&self) -> Option<(Point, Point)> {
		let points = self.flatten();
		let end = *points.last()?;
		let from = points.iter().rev().find(|p| p.distance(end) > 1e-6)?;
		Some((*from, end))
	}

	/// Polyline approximation; closed paths repeat their first point.
	pub fn flatten(&self) -> Vec<Point> {
		let mut out = Vec::new();
		let (mut cursor, mut first) = (Point::default(), Point::default());
		for seg in &self.segments {
			match *seg {
				Segment::MoveTo(p) => {
					cursor = p;
					first = p;
					out.push(p);
				}
				Segment::LineTo(p) => {
					cursor = p;
					out.push(p);
				}
				Segment::CubicTo(c1, c2, p) => {
					for i in 1..=CUBIC_STEPS {
						out.push(cubic_point(cursor, c1, c2, p, i as f64 / CUBIC_STEPS as f64));
					}
					cursor = p;
				}
				Segment::Close => {
					cursor = first;
					out.push(first);
				}
			}
		}
		out
	}

	pub fn length(&self) -> f64 {
		polyline_length(&self.flatten())
	}

	pub fn point_at_length(&self, distance: f64) -> Option<Point> {
		point_along(&self.flatten(), distance)
	}
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
	let mt = 1.0 - t;
	let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
	Point::new(
		a * p0.x + b * c1.x + c * c2.x + d * p1.x,
		a * p0.y + b * c1.y + c * c2.y + d * p1.y,
	)
}

fn polyline_length(points: &[Point]) -> f64 {
	points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

fn point_along(points: &[Point], distance: f64) -> Option<Point> {
	let first = *points.first()?;
	if distance <= 0.0 {
		return Some(first);
	}
	let mut remaining = distance;
	for w in points.windows(2) {
		let len = w[0].distance(w[1]);
		if remaining <= len {
			return Some(if len > 0.0 {
				w[0].lerp(w[1], remaining / len)
			} else {
				w[1]
			});
		}
		remaining -= len;
	}
	points.last().copied()
}

/// Vertices of a hexagon with circumradius `radius` centred on the origin,
/// starting at the top and running clockwise.
pub fn hexagon_outline(radius: f64) -> [Point; 6] {
	let half_w = radius * 3f64.sqrt() / 2.0;
	[
		Point::new(0.0, -radius),
		Point::new(half_w, -radius / 2.0),
		Point::new(half_w, radius / 2.0),
		Point::new(0.0, radius),
		Point::new(-half_w, radius / 2.0),
		Point::new(-half_w, -radius / 2.0),
	]
}

pub fn hexagon_path(radius: f64) -> Path {
	let outline = hexagon_outline(radius);
	let mut segments = vec![Segment::MoveTo(outline[0])];
	segments.extend(outline[1..].iter().map(|&p| Segment::LineTo(p)));
	segments.push(Segment::Close);
	Path { segments }
}

/// Route an edge between two node centres.
///
/// Plain edges become a vertically biased S-curve that stops
/// [`TRIM_CLEARANCE`] short of the target. Edges with waypoints or a basis
/// curve run through every point and end on the raw target.
pub fn route_edge(source: Point, target: Point, waypoints: &[Point], curve: CurveStyle) -> Path {
	let mut points = Vec::with_capacity(waypoints.len() + 2);
	points.push(source);
	points.extend_from_slice(waypoints);
	points.push(target);

	if polyline_length(&points) == 0.0 {
		return Path::default();
	}

	if !waypoints.is_empty() || curve == CurveStyle::Basis {
		return match curve {
			CurveStyle::Basis => basis_spline(&points),
			CurveStyle::Default => polyline(&points),
		};
	}

	let end = trim_end(&points, target, TRIM_CLEARANCE);
	let mid_y = source.y + (target.y - source.y) / 2.0;
	Path {
		segments: vec![
			Segment::MoveTo(source),
			Segment::CubicTo(
				Point::new(source.x, mid_y),
				Point::new(end.x, mid_y),
				end,
			),
		],
	}
}

/// Walk back from the end of `points` in unit steps until the point lies
/// further than `clearance` from `target`.
pub fn trim_end(points: &[Point], target: Point, clearance: f64) -> Point {
	let total = polyline_length(points);
	let Some(mut point) = points.last().copied() else {
		return target;
	};
	let mut d = total;
	while d >= 0.0 {
		if let Some(p) = point_along(points, d) {
			point = p;
		}
		if point.distance(target) > clearance {
			break;
		}
		d -= 1.0;
	}
	point
}

pub fn polyline(points: &[Point]) -> Path {
	let Some((&first, rest)) = points.split_first() else {
		return Path::default();
	};
	let mut segments = vec![Segment::MoveTo(first)];
	segments.extend(rest.iter().map(|&p| Segment::LineTo(p)));
	Path { segments }
}

/// Uniform cubic B-spline that starts and ends on the first and last point.
pub fn basis_spline(points: &[Point]) -> Path {
	match points {
		[] => return Path::default(),
		[_] | [_, _] => return polyline(points),
		_ => {}
	}

	let mut segments = vec![Segment::MoveTo(points[0])];
	let (mut p0, mut p1) = (points[0], points[1]);
	segments.push(Segment::LineTo(Point::new(
		(5.0 * p0.x + p1.x) / 6.0,
		(5.0 * p0.y + p1.y) / 6.0,
	)));
	for &p in &points[2..] {
		segments.push(basis_segment(p0, p1, p));
		(p0, p1) = (p1, p);
	}
	segments.push(basis_segment(p0, p1, p1));
	segments.push(Segment::LineTo(p1));
	Path { segments }
}

fn basis_segment(p0: Point, p1: Point, p: Point) -> Segment {
	Segment::CubicTo(
		Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
		Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
		Point::new((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn test_hexagon_vertices_on_circle() {
		for r in [1.0, 35.0, 40.0, 123.5] {
			let outline = hexagon_outline(r);
			assert_eq!(outline.len(), 6);
			for p in outline {
				assert!(approx(p.distance(Point::default()), r));
			}
		}
	}

	#[test]
	fn test_hexagon_path_closes() {
		let path = hexagon_path(40.0);
		assert_eq!(path.segments.last(), Some(&Segment::Close));
		let flat = path.flatten();
		assert_eq!(flat.len(), 7);
		assert_eq!(flat.first(), flat.last());
	}

	#[test]
	fn test_simple_route_trims_end() {
		let (source, target) = (Point::new(250.0, 200.0), Point::new(250.0, 350.0));
		let path = route_edge(source, target, &[], CurveStyle::Default);

		assert_eq!(path.start(), Some(source));
		let end = path.end().unwrap();
		let gap = end.distance(target);
		assert!(gap > TRIM_CLEARANCE, "gap {gap} inside clearance");
		assert!(gap <= TRIM_CLEARANCE + 1.0 + 1e-6, "gap {gap} too far out");
	}

	#[test]
	fn test_simple_route_bows_through_mid_y() {
		let path = route_edge(
			Point::new(100.0, 50.0),
			Point::new(100.0, 350.0),
			&[],
			CurveStyle::Default,
		);
		match path.segments[1] {
			Segment::CubicTo(c1, c2, _) => {
				assert_eq!(c1, Point::new(100.0, 200.0));
				assert_eq!(c2.y, 200.0);
			}
			other => panic!("expected cubic, got {other:?}"),
		}
	}

	#[test]
	fn test_waypoint_route_ends_on_target() {
		let target = Point::new(250.0, 600.0);
		let path = route_edge(
			Point::new(250.0, 350.0),
			target,
			&[Point::new(250.0, 450.0)],
			CurveStyle::Default,
		);

		assert_eq!(path.segments.len(), 3);
		assert_eq!(path.end(), Some(target));
		assert!(approx(path.length(), 250.0));
	}

	#[test]
	fn test_basis_route_hits_endpoints() {
		let (source, target) = (Point::new(1050.0, 170.0), Point::new(1300.0, 350.0));
		let path = route_edge(source, target, &[Point::new(1200.0, 170.0)], CurveStyle::Basis);

		assert_eq!(path.start(), Some(source));
		assert_eq!(path.end(), Some(target));
		assert!(path.segments.iter().any(|s| matches!(s, Segment::CubicTo(..))));
	}

	#[test]
	fn test_basis_with_two_points_is_a_line() {
		let path = basis_spline(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
		assert_eq!(
			path.segments,
			vec![
				Segment::MoveTo(Point::new(0.0, 0.0)),
				Segment::LineTo(Point::new(10.0, 0.0))
			]
		);
	}

	#[test]
	fn test_zero_length_route_is_empty() {
		let p = Point::new(10.0, 10.0);
		assert!(route_edge(p, p, &[], CurveStyle::Default).is_empty());
		assert!(route_edge(p, p, &[p], CurveStyle::Basis).is_empty());
	}

	#[test]
	fn test_trim_when_nodes_overlap_falls_back_to_start() {
		let (source, target) = (Point::new(0.0, 0.0), Point::new(20.0, 0.0));
		let end = trim_end(&[source, target], target, TRIM_CLEARANCE);
		assert!(end.distance(source) < 1.0);
	}

	#[test]
	fn test_point_at_length_midpoint() {
		let path = polyline(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
		assert_eq!(path.point_at_length(50.0), Some(Point::new(50.0, 0.0)));
		assert_eq!(path.point_at_length(500.0), Some(Point::new(100.0, 0.0)));
	}

	#[test]
	fn test_end_tangent_follows_last_segment() {
		let path = polyline(&[Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0)]);
		let (from, to) = path.end_tangent().unwrap();
		assert_eq!(to, Point::new(10.0, 10.0));
		assert_eq!(from, Point::new(0.0, 10.0));
	}
}
