//! Turns a [`DiagramData`] into draw-ready geometry. Nothing here touches the DOM.

use std::collections::HashMap;

use log::{info, warn};

use super::geometry::{Path, Point, hexagon_path, route_edge};
use super::types::{ArchLayer, DiagramData, DiagramLink, DiagramNode, LabelSide, NodeShape};

pub const CANVAS_WIDTH: f64 = 1600.0;
pub const CANVAS_HEIGHT: f64 = 850.0;

pub const NODE_RADIUS: f64 = 35.0;
pub const RING_RADIUS: f64 = NODE_RADIUS + 5.0;

pub const LABEL_FONT_PX: f64 = 10.0;
pub const LABEL_LINE_HEIGHT: f64 = LABEL_FONT_PX * 1.2;
const LABEL_NUDGE: f64 = 8.0;

pub const FADE_MS: f64 = 500.0;
const NODE_STAGGER_MS: f64 = 10.0;
const EDGE_STAGGER_MS: f64 = 5.0;

const USER_ICON: &str = "M0-12.5C-6.9-12.5-12.5-6.9-12.5,0S-6.9,12.5,0,12.5,12.5,6.9,12.5,0,6.9-12.5,0-12.5Zm0,5.5A3.5,3.5,0,1,1-3.5-3.5,3.5,3.5,0,0,1,0-7Zm0,18c-4.9,0-9.2-2.8-11.2-7a11.8,11.8,0,0,1,22.4,0c-2,4.2-6.3,7-11.2,7Z";
const DB_ICON: &str = "M0-15c-6.9,0-12.5,2.2-12.5,5v20c0,2.8,5.6,5,12.5,5s12.5-2.2,12.5-5V-10C12.5-12.8,6.9-15,0-15Zm0,28.8c-5.8,0-10.5-1.7-10.5-3.8V-5c1.4,1.8,5.5,3,10.5,3s9.1-1.2,10.5-3v19.1c0,2.1-4.7,3.8-10.5,3.8Z M0-6.2c-5.8,0-10.5-1.7-10.5-3.8S-5.8-13.8,0-13.8s10.5,1.7,10.5,3.8S5.8-6.2,0-6.2Z";
const MONITOR_ICON: &str = "M-12-10h4v20h-4z M-2-15h4v25h-4z M8-5h4v15h-4z";

/// One drawable piece of a node glyph, in node-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphPart {
	/// Dark hexagonal body with a light outline.
	Body(Path),
	/// SVG path data filled with the group colour.
	Icon { svg: &'static str, scale: f64 },
}

impl NodeShape {
	pub fn glyph(self) -> Vec<GlyphPart> {
		let body = || GlyphPart::Body(hexagon_path(NODE_RADIUS));
		match self {
			NodeShape::Hexagon => vec![body()],
			NodeShape::Icon => vec![GlyphPart::Icon {
				svg: USER_ICON,
				scale: 1.0,
			}],
			NodeShape::Db => vec![
				body(),
				GlyphPart::Icon {
					svg: DB_ICON,
					scale: 0.8,
				},
			],
			NodeShape::Monitor => vec![
				body(),
				GlyphPart::Icon {
					svg: MONITOR_ICON,
					scale: 1.0,
				},
			],
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub label: String,
	pub label_anchor: Point,
	pub label_side: LabelSide,
}

impl From<&ArchLayer> for LayerBox {
	fn from(layer: &ArchLayer) -> Self {
		let label_anchor = match layer.label_side {
			LabelSide::Top => Point::new(layer.x + 15.0, layer.y - 10.0),
			LabelSide::Left => Point::new(layer.x - 10.0, layer.y + layer.height / 2.0),
		};
		Self {
			x: layer.x,
			y: layer.y,
			width: layer.width,
			height: layer.height,
			label: layer.label.clone(),
			label_anchor,
			label_side: layer.label_side,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	pub anchor: Point,
	pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub source: String,
	pub target: String,
	pub path: Path,
	pub label: Option<EdgeLabel>,
	pub delay_ms: f64,
}

impl EdgeVisual {
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub node: DiagramNode,
	pub ring: Path,
	pub ring_dashed: bool,
	pub color: &'static str,
	pub glyph: Vec<GlyphPart>,
	pub delay_ms: f64,
}

impl NodeVisual {
	pub fn center(&self) -> Point {
		self.node.position()
	}

	/// Title baseline and optional subtitle baseline, relative to the centre.
	pub fn title_offsets(&self) -> (f64, Option<f64>) {
		if self.node.subtitle.is_some() {
			(-6.0, Some(10.0))
		} else {
			(4.0, None)
		}
	}
}

/// Everything the renderer draws, in z-order: layers, then edges, then nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub layers: Vec<LayerBox>,
	pub edges: Vec<EdgeVisual>,
	pub nodes: Vec<NodeVisual>,
}

impl Scene {
	pub fn build(data: &DiagramData) -> Self {
		for issue in data.validate() {
			warn!("diagram dataset: {issue}");
		}

		let positions: HashMap<&str, Point> = data
			.nodes
			.iter()
			.map(|n| (n.id.as_str(), n.position()))
			.collect();

		let layers = data.layers.iter().map(LayerBox::from).collect();

		let edge_base_delay = data.nodes.len() as f64 * NODE_STAGGER_MS;
		let edges: Vec<EdgeVisual> = data
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| {
				build_edge(link, &positions, edge_base_delay + i as f64 * EDGE_STAGGER_MS)
			})
			.collect();

		let nodes: Vec<NodeVisual> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| NodeVisual {
				node: node.clone(),
				ring: hexagon_path(RING_RADIUS),
				ring_dashed: node.group.is_external(),
				color: node.group.color(),
				glyph: node.shape.glyph(),
				delay_ms: i as f64 * NODE_STAGGER_MS,
			})
			.collect();

		info!(
			"Scene built: {} layers, {} edges ({} drawable), {} nodes",
			data.layers.len(),
			edges.len(),
			edges.iter().filter(|e| !e.path.is_empty()).count(),
			nodes.len()
		);

		Self {
			layers,
			edges,
			nodes,
		}
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.node.id == id)
	}
}

fn build_edge(link: &DiagramLink, positions: &HashMap<&str, Point>, delay_ms: f64) -> EdgeVisual {
	let endpoints = (
		positions.get(link.source.as_str()),
		positions.get(link.target.as_str()),
	);
	let path = match endpoints {
		(Some(&source), Some(&target)) => route_edge(source, target, &link.waypoints, link.curve),
		_ => Path::default(),
	};
	let label = match (&link.label, path.is_empty()) {
		(Some(text), false) => {
			let anchor = match (link.label_offset, path.start()) {
				(Some(offset), Some(source)) => Some(source.offset(offset.x, offset.y)),
				_ => path
					.point_at_length(path.length() / 2.0)
					.map(|mid| mid.offset(0.0, -LABEL_NUDGE)),
			};
			anchor.map(|anchor| EdgeLabel {
				anchor,
				lines: text.split('\n').map(str::to_owned).collect(),
			})
		}
		_ => None,
	};
	EdgeVisual {
		source: link.source.clone(),
		target: link.target.clone(),
		path,
		label,
		delay_ms,
	}
}

/// Fade-in progress in `[0, 1]` for an element with the given delay.
pub fn entrance_alpha(elapsed_ms: f64, delay_ms: f64) -> f64 {
	((elapsed_ms - delay_ms) / FADE_MS).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::geometry::{Segment, TRIM_CLEARANCE};
	use crate::components::arch_diagram::types::{DiagramLink, NodeGroup};

	fn node(id: &str, x: f64, y: f64, group: NodeGroup, shape: NodeShape) -> DiagramNode {
		DiagramNode {
			id: id.into(),
			subtitle: None,
			x,
			y,
			group,
			shape,
			description: format!("{id} service"),
			doc_url: None,
		}
	}

	fn data() -> DiagramData {
		DiagramData {
			nodes: vec![
				node("Corretoras", 100.0, 50.0, NodeGroup::External, NodeShape::Hexagon),
				node("BackOffice", 100.0, 350.0, NodeGroup::Red, NodeShape::Hexagon),
				node("WDI", 1500.0, 350.0, NodeGroup::Green, NodeShape::Db),
			],
			links: vec![
				DiagramLink::new("Corretoras", "BackOffice")
					.label("SINACOR\nFIX\nREST API")
					.label_offset(-80.0, 0.0),
				DiagramLink::new("BackOffice", "WDI").label("Logs"),
				DiagramLink::new("BackOffice", "Nowhere").label("Lost"),
			],
			layers: vec![
				ArchLayer {
					id: "roteamento".into(),
					label: "Roteamento".into(),
					x: 50.0,
					y: 150.0,
					width: 400.0,
					height: 350.0,
					label_side: LabelSide::Top,
				},
				ArchLayer {
					id: "acesso".into(),
					label: "Camada de Acesso".into(),
					x: 150.0,
					y: 575.0,
					width: 850.0,
					height: 75.0,
					label_side: LabelSide::Left,
				},
			],
		}
	}

	#[test]
	fn test_multiline_label_split_in_order() {
		let scene = Scene::build(&data());
		let label = scene.edges[0].label.as_ref().unwrap();
		assert_eq!(label.lines, vec!["SINACOR", "FIX", "REST API"]);
		assert_eq!(label.anchor, Point::new(20.0, 50.0));
	}

	#[test]
	fn test_label_defaults_to_nudged_midpoint() {
		let scene = Scene::build(&data());
		let edge = &scene.edges[1];
		let mid = edge.path.point_at_length(edge.path.length() / 2.0).unwrap();
		let label = edge.label.as_ref().unwrap();
		assert_eq!(label.anchor, Point::new(mid.x, mid.y - 8.0));
		assert_eq!(label.lines, vec!["Logs"]);
	}

	#[test]
	fn test_unknown_target_is_empty_and_unlabelled() {
		let scene = Scene::build(&data());
		let edge = &scene.edges[2];
		assert!(edge.path.is_empty());
		assert!(edge.label.is_none());
	}

	#[test]
	fn test_edge_starts_at_source_and_stops_short() {
		let scene = Scene::build(&data());
		let path = &scene.edges[1].path;
		assert_eq!(path.start(), Some(Point::new(100.0, 350.0)));
		let gap = path.end().unwrap().distance(Point::new(1500.0, 350.0));
		assert!(gap > TRIM_CLEARANCE && gap < TRIM_CLEARANCE + 1.5);
	}

	#[test]
	fn test_external_nodes_get_dashed_ring() {
		let scene = Scene::build(&data());
		assert!(scene.nodes[0].ring_dashed);
		assert!(!scene.nodes[1].ring_dashed);
		assert_eq!(scene.nodes[1].color, "#ef4444");
		assert!(matches!(scene.nodes[0].ring.segments[0], Segment::MoveTo(p) if p == Point::new(0.0, -RING_RADIUS)));
	}

	#[test]
	fn test_glyph_per_shape() {
		assert_eq!(NodeShape::Hexagon.glyph().len(), 1);
		assert!(matches!(NodeShape::Icon.glyph()[..], [GlyphPart::Icon { .. }]));
		assert!(matches!(
			NodeShape::Db.glyph()[..],
			[GlyphPart::Body(_), GlyphPart::Icon { scale, .. }] if scale == 0.8
		));
		assert!(matches!(
			NodeShape::Monitor.glyph()[..],
			[GlyphPart::Body(_), GlyphPart::Icon { .. }]
		));
	}

	#[test]
	fn test_layer_label_anchor_by_side() {
		let scene = Scene::build(&data());
		assert_eq!(scene.layers[0].label_anchor, Point::new(65.0, 140.0));
		assert_eq!(scene.layers[1].label_anchor, Point::new(140.0, 612.5));
	}

	#[test]
	fn test_entrance_order() {
		let scene = Scene::build(&data());
		let delays: Vec<f64> = scene.nodes.iter().map(|n| n.delay_ms).collect();
		assert_eq!(delays, vec![0.0, 10.0, 20.0]);
		let delays: Vec<f64> = scene.edges.iter().map(|e| e.delay_ms).collect();
		assert_eq!(delays, vec![30.0, 35.0, 40.0]);

		assert_eq!(entrance_alpha(0.0, 10.0), 0.0);
		assert_eq!(entrance_alpha(260.0, 10.0), 0.5);
		assert_eq!(entrance_alpha(2000.0, 10.0), 1.0);
	}

	#[test]
	fn test_title_offsets() {
		let mut scene = Scene::build(&data());
		assert_eq!(scene.nodes[0].title_offsets(), (4.0, None));
		scene.nodes[2].node.subtitle = Some("(NOC Tools)".into());
		assert_eq!(scene.nodes[2].title_offsets(), (-6.0, Some(10.0)));
	}
}
