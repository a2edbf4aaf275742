use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::adjacency::AdjacencyIndex;
use super::geometry::Point;
use super::scene::{CANVAS_HEIGHT, CANVAS_WIDTH, RING_RADIUS, Scene};
use super::types::{DiagramData, DiagramNode};

pub const DIMMED_NODE_OPACITY: f64 = 0.2;
pub const DIMMED_EDGE_OPACITY: f64 = 0.1;
const HOVER_TRANSITION_SECS: f64 = 0.2;

/// Tooltip offset from the pointer, in CSS pixels.
pub const TOOLTIP_OFFSET: f64 = 15.0;
pub const TOOLTIP_WIDTH: f64 = 260.0;

/// Hover and selection are tracked independently; hover never touches selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
	pub hovered_node: Option<String>,
	pub selected_node: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
	HoverEnter(String),
	HoverExit,
	Click(String),
	Close,
}

impl ViewState {
	pub fn next(&self, interaction: &Interaction) -> ViewState {
		let mut next = self.clone();
		match interaction {
			Interaction::HoverEnter(id) => next.hovered_node = Some(id.clone()),
			Interaction::HoverExit => next.hovered_node = None,
			Interaction::Click(id) => next.selected_node = Some(id.clone()),
			Interaction::Close => next.selected_node = None,
		}
		next
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
	Normal,
	Emphasized,
	Dimmed,
}

/// Visual targets for one hovered node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlight {
	pub focus: usize,
	pub nodes: HashSet<usize>,
	pub edges: HashSet<usize>,
}

impl Highlight {
	pub fn derive(view: &ViewState, scene: &Scene, adjacency: &AdjacencyIndex) -> Option<Self> {
		let id = view.hovered_node.as_deref()?;
		let focus = scene.node_index(id)?;
		let nodes = scene
			.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| adjacency.are_connected(id, &n.node.id))
			.map(|(i, _)| i)
			.collect();
		let edges = scene
			.edges
			.iter()
			.enumerate()
			.filter(|(_, e)| e.touches(id))
			.map(|(i, _)| i)
			.collect();
		Some(Self {
			focus,
			nodes,
			edges,
		})
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub title: String,
	pub description: String,
	pub x: f64,
	pub y: f64,
}

/// Maps the 1600x850 logical viewport into the canvas, preserving aspect.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	pub fn fit(width: f64, height: f64) -> Self {
		let k = (width / CANVAS_WIDTH).min(height / CANVAS_HEIGHT).max(f64::EPSILON);
		Self {
			x: (width - CANVAS_WIDTH * k) / 2.0,
			y: (height - CANVAS_HEIGHT * k) / 2.0,
			k,
		}
	}
}

pub struct DiagramState {
	pub scene: Scene,
	pub adjacency: AdjacencyIndex,
	pub view: ViewState,
	pub highlight: Option<Highlight>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	/// Milliseconds since the scene was first shown.
	pub elapsed_ms: f64,
	pointer: Option<(f64, f64)>,
	node_alpha: Vec<f64>,
	edge_alpha: Vec<f64>,
}

impl DiagramState {
	pub fn new(data: &DiagramData, width: f64, height: f64) -> Self {
		let scene = Scene::build(data);
		let adjacency = AdjacencyIndex::build(&data.links);
		let (node_alpha, edge_alpha) = (vec![1.0; scene.nodes.len()], vec![1.0; scene.edges.len()]);
		Self {
			scene,
			adjacency,
			view: ViewState::default(),
			highlight: None,
			transform: ViewTransform::fit(width, height),
			width,
			height,
			elapsed_ms: 0.0,
			pointer: None,
			node_alpha,
			edge_alpha,
		}
	}

	/// Apply one interaction and re-derive every visual target from the result.
	pub fn dispatch(&mut self, interaction: Interaction) {
		let next = self.view.next(&interaction);
		if next != self.view {
			debug!("view state {:?} -> {:?}", self.view, next);
		}
		if let Interaction::HoverEnter(id) = &interaction {
			debug!("hover {id}: {} neighbours", self.adjacency.neighbors(id).count());
		}
		self.view = next;
		self.highlight = Highlight::derive(&self.view, &self.scene, &self.adjacency);
		if self.highlight.is_none() {
			self.pointer = None;
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Top-most node whose ring contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let pointer = Point::new(gx, gy);
		self.scene
			.nodes
			.iter()
			.rposition(|n| n.center().distance(pointer) <= RING_RADIUS)
	}

	/// Hover whatever node (if any) lies under the pointer.
	pub fn set_hover(&mut self, idx: Option<usize>) {
		let id = idx.and_then(|i| self.scene.nodes.get(i)).map(|n| n.node.id.clone());
		if id == self.view.hovered_node {
			return;
		}
		match id {
			Some(id) => self.dispatch(Interaction::HoverEnter(id)),
			None => self.dispatch(Interaction::HoverExit),
		}
	}

	pub fn select(&mut self, idx: usize) -> Option<DiagramNode> {
		let node = self.scene.nodes.get(idx)?.node.clone();
		self.dispatch(Interaction::Click(node.id.clone()));
		Some(node)
	}

	pub fn close(&mut self) {
		self.dispatch(Interaction::Close);
	}

	/// Track the pointer, in container pixels, for tooltip placement.
	pub fn move_pointer(&mut self, x: f64, y: f64) {
		if self.highlight.is_some() {
			self.pointer = Some((x, y));
		}
	}

	pub fn tooltip(&self) -> Option<Tooltip> {
		let highlight = self.highlight.as_ref()?;
		let node = &self.scene.nodes.get(highlight.focus)?.node;
		let (px, py) = self.pointer?;
		Some(Tooltip {
			title: node.id.clone(),
			description: node.description.clone(),
			x: (px + TOOLTIP_OFFSET).min(self.width - TOOLTIP_WIDTH).max(0.0),
			y: (py + TOOLTIP_OFFSET).min(self.height).max(0.0),
		})
	}

	pub fn target_node_opacity(&self, idx: usize) -> f64 {
		match &self.highlight {
			Some(h) if !h.nodes.contains(&idx) => DIMMED_NODE_OPACITY,
			_ => 1.0,
		}
	}

	pub fn edge_emphasis(&self, idx: usize) -> EdgeEmphasis {
		match &self.highlight {
			None => EdgeEmphasis::Normal,
			Some(h) if h.edges.contains(&idx) => EdgeEmphasis::Emphasized,
			Some(_) => EdgeEmphasis::Dimmed,
		}
	}

	pub fn target_edge_opacity(&self, idx: usize) -> f64 {
		match self.edge_emphasis(idx) {
			EdgeEmphasis::Dimmed => DIMMED_EDGE_OPACITY,
			_ => 1.0,
		}
	}

	pub fn is_glowing(&self, idx: usize) -> bool {
		self.highlight.as_ref().is_some_and(|h| h.focus == idx)
	}

	/// Current (eased) opacities.
	pub fn node_opacity(&self, idx: usize) -> f64 {
		self.node_alpha.get(idx).copied().unwrap_or(1.0)
	}

	pub fn edge_opacity(&self, idx: usize) -> f64 {
		self.edge_alpha.get(idx).copied().unwrap_or(1.0)
	}

	pub fn tick(&mut self, dt: f64) {
		self.elapsed_ms += dt * 1000.0;
		let step = (dt / HOVER_TRANSITION_SECS).min(1.0);
		for i in 0..self.node_alpha.len() {
			let target = self.target_node_opacity(i);
			self.node_alpha[i] = approach(self.node_alpha[i], target, step);
		}
		for i in 0..self.edge_alpha.len() {
			let target = self.target_edge_opacity(i);
			self.edge_alpha[i] = approach(self.edge_alpha[i], target, step);
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.transform = ViewTransform::fit(width, height);
	}
}

fn approach(current: f64, target: f64, step: f64) -> f64 {
	if current < target {
		(current + step).min(target)
	} else {
		(current - step).max(target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::types::{DiagramLink, NodeGroup, NodeShape};

	fn node(id: &str, x: f64, y: f64) -> DiagramNode {
		DiagramNode {
			id: id.into(),
			subtitle: None,
			x,
			y,
			group: NodeGroup::Orange,
			shape: NodeShape::Hexagon,
			description: format!("about {id}"),
			doc_url: Some(format!("#/docs/{id}")),
		}
	}

	fn state() -> DiagramState {
		let data = DiagramData {
			nodes: vec![node("A", 0.0, 0.0), node("B", 100.0, 0.0), node("C", 800.0, 400.0)],
			links: vec![DiagramLink::new("A", "B")],
			layers: vec![],
		};
		DiagramState::new(&data, CANVAS_WIDTH, CANVAS_HEIGHT)
	}

	fn dimmed(s: &DiagramState) -> Vec<usize> {
		(0..s.scene.nodes.len())
			.filter(|&i| s.target_node_opacity(i) < 1.0)
			.collect()
	}

	#[test]
	fn test_hover_keeps_neighbors_and_touching_edges() {
		let mut s = state();
		s.dispatch(Interaction::HoverEnter("A".into()));

		assert_eq!(s.target_node_opacity(1), 1.0);
		assert_eq!(s.target_node_opacity(2), DIMMED_NODE_OPACITY);
		assert_eq!(s.edge_emphasis(0), EdgeEmphasis::Emphasized);
		assert_eq!(s.target_edge_opacity(0), 1.0);
		assert!(s.is_glowing(0));
		assert!(!s.is_glowing(1));
	}

	#[test]
	fn test_hover_isolated_node_dims_everything_else() {
		let mut s = state();
		s.dispatch(Interaction::HoverEnter("C".into()));

		assert_eq!(dimmed(&s), vec![0, 1]);
		assert_eq!(s.edge_emphasis(0), EdgeEmphasis::Dimmed);
		assert_eq!(s.target_edge_opacity(0), DIMMED_EDGE_OPACITY);
	}

	#[test]
	fn test_repeated_hover_is_idempotent() {
		let mut s = state();
		s.dispatch(Interaction::HoverEnter("C".into()));
		let once = (s.view.clone(), dimmed(&s));
		s.dispatch(Interaction::HoverEnter("C".into()));
		assert_eq!((s.view.clone(), dimmed(&s)), once);

		s.dispatch(Interaction::HoverExit);
		assert!(dimmed(&s).is_empty());
		assert_eq!(s.edge_emphasis(0), EdgeEmphasis::Normal);
		assert!(s.tooltip().is_none());
	}

	#[test]
	fn test_newer_hover_supersedes_older() {
		let mut s = state();
		s.dispatch(Interaction::HoverEnter("C".into()));
		s.dispatch(Interaction::HoverEnter("A".into()));
		assert_eq!(dimmed(&s), vec![2]);
		s.dispatch(Interaction::HoverExit);
		s.dispatch(Interaction::HoverExit);
		assert!(s.highlight.is_none());
	}

	#[test]
	fn test_selection_survives_hover() {
		let mut s = state();
		let picked = s.select(1).unwrap();
		assert_eq!(picked.id, "B");
		s.dispatch(Interaction::HoverEnter("A".into()));
		s.dispatch(Interaction::HoverExit);
		assert_eq!(s.view.selected_node.as_deref(), Some("B"));

		s.close();
		assert_eq!(s.view, ViewState::default());
	}

	#[test]
	fn test_view_state_serializes() {
		let view = ViewState::default().next(&Interaction::Click("Hades".into()));
		let json = serde_json::to_value(&view).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "hoveredNode": null, "selectedNode": "Hades" })
		);
		let back: ViewState = serde_json::from_value(json).unwrap();
		assert_eq!(back, view);
	}

	#[test]
	fn test_tooltip_follows_pointer() {
		let mut s = state();
		s.move_pointer(10.0, 10.0);
		assert!(s.tooltip().is_none());

		s.set_hover(Some(0));
		s.move_pointer(100.0, 200.0);
		let tip = s.tooltip().unwrap();
		assert_eq!(tip.title, "A");
		assert_eq!(tip.description, "about A");
		assert_eq!((tip.x, tip.y), (115.0, 215.0));

		s.move_pointer(CANVAS_WIDTH - 10.0, 0.0);
		assert_eq!(s.tooltip().unwrap().x, CANVAS_WIDTH - TOOLTIP_WIDTH);
	}

	#[test]
	fn test_hit_testing_through_transform() {
		let mut s = state();
		s.resize(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT);
		assert_eq!(s.transform.k, 0.5);
		assert_eq!(s.transform.y, CANVAS_HEIGHT / 4.0);

		let (sx, sy) = (s.transform.x + 100.0 * 0.5, s.transform.y);
		assert_eq!(s.node_at_position(sx, sy), Some(1));
		assert_eq!(s.node_at_position(s.transform.x + 300.0, s.transform.y + 100.0), None);
	}

	#[test]
	fn test_opacity_eases_to_target() {
		let mut s = state();
		s.set_hover(Some(2));
		s.tick(0.1);
		assert!((s.node_opacity(0) - 0.5).abs() < 1e-9);
		s.tick(0.1);
		assert_eq!(s.node_opacity(0), DIMMED_NODE_OPACITY);
		assert_eq!(s.edge_opacity(0), DIMMED_EDGE_OPACITY);

		s.set_hover(None);
		for _ in 0..20 {
			s.tick(1.0 / 60.0);
		}
		assert_eq!(s.node_opacity(0), 1.0);
		assert_eq!(s.edge_opacity(0), 1.0);
	}
}
