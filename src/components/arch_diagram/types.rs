use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Point;

/// Colour family of a node. Only affects tinting; `External` also dashes the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeGroup {
	Red,
	Orange,
	Green,
	Blue,
	External,
}

impl NodeGroup {
	pub fn color(self) -> &'static str {
		match self {
			NodeGroup::Red => "#ef4444",
			NodeGroup::Orange => "#f97316",
			NodeGroup::Green => "#22c55e",
			NodeGroup::Blue => "#3b82f6",
			NodeGroup::External => "#f5f5f5",
		}
	}

	pub fn is_external(self) -> bool {
		matches!(self, NodeGroup::External)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
	Hexagon,
	Icon,
	Db,
	Monitor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveStyle {
	#[default]
	Default,
	/// Uniform cubic B-spline through the control points.
	Basis,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelSide {
	#[default]
	Top,
	Left,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
	pub id: String,
	pub subtitle: Option<String>,
	pub x: f64,
	pub y: f64,
	pub group: NodeGroup,
	pub shape: NodeShape,
	pub description: String,
	pub doc_url: Option<String>,
}

impl DiagramNode {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramLink {
	pub source: String,
	pub target: String,
	pub label: Option<String>,
	/// Label anchor relative to the source node.
	pub label_offset: Option<Point>,
	#[serde(default)]
	pub waypoints: Vec<Point>,
	#[serde(default)]
	pub curve: CurveStyle,
}

impl DiagramLink {
	pub fn new(source: &str, target: &str) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			..Self::default()
		}
	}

	pub fn label(mut self, label: &str) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn label_offset(mut self, x: f64, y: f64) -> Self {
		self.label_offset = Some(Point::new(x, y));
		self
	}

	pub fn waypoint(mut self, x: f64, y: f64) -> Self {
		self.waypoints.push(Point::new(x, y));
		self
	}

	pub fn basis(mut self) -> Self {
		self.curve = CurveStyle::Basis;
		self
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchLayer {
	pub id: String,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub label_side: LabelSide,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramData {
	pub nodes: Vec<DiagramNode>,
	pub links: Vec<DiagramLink>,
	pub layers: Vec<ArchLayer>,
}

/// Integrity problems found in a dataset. None of them abort rendering.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DatasetIssue {
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	#[error("link #{link} references unknown node `{id}`")]
	UnknownEndpoint { link: usize, id: String },
}

impl DiagramData {
	pub fn validate(&self) -> Vec<DatasetIssue> {
		let mut issues = Vec::new();
		let mut seen = HashSet::new();
		for node in &self.nodes {
			if !seen.insert(node.id.as_str()) {
				issues.push(DatasetIssue::DuplicateNode(node.id.clone()));
			}
		}
		for (i, link) in self.links.iter().enumerate() {
			for id in [&link.source, &link.target] {
				if !seen.contains(id.as_str()) {
					issues.push(DatasetIssue::UnknownEndpoint {
						link: i,
						id: id.clone(),
					});
				}
			}
		}
		issues
	}
}
