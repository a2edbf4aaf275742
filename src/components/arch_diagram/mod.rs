mod adjacency;
mod component;
mod geometry;
mod render;
mod scene;
mod state;
mod types;

pub use component::ArchDiagramCanvas;
pub use types::{ArchLayer, DiagramData, DiagramLink, DiagramNode, LabelSide, NodeGroup, NodeShape};
