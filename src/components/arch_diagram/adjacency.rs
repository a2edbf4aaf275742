use std::collections::{HashMap, HashSet};

use super::types::DiagramLink;

/// Undirected one-hop neighbourhoods, keyed by node id.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	links: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
	pub fn build(links: &[DiagramLink]) -> Self {
		let mut index: HashMap<String, HashSet<String>> = HashMap::new();
		for link in links {
			index
				.entry(link.source.clone())
				.or_default()
				.insert(link.target.clone());
			index
				.entry(link.target.clone())
				.or_default()
				.insert(link.source.clone());
		}
		Self { links: index }
	}

	/// Neighbours of `id`; nodes without edges yield nothing.
	pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
		self.links
			.get(id)
			.into_iter()
			.flat_map(|set| set.iter().map(String::as_str))
	}

	pub fn are_connected(&self, a: &str, b: &str) -> bool {
		a == b
			|| self.links.get(a).is_some_and(|s| s.contains(b))
			|| self.links.get(b).is_some_and(|s| s.contains(a))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn links() -> Vec<DiagramLink> {
		vec![
			DiagramLink::new("Hades", "Ares"),
			DiagramLink::new("Ares", "Caronte"),
			DiagramLink::new("Hades", "Caronte"),
			DiagramLink::new("B3", "Hades"),
		]
	}

	#[test]
	fn test_connections_are_symmetric() {
		let links = links();
		let index = AdjacencyIndex::build(&links);
		for link in &links {
			assert!(index.are_connected(&link.source, &link.target));
			assert!(index.are_connected(&link.target, &link.source));
		}
	}

	#[test]
	fn test_self_connected_even_without_edges() {
		let index = AdjacencyIndex::build(&links());
		assert!(index.are_connected("Hades", "Hades"));
		assert!(index.are_connected("Zabbix", "Zabbix"));
	}

	#[test]
	fn test_no_multi_hop() {
		let index = AdjacencyIndex::build(&links());
		assert!(!index.are_connected("B3", "Ares"));
		assert!(!index.are_connected("Zabbix", "Hades"));
	}

	#[test]
	fn test_neighbors_of_isolated_node_is_empty() {
		let index = AdjacencyIndex::build(&links());
		assert_eq!(index.neighbors("Zabbix").count(), 0);

		let mut hades: Vec<_> = index.neighbors("Hades").collect();
		hades.sort_unstable();
		assert_eq!(hades, vec!["Ares", "B3", "Caronte"]);
	}
}
