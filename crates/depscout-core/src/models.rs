use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One resolved package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageNode {
    /// Lower-cased package name, unique within a graph
    pub name: String,
    /// Normalized license label, `unknown` when nothing matched
    pub license: String,
    /// Largest distribution file of the latest release in bytes,
    /// `None` when the release has no files
    pub size: Option<u64>,
}

/// `from` depends on `to`
///
/// `to` may have no [`PackageNode`] when its own lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

impl DependencyEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Packages and edges accumulated by a crawl, in discovery order
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<PackageNode>,
    index: HashMap<String, usize>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node unless one with the same name exists
    ///
    /// First write wins; returns false when the node was ignored.
    pub fn add_node(&mut self, node: PackageNode) -> bool {
        if self.index.contains_key(&node.name) {
            return false;
        }
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        self.edges.push(edge);
    }

    pub fn node(&self, name: &str) -> Option<&PackageNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn nodes(&self) -> &[PackageNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Direct dependencies of `name`, in the order they were declared
    pub fn dependencies_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.from == name)
            .map(|e| e.to.as_str())
    }

    /// Edges whose target never got a node
    pub fn dangling_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(|e| !self.contains(&e.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, license: &str, size: Option<u64>) -> PackageNode {
        PackageNode {
            name: name.to_string(),
            license: license.to_string(),
            size,
        }
    }

    #[test]
    fn test_first_write_wins() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_node(node("a", "MIT", Some(10))));
        assert!(!graph.add_node(node("a", "GPL-3.0", Some(99))));

        assert_eq!(graph.node_count(), 1);
        let a = graph.node("a").unwrap();
        assert_eq!(a.license, "MIT");
        assert_eq!(a.size, Some(10));
    }

    #[test]
    fn test_edges_keep_order_and_allow_dangling_targets() {
        let mut graph = DependencyGraph::new();
        graph.add_node(node("a", "MIT", None));
        graph.add_node(node("b", "MIT", None));
        graph.add_edge(DependencyEdge::new("a", "b"));
        graph.add_edge(DependencyEdge::new("a", "ghost"));

        let deps: Vec<_> = graph.dependencies_of("a").collect();
        assert_eq!(deps, vec!["b", "ghost"]);

        let dangling: Vec<_> = graph.dangling_edges().collect();
        assert_eq!(dangling, vec![&DependencyEdge::new("a", "ghost")]);
    }

    #[test]
    fn test_nodes_keep_discovery_order() {
        let mut graph = DependencyGraph::new();
        for name in ["z", "a", "m"] {
            graph.add_node(node(name, "unknown", None));
        }
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
