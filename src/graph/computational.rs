//! The result of a backward build: an edge set over a borrowed node store.
use super::edge::{Edge, EdgeSet};
use crate::display::dot;
use crate::error::GraphError;
use crate::store::{NodeId, Registry};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashSet;
use std::str::FromStr;

/// Text formats `ComputationalGraph::dump` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    #[default]
    Dot,
}

impl FromStr for DumpFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(DumpFormat::Dot),
            other => Err(GraphError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A directed graph of values and operations, assumed acyclic.
#[derive(Debug, Clone)]
pub struct ComputationalGraph<'a> {
    registry: &'a Registry,
    edges: EdgeSet,
}

impl<'a> ComputationalGraph<'a> {
    pub fn new(registry: &'a Registry, edges: EdgeSet) -> Self {
        Self { registry, edges }
    }

    pub fn len(&self) -> usize { self.edges.len() }
    pub fn is_empty(&self) -> bool { self.edges.is_empty() }
    pub fn contains(&self, edge: &Edge) -> bool { self.edges.contains(edge) }
    pub fn edges(&self) -> &EdgeSet { &self.edges }
    pub fn registry(&self) -> &'a Registry { self.registry }
    pub fn into_edges(self) -> EdgeSet { self.edges }

    /// Distinct nodes touched by any edge, in first-seen order.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .flat_map(|e| [e.producer, e.consumer])
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Dumps the graph as text in the named format.
    pub fn dump(&self, format: &str) -> Result<String, GraphError> {
        match format.parse::<DumpFormat>()? {
            DumpFormat::Dot => self.to_dot(),
        }
    }

    pub fn to_dot(&self) -> Result<String, GraphError> {
        dot::to_dot(self.registry, &self.edges)
    }

    pub fn to_digraph(&self) -> DiGraphMap<NodeId, ()> {
        let mut graph = DiGraphMap::new();
        for edge in &self.edges {
            graph.add_edge(edge.producer, edge.consumer, ());
        }
        graph
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.to_digraph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NodeMetadata, OpKind};
    use rstest::rstest;

    #[rstest]
    #[case("xml")]
    #[case("DOT")]
    #[case("")]
    fn test_unsupported_format(#[case] format: &str) {
        let reg = Registry::new();
        let graph = ComputationalGraph::new(&reg, EdgeSet::new());
        assert_eq!(graph.dump(format), Err(GraphError::UnsupportedFormat(format.to_string())));
    }

    #[test]
    fn test_empty_graph_dump() {
        let reg = Registry::new();
        let graph = ComputationalGraph::new(&reg, EdgeSet::new());
        assert_eq!(graph.len(), 0);
        assert!(graph.is_empty());
        assert_eq!(graph.dump("dot").unwrap(), "digraph graphname{}");
    }

    #[test]
    fn test_nodes_and_digraph_export() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::default()).unwrap();
        let f = reg.add_operation(OpKind::Function, &[x], None, NodeMetadata::default()).unwrap();
        let y = reg.add_value(Some(f), NodeMetadata::default()).unwrap();

        let edges: EdgeSet = [Edge::new(f, y), Edge::new(x, f)].into_iter().collect();
        let graph = ComputationalGraph::new(&reg, edges);

        assert_eq!(graph.nodes(), vec![f, y, x]);
        let digraph = graph.to_digraph();
        assert_eq!(digraph.node_count(), 3);
        assert_eq!(digraph.edge_count(), 2);
        assert!(graph.is_acyclic());
    }
}
