//! Defines the `Edge` type, a (producer, consumer) link between a value and an operation.
use crate::error::GraphError;
use crate::store::{NodeId, Registry};
use serde::{Serialize, Deserialize};
use std::collections::HashSet;

/// A directed link from `producer` to `consumer`.
///
/// Equality is by node identity only; two nodes with the same label are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub producer: NodeId,
    pub consumer: NodeId,
}

impl Edge {
    pub fn new(producer: NodeId, consumer: NodeId) -> Self {
        Self { producer, consumer }
    }

    /// Builds an edge after checking that exactly one endpoint is a value.
    pub fn checked(registry: &Registry, producer: NodeId, consumer: NodeId) -> Result<Self, GraphError> {
        let p = registry.get(producer)?;
        let c = registry.get(consumer)?;
        if p.is_value() == c.is_value() {
            return Err(GraphError::InvalidEdge { producer, consumer });
        }
        Ok(Self::new(producer, consumer))
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((producer, consumer): (NodeId, NodeId)) -> Self {
        Self::new(producer, consumer)
    }
}

/// Deduplicated edges, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    order: Vec<Edge>,
    index: HashSet<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self { Self::default() }

    /// Returns `false` if the edge was already present.
    pub fn insert(&mut self, edge: Edge) -> bool {
        if self.index.insert(edge) {
            self.order.push(edge);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, edge: &Edge) -> bool { self.index.contains(edge) }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Edge> { self.order.iter() }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = Self::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NodeMetadata, OpKind};

    #[test]
    fn test_edge_set_keeps_first_insertion() {
        let a = Edge::new(NodeId(0), NodeId(1));
        let b = Edge::new(NodeId(1), NodeId(2));
        let mut set = EdgeSet::new();
        assert!(set.insert(a));
        assert!(set.insert(b));
        assert!(!set.insert(a));

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![a, b]);
        assert!(!set.contains(&Edge::new(NodeId(0), NodeId(2))));
    }

    #[test]
    fn test_checked_edge_requires_alternation() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::default()).unwrap();
        let f = reg.add_operation(OpKind::Function, &[x], None, NodeMetadata::default()).unwrap();
        let y = reg.add_value(Some(f), NodeMetadata::default()).unwrap();

        assert_eq!(Edge::checked(&reg, x, f), Ok(Edge::new(x, f)));
        assert_eq!(Edge::checked(&reg, f, y), Ok(Edge::new(f, y)));
        assert_eq!(Edge::checked(&reg, x, y), Err(GraphError::InvalidEdge { producer: x, consumer: y }));
        assert_eq!(Edge::checked(&reg, f, f), Err(GraphError::InvalidEdge { producer: f, consumer: f }));
    }
}
