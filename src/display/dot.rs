//! Renders an edge set in the dot graph description language.
use crate::error::GraphError;
use crate::graph::edge::Edge;
use crate::store::{NodeId, NodeKind, OpKind, Registry};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Oval,
    Hexagon,
    Box,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Oval => "oval",
            Shape::Hexagon => "hexagon",
            Shape::Box => "box",
        }
    }
}

/// Display wrapper over a value or operation, alive only while rendering.
#[derive(Debug, Clone)]
pub struct DotNode<'a> {
    pub id: NodeId,
    pub label: &'a str,
    pub shape: Shape,
}

impl<'a> DotNode<'a> {
    pub fn new(registry: &'a Registry, id: NodeId) -> Result<Self, GraphError> {
        let kind = registry.get(id)?;
        let shape = match kind {
            NodeKind::Value { .. } => Shape::Oval,
            NodeKind::Operation { op: OpKind::Split, .. } => Shape::Hexagon,
            NodeKind::Operation { op: OpKind::Function, .. } => Shape::Box,
        };
        let label = registry.label(id).unwrap_or_else(|| kind.kind_name());
        Ok(Self { id, label, shape })
    }

    /// Writes `ID [label="...",shape="..."];`.
    pub fn write_declaration(&self, out: &mut String) {
        let _ = write!(
            out,
            "{} [label=\"{}\",shape=\"{}\"];",
            self.id.0,
            escape(self.label),
            self.shape.as_str()
        );
    }
}

fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Emits both endpoint declarations and the arrow for every edge.
/// Declarations repeat when a node appears in several edges.
pub fn to_dot<'e>(
    registry: &Registry,
    edges: impl IntoIterator<Item = &'e Edge>,
) -> Result<String, GraphError> {
    let mut out = String::from("digraph graphname{");
    for edge in edges {
        let edge = Edge::checked(registry, edge.producer, edge.consumer)?;
        let head = DotNode::new(registry, edge.producer)?;
        let tail = DotNode::new(registry, edge.consumer)?;
        head.write_declaration(&mut out);
        tail.write_declaration(&mut out);
        let _ = write!(out, "{} -> {};", head.id.0, tail.id.0);
    }
    out.push('}');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NodeMetadata;
    use rstest::rstest;

    #[rstest]
    #[case(None, "Value")]
    #[case(Some("x"), "x")]
    #[case(Some("say \"hi\""), "say \\\"hi\\\"")]
    #[case(Some("a\\b"), "a\\\\b")]
    fn test_value_declaration(#[case] label: Option<&str>, #[case] expected: &str) {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata { label: label.map(String::from) }).unwrap();

        let mut out = String::new();
        DotNode::new(&reg, x).unwrap().write_declaration(&mut out);
        assert_eq!(out, format!("0 [label=\"{}\",shape=\"oval\"];", expected));
    }

    #[test]
    fn test_operation_shapes() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::default()).unwrap();
        let s = reg.add_operation(OpKind::Split, &[x], None, NodeMetadata::default()).unwrap();
        let f = reg.add_operation(OpKind::Function, &[x], None, NodeMetadata::labeled("linear")).unwrap();

        let split = DotNode::new(&reg, s).unwrap();
        assert_eq!((split.shape, split.label), (Shape::Hexagon, "Split"));
        let func = DotNode::new(&reg, f).unwrap();
        assert_eq!((func.shape, func.label), (Shape::Box, "linear"));
    }

    #[test]
    fn test_to_dot_single_edge() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::labeled("x")).unwrap();
        let f = reg.add_operation(OpKind::Function, &[x], None, NodeMetadata::labeled("f")).unwrap();

        let dot = to_dot(&reg, &[Edge::new(x, f)]).unwrap();
        assert_eq!(
            dot,
            "digraph graphname{0 [label=\"x\",shape=\"oval\"];1 [label=\"f\",shape=\"box\"];0 -> 1;}"
        );
    }

    #[test]
    fn test_to_dot_rejects_non_alternating_edge() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::default()).unwrap();
        let y = reg.add_value(None, NodeMetadata::default()).unwrap();

        let err = to_dot(&reg, &[Edge::new(x, y)]).unwrap_err();
        assert_eq!(err, GraphError::InvalidEdge { producer: x, consumer: y });
    }

    #[test]
    fn test_to_dot_rejects_operation_pair_and_unknown_node() {
        let mut reg = Registry::new();
        let x = reg.add_value(None, NodeMetadata::default()).unwrap();
        let f = reg.add_operation(OpKind::Function, &[x], None, NodeMetadata::default()).unwrap();
        let g = reg.add_operation(OpKind::Split, &[x], None, NodeMetadata::default()).unwrap();

        // The valid edge is rendered before the bad one, which still aborts the dump.
        let err = to_dot(&reg, &[Edge::new(x, f), Edge::new(f, g)]).unwrap_err();
        assert_eq!(err, GraphError::InvalidEdge { producer: f, consumer: g });
        assert_eq!(
            to_dot(&reg, &[Edge::new(x, NodeId(9))]),
            Err(GraphError::UnknownNode(NodeId(9)))
        );
    }
}
