use crate::error::GraphError;
use serde::{Serialize, Deserialize};

/// Stable identity of a value or operation inside a `Registry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

impl TryFrom<usize> for NodeId {
    type Error = GraphError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        u32::try_from(idx).map(Self).map_err(|_| GraphError::IdOutOfRange(idx))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub label: Option<String>,
}

impl NodeMetadata {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// Any differentiable computation.
    Function,
    /// Fan-out duplication of a single input value.
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Value { creator: Option<NodeId>, rank: Option<u32> },
    Operation { op: OpKind, rank: u32 },
}

impl NodeKind {
    pub fn is_value(&self) -> bool { matches!(self, NodeKind::Value { .. }) }

    pub fn is_split(&self) -> bool {
        matches!(self, NodeKind::Operation { op: OpKind::Split, .. })
    }

    /// Name used when a node carries no label of its own.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Value { .. } => "Value",
            NodeKind::Operation { op: OpKind::Function, .. } => "Function",
            NodeKind::Operation { op: OpKind::Split, .. } => "Split",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(u32::MAX as usize)]
    fn test_index_in_range(#[case] idx: usize) {
        assert_eq!(NodeId::try_from(idx).map(|id| id.index()), Ok(idx));
    }

    #[cfg(target_pointer_width = "64")]
    #[rstest]
    #[case(u32::MAX as usize + 1)]
    #[case((1usize << 32) + 2)]
    #[case(usize::MAX)]
    fn test_index_out_of_range_is_not_truncated(#[case] idx: usize) {
        assert_eq!(NodeId::try_from(idx), Err(GraphError::IdOutOfRange(idx)));
    }
}
