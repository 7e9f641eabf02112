use super::types::*;
use crate::error::GraphError;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    // Columnar Arrays
    pub kinds: Vec<NodeKind>,
    pub meta: Vec<NodeMetadata>,

    // Operation inputs (CSR). Values hold an empty range.
    pub inputs_flat: Vec<NodeId>,
    pub inputs_ranges: Vec<(u32, u32)>, // (start, count)
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.kinds.len() }

    fn push_node(&mut self, kind: NodeKind, inputs: &[NodeId], meta: NodeMetadata) -> NodeId {
        let id = NodeId::new(self.kinds.len());

        let start = self.inputs_flat.len() as u32;
        self.inputs_flat.extend_from_slice(inputs);
        self.inputs_ranges.push((start, inputs.len() as u32));

        self.kinds.push(kind);
        self.meta.push(meta);
        id
    }

    /// Registers a value. A value with a creator is one rank above it; a leaf sits at rank 0.
    pub fn add_value(&mut self, creator: Option<NodeId>, meta: NodeMetadata) -> Result<NodeId, GraphError> {
        let rank = match creator {
            Some(op) => match self.get(op)? {
                NodeKind::Operation { rank, .. } => rank.saturating_add(1),
                NodeKind::Value { .. } => return Err(GraphError::NotAnOperation(op)),
            },
            None => 0,
        };
        Ok(self.push_node(NodeKind::Value { creator, rank: Some(rank) }, &[], meta))
    }

    /// Registers an operation over existing values.
    ///
    /// Without an explicit `rank` the operation takes the highest rank among its inputs.
    pub fn add_operation(
        &mut self,
        op: OpKind,
        inputs: &[NodeId],
        rank: Option<u32>,
        meta: NodeMetadata,
    ) -> Result<NodeId, GraphError> {
        if op == OpKind::Split && inputs.len() != 1 {
            return Err(GraphError::SplitArity { node: NodeId::new(self.count()), found: inputs.len() });
        }
        for &input in inputs {
            if !self.get(input)?.is_value() {
                return Err(GraphError::NotAValue(input));
            }
        }
        let rank = rank.unwrap_or_else(|| {
            inputs.iter().map(|&i| self.rank_of(i)).max().unwrap_or(0)
        });
        Ok(self.push_node(NodeKind::Operation { op, rank }, inputs, meta))
    }

    pub fn get(&self, id: NodeId) -> Result<&NodeKind, GraphError> {
        self.kinds.get(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.meta.get(id.index())?.label.as_deref()
    }

    /// Inputs of an operation. Values, unknown ids and out-of-bounds ranges yield an empty slice.
    #[inline(always)]
    pub fn get_inputs(&self, id: NodeId) -> &[NodeId] {
        self.input_range(id)
            .and_then(|range| self.inputs_flat.get(range))
            .unwrap_or(&[])
    }

    fn input_range(&self, id: NodeId) -> Option<std::ops::Range<usize>> {
        let &(start, count) = self.inputs_ranges.get(id.index())?;
        let start = start as usize;
        Some(start..start.checked_add(count as usize)?)
    }

    /// Checks that the columns agree and every link points at a node of the right kind.
    ///
    /// Run after loading a registry from serialized state.
    pub fn validate(&self) -> Result<(), GraphError> {
        let count = self.count();
        if self.meta.len() != count || self.inputs_ranges.len() != count {
            return Err(GraphError::InconsistentStore(format!(
                "column lengths differ: kinds={}, meta={}, inputs_ranges={}",
                count,
                self.meta.len(),
                self.inputs_ranges.len()
            )));
        }
        if u32::try_from(count).is_err() {
            return Err(GraphError::IdOutOfRange(count));
        }

        for idx in 0..count {
            let id = NodeId::new(idx);
            let range = self
                .input_range(id)
                .filter(|r| r.end <= self.inputs_flat.len())
                .ok_or_else(|| {
                    GraphError::InconsistentStore(format!("input range of {:?} is out of bounds", id))
                })?;

            match &self.kinds[idx] {
                NodeKind::Value { creator, .. } => {
                    if !range.is_empty() {
                        return Err(GraphError::InconsistentStore(format!("value {:?} has inputs", id)));
                    }
                    if let Some(op) = *creator {
                        if self.get(op)?.is_value() {
                            return Err(GraphError::NotAnOperation(op));
                        }
                    }
                }
                NodeKind::Operation { op, .. } => {
                    if *op == OpKind::Split && range.len() != 1 {
                        return Err(GraphError::SplitArity { node: id, found: range.len() });
                    }
                    for &input in &self.inputs_flat[range] {
                        if !self.get(input)?.is_value() {
                            return Err(GraphError::NotAValue(input));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn creator(&self, id: NodeId) -> Option<NodeId> {
        match self.kinds.get(id.index())? {
            NodeKind::Value { creator, .. } => *creator,
            NodeKind::Operation { .. } => None,
        }
    }

    pub fn is_split(&self, id: NodeId) -> bool {
        self.kinds.get(id.index()).is_some_and(NodeKind::is_split)
    }

    /// Ordering key for the backward traversal.
    ///
    /// Values without a recorded rank fall back to their creator's rank, then to 0.
    pub fn rank_of(&self, id: NodeId) -> u32 {
        match self.kinds.get(id.index()) {
            Some(NodeKind::Operation { rank, .. }) => *rank,
            Some(NodeKind::Value { rank: Some(rank), .. }) => *rank,
            Some(NodeKind::Value { creator: Some(op), rank: None }) => match self.kinds.get(op.index()) {
                Some(NodeKind::Operation { rank, .. }) => *rank,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// The sole input of a split operation.
    pub fn split_input(&self, id: NodeId) -> Result<NodeId, GraphError> {
        match self.get_inputs(id) {
            [input] => Ok(*input),
            other => Err(GraphError::SplitArity { node: id, found: other.len() }),
        }
    }
}
