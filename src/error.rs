//! Defines the error type shared by the store, the builder and the renderer.
use crate::store::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The requested dump format is not one the renderer knows.
    #[error("Unsupported format: '{0}'. Currently, only 'dot' format is supported.")]
    UnsupportedFormat(String),
    /// A split operation does not have exactly one input.
    #[error("Split operation {node:?} must have exactly one input, found {found}")]
    SplitArity { node: NodeId, found: usize },
    /// An edge whose endpoints are not one value and one operation.
    #[error("Invalid edge {producer:?} -> {consumer:?}: endpoints must be one value and one operation")]
    InvalidEdge { producer: NodeId, consumer: NodeId },
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {0:?} is not a value")]
    NotAValue(NodeId),
    #[error("Node {0:?} is not an operation")]
    NotAnOperation(NodeId),
    /// An index that does not fit the 32-bit node id space.
    #[error("Node index {0} is out of range")]
    IdOutOfRange(usize),
    /// Registry columns that disagree with each other, e.g. after deserialization.
    #[error("Inconsistent node store: {0}")]
    InconsistentStore(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
