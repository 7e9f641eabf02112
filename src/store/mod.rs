//! The node model read by the graph builder: values, operations and their links.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{NodeId, NodeKind, NodeMetadata, OpKind};
