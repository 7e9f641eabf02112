//! Graph algorithms over the node store.
pub mod backward;

pub use backward::{build, build_many};
