//! Reconstructs the backward computational graph of an autograd run and
//! renders it as dot text. Also exports the `_core` Python extension module.

pub mod analysis;
pub mod bindings;
pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod store;

pub use analysis::{build, build_many};
pub use config::BuildOptions;
pub use error::GraphError;
pub use graph::{ComputationalGraph, DumpFormat, Edge};
pub use store::{NodeId, NodeKind, NodeMetadata, OpKind, Registry};

use bindings::python::{PyComputationalGraph, PyNodeStore};
use pyo3::prelude::*;

// --- Module Definition ---
/// Defines the `_core` Python module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNodeStore>()?;
    m.add_class::<PyComputationalGraph>()?;
    Ok(())
}
