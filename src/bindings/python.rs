use crate::analysis::backward;
use crate::config::BuildOptions;
use crate::error::GraphError;
use crate::graph::{ComputationalGraph, Edge, EdgeSet};
use crate::store::{NodeId, NodeMetadata, OpKind, Registry};
use pyo3::exceptions::{PyNotImplementedError, PyValueError};
use pyo3::prelude::*;
use std::sync::Arc;

fn to_py_err(e: GraphError) -> PyErr {
    match e {
        GraphError::UnsupportedFormat(_) => PyNotImplementedError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn to_node_id(idx: usize) -> PyResult<NodeId> {
    NodeId::try_from(idx).map_err(to_py_err)
}

fn to_node_ids(indices: Vec<usize>) -> PyResult<Vec<NodeId>> {
    indices.into_iter().map(to_node_id).collect()
}

#[pyclass(name = "_NodeStore")]
#[derive(Debug, Clone, Default)]
pub struct PyNodeStore {
    // Shared with the graphs built from it; copied on the next write.
    registry: Arc<Registry>,
}

#[pymethods]
impl PyNodeStore {
    #[new]
    pub fn new() -> Self { Self::default() }

    #[pyo3(signature = (label=None, creator=None))]
    pub fn add_value(&mut self, label: Option<String>, creator: Option<usize>) -> PyResult<usize> {
        let creator = creator.map(to_node_id).transpose()?;
        Arc::make_mut(&mut self.registry)
            .add_value(creator, NodeMetadata { label })
            .map(|id| id.index())
            .map_err(to_py_err)
    }

    #[pyo3(signature = (inputs, rank=None, label=None, split=false))]
    pub fn add_operation(
        &mut self,
        inputs: Vec<usize>,
        rank: Option<u32>,
        label: Option<String>,
        split: bool,
    ) -> PyResult<usize> {
        let op = if split { OpKind::Split } else { OpKind::Function };
        let ids = to_node_ids(inputs)?;
        Arc::make_mut(&mut self.registry)
            .add_operation(op, &ids, rank, NodeMetadata { label })
            .map(|id| id.index())
            .map_err(to_py_err)
    }

    pub fn node_count(&self) -> usize { self.registry.count() }

    #[pyo3(signature = (outputs, remove_split=true))]
    pub fn build_computational_graph(&self, outputs: Vec<usize>, remove_split: bool) -> PyResult<PyComputationalGraph> {
        let ids = to_node_ids(outputs)?;
        let edges = backward::build(&self.registry, &ids, BuildOptions { remove_split })
            .map_err(to_py_err)?
            .into_edges();
        Ok(PyComputationalGraph { registry: Arc::clone(&self.registry), edges })
    }

    pub fn __getstate__(&self) -> PyResult<String> {
        serde_json::to_string(self.registry.as_ref()).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    pub fn __setstate__(&mut self, state: &str) -> PyResult<()> {
        let registry: Registry = serde_json::from_str(state).map_err(|e| PyValueError::new_err(e.to_string()))?;
        registry.validate().map_err(to_py_err)?;
        self.registry = Arc::new(registry);
        Ok(())
    }
}

#[pyclass(name = "_ComputationalGraph")]
#[derive(Debug, Clone)]
pub struct PyComputationalGraph {
    registry: Arc<Registry>,
    edges: EdgeSet,
}

#[pymethods]
impl PyComputationalGraph {
    pub fn __len__(&self) -> usize { self.edges.len() }

    pub fn __contains__(&self, edge: (usize, usize)) -> bool {
        match (NodeId::try_from(edge.0), NodeId::try_from(edge.1)) {
            (Ok(producer), Ok(consumer)) => self.edges.contains(&Edge::new(producer, consumer)),
            _ => false,
        }
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.edges.iter().map(|e| (e.producer.index(), e.consumer.index())).collect()
    }

    #[pyo3(signature = (format="dot"))]
    pub fn dump(&self, format: &str) -> PyResult<String> {
        ComputationalGraph::new(&self.registry, self.edges.clone())
            .dump(format)
            .map_err(to_py_err)
    }
}
