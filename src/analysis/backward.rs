//! Reconstructs the graph backward-reachable from a set of output nodes.
//!
//! Candidates are popped highest rank first; equal ranks pop in push order so
//! the resulting edge order is reproducible. With `remove_split` set, split
//! operations and their output values are dropped and the split's input is
//! wired directly to the downstream consumer.

use crate::config::BuildOptions;
use crate::error::GraphError;
use crate::graph::{ComputationalGraph, Edge, EdgeSet};
use crate::store::{NodeId, NodeKind, Registry};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Builds the graph of values and operations reachable backward from `outputs`.
#[tracing::instrument(skip_all, fields(outputs = outputs.len(), remove_split = options.remove_split))]
pub fn build<'a>(
    registry: &'a Registry,
    outputs: &[NodeId],
    options: BuildOptions,
) -> Result<ComputationalGraph<'a>, GraphError> {
    let mut traversal = Traversal::new(registry, options.remove_split);
    for &output in outputs {
        registry.get(output)?;
        traversal.push(output);
    }
    let edges = traversal.run()?;
    tracing::debug!(edges = edges.len(), "backward traversal finished");
    Ok(ComputationalGraph::new(registry, edges))
}

/// Runs one independent build per output set in parallel. Results keep the input order.
pub fn build_many<'a>(
    registry: &'a Registry,
    output_sets: &[Vec<NodeId>],
    options: BuildOptions,
) -> Result<Vec<ComputationalGraph<'a>>, GraphError> {
    output_sets
        .par_iter()
        .map(|outputs| build(registry, outputs, options))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    rank: u32,
    seq: u64,
    node: NodeId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: higher rank wins, then the earlier push.
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Traversal<'a> {
    registry: &'a Registry,
    remove_split: bool,
    queue: BinaryHeap<Candidate>,
    next_seq: u64,
    edges: EdgeSet,
}

impl<'a> Traversal<'a> {
    fn new(registry: &'a Registry, remove_split: bool) -> Self {
        Self {
            registry,
            remove_split,
            queue: BinaryHeap::new(),
            next_seq: 0,
            edges: EdgeSet::new(),
        }
    }

    fn push(&mut self, node: NodeId) {
        let rank = self.registry.rank_of(node);
        self.queue.push(Candidate { rank, seq: self.next_seq, node });
        self.next_seq += 1;
    }

    fn run(mut self) -> Result<EdgeSet, GraphError> {
        let registry = self.registry;
        while let Some(Candidate { rank, node, .. }) = self.queue.pop() {
            tracing::trace!(node = node.0, rank, "visit");
            match registry.get(node)? {
                NodeKind::Value { creator, .. } => self.visit_value(node, *creator)?,
                NodeKind::Operation { .. } => self.visit_operation(node)?,
            }
        }
        Ok(self.edges)
    }

    fn visit_value(&mut self, value: NodeId, creator: Option<NodeId>) -> Result<(), GraphError> {
        let Some(creator) = creator else { return Ok(()) };

        if self.remove_split && self.registry.is_split(creator) {
            let input = self.registry.split_input(creator)?;
            self.push(input);
            return Ok(());
        }
        if self.edges.insert(Edge::new(creator, value)) {
            self.push(creator);
        }
        Ok(())
    }

    fn visit_operation(&mut self, op: NodeId) -> Result<(), GraphError> {
        let registry = self.registry;

        // Reached as an output or through another split.
        if self.remove_split && registry.is_split(op) {
            let input = registry.split_input(op)?;
            self.push(input);
            return Ok(());
        }

        for &input in registry.get_inputs(op) {
            if input == op || self.edges.contains(&Edge::new(input, op)) {
                continue;
            }
            let source = self.bypass_splits(input)?;
            if self.edges.insert(Edge::new(source, op)) {
                self.push(source);
            }
        }
        Ok(())
    }

    /// Walks back through split outputs to the first value not produced by a split.
    fn bypass_splits(&self, mut value: NodeId) -> Result<NodeId, GraphError> {
        if !self.remove_split {
            return Ok(value);
        }
        while let Some(split) = self.registry.creator(value).filter(|&c| self.registry.is_split(c)) {
            value = self.registry.split_input(split)?;
        }
        Ok(value)
    }
}
