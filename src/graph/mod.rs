//! Defines the edge and graph types produced by a backward build.
pub mod computational;
pub mod edge;

// Re-export key types for convenient access
pub use computational::{ComputationalGraph, DumpFormat};
pub use edge::{Edge, EdgeSet};
