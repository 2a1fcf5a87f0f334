//! Memory-compact connectivity graphs with indices that survive removal.
//!
//! This crate provides a graph container for dynamic connectivity, e.g. the
//! bonded topology between particles in a reaction-diffusion simulation.
//! Vertices carry an arbitrary payload, edges are symmetric and unweighted,
//! and the structure answers derived queries: connectivity, connected
//! component extraction and the enumeration of all short paths used to derive
//! bond, angle and dihedral terms from adjacency.
//!
//! The storage layer is an *index-persistent* vector: removing an element
//! never shifts the index of any other element. Removed slots are tombstoned
//! and reused by later insertions, so neighbor relations can be stored as
//! plain indices without ever rewriting them on removal.
//!
//! # Example
//!
//! ```
//! use bondgraph::Graph;
//!
//! let mut graph = Graph::new();
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! let c = graph.add_vertex("c");
//!
//! graph.add_edge(a, b).unwrap();
//! graph.add_edge(b, c).unwrap();
//! assert!(graph.is_connected());
//!
//! graph.remove_vertex(b).unwrap();
//! assert_eq!(graph.vertex_count(), 2);
//! assert!(!graph.is_connected());
//!
//! // the index of `c` is unchanged by the removal
//! assert_eq!(graph.vertex(c).unwrap().data(), &"c");
//! ```

pub mod components;
pub mod graph;
pub mod memory;
pub mod tuples;
pub mod vertex;

pub use graph::{Graph, GraphError};
pub use memory::persistent::{AccessError, ActiveCursor, Deactivate, PersistentVec};
pub use tuples::{AnglePath, BondPair, DihedralPath};
pub use vertex::Vertex;

use std::fmt;

/// Index of a vertex within the [`Graph`] that produced it.
///
/// Indices are stable under removal and are only reused once the referenced
/// vertex has been removed. They carry no meaning outside the graph instance
/// they were obtained from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIndex(u32);

entity_impl!(VertexIndex, u32);

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
