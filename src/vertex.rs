//! Vertices carrying user data and their adjacency lists.

use crate::{memory::persistent::Deactivate, VertexIndex};

/// A graph vertex: user payload plus the indices of its neighbors.
///
/// Neighbor lists are kept in insertion order and are maintained exclusively
/// through [`Graph`](crate::Graph) edge operations, which keep the two ends
/// of every edge in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex<D> {
    data: D,
    neighbors: Vec<VertexIndex>,
    deactivated: bool,
}

impl<D> Vertex<D> {
    /// Creates an isolated vertex holding `data`.
    pub fn new(data: D) -> Self {
        Self {
            data,
            neighbors: Vec::new(),
            deactivated: false,
        }
    }

    pub(crate) fn from_parts(data: D, neighbors: Vec<VertexIndex>) -> Self {
        Self {
            data,
            neighbors,
            deactivated: false,
        }
    }

    /// The user payload.
    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the user payload.
    #[inline]
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Consumes the vertex, returning its payload.
    pub fn into_data(self) -> D {
        self.data
    }

    /// The indices of the adjacent vertices, in insertion order.
    #[inline]
    pub fn neighbors(&self) -> &[VertexIndex] {
        &self.neighbors
    }

    /// The number of adjacent vertices.
    #[inline]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns whether `index` is adjacent to this vertex.
    #[inline]
    pub fn contains_neighbor(&self, index: VertexIndex) -> bool {
        self.neighbors.contains(&index)
    }

    pub(crate) fn neighbors_mut(&mut self) -> &mut Vec<VertexIndex> {
        &mut self.neighbors
    }

    /// Records `index` as a neighbor. Returns `false` (and leaves the list
    /// unchanged) when it already was one.
    pub(crate) fn add_neighbor(&mut self, index: VertexIndex) -> bool {
        if self.neighbors.contains(&index) {
            return false;
        }
        self.neighbors.push(index);
        true
    }

    /// Removes `index` from the neighbor list. Returns `false` when it was
    /// not a neighbor.
    pub(crate) fn remove_neighbor(&mut self, index: VertexIndex) -> bool {
        match self.neighbors.iter().position(|&n| n == index) {
            Some(pos) => {
                self.neighbors.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<D> Deactivate for Vertex<D> {
    fn deactivate(&mut self) {
        self.deactivated = true;
    }

    fn is_deactivated(&self) -> bool {
        self.deactivated
    }
}
