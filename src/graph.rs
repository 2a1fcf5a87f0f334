//! The graph container: vertices in index-persistent storage plus a
//! maintained edge cache.

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::{
    memory::{persistent::AccessError, EntityIndex, PersistentVec},
    vertex::Vertex,
    VertexIndex,
};

/// An undirected graph with vertex indices that survive removal.
///
/// Adjacency is stored symmetrically on the vertices. Alongside it the graph
/// maintains a flat list of undirected edges, updated incrementally on every
/// mutation, so edge enumeration never rescans the adjacency lists.
///
/// Vertex payloads are arbitrary; edges carry no data.
///
/// # Example
///
/// ```
/// use bondgraph::Graph;
///
/// let mut graph = Graph::new();
/// let a = graph.add_vertex(0);
/// let b = graph.add_vertex(1);
///
/// graph.add_edge(a, b)?;
/// assert!(graph.contains_edge(a, b));
/// assert_eq!(graph.neighbors(a)?, &[b]);
///
/// graph.remove_edge(a, b)?;
/// assert_eq!(graph.edge_count(), 0);
/// # Ok::<(), bondgraph::GraphError>(())
/// ```
#[derive(Clone)]
pub struct Graph<D> {
    pub(crate) vertices: PersistentVec<VertexIndex, Vertex<D>>,
    /// Undirected edge cache; each edge appears exactly once, in the
    /// orientation it was added in.
    pub(crate) edges: Vec<(VertexIndex, VertexIndex)>,
}

impl<D> Graph<D> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: PersistentVec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: PersistentVec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Builds a graph from pre-wired vertices, reconstructing the edge cache
    /// from their neighbor lists.
    pub(crate) fn from_vertices(vertices: PersistentVec<VertexIndex, Vertex<D>>) -> Self {
        let mut edges = Vec::new();
        for (ix, vertex) in vertices.iter() {
            for &neighbor in vertex.neighbors() {
                if neighbor.index() < ix.index() {
                    edges.push((neighbor, ix));
                }
            }
        }
        Self { vertices, edges }
    }

    /// The underlying vertex storage.
    #[inline]
    pub fn vertices(&self) -> &PersistentVec<VertexIndex, Vertex<D>> {
        &self.vertices
    }

    /// The number of live vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len_active()
    }

    /// The total number of vertex slots, deactivated ones included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no live vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty_active()
    }

    /// Adds an isolated vertex and returns its index.
    ///
    /// The lowest deactivated slot is reused before the storage grows, so
    /// indices of removed vertices eventually come back into circulation.
    pub fn add_vertex(&mut self, data: D) -> VertexIndex {
        self.vertices.insert(Vertex::new(data))
    }

    /// Borrows the vertex at `index`.
    ///
    /// # Errors
    ///
    /// Fails when `index` is out of range or refers to a removed vertex.
    pub fn vertex(&self, index: VertexIndex) -> Result<&Vertex<D>, GraphError> {
        Ok(self.vertices.at(index)?)
    }

    /// Mutably borrows the payload of the vertex at `index`.
    pub fn vertex_data_mut(&mut self, index: VertexIndex) -> Result<&mut D, GraphError> {
        Ok(self.vertices.at_mut(index)?.data_mut())
    }

    /// The neighbor indices of the vertex at `index`, in insertion order.
    pub fn neighbors(&self, index: VertexIndex) -> Result<&[VertexIndex], GraphError> {
        Ok(self.vertices.at(index)?.neighbors())
    }

    /// Returns whether `index` refers to a live vertex.
    #[inline]
    pub fn contains_vertex(&self, index: VertexIndex) -> bool {
        self.vertices.contains(index)
    }

    /// Connects two vertices.
    ///
    /// Adding an edge that already exists is a no-op, reported at debug level.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::SelfLoop`] when `a == b` and with
    /// [`GraphError::Access`] when either endpoint is invalid.
    pub fn add_edge(&mut self, a: VertexIndex, b: VertexIndex) -> Result<(), GraphError> {
        self.add_edge_inner(a, b, None)
    }

    /// Like [`Graph::add_edge`], but additionally routes the duplicate-edge
    /// no-op report into `sink`.
    pub fn add_edge_with_diagnostics(
        &mut self,
        a: VertexIndex,
        b: VertexIndex,
        sink: &mut dyn FnMut(String),
    ) -> Result<(), GraphError> {
        self.add_edge_inner(a, b, Some(sink))
    }

    fn add_edge_inner(
        &mut self,
        a: VertexIndex,
        b: VertexIndex,
        sink: Option<&mut dyn FnMut(String)>,
    ) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }

        // both ends validated before either is touched
        self.vertices.at(a)?;
        self.vertices.at(b)?;

        let added_a = self.vertices.at_mut(a)?.add_neighbor(b);
        let added_b = self.vertices.at_mut(b)?.add_neighbor(a);
        debug_assert_eq!(added_a, added_b);

        if added_a {
            self.edges.push((a, b));
        } else {
            let message = format!("edge ({a}, {b}) already exists, ignoring");
            log::debug!("{message}");
            if let Some(sink) = sink {
                sink(message);
            }
        }
        Ok(())
    }

    /// Disconnects two vertices.
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::EdgeNotFound`] when the vertices exist but
    /// are not connected, and with [`GraphError::Access`] when either
    /// endpoint is invalid.
    pub fn remove_edge(&mut self, a: VertexIndex, b: VertexIndex) -> Result<(), GraphError> {
        if self.remove_edge_inner(a, b)? {
            Ok(())
        } else {
            Err(GraphError::EdgeNotFound(a, b))
        }
    }

    /// Like [`Graph::remove_edge`], but a missing edge is a no-op reported
    /// into `sink` instead of an error.
    pub fn remove_edge_with_diagnostics(
        &mut self,
        a: VertexIndex,
        b: VertexIndex,
        sink: &mut dyn FnMut(String),
    ) -> Result<(), GraphError> {
        if !self.remove_edge_inner(a, b)? {
            let message = format!("no edge between {a} and {b}, ignoring");
            log::debug!("{message}");
            sink(message);
        }
        Ok(())
    }

    fn remove_edge_inner(&mut self, a: VertexIndex, b: VertexIndex) -> Result<bool, GraphError> {
        self.vertices.at(a)?;
        self.vertices.at(b)?;

        let removed_a = self.vertices.at_mut(a)?.remove_neighbor(b);
        let removed_b = self.vertices.at_mut(b)?.remove_neighbor(a);
        debug_assert_eq!(removed_a, removed_b);

        if removed_a {
            let pos = self
                .edges
                .iter()
                .position(|&e| e == (a, b) || e == (b, a))
                .expect("edge cache out of sync with adjacency");
            self.edges.remove(pos);
        }
        Ok(removed_a)
    }

    /// Removes the vertex at `index`, severing all its edges first.
    ///
    /// The slot is tombstoned, not compacted away: every other vertex keeps
    /// its index, and the freed slot is reused by a later
    /// [`Graph::add_vertex`].
    ///
    /// # Errors
    ///
    /// Fails when `index` is out of range or already removed.
    pub fn remove_vertex(&mut self, index: VertexIndex) -> Result<(), GraphError> {
        let neighbors = self.vertices.at(index)?.neighbors().to_vec();
        for neighbor in neighbors {
            let severed = self.vertices.at_mut(neighbor)?.remove_neighbor(index);
            debug_assert!(severed);
        }
        self.vertices.at_mut(index)?.neighbors_mut().clear();
        self.edges.retain(|&(a, b)| a != index && b != index);
        self.vertices.erase(index)?;
        Ok(())
    }

    /// Returns whether an edge connects `a` and `b`.
    pub fn contains_edge(&self, a: VertexIndex, b: VertexIndex) -> bool {
        matches!(self.vertices.get(a), Some(vertex) if vertex.contains_neighbor(b))
    }

    /// The edges, each reported once in the orientation it was added in.
    #[inline]
    pub fn edges(&self) -> &[(VertexIndex, VertexIndex)] {
        &self.edges
    }

    /// Calls `f` once per edge.
    pub fn for_each_edge(&self, mut f: impl FnMut(VertexIndex, VertexIndex)) {
        for &(a, b) in &self.edges {
            f(a, b);
        }
    }

    /// Removes all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}

impl<D> Default for Graph<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a graph of isolated vertices from their payloads; vertex `i` holds
/// the `i`-th payload.
impl<D> FromIterator<D> for Graph<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self {
            vertices: iter.into_iter().map(Vertex::new).collect(),
            edges: Vec::new(),
        }
    }
}

impl<D: Debug> Debug for Graph<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices)
            .field("edges", &self.edges)
            .finish()
    }
}

/// Error returned by [`Graph`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("cannot connect vertex {0} to itself")]
    SelfLoop(VertexIndex),
    #[error("no edge between vertices {0} and {1}")]
    EdgeNotFound(VertexIndex, VertexIndex),
    #[error(transparent)]
    Access(#[from] AccessError),
}
