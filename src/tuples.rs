//! Enumeration of short paths in the adjacency structure.
//!
//! Bonded force fields derive their terms from topology alone: every edge is
//! a bond, every path of three vertices an angle, every path of four a
//! dihedral. [`Graph::for_each_n_tuple`] discovers all three families in a
//! single sweep over the adjacency lists.

use bitvec::prelude::*;

use crate::{graph::Graph, memory::EntityIndex, VertexIndex};

/// A pair of adjacent vertices, i.e. an edge.
pub type BondPair = (VertexIndex, VertexIndex);

/// A path of three distinct vertices; the middle entry is adjacent to both
/// endpoints.
pub type AnglePath = (VertexIndex, VertexIndex, VertexIndex);

/// A path of four distinct vertices connected in sequence.
pub type DihedralPath = (VertexIndex, VertexIndex, VertexIndex, VertexIndex);

impl<D> Graph<D> {
    /// Enumerates all bond pairs, angle paths and dihedral paths in one
    /// sweep.
    ///
    /// Each pair and each angle path is reported exactly once: pairs follow
    /// the discovery order of the sweep, angle paths place the
    /// smaller-index endpoint first. A dihedral path `(a, b, c, d)` is any
    /// walk where `b` is adjacent to `a` and `c`, `c` is adjacent to `d`,
    /// and `d` is neither `a` nor `b`; closing edges such as `d`-`a` do not
    /// disqualify it, so cycles contribute their chains too.
    /// The orientation of a reported dihedral path is an artifact of
    /// discovery order, so callers treating `(a, b, c, d)` and
    /// `(d, c, b, a)` as equivalent must deduplicate themselves.
    pub fn for_each_n_tuple(
        &self,
        mut pair: impl FnMut(BondPair),
        mut triple: impl FnMut(AnglePath),
        mut quad: impl FnMut(DihedralPath),
    ) {
        let mut visited = bitvec![0; self.slot_count()];

        for (v1, vertex) in self.vertices.iter() {
            visited.set(v1.index(), true);
            let neighbors = vertex.neighbors();

            for &v2 in neighbors {
                if !visited[v2.index()] {
                    pair((v1, v2));

                    let across = &self.vertices[v2];
                    for &v3 in neighbors {
                        if v3 == v2 {
                            continue;
                        }
                        for &v4 in across.neighbors() {
                            // all four vertices distinct; v4 != v2 holds
                            // because there are no self loops
                            if v4 != v1 && v4 != v3 {
                                quad((v3, v1, v2, v4));
                            }
                        }
                    }
                }

                for &other in neighbors {
                    if other < v2 {
                        triple((other, v1, v2));
                    }
                }
            }
        }
    }

    /// Collects all bond pairs, angle paths and dihedral paths.
    ///
    /// # Example
    ///
    /// ```
    /// use bondgraph::Graph;
    ///
    /// // a chain of four vertices
    /// let mut graph = Graph::new();
    /// let vs: Vec<_> = (0..4).map(|i| graph.add_vertex(i)).collect();
    /// for w in vs.windows(2) {
    ///     graph.add_edge(w[0], w[1])?;
    /// }
    ///
    /// let (pairs, triples, quads) = graph.find_n_tuples();
    /// assert_eq!(pairs.len(), 3);
    /// assert_eq!(triples.len(), 2);
    /// assert_eq!(quads, [(vs[0], vs[1], vs[2], vs[3])]);
    /// # Ok::<(), bondgraph::GraphError>(())
    /// ```
    pub fn find_n_tuples(&self) -> (Vec<BondPair>, Vec<AnglePath>, Vec<DihedralPath>) {
        let mut pairs = Vec::new();
        let mut triples = Vec::new();
        let mut quads = Vec::new();
        self.for_each_n_tuple(
            |pair| pairs.push(pair),
            |triple| triples.push(triple),
            |quad| quads.push(quad),
        );
        log::trace!(
            "found {} pairs, {} triples, {} quadruples",
            pairs.len(),
            triples.len(),
            quads.len()
        );
        (pairs, triples, quads)
    }
}
