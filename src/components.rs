//! Connectivity queries and component extraction.
//!
//! Component extraction comes in two flavors. [`Graph::connected_components`]
//! clones vertex payloads and leaves the source graph untouched;
//! [`Graph::into_connected_components`] consumes the graph and moves the
//! payloads out, for payload types that are expensive or impossible to clone.
//! Both compact the extracted components: the blanks of the source graph do
//! not carry over, so indices are remapped.

use bitvec::prelude::*;

use crate::{
    graph::{Graph, GraphError},
    memory::{EntityIndex, PersistentVec},
    vertex::Vertex,
    VertexIndex,
};

impl<D> Graph<D> {
    /// Returns whether every live vertex is reachable from every other.
    ///
    /// The empty graph is connected.
    ///
    /// # Example
    ///
    /// ```
    /// use bondgraph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// let a = graph.add_vertex(());
    /// let b = graph.add_vertex(());
    /// assert!(!graph.is_connected());
    ///
    /// graph.add_edge(a, b)?;
    /// assert!(graph.is_connected());
    /// # Ok::<(), bondgraph::GraphError>(())
    /// ```
    pub fn is_connected(&self) -> bool {
        let mut iter = self.vertices.iter();
        let Some((start, _)) = iter.next() else {
            return true;
        };

        let mut visited = bitvec![0; self.slot_count()];
        let mut stack = vec![start];
        visited.set(start.index(), true);
        let mut seen = 0;

        while let Some(ix) = stack.pop() {
            seen += 1;
            for &neighbor in self.vertices[ix].neighbors() {
                if !visited[neighbor.index()] {
                    visited.set(neighbor.index(), true);
                    stack.push(neighbor);
                }
            }
        }

        seen == self.vertex_count()
    }

    /// Groups the live vertices into connected components, in discovery
    /// order. Within a component, members are listed in depth-first order
    /// from the lowest-index member.
    fn component_indices(&self) -> Vec<Vec<VertexIndex>> {
        let mut visited = bitvec![0; self.slot_count()];
        let mut components = Vec::new();

        for (start, _) in self.vertices.iter() {
            if visited[start.index()] {
                continue;
            }

            let mut members = Vec::new();
            let mut stack = vec![start];
            visited.set(start.index(), true);

            while let Some(ix) = stack.pop() {
                members.push(ix);
                for &neighbor in self.vertices[ix].neighbors() {
                    if !visited[neighbor.index()] {
                        visited.set(neighbor.index(), true);
                        stack.push(neighbor);
                    }
                }
            }

            components.push(members);
        }

        components
    }

    /// The number of connected components among the live vertices.
    pub fn component_count(&self) -> usize {
        self.component_indices().len()
    }

    /// Extracts each connected component as its own compact graph, cloning
    /// the vertex payloads. The source graph is left unchanged.
    ///
    /// Component indices do not correspond to indices in the source graph:
    /// each component is rebuilt without blanks.
    pub fn connected_components(&self) -> Vec<Graph<D>>
    where
        D: Clone,
    {
        let components = self.component_indices();
        // shared across components; each reads only the entries it wrote
        let mut remap = vec![VertexIndex::default(); self.slot_count()];

        components
            .iter()
            .map(|members| {
                let mut graph = Graph::with_capacity(members.len(), 0);
                for &ix in members {
                    remap[ix.index()] = graph.add_vertex(self.vertices[ix].data().clone());
                }
                for &ix in members {
                    for &neighbor in self.vertices[ix].neighbors() {
                        if neighbor.index() < ix.index() {
                            graph
                                .add_edge(remap[neighbor.index()], remap[ix.index()])
                                .expect("endpoints were just inserted");
                        }
                    }
                }
                graph
            })
            .collect()
    }

    /// Extracts each connected component as its own compact graph, consuming
    /// the graph and moving the vertex payloads.
    ///
    /// # Example
    ///
    /// ```
    /// use bondgraph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// let a = graph.add_vertex(String::from("a"));
    /// let b = graph.add_vertex(String::from("b"));
    /// graph.add_vertex(String::from("c"));
    /// graph.add_edge(a, b)?;
    ///
    /// let components = graph.into_connected_components();
    /// let sizes: Vec<_> = components.iter().map(Graph::vertex_count).collect();
    /// assert_eq!(sizes, [2, 1]);
    /// # Ok::<(), bondgraph::GraphError>(())
    /// ```
    pub fn into_connected_components(self) -> Vec<Graph<D>> {
        let components = self.component_indices();
        let mut remap = vec![VertexIndex::default(); self.slot_count()];
        let mut slots: Vec<Option<Vertex<D>>> =
            self.vertices.into_slots().into_iter().map(Some).collect();

        components
            .iter()
            .map(|members| {
                for (new_ix, &old) in members.iter().enumerate() {
                    remap[old.index()] = VertexIndex::new(new_ix);
                }

                let vertices: PersistentVec<VertexIndex, Vertex<D>> = members
                    .iter()
                    .map(|&old| {
                        let vertex = slots[old.index()]
                            .take()
                            .expect("vertex assigned to two components");
                        let neighbors = vertex
                            .neighbors()
                            .iter()
                            .map(|n| remap[n.index()])
                            .collect();
                        Vertex::from_parts(vertex.into_data(), neighbors)
                    })
                    .collect();

                Graph::from_vertices(vertices)
            })
            .collect()
    }

    /// Copies all live vertices and edges of `other` into this graph.
    ///
    /// Returns the index translation: position `i` holds the index in this
    /// graph of the vertex that occupied slot `i` of `other`. Entries for
    /// deactivated slots of `other` are meaningless.
    pub fn append(&mut self, other: &Graph<D>) -> Vec<VertexIndex>
    where
        D: Clone,
    {
        let mut mapping = vec![VertexIndex::default(); other.slot_count()];

        for (ix, vertex) in other.vertices.iter() {
            mapping[ix.index()] = self.add_vertex(vertex.data().clone());
        }
        for (ix, vertex) in other.vertices.iter() {
            for &neighbor in vertex.neighbors() {
                // neighbors are symmetric, replay each edge once
                if ix.index() < neighbor.index() {
                    self.add_edge(mapping[ix.index()], mapping[neighbor.index()])
                        .expect("endpoints were just inserted");
                }
            }
        }

        mapping
    }

    /// Appends `other` and connects `here` (in this graph) to the copy of
    /// `there` (from `other`), joining the two structures.
    ///
    /// # Errors
    ///
    /// Fails when `here` is not a live vertex of this graph or `there` is
    /// not a live vertex of `other`; nothing is appended in that case.
    pub fn append_with_bridge(
        &mut self,
        other: &Graph<D>,
        here: VertexIndex,
        there: VertexIndex,
    ) -> Result<Vec<VertexIndex>, GraphError>
    where
        D: Clone,
    {
        self.vertex(here)?;
        other.vertex(there)?;

        let mapping = self.append(other);
        self.add_edge(here, mapping[there.index()])?;
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles and one isolated vertex, with a blank slot in between.
    fn two_triangles_and_a_loner() -> Graph<u32> {
        let mut graph = Graph::new();
        let vs: Vec<_> = (0..8).map(|i| graph.add_vertex(i)).collect();
        for (a, b) in [(0, 1), (1, 2), (2, 0), (4, 5), (5, 6), (6, 4)] {
            graph.add_edge(vs[a], vs[b]).unwrap();
        }
        graph.remove_vertex(vs[3]).unwrap();
        graph
    }

    #[test]
    fn empty_graph_is_connected() {
        let graph: Graph<()> = Graph::new();
        assert!(graph.is_connected());
        assert_eq!(graph.component_count(), 0);
        assert!(graph.connected_components().is_empty());
    }

    #[test]
    fn connectivity_follows_mutations() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0);
        assert!(graph.is_connected());

        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        assert!(!graph.is_connected());

        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, c).unwrap();
        assert!(graph.is_connected());

        graph.remove_vertex(b).unwrap();
        assert!(!graph.is_connected());

        graph.remove_vertex(c).unwrap();
        assert!(graph.is_connected());
    }

    #[test]
    fn components_are_compact_copies() {
        let graph = two_triangles_and_a_loner();
        assert_eq!(graph.component_count(), 3);

        let components = graph.connected_components();
        let sizes: Vec<_> = components.iter().map(Graph::vertex_count).collect();
        assert_eq!(sizes, [3, 3, 1]);

        for component in &components {
            assert!(component.is_connected());
            // compacted: no blanks survive the extraction
            assert_eq!(component.slot_count(), component.vertex_count());
        }
        assert_eq!(components[0].edge_count(), 3);
        assert_eq!(components[1].edge_count(), 3);
        assert_eq!(components[2].edge_count(), 0);

        // source untouched
        assert_eq!(graph.vertex_count(), 7);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn destructive_components_move_payloads() {
        let graph = two_triangles_and_a_loner();
        let payloads: Vec<Vec<u32>> = graph
            .into_connected_components()
            .into_iter()
            .map(|c| c.vertices().iter().map(|(_, v)| *v.data()).collect())
            .collect();

        let mut sorted: Vec<Vec<u32>> = payloads
            .into_iter()
            .map(|mut p| {
                p.sort_unstable();
                p
            })
            .collect();
        sorted.sort();
        assert_eq!(sorted, [vec![0, 1, 2], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn destructive_components_preserve_edges() {
        let graph = two_triangles_and_a_loner();
        let components = graph.into_connected_components();
        assert_eq!(components.len(), 3);
        for component in &components {
            assert!(component.is_connected());
        }
        assert_eq!(components[0].edge_count(), 3);
        assert_eq!(components[1].edge_count(), 3);
        assert_eq!(components[2].edge_count(), 0);
    }

    #[test]
    fn append_translates_indices() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(100);

        let mut other = Graph::new();
        let x = other.add_vertex(0);
        let y = other.add_vertex(1);
        let z = other.add_vertex(2);
        other.add_edge(x, y).unwrap();
        other.add_edge(y, z).unwrap();
        other.remove_vertex(z).unwrap();

        let mapping = graph.append(&other);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(mapping[x.index()], mapping[y.index()]));
        assert!(!graph.contains_edge(a, mapping[x.index()]));
        assert_eq!(graph.vertex(mapping[y.index()]).unwrap().data(), &1);
    }

    #[test]
    fn bridged_append_joins_the_graphs() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        graph.add_edge(a, b).unwrap();

        let mut other = Graph::new();
        let x = other.add_vertex(2);
        let y = other.add_vertex(3);
        other.add_edge(x, y).unwrap();

        let mapping = graph.append_with_bridge(&other, b, x).unwrap();
        assert!(graph.is_connected());
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains_edge(b, mapping[x.index()]));
    }

    #[test]
    fn bridged_append_validates_before_copying() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(0);

        let mut other = Graph::new();
        let x = other.add_vertex(1);
        other.remove_vertex(x).unwrap();

        assert!(graph.append_with_bridge(&other, a, x).is_err());
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn round_trip_components_through_append() {
        let graph = two_triangles_and_a_loner();
        let mut rebuilt = Graph::new();
        for component in graph.connected_components() {
            rebuilt.append(&component);
        }

        assert_eq!(rebuilt.vertex_count(), graph.vertex_count());
        assert_eq!(rebuilt.edge_count(), graph.edge_count());
        assert_eq!(rebuilt.component_count(), graph.component_count());
    }
}
