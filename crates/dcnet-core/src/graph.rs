//! The typed, undirected graph shared by every topology family.

pub mod types;

use petgraph::{
    stable_graph::{NodeIndex, StableUnGraph},
    visit::EdgeRef,
};
use rustc_hash::FxHashMap;

pub use petgraph::stable_graph::EdgeIndex;
pub use types::*;

/// An arena of servers and switches connected by undirected edges. Vertices are addressed by
/// [`VertexKey`] and edges by stable [`EdgeIndex`]es, so removing an edge never invalidates the
/// indices of others. Each vertex's incident edges are derived from the arena, which means an
/// edge is detached from both endpoints in a single removal.
///
/// Port budgets are recorded on the vertices but are not enforced here; that is the job of the
/// topology generators.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: StableUnGraph<Vertex, ()>,
    key2idx: FxHashMap<VertexKey, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex. Keys must be unique.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        let key = vertex.key;
        if self.key2idx.contains_key(&key) {
            return Err(GraphError::DuplicateVertex(key));
        }
        let idx = self.inner.add_node(vertex);
        self.key2idx.insert(key, idx);
        Ok(())
    }

    /// Connects `a` and `b`, appending the new edge to both incidence sets.
    pub fn add_edge(&mut self, a: VertexKey, b: VertexKey) -> Result<EdgeIndex, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let i = self.idx_of(a)?;
        let j = self.idx_of(b)?;
        Ok(self.inner.add_edge(i, j, ()))
    }

    /// Removes an edge from both of its endpoints and returns them. Returns `None` if `edge` is
    /// not in the graph.
    pub fn remove_edge(&mut self, edge: EdgeIndex) -> Option<(VertexKey, VertexKey)> {
        let endpoints = self.endpoints(edge)?;
        self.inner.remove_edge(edge);
        Some(endpoints)
    }

    /// Removes one edge between `a` and `b`, if there is one. Returns false if they are not
    /// adjacent.
    pub fn remove_edge_between(&mut self, a: VertexKey, b: VertexKey) -> bool {
        match self.find_edge(a, b) {
            Some(edge) => self.remove_edge(edge).is_some(),
            None => false,
        }
    }

    pub fn find_edge(&self, a: VertexKey, b: VertexKey) -> Option<EdgeIndex> {
        let i = *self.key2idx.get(&a)?;
        let j = *self.key2idx.get(&b)?;
        self.inner.find_edge(i, j)
    }

    pub fn is_neighbor(&self, a: VertexKey, b: VertexKey) -> bool {
        self.find_edge(a, b).is_some()
    }

    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(VertexKey, VertexKey)> {
        self.inner
            .edge_endpoints(edge)
            .map(|(i, j)| (self.inner[i].key, self.inner[j].key))
    }

    /// Returns the endpoint of `edge` that is not `from`. Both the ID and the kind are compared,
    /// so a server and a switch sharing an ID are never confused.
    pub fn opposite(&self, edge: EdgeIndex, from: VertexKey) -> Option<VertexKey> {
        let (a, b) = self.endpoints(edge)?;
        if a == from {
            Some(b)
        } else if b == from {
            Some(a)
        } else {
            None
        }
    }

    /// Get an iterator over the edges incident to `key`. The iterator is empty if `key` is not in
    /// the graph.
    pub fn incident_edges(&self, key: VertexKey) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.key2idx
            .get(&key)
            .into_iter()
            .flat_map(move |&idx| self.inner.edges(idx).map(|e| e.id()))
    }

    pub fn neighbors(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.incident_edges(key)
            .filter_map(move |edge| self.opposite(edge, key))
    }

    pub fn degree(&self, key: VertexKey) -> usize {
        self.incident_edges(key).count()
    }

    /// The number of ports of `key` not yet used by an edge.
    pub fn open_ports(&self, key: VertexKey) -> usize {
        self.vertex(key)
            .map(|v| v.ports.saturating_sub(self.degree(key)))
            .unwrap_or(0)
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.key2idx.get(&key).map(|&idx| &self.inner[idx])
    }

    pub fn contains(&self, key: VertexKey) -> bool {
        self.key2idx.contains_key(&key)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    pub fn servers(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices().filter(|v| v.key.is_server())
    }

    pub fn switches(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices().filter(|v| v.key.is_switch())
    }

    /// Get an iterator over the endpoints of every edge.
    pub fn links(&self) -> impl Iterator<Item = (VertexKey, VertexKey)> + '_ {
        self.inner
            .edge_indices()
            .filter_map(move |edge| self.endpoints(edge))
    }

    pub fn nr_servers(&self) -> usize {
        self.servers().count()
    }

    pub fn nr_switches(&self) -> usize {
        self.switches().count()
    }

    delegate::delegate! {
        to self.inner {
            #[call(node_count)]
            pub fn nr_vertices(&self) -> usize;

            #[call(edge_count)]
            pub fn nr_edges(&self) -> usize;
        }
    }

    fn idx_of(&self, key: VertexKey) -> Result<NodeIndex, GraphError> {
        self.key2idx
            .get(&key)
            .copied()
            .ok_or(GraphError::UnknownVertex(key))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Duplicate vertex {0}")]
    DuplicateVertex(VertexKey),

    #[error("Vertex {0} cannot be connected to itself")]
    SelfLoop(VertexKey),

    #[error("Vertex {0} is not in the graph")]
    UnknownVertex(VertexKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(id: usize) -> VertexKey {
        VertexKey::server(id)
    }

    fn switch(id: usize) -> VertexKey {
        VertexKey::switch(Tier::Plain, id)
    }

    // Server 0 and switch 0 share an ID.
    fn shared_id_graph() -> anyhow::Result<Graph> {
        let mut g = Graph::new();
        g.add_vertex(Vertex::new(server(0), 1))?;
        g.add_vertex(Vertex::new(server(1), 1))?;
        g.add_vertex(Vertex::new(switch(0), 4))?;
        g.add_vertex(Vertex::new(switch(1), 4))?;
        g.add_edge(server(0), switch(0))?;
        g.add_edge(server(1), switch(1))?;
        g.add_edge(switch(0), switch(1))?;
        Ok(g)
    }

    #[test]
    fn duplicate_vertex_fails() {
        let mut g = Graph::new();
        assert!(g.add_vertex(Vertex::new(server(0), 1)).is_ok());
        assert!(g.add_vertex(Vertex::new(switch(0), 1)).is_ok());
        let res = g.add_vertex(Vertex::new(server(0), 1));
        assert!(matches!(res, Err(GraphError::DuplicateVertex(..))));
    }

    #[test]
    fn self_loop_fails() -> anyhow::Result<()> {
        let mut g = shared_id_graph()?;
        let res = g.add_edge(switch(0), switch(0));
        assert!(matches!(res, Err(GraphError::SelfLoop(..))));
        Ok(())
    }

    #[test]
    fn unknown_vertex_fails() -> anyhow::Result<()> {
        let mut g = shared_id_graph()?;
        let res = g.add_edge(switch(0), switch(7));
        assert!(matches!(res, Err(GraphError::UnknownVertex(..))));
        Ok(())
    }

    #[test]
    fn opposite_distinguishes_shared_ids() -> anyhow::Result<()> {
        let g = shared_id_graph()?;
        let edge = g.find_edge(server(0), switch(0)).unwrap();
        assert_eq!(g.opposite(edge, server(0)), Some(switch(0)));
        assert_eq!(g.opposite(edge, switch(0)), Some(server(0)));
        assert_eq!(g.opposite(edge, server(1)), None);
        Ok(())
    }

    #[test]
    fn remove_edge_detaches_both_endpoints() -> anyhow::Result<()> {
        let mut g = shared_id_graph()?;
        let edge = g.find_edge(switch(0), switch(1)).unwrap();
        assert_eq!(g.remove_edge(edge), Some((switch(0), switch(1))));
        assert!(!g.is_neighbor(switch(0), switch(1)));
        assert!(!g.is_neighbor(switch(1), switch(0)));
        assert_eq!(g.degree(switch(0)), 1);
        assert_eq!(g.degree(switch(1)), 1);
        assert_eq!(g.nr_edges(), 2);
        // The edge is gone, so a second removal is a no-op
        assert_eq!(g.remove_edge(edge), None);
        Ok(())
    }

    #[test]
    fn remove_missing_edge_is_noop() -> anyhow::Result<()> {
        let mut g = shared_id_graph()?;
        assert!(!g.remove_edge_between(server(0), server(1)));
        assert!(g.remove_edge_between(switch(1), switch(0)));
        assert!(!g.remove_edge_between(switch(1), switch(0)));
        assert_eq!(g.nr_edges(), 2);
        Ok(())
    }

    #[test]
    fn neighbors_and_ports() -> anyhow::Result<()> {
        let g = shared_id_graph()?;
        let mut neighbors = g.neighbors(switch(0)).collect::<Vec<_>>();
        neighbors.sort();
        assert_eq!(neighbors, vec![server(0), switch(1)]);
        assert_eq!(g.open_ports(switch(0)), 2);
        assert_eq!(g.open_ports(server(0)), 0);
        assert_eq!(g.nr_servers(), 2);
        assert_eq!(g.nr_switches(), 2);
        assert_eq!(g.neighbors(switch(9)).count(), 0);
        Ok(())
    }
}
