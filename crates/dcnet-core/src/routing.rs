//! Shortest-path tables and multi-path search over a [`Graph`].

pub mod dijkstra;
pub mod yen;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    graph::{Graph, Path, VertexId, VertexKey},
    utils,
};

pub use dijkstra::{shortest_path, shortest_path_table};
pub use yen::k_shortest_paths;

/// The trait implemented by all routing algorithms
pub trait RoutingAlgo {
    /// Return the set of next hops needed to get from `from` to `to`.
    fn next_hops(&self, from: VertexKey, to: VertexKey) -> Option<Vec<VertexKey>>;
}

/// A hop count, or no path at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Distance {
    Finite(usize),
    Infinite,
}

impl Distance {
    pub fn finite(self) -> Option<usize> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Infinite => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Infinite => write!(f, "inf"),
        }
    }
}

/// What a [`ShortestPathTable`] knows about one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PathEntry {
    pub distance: Distance,
    /// The neighbor one hop closer to the source.
    pub predecessor: Option<VertexKey>,
}

impl PathEntry {
    pub(crate) const UNREACHED: PathEntry = PathEntry {
        distance: Distance::Infinite,
        predecessor: None,
    };
}

/// The result of a single-source shortest-path search. Tables are immutable once built; looking
/// up a vertex the search never saw does not create an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTable {
    source: VertexKey,
    entries: FxHashMap<VertexKey, PathEntry>,
}

impl ShortestPathTable {
    pub(crate) fn new(source: VertexKey, entries: FxHashMap<VertexKey, PathEntry>) -> Self {
        Self { source, entries }
    }

    pub fn source(&self) -> VertexKey {
        self.source
    }

    pub fn get(&self, key: VertexKey) -> Option<&PathEntry> {
        self.entries.get(&key)
    }

    pub fn distance(&self, key: VertexKey) -> Distance {
        self.get(key)
            .map(|entry| entry.distance)
            .unwrap_or(Distance::Infinite)
    }

    pub fn predecessor(&self, key: VertexKey) -> Option<VertexKey> {
        self.get(key).and_then(|entry| entry.predecessor)
    }

    /// Reconstructs the path from the source to `dst` by walking predecessors. Returns `None` if
    /// `dst` was not reached.
    pub fn path_to(&self, dst: VertexKey) -> Option<Path> {
        if !self.distance(dst).is_finite() {
            return None;
        }
        let mut vertices = vec![dst];
        let mut cur = dst;
        while cur != self.source {
            cur = self.predecessor(cur)?;
            vertices.push(cur);
        }
        vertices.reverse();
        Some(Path::new(vertices))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexKey, &PathEntry)> {
        self.entries.iter().map(|(&key, entry)| (key, entry))
    }

    delegate::delegate! {
        to self.entries {
            #[call(len)]
            pub fn nr_entries(&self) -> usize;
        }
    }
}

/// Shortest-path tables rooted at every server that has at least one link.
#[derive(Debug, Clone, Default)]
pub struct ShortestPathTables {
    inner: FxHashMap<VertexKey, ShortestPathTable>,
}

impl ShortestPathTables {
    /// Builds one table per connected server. Each source is an independent search over the same
    /// graph, so chunks of sources are searched in parallel.
    pub fn new(graph: &Graph) -> Self {
        let sources = graph
            .servers()
            .map(|v| v.key)
            .filter(|&key| graph.degree(key) > 0)
            .collect::<Vec<_>>();
        let inner = utils::par_chunks(&sources, |chunk| {
            chunk
                .iter()
                .map(|&source| (source, shortest_path_table(graph, source)))
                .collect()
        })
        .collect();
        Self { inner }
    }

    pub fn get(&self, source: VertexKey) -> Option<&ShortestPathTable> {
        self.inner.get(&source)
    }

    pub fn sources(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.inner.keys().copied()
    }

    pub fn tables(&self) -> impl Iterator<Item = &ShortestPathTable> {
        self.inner.values()
    }

    /// The shortest path from `src` to `dst`. If there is no table rooted at `src`, the table
    /// rooted at `dst` is used and its path reversed.
    pub fn path(&self, src: VertexKey, dst: VertexKey) -> Option<Path> {
        if let Some(table) = self.get(src) {
            return table.path_to(dst);
        }
        let mut vertices = self.get(dst)?.path_to(src)?.into_vertices();
        vertices.reverse();
        Some(Path::new(vertices))
    }
}

impl RoutingAlgo for ShortestPathTables {
    fn next_hops(&self, from: VertexKey, to: VertexKey) -> Option<Vec<VertexKey>> {
        // In a table rooted at `to`, the predecessor of `from` is one hop closer to `to`
        self.get(to)
            .and_then(|table| table.predecessor(from))
            .map(|hop| vec![hop])
    }
}

/// The hop-by-hop path between two servers, or `None` if they are not connected.
pub fn shortest_path_list(
    tables: &ShortestPathTables,
    src: VertexId,
    dst: VertexId,
) -> Option<Path> {
    tables.path(VertexKey::Server(src), VertexKey::Server(dst))
}
