use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashSet;

identifier!(VertexId, usize);

/// The tier a switch occupies. Random topologies only use [`Tier::Plain`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Tier {
    Plain,
    Edge,
    Aggregation,
    Core,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Plain => write!(f, "switch"),
            Tier::Edge => write!(f, "edge switch"),
            Tier::Aggregation => write!(f, "aggregation switch"),
            Tier::Core => write!(f, "core switch"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum VertexKind {
    Server,
    Switch(Tier),
}

/// Identifies a vertex. Servers and switches draw their IDs from separate spaces, so the same
/// [`VertexId`] may name both a server and a switch; only the full key is unique.
///
/// The derived ordering (servers first, then switches by tier, then by ID) is the tie-break used
/// by the shortest-path search.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum VertexKey {
    Server(VertexId),
    Switch(Tier, VertexId),
}

impl VertexKey {
    pub fn server(id: usize) -> Self {
        Self::Server(VertexId::new(id))
    }

    pub fn switch(tier: Tier, id: usize) -> Self {
        Self::Switch(tier, VertexId::new(id))
    }

    pub fn id(&self) -> VertexId {
        match *self {
            VertexKey::Server(id) | VertexKey::Switch(_, id) => id,
        }
    }

    pub fn kind(&self) -> VertexKind {
        match *self {
            VertexKey::Server(_) => VertexKind::Server,
            VertexKey::Switch(tier, _) => VertexKind::Switch(tier),
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, VertexKey::Server(_))
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, VertexKey::Switch(..))
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexKey::Server(id) => write!(f, "server {id}"),
            VertexKey::Switch(tier, id) => write!(f, "{tier} {id}"),
        }
    }
}

/// A server or switch together with its port budget.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    pub key: VertexKey,
    pub ports: usize,
}

/// A sequence of vertices from a source to a sink.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Path {
    vertices: Vec<VertexKey>,
}

impl Path {
    pub fn new(vertices: Vec<VertexKey>) -> Self {
        Self { vertices }
    }

    /// The number of edges traversed.
    pub fn nr_hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<VertexKey> {
        self.vertices.first().copied()
    }

    pub fn sink(&self) -> Option<VertexKey> {
        self.vertices.last().copied()
    }

    /// Get an iterator over the traversed vertex pairs, in order.
    pub fn links(&self) -> impl Iterator<Item = (VertexKey, VertexKey)> + '_ {
        self.vertices.iter().copied().tuple_windows()
    }

    /// Returns true if no vertex appears twice.
    pub fn is_loopless(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.vertices.iter().all(|v| seen.insert(v))
    }

    pub fn into_vertices(self) -> Vec<VertexKey> {
        self.vertices
    }

    delegate::delegate! {
        to self.vertices {
            #[call(len)]
            pub fn nr_vertices(&self) -> usize;

            #[call(as_slice)]
            pub fn vertices(&self) -> &[VertexKey];

            pub fn contains(&self, key: &VertexKey) -> bool;
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertices.iter().join(" -> "))
    }
}
