#![warn(unreachable_pub, missing_debug_implementations)]

//! The core dcnet library. This crate builds [data center topologies](topology) as
//! [graphs](Graph) of servers and switches, and [routes](routing) over them.

#[macro_use]
mod ident;

pub mod graph;
pub mod routing;
pub mod stats;
pub mod topology;

pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use graph::{Graph, GraphError, Path, Tier, Vertex, VertexId, VertexKey, VertexKind};
pub use routing::{
    k_shortest_paths, shortest_path, shortest_path_list, shortest_path_table, Distance, PathEntry,
    RoutingAlgo, ShortestPathTable, ShortestPathTables,
};
pub use stats::PathLengthDistribution;
pub use topology::{FatTree, RandomTopology, TopologyError, TopologyGen};
