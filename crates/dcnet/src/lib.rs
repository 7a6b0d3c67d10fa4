//! `dcnet` builds data center topologies and studies how traffic can be routed over them.
//! Random port-constrained topologies in the style of Jellyfish and three-tier fat trees are
//! generated as typed graphs of servers and switches, which can then be queried for shortest
//! paths, `K` shortest paths, and server-to-server path-length distributions.

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod utils;
