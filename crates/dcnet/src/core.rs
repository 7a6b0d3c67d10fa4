//! Core dcnet data structures, traits, and routines. The most common entry points are the
//! [topology generators](topology::TopologyGen) and
//! [`ShortestPathTables`](routing::ShortestPathTables).

pub use dcnet_core::*;
