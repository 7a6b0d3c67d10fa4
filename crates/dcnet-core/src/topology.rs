//! Topology generators. Each call to [`TopologyGen::build`] produces an independent [`Graph`].

pub mod fat_tree;
pub mod random;

use rand::Rng;

use crate::graph::{Graph, GraphError};

pub use fat_tree::FatTree;
pub use random::RandomTopology;

/// The trait implemented by all topology generators.
pub trait TopologyGen {
    /// Builds a graph. Deterministic generators ignore `rng`.
    fn build<R>(&self, rng: &mut R) -> Result<Graph, TopologyError>
    where
        R: Rng + ?Sized;
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Switches need more than one port (got {0})")]
    TooFewPorts(usize),

    #[error("Radix must be even (got {0})")]
    OddRadix(usize),

    #[error("{0} servers cannot be placed without any switches")]
    NoSwitches(usize),

    #[error("Failed to wire topology")]
    Graph(#[from] GraphError),
}
