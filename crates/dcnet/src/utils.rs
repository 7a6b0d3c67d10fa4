//! Utilities for reading topologies from configuration files.

pub use dcnet_utils::*;
