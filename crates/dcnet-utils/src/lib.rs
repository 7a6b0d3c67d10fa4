//! Utilities for describing dcnet topologies in configuration files.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::path::{Path, PathBuf};

use dcnet_core::{FatTree, Graph, RandomTopology, TopologyError};
use rand::{rngs::StdRng, SeedableRng};

/// Reads a [`TopologySpec`] from a file in JSON or Dhall format and builds its [`Graph`].
pub fn read_graph(topology_spec: impl AsRef<Path>) -> Result<Graph, Error> {
    let spec = read_topology_spec(topology_spec)?;
    Ok(spec.build()?)
}

/// Reads a [`TopologySpec`] from a file in JSON or Dhall format.
pub fn read_topology_spec(path: impl AsRef<Path>) -> Result<TopologySpec, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let spec: TopologySpec = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)?,
        Some("dhall") => serde_dhall::from_str(&contents).parse().map_err(Box::new)?,
        _ => return Err(Error::UnknownFileType(path.as_ref().into())),
    };
    Ok(spec)
}

/// A topology specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    /// A random, port-constrained topology.
    Random {
        /// Number of servers.
        num_servers: usize,
        /// Number of switches.
        num_switches: usize,
        /// Ports per switch.
        num_ports: usize,
        /// Seed for the generator. Defaults to 0.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// A three-tier fat tree.
    FatTree {
        /// Switch radix.
        k: usize,
    },
}

impl TopologySpec {
    /// Builds the described graph. Random topologies are seeded from the specification, so the
    /// same specification always yields the same graph.
    pub fn build(&self) -> Result<Graph, TopologyError> {
        match *self {
            TopologySpec::Random {
                num_servers,
                num_switches,
                num_ports,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
                RandomTopology::builder()
                    .num_servers(num_servers)
                    .num_switches(num_switches)
                    .num_ports(num_ports)
                    .build()
                    .generate(&mut rng)
            }
            TopologySpec::FatTree { k } => FatTree::new(k).generate(),
        }
    }
}

/// Error kinds for specifications and I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// Error deserializing Dhall.
    #[error("Dhall error")]
    Dhall(#[from] Box<serde_dhall::Error>),

    /// Error deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Error constructing a valid topology.
    #[error("invalid topology")]
    Topology(#[from] TopologyError),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_spec(name: &str, contents: &str) -> anyhow::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        let mut f = std::fs::File::create(dir.path().join(name))?;
        f.write_all(contents.as_bytes())?;
        Ok(dir)
    }

    #[test]
    fn json_random_spec() -> anyhow::Result<()> {
        let dir = write_spec(
            "topo.json",
            r#"{ "kind": "random", "num_servers": 6, "num_switches": 3, "num_ports": 4, "seed": 9 }"#,
        )?;
        let spec = read_topology_spec(dir.path().join("topo.json"))?;
        assert_eq!(
            spec,
            TopologySpec::Random {
                num_servers: 6,
                num_switches: 3,
                num_ports: 4,
                seed: Some(9),
            }
        );
        let g = read_graph(dir.path().join("topo.json"))?;
        assert_eq!(g.nr_servers(), 6);
        assert_eq!(g.nr_switches(), 3);
        Ok(())
    }

    #[test]
    fn missing_seed_defaults_to_zero() -> anyhow::Result<()> {
        let dir = write_spec(
            "topo.json",
            r#"{ "kind": "random", "num_servers": 8, "num_switches": 4, "num_ports": 4 }"#,
        )?;
        let spec = read_topology_spec(dir.path().join("topo.json"))?;
        let seeded = TopologySpec::Random {
            num_servers: 8,
            num_switches: 4,
            num_ports: 4,
            seed: Some(0),
        };
        let mut links = spec.build()?.links().collect::<Vec<_>>();
        let mut expected = seeded.build()?.links().collect::<Vec<_>>();
        links.sort();
        expected.sort();
        assert_eq!(links, expected);
        Ok(())
    }

    #[test]
    fn dhall_fat_tree_spec() -> anyhow::Result<()> {
        let dir = write_spec("topo.dhall", r#"{ kind = "fat_tree", k = 4 }"#)?;
        let spec = read_topology_spec(dir.path().join("topo.dhall"))?;
        assert_eq!(spec, TopologySpec::FatTree { k: 4 });
        let g = read_graph(dir.path().join("topo.dhall"))?;
        assert_eq!(g.nr_servers(), 16);
        assert_eq!(g.nr_switches(), 20);
        Ok(())
    }

    #[test]
    fn unknown_extension_fails() -> anyhow::Result<()> {
        let dir = write_spec("topo.yaml", "kind: fat_tree\nk: 4\n")?;
        let res = read_topology_spec(dir.path().join("topo.yaml"));
        assert!(matches!(res, Err(Error::UnknownFileType(..))));
        Ok(())
    }

    #[test]
    fn invalid_topology_fails() -> anyhow::Result<()> {
        let dir = write_spec("topo.json", r#"{ "kind": "fat_tree", "k": 3 }"#)?;
        let res = read_graph(dir.path().join("topo.json"));
        assert!(matches!(
            res,
            Err(Error::Topology(TopologyError::OddRadix(3)))
        ));
        Ok(())
    }
}
