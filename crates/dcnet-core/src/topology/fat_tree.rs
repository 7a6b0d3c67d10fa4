//! A three-tier `k`-ary fat tree.
//!
//! With radix `k` there are `k` pods. Each pod holds `k/2` edge switches and `k/2` aggregation
//! switches; every edge switch serves `k/2` servers and connects to every aggregation switch in
//! its pod. Aggregation switch `j` of each pod (pod-local index) connects to the `j`th block of
//! `k/2` core switches, so two servers in different pods are joined through a single core switch.

use rand::Rng;

use crate::graph::{Graph, Tier, Vertex, VertexKey};

use super::{TopologyError, TopologyGen};

/// A fat-tree generator parameterized by the switch radix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize,
)]
pub struct FatTree {
    k: usize,
}

impl FatTree {
    pub fn radix(&self) -> usize {
        self.k
    }

    pub fn nr_pods(&self) -> usize {
        self.k
    }

    pub fn nr_core(&self) -> usize {
        self.half() * self.half()
    }

    pub fn nr_aggregation(&self) -> usize {
        self.k * self.half()
    }

    pub fn nr_edge(&self) -> usize {
        self.k * self.half()
    }

    pub fn nr_servers(&self) -> usize {
        self.k * self.k * self.k / 4
    }

    /// Builds the fat tree. The result is the same on every call.
    pub fn generate(&self) -> Result<Graph, TopologyError> {
        self.validate()?;
        let half = self.half();
        let mut g = Graph::new();

        for id in 0..self.nr_servers() {
            g.add_vertex(Vertex::new(VertexKey::server(id), 1))?;
        }
        for (tier, count) in [
            (Tier::Edge, self.nr_edge()),
            (Tier::Aggregation, self.nr_aggregation()),
            (Tier::Core, self.nr_core()),
        ] {
            for id in 0..count {
                g.add_vertex(Vertex::new(VertexKey::switch(tier, id), self.k))?;
            }
        }

        // Servers are partitioned contiguously across edge switches
        for e in 0..self.nr_edge() {
            let edge = VertexKey::switch(Tier::Edge, e);
            for s in e * half..(e + 1) * half {
                g.add_edge(VertexKey::server(s), edge)?;
            }
        }

        // Each edge switch connects to every aggregation switch in its pod
        for e in 0..self.nr_edge() {
            let pod = e / half;
            let edge = VertexKey::switch(Tier::Edge, e);
            for a in pod * half..(pod + 1) * half {
                g.add_edge(edge, VertexKey::switch(Tier::Aggregation, a))?;
            }
        }

        // Aggregation switches with the same pod-local index share a block of core switches
        for a in 0..self.nr_aggregation() {
            let j = a % half;
            let agg = VertexKey::switch(Tier::Aggregation, a);
            for c in j * half..(j + 1) * half {
                g.add_edge(agg, VertexKey::switch(Tier::Core, c))?;
            }
        }

        log::debug!(
            "built {}-ary fat tree: {} servers, {} switches, {} links",
            self.k,
            g.nr_servers(),
            g.nr_switches(),
            g.nr_edges()
        );
        Ok(g)
    }

    fn half(&self) -> usize {
        self.k / 2
    }

    fn validate(&self) -> Result<(), TopologyError> {
        if self.k <= 1 {
            return Err(TopologyError::TooFewPorts(self.k));
        }
        if self.k % 2 != 0 {
            return Err(TopologyError::OddRadix(self.k));
        }
        Ok(())
    }
}

impl TopologyGen for FatTree {
    fn build<R>(&self, _: &mut R) -> Result<Graph, TopologyError>
    where
        R: Rng + ?Sized,
    {
        self.generate()
    }
}
