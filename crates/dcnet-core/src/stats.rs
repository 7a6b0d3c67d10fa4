//! Server-to-server path-length distributions.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    graph::{Graph, VertexKey},
    routing::{Distance, ShortestPathTables},
};

/// How many unordered server pairs are separated by each hop count.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PathLengthDistribution {
    counts: BTreeMap<usize, usize>,
    pairs: usize,
    unreachable: usize,
}

impl PathLengthDistribution {
    /// Counts the distance between every pair of connected servers. Pairs with no path between
    /// them are tallied separately and do not contribute to [`Self::fractions`].
    pub fn from_tables(graph: &Graph, tables: &ShortestPathTables) -> Self {
        let mut servers = graph
            .servers()
            .map(|v| v.key)
            .filter(|&key| graph.degree(key) > 0)
            .collect::<Vec<_>>();
        servers.sort();

        let mut dist = Self::default();
        for (i, &s) in servers.iter().enumerate() {
            for &t in &servers[i + 1..] {
                match distance(tables, s, t) {
                    Distance::Finite(d) if d > 0 => dist.record(d),
                    _ => dist.unreachable += 1,
                }
            }
        }
        dist
    }

    /// Builds the shortest-path tables for `graph` and counts its path lengths.
    pub fn for_graph(graph: &Graph) -> Self {
        let tables = ShortestPathTables::new(graph);
        Self::from_tables(graph, &tables)
    }

    pub fn merge(&mut self, other: &PathLengthDistribution) {
        for (&hops, &count) in &other.counts {
            *self.counts.entry(hops).or_default() += count;
        }
        self.pairs += other.pairs;
        self.unreachable += other.unreachable;
    }

    /// The share of reachable pairs at each hop count.
    pub fn fractions(&self) -> BTreeMap<usize, f64> {
        self.counts
            .iter()
            .map(|(&hops, &count)| (hops, count as f64 / self.pairs as f64))
            .collect()
    }

    /// The mean hop count over reachable pairs, or `None` if there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.pairs == 0 {
            return None;
        }
        let total = self
            .counts
            .iter()
            .map(|(&hops, &count)| hops * count)
            .sum::<usize>();
        Some(total as f64 / self.pairs as f64)
    }

    pub fn counts(&self) -> &BTreeMap<usize, usize> {
        &self.counts
    }

    pub fn nr_pairs(&self) -> usize {
        self.pairs
    }

    pub fn nr_unreachable(&self) -> usize {
        self.unreachable
    }

    fn record(&mut self, hops: usize) {
        *self.counts.entry(hops).or_default() += 1;
        self.pairs += 1;
    }
}

fn distance(tables: &ShortestPathTables, s: VertexKey, t: VertexKey) -> Distance {
    tables
        .get(s)
        .map(|table| table.distance(t))
        .or_else(|| tables.get(t).map(|table| table.distance(s)))
        .unwrap_or(Distance::Infinite)
}

/// Builds `iterations` graphs in parallel, seeding iteration `i` with `base_seed + i`, and merges
/// their path-length distributions. Seeds wrap around past `u64::MAX`. The first error returned
/// by `build` is propagated.
pub fn sample<F, E>(
    iterations: usize,
    base_seed: u64,
    build: F,
) -> Result<PathLengthDistribution, E>
where
    F: Fn(&mut StdRng) -> Result<Graph, E> + Sync,
    E: Send,
{
    (0..iterations)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let graph = build(&mut rng)?;
            let dist = PathLengthDistribution::for_graph(&graph);
            log::debug!("iteration {i}: {} reachable pairs", dist.pairs);
            Ok(dist)
        })
        .try_reduce(PathLengthDistribution::default, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })
}
