//! Yen's algorithm for the `K` shortest loopless paths between two vertices.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::graph::{Graph, Path, VertexKey};

use super::dijkstra;

/// Finds up to `k` distinct loopless paths from `source` to `sink`, in non-decreasing order of
/// length. With `equal_cost`, only paths as short as the shortest one are returned.
///
/// Edges are temporarily removed from `graph` while searching for spur paths. They are all put
/// back before this function returns, though their [`EdgeIndex`](crate::graph::EdgeIndex)es may
/// change.
pub fn k_shortest_paths(
    graph: &mut Graph,
    source: VertexKey,
    sink: VertexKey,
    k: usize,
    equal_cost: bool,
) -> Vec<Path> {
    if k == 0 {
        return Vec::new();
    }
    let Some(first) = dijkstra::shortest_path(graph, source, sink) else {
        return Vec::new();
    };
    let shortest = first.nr_hops();
    let mut accepted = vec![first];
    // Ordered by length, then by vertex sequence
    let mut candidates = BTreeSet::new();

    while accepted.len() < k {
        let last = accepted[accepted.len() - 1].vertices().to_vec();
        for i in 0..last.len().saturating_sub(1) {
            let spur = last[i];
            let root = &last[..i];
            let spur_path = {
                let mut detached = Detached::new(graph);
                for path in &accepted {
                    let vertices = path.vertices();
                    if vertices.len() > i + 1 && vertices[..i] == *root && vertices[i] == spur {
                        detached.detach(vertices[i], vertices[i + 1]);
                    }
                }
                let excluded = root.iter().copied().collect::<FxHashSet<_>>();
                dijkstra::search(detached.graph(), spur, Some(sink), &excluded).path_to(sink)
            };
            if let Some(spur_path) = spur_path {
                let mut vertices = root.to_vec();
                vertices.extend(spur_path.into_vertices());
                let candidate = Path::new(vertices);
                if !accepted.contains(&candidate) {
                    candidates.insert((candidate.nr_hops(), candidate));
                }
            }
        }

        let next = loop {
            let Some((len, path)) = candidates.pop_first() else {
                break None;
            };
            if accepted.contains(&path) {
                continue;
            }
            if equal_cost && len != shortest {
                break None;
            }
            break Some(path);
        };
        match next {
            Some(path) => accepted.push(path),
            None => break,
        }
    }

    log::debug!(
        "found {} of {} requested paths from {} to {}",
        accepted.len(),
        k,
        source,
        sink
    );
    accepted
}

/// Edges removed from a graph for the duration of one spur search. Dropping the guard adds each
/// removed edge back exactly once.
struct Detached<'g> {
    graph: &'g mut Graph,
    removed: Vec<(VertexKey, VertexKey)>,
}

impl<'g> Detached<'g> {
    fn new(graph: &'g mut Graph) -> Self {
        Self {
            graph,
            removed: Vec::new(),
        }
    }

    fn graph(&self) -> &Graph {
        self.graph
    }

    /// Removes the edge between `a` and `b`. Pairs already removed and pairs that are not
    /// adjacent are skipped.
    fn detach(&mut self, a: VertexKey, b: VertexKey) {
        let pair = if a < b { (a, b) } else { (b, a) };
        if self.removed.contains(&pair) {
            return;
        }
        if self.graph.remove_edge_between(a, b) {
            self.removed.push(pair);
        }
    }
}

impl Drop for Detached<'_> {
    fn drop(&mut self) {
        for (a, b) in self.removed.drain(..) {
            if let Err(e) = self.graph.add_edge(a, b) {
                log::warn!("failed to restore link {a} - {b}: {e}");
            }
        }
    }
}
