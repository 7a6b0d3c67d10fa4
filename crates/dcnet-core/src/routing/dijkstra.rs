//! Single-source shortest paths with unit link weights.

use std::{cmp::Reverse, collections::BinaryHeap};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{Graph, Path, VertexKey};

use super::{Distance, PathEntry, ShortestPathTable};

/// Computes distances and predecessors from `source` to every vertex it can reach.
pub fn shortest_path_table(graph: &Graph, source: VertexKey) -> ShortestPathTable {
    search(graph, source, None, &FxHashSet::default())
}

/// The shortest path from `source` to `sink`, or `None` if there is none. The search stops as soon
/// as `sink` is settled.
pub fn shortest_path(graph: &Graph, source: VertexKey, sink: VertexKey) -> Option<Path> {
    search(graph, source, Some(sink), &FxHashSet::default()).path_to(sink)
}

/// Runs the search, never entering a vertex in `excluded`. Among equally distant vertices the
/// smallest key is settled first, and a predecessor only changes on strict improvement, so every
/// vertex records its smallest-key neighbor one hop closer to the source.
pub(crate) fn search(
    graph: &Graph,
    source: VertexKey,
    sink: Option<VertexKey>,
    excluded: &FxHashSet<VertexKey>,
) -> ShortestPathTable {
    let mut entries = graph
        .vertices()
        .map(|v| v.key)
        .filter(|&key| !excluded.contains(&key) && graph.degree(key) > 0)
        .map(|key| (key, PathEntry::UNREACHED))
        .collect::<FxHashMap<_, _>>();
    entries.insert(
        source,
        PathEntry {
            distance: Distance::Finite(0),
            predecessor: None,
        },
    );

    // Without a sink, the search is done once every server that could be reached is settled
    let mut unsettled_servers = entries
        .keys()
        .filter(|key| key.is_server() && **key != source)
        .count();

    let mut settled = FxHashSet::default();
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0, source)));

    while let Some(Reverse((dist, cur))) = heap.pop() {
        if !settled.insert(cur) {
            continue;
        }
        if sink == Some(cur) {
            break;
        }
        if sink.is_none() && cur != source && cur.is_server() {
            unsettled_servers -= 1;
            if unsettled_servers == 0 {
                break;
            }
        }
        for edge in graph.incident_edges(cur) {
            let Some(next) = graph.opposite(edge, cur) else {
                continue;
            };
            if settled.contains(&next) || excluded.contains(&next) {
                continue;
            }
            let Some(entry) = entries.get_mut(&next) else {
                continue;
            };
            let candidate = Distance::Finite(dist + 1);
            if candidate < entry.distance {
                entry.distance = candidate;
                entry.predecessor = Some(cur);
                heap.push(Reverse((dist + 1, next)));
            }
        }
    }

    ShortestPathTable::new(source, entries)
}
