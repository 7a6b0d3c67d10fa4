use dcnet_core::{
    k_shortest_paths, shortest_path_table, Distance, Graph, PathLengthDistribution, RandomTopology,
    ShortestPathTables, TopologyGen, VertexKey,
};
use rand::{rngs::StdRng, SeedableRng};

fn topology() -> RandomTopology {
    RandomTopology::builder()
        .num_servers(20)
        .num_switches(10)
        .num_ports(6)
        .build()
}

fn sorted_links(g: &Graph) -> Vec<(VertexKey, VertexKey)> {
    let mut links = g
        .links()
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect::<Vec<_>>();
    links.sort();
    links
}

#[test]
fn distances_are_symmetric() -> anyhow::Result<()> {
    for seed in 0..10 {
        let g = topology().build(&mut StdRng::seed_from_u64(seed))?;
        let tables = ShortestPathTables::new(&g);
        for a in tables.sources() {
            let table = tables.get(a).unwrap();
            assert_eq!(table.distance(a), Distance::Finite(0));
            for b in tables.sources() {
                assert_eq!(table.distance(b), tables.get(b).unwrap().distance(a));
            }
        }
    }
    Ok(())
}

#[test]
fn tables_are_stable() -> anyhow::Result<()> {
    let g = topology().build(&mut StdRng::seed_from_u64(3))?;
    for v in g.servers() {
        assert_eq!(
            shortest_path_table(&g, v.key),
            shortest_path_table(&g, v.key)
        );
    }
    Ok(())
}

#[test]
fn k_shortest_paths_leave_the_graph_intact() -> anyhow::Result<()> {
    let mut g = topology().build(&mut StdRng::seed_from_u64(11))?;
    let before = sorted_links(&g);

    // Pair server 0 with the farthest server it can reach
    let src = VertexKey::server(0);
    let table = shortest_path_table(&g, src);
    let (dst, shortest) = g
        .servers()
        .map(|v| (v.key, table.distance(v.key)))
        .filter(|(_, d)| d.is_finite() && *d != Distance::Finite(0))
        .max_by_key(|&(key, d)| (d, key))
        .unwrap();
    let paths = k_shortest_paths(&mut g, src, dst, 6, false);
    assert!(!paths.is_empty());
    assert_eq!(Distance::Finite(paths[0].nr_hops()), shortest);
    for pair in paths.windows(2) {
        assert!(pair[0].nr_hops() <= pair[1].nr_hops());
        assert_ne!(pair[0], pair[1]);
    }
    assert!(paths.iter().all(|p| p.is_loopless()));

    assert_eq!(sorted_links(&g), before);
    Ok(())
}

#[test]
fn distribution_counts_every_connected_pair() -> anyhow::Result<()> {
    let g = topology().build(&mut StdRng::seed_from_u64(5))?;
    let dist = PathLengthDistribution::for_graph(&g);
    let connected = g.servers().filter(|v| g.degree(v.key) > 0).count();
    assert_eq!(
        dist.nr_pairs() + dist.nr_unreachable(),
        connected * (connected - 1) / 2
    );
    assert_eq!(dist.counts().values().sum::<usize>(), dist.nr_pairs());
    let total = dist.fractions().values().sum::<f64>();
    assert!((total - 1.0).abs() < 1e-9);
    Ok(())
}
