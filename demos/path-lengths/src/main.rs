use std::{collections::BTreeSet, path::PathBuf};

use clap::Parser;
use dcnet::{
    core::{
        routing::k_shortest_paths,
        stats::{self, PathLengthDistribution},
        topology::{FatTree, RandomTopology, TopologyGen},
        Graph, VertexKey,
    },
    utils,
};
use rand::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Kind {
    Random,
    FatTree,
    /// Random and fat-tree distributions side by side
    Both,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topology specification in JSON or Dhall format. Overrides the options below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Topology family
    #[arg(long, value_enum, default_value_t = Kind::Both)]
    kind: Kind,

    /// Number of servers in a random topology
    #[arg(long, default_value_t = 686)]
    num_servers: usize,

    /// Number of switches in a random topology
    #[arg(long, default_value_t = 245)]
    num_switches: usize,

    /// Ports per switch in a random topology
    #[arg(long, default_value_t = 14)]
    num_ports: usize,

    /// Fat-tree radix
    #[arg(short, default_value_t = 14)]
    k: usize,

    /// Number of random topologies to average over
    #[arg(short, long, default_value_t = 1)]
    iterations: usize,

    /// Random seed of the first iteration
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Also list up to this many shortest paths between `src` and `dst`
    #[arg(long)]
    paths: Option<usize>,

    /// Source server for `paths`
    #[arg(long, default_value_t = 0)]
    src: usize,

    /// Destination server for `paths`
    #[arg(long, default_value_t = 1)]
    dst: usize,

    /// Only list paths as short as the shortest one
    #[arg(long)]
    equal_cost: bool,
}

impl Args {
    fn random_topology(&self) -> RandomTopology {
        RandomTopology::builder()
            .num_servers(self.num_servers)
            .num_switches(self.num_switches)
            .num_ports(self.num_ports)
            .build()
    }

    fn fat_tree(&self) -> FatTree {
        FatTree::new(self.k)
    }

    fn wants(&self, kind: Kind) -> bool {
        self.kind == kind || self.kind == Kind::Both
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.iterations > 0, "need at least one iteration");

    print_distributions(&distributions(&args)?);

    if let Some(k) = args.paths {
        let mut graphs = Vec::new();
        match &args.config {
            Some(path) => {
                let g = utils::read_graph(path)?;
                graphs.push((path.display().to_string(), g));
            }
            None => {
                if args.wants(Kind::Random) {
                    let mut rng = StdRng::seed_from_u64(args.seed);
                    let g = args.random_topology().build(&mut rng)?;
                    graphs.push(("random".to_string(), g));
                }
                if args.wants(Kind::FatTree) {
                    graphs.push(("fat tree".to_string(), args.fat_tree().generate()?));
                }
            }
        }
        for (name, mut g) in graphs {
            print_paths(&name, &mut g, &args, k);
        }
    }
    Ok(())
}

/// One named distribution per requested topology family.
fn distributions(args: &Args) -> anyhow::Result<Vec<(String, PathLengthDistribution)>> {
    let mut columns = Vec::new();
    match &args.config {
        Some(path) => {
            let dist = PathLengthDistribution::for_graph(&utils::read_graph(path)?);
            columns.push((path.display().to_string(), dist));
        }
        None => {
            if args.wants(Kind::Random) {
                let topo = args.random_topology();
                let dist = stats::sample(args.iterations, args.seed, |rng| topo.build(rng))?;
                columns.push(("random".to_string(), dist));
            }
            if args.wants(Kind::FatTree) {
                // Fat trees are deterministic, so one build covers every iteration
                let ft = args.fat_tree();
                let dist = PathLengthDistribution::for_graph(&ft.generate()?);
                columns.push((format!("{}-ary fat tree", ft.radix()), dist));
            }
        }
    }
    Ok(columns)
}

/// Prints the fraction of server pairs at each hop count, one column per distribution.
fn print_distributions(columns: &[(String, PathLengthDistribution)]) {
    for (name, dist) in columns {
        log::info!(
            "{name}: {} reachable server pairs, {} unreachable",
            dist.nr_pairs(),
            dist.nr_unreachable()
        );
    }
    let hops = columns
        .iter()
        .flat_map(|(_, dist)| dist.counts().keys().copied())
        .collect::<BTreeSet<_>>();
    let fractions = columns
        .iter()
        .map(|(_, dist)| dist.fractions())
        .collect::<Vec<_>>();

    print!("{:>6}", "hops");
    for (name, _) in columns {
        print!("  {name:>20}");
    }
    println!();
    for h in hops {
        print!("{h:>6}");
        for (fractions, (_, dist)) in fractions.iter().zip(columns) {
            let count = dist.counts().get(&h).copied().unwrap_or(0);
            let fraction = fractions.get(&h).copied().unwrap_or(0.0);
            print!("  {:>20}", format!("{count} ({fraction:.4})"));
        }
        println!();
    }
    print!("{:>6}", "mean");
    for (_, dist) in columns {
        match dist.mean() {
            Some(mean) => print!("  {mean:>20.4}"),
            None => print!("  {:>20}", "-"),
        }
    }
    println!();
}

fn print_paths(name: &str, g: &mut Graph, args: &Args, k: usize) {
    let (src, dst) = (VertexKey::server(args.src), VertexKey::server(args.dst));
    let paths = k_shortest_paths(g, src, dst, k, args.equal_cost);
    println!("{name}: {} paths from {src} to {dst}", paths.len());
    for path in paths {
        println!("  {} hops: {path}", path.nr_hops());
    }
}
