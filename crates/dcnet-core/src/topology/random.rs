//! A random, port-constrained topology in the style of Jellyfish.
//!
//! Generation runs in named phases over a [`LinkPlan`]:
//!
//! 1. [`attach_dedicated_servers`](LinkPlan::attach_dedicated_servers): server `i` takes one port
//!    on switch `i`.
//! 2. [`link_random_pairs`](LinkPlan::link_random_pairs): switches with open ports are paired
//!    uniformly at random until at most one switch has open ports, or until
//!    [`MAX_CONSECUTIVE_FAILURES`] picks in a row land on pairs that are already linked.
//! 3. [`expand_incrementally`](LinkPlan::expand_incrementally): a switch with two or more open
//!    ports splits an existing link `(a, b)` into `(s, a)` and `(s, b)`.
//! 4. [`attach_remaining_servers`](LinkPlan::attach_remaining_servers): leftover ports take the
//!    servers that are still unconnected.

use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};
use rustc_hash::FxHashSet;

use crate::graph::{Graph, Tier, Vertex, VertexKey};

use super::{TopologyError, TopologyGen};

/// The number of consecutive already-linked picks after which random pairing gives up.
pub const MAX_CONSECUTIVE_FAILURES: usize = 10;

/// A random topology generator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    typed_builder::TypedBuilder,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct RandomTopology {
    /// Number of servers.
    pub num_servers: usize,
    /// Number of switches.
    pub num_switches: usize,
    /// Ports per switch.
    pub num_ports: usize,
}

impl RandomTopology {
    /// Builds a random topology. The result depends only on the configuration and the sequence
    /// produced by `rng`.
    pub fn generate<R>(&self, rng: &mut R) -> Result<Graph, TopologyError>
    where
        R: Rng + ?Sized,
    {
        self.validate()?;
        let mut plan = LinkPlan::new(self.num_switches, self.num_ports);
        plan.attach_dedicated_servers(self.num_servers);
        let nr_random = plan.link_random_pairs(rng);
        let nr_repairs = plan.expand_incrementally(rng);
        let nr_unattached = plan.attach_remaining_servers(self.num_servers);
        debug!(
            "random topology: {} random links, {} repairs, {} switch links total",
            nr_random,
            nr_repairs,
            plan.links.len()
        );
        if nr_unattached > 0 {
            warn!(
                "{} of {} servers could not be attached: no switch ports left",
                nr_unattached, self.num_servers
            );
        }
        plan.into_graph(self.num_servers, self.num_ports)
    }

    fn validate(&self) -> Result<(), TopologyError> {
        if self.num_ports <= 1 {
            return Err(TopologyError::TooFewPorts(self.num_ports));
        }
        if self.num_switches == 0 && self.num_servers > 0 {
            return Err(TopologyError::NoSwitches(self.num_servers));
        }
        Ok(())
    }
}

impl TopologyGen for RandomTopology {
    fn build<R>(&self, rng: &mut R) -> Result<Graph, TopologyError>
    where
        R: Rng + ?Sized,
    {
        self.generate(rng)
    }
}

/// Switch-level wiring decisions, kept apart from the [`Graph`] until every phase has run.
#[derive(Debug)]
struct LinkPlan {
    open_ports: Vec<usize>,
    // Switch pairs, stored with the smaller index first
    links: Vec<(usize, usize)>,
    linked: FxHashSet<(usize, usize)>,
    // (server, switch) pairs
    server_links: Vec<(usize, usize)>,
}

impl LinkPlan {
    fn new(num_switches: usize, num_ports: usize) -> Self {
        Self {
            open_ports: vec![num_ports; num_switches],
            links: Vec::new(),
            linked: FxHashSet::default(),
            server_links: Vec::new(),
        }
    }

    fn is_linked(&self, a: usize, b: usize) -> bool {
        self.linked.contains(&ordered(a, b))
    }

    fn link(&mut self, a: usize, b: usize) {
        debug_assert!(a != b && !self.is_linked(a, b));
        let pair = ordered(a, b);
        self.links.push(pair);
        self.linked.insert(pair);
        self.open_ports[a] -= 1;
        self.open_ports[b] -= 1;
    }

    fn unlink_at(&mut self, pos: usize) -> (usize, usize) {
        let (a, b) = self.links.swap_remove(pos);
        self.linked.remove(&(a, b));
        self.open_ports[a] += 1;
        self.open_ports[b] += 1;
        (a, b)
    }

    fn attach_server(&mut self, server: usize, switch: usize) {
        self.server_links.push((server, switch));
        self.open_ports[switch] -= 1;
    }

    fn switches_with_open_ports(&self) -> Vec<usize> {
        (0..self.open_ports.len())
            .filter(|&s| self.open_ports[s] > 0)
            .collect()
    }

    /// Phase 1: server `i` is attached to switch `i`, for as many servers as there are switches.
    fn attach_dedicated_servers(&mut self, num_servers: usize) {
        let n = std::cmp::min(num_servers, self.open_ports.len());
        for i in 0..n {
            self.attach_server(i, i);
        }
    }

    /// Phase 2: returns the number of links formed.
    fn link_random_pairs<R>(&mut self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut nr_links = 0;
        let mut consecutive_failures = 0;
        loop {
            let open = self.switches_with_open_ports();
            if open.len() <= 1 {
                break;
            }
            if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                debug!(
                    "random pairing stalled with {} switches still open",
                    open.len()
                );
                break;
            }
            let picks = rand::seq::index::sample(rng, open.len(), 2);
            let (a, b) = (open[picks.index(0)], open[picks.index(1)]);
            if self.is_linked(a, b) {
                consecutive_failures += 1;
            } else {
                self.link(a, b);
                consecutive_failures = 0;
                nr_links += 1;
            }
        }
        nr_links
    }

    /// Phase 3: switches are visited in ascending order. Each repair removes one link and adds
    /// two, so the endpoints of the removed link keep their degree. Returns the number of
    /// repairs.
    fn expand_incrementally<R>(&mut self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut nr_repairs = 0;
        for s in 0..self.open_ports.len() {
            while self.open_ports[s] >= 2 {
                let candidates = self
                    .links
                    .iter()
                    .enumerate()
                    .filter(|&(_, &(a, b))| {
                        a != s && b != s && !self.is_linked(s, a) && !self.is_linked(s, b)
                    })
                    .map(|(pos, _)| pos)
                    .collect::<Vec<_>>();
                let Some(&pos) = candidates.choose(rng) else {
                    debug!(
                        "switch {} keeps {} open ports: no link can be split",
                        s, self.open_ports[s]
                    );
                    break;
                };
                let (a, b) = self.unlink_at(pos);
                self.link(s, a);
                self.link(s, b);
                nr_repairs += 1;
            }
        }
        nr_repairs
    }

    /// Phase 4: unconnected servers fill the remaining ports, switches in ascending order.
    /// Returns the number of servers left without a port.
    fn attach_remaining_servers(&mut self, num_servers: usize) -> usize {
        let attached = self
            .server_links
            .iter()
            .map(|&(server, _)| server)
            .collect::<FxHashSet<_>>();
        let mut pending = (0..num_servers).filter(|server| !attached.contains(server));
        for switch in 0..self.open_ports.len() {
            while self.open_ports[switch] > 0 {
                match pending.next() {
                    Some(server) => self.attach_server(server, switch),
                    None => return 0,
                }
            }
        }
        pending.count()
    }

    fn into_graph(self, num_servers: usize, num_ports: usize) -> Result<Graph, TopologyError> {
        let mut g = Graph::new();
        for id in 0..num_servers {
            g.add_vertex(Vertex::new(VertexKey::server(id), 1))?;
        }
        for id in 0..self.open_ports.len() {
            g.add_vertex(Vertex::new(switch(id), num_ports))?;
        }
        for (server, s) in self.server_links {
            g.add_edge(VertexKey::server(server), switch(s))?;
        }
        for (a, b) in self.links {
            g.add_edge(switch(a), switch(b))?;
        }
        Ok(g)
    }
}

fn switch(id: usize) -> VertexKey {
    VertexKey::switch(Tier::Plain, id)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
