use crate::graph::{Graph, GraphError, Tier, Vertex, VertexKey};

fn server(id: usize) -> VertexKey {
    VertexKey::server(id)
}

fn switch(id: usize) -> VertexKey {
    VertexKey::switch(Tier::Plain, id)
}

fn with_vertices(servers: usize, switches: &[(usize, usize)]) -> Result<Graph, GraphError> {
    let mut g = Graph::new();
    for id in 0..servers {
        g.add_vertex(Vertex::new(server(id), 1))?;
    }
    for &(id, ports) in switches {
        g.add_vertex(Vertex::new(switch(id), ports))?;
    }
    Ok(g)
}

/// `n` servers (IDs 0 to n-1) hanging off switch 0.
pub(crate) fn star(n: usize) -> Result<Graph, GraphError> {
    let mut g = with_vertices(n, &[(0, n)])?;
    for id in 0..n {
        g.add_edge(server(id), switch(0))?;
    }
    Ok(g)
}

/// Servers 0 and 1 on switch 0, servers 2 and 3 on switch 1, and server 4 with no links.
pub(crate) fn two_islands() -> Result<Graph, GraphError> {
    let mut g = with_vertices(5, &[(0, 2), (1, 2)])?;
    g.add_edge(server(0), switch(0))?;
    g.add_edge(server(1), switch(0))?;
    g.add_edge(server(2), switch(1))?;
    g.add_edge(server(3), switch(1))?;
    Ok(g)
}

/// Server 0 on switch 0 and server 1 on switch 3, with switches 1 and 2 forming two equal-length
/// routes between them.
pub(crate) fn diamond() -> Result<Graph, GraphError> {
    let mut g = with_vertices(2, &[(0, 4), (1, 2), (2, 2), (3, 4)])?;
    g.add_edge(server(0), switch(0))?;
    g.add_edge(switch(0), switch(1))?;
    g.add_edge(switch(0), switch(2))?;
    g.add_edge(switch(1), switch(3))?;
    g.add_edge(switch(2), switch(3))?;
    g.add_edge(switch(3), server(1))?;
    Ok(g)
}

/// [`diamond`] plus a route one hop longer through switches 4 and 5.
pub(crate) fn diamond_with_detour() -> Result<Graph, GraphError> {
    let mut g = diamond()?;
    g.add_vertex(Vertex::new(switch(4), 2))?;
    g.add_vertex(Vertex::new(switch(5), 2))?;
    g.add_edge(switch(0), switch(4))?;
    g.add_edge(switch(4), switch(5))?;
    g.add_edge(switch(5), switch(3))?;
    Ok(g)
}
