//! Capacitated flow network with Dinic's maximum-flow algorithm.
//!
//! # Algorithm
//!
//! 1. BFS from the source over edges with residual capacity to assign a
//!    level to every reachable node. Stop if the sink is unreachable.
//! 2. Repeatedly push blocking flow with a DFS that only follows edges to
//!    the next level. Each node keeps a pointer to the next edge to try,
//!    so saturated edges are never rescanned within a phase.
//! 3. Go back to 1.
//!
//! Edges are stored in pairs: edge `e` and its reverse `e ^ 1`. The
//! reverse edge's residual capacity equals the flow on `e`.
//!
//! # Complexity
//! O(V² E) in general; O(E √V) on unit-capacity bipartite graphs.
//!
//! # Reference
//! Dinic (1970), "Algorithm for solution of a problem of maximum flow in
//! networks with power estimation"

use std::collections::VecDeque;

/// Handle to a forward edge returned by [`FlowNetwork::add_edge`].
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    /// Residual capacity.
    cap: u32,
}

/// A directed graph with integer edge capacities.
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    edges: Vec<Edge>,
    adj: Vec<Vec<EdgeId>>,
}

impl FlowNetwork {
    /// Creates a network with `nodes` nodes and no edges.
    pub fn new(nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            adj: vec![Vec::new(); nodes],
        }
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self) -> usize {
        self.adj.push(Vec::new());
        self.adj.len() - 1
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of forward edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Adds an edge `from → to` with the given capacity.
    ///
    /// # Panics
    /// Panics if either node does not exist.
    pub fn add_edge(&mut self, from: usize, to: usize, cap: u32) -> EdgeId {
        assert!(
            from < self.adj.len() && to < self.adj.len(),
            "edge {from} -> {to} references a missing node"
        );
        let id = self.edges.len();
        self.edges.push(Edge { to, cap });
        self.edges.push(Edge { to: from, cap: 0 });
        self.adj[from].push(id);
        self.adj[to].push(id + 1);
        id
    }

    /// Flow currently routed through a forward edge.
    #[inline]
    pub fn flow(&self, edge: EdgeId) -> u32 {
        self.edges[edge ^ 1].cap
    }

    /// Residual capacity of a forward edge.
    #[inline]
    pub fn residual(&self, edge: EdgeId) -> u32 {
        self.edges[edge].cap
    }

    /// Computes a maximum flow from `source` to `sink` and returns its value.
    ///
    /// Runs until no augmenting path remains. Calling it again on the same
    /// network returns 0, since the residual graph is already saturated.
    pub fn max_flow(&mut self, source: usize, sink: usize) -> u64 {
        if source == sink {
            return 0;
        }
        let n = self.adj.len();
        let mut level: Vec<Option<u32>> = vec![None; n];
        let mut next = vec![0usize; n];
        let mut total: u64 = 0;

        while self.build_levels(source, sink, &mut level) {
            next.fill(0);
            loop {
                let pushed = self.augment(source, sink, u32::MAX, &level, &mut next);
                if pushed == 0 {
                    break;
                }
                total += u64::from(pushed);
            }
        }
        total
    }

    /// BFS over residual edges. Returns whether the sink is reachable.
    fn build_levels(&self, source: usize, sink: usize, level: &mut [Option<u32>]) -> bool {
        level.fill(None);
        level[source] = Some(0);
        let mut queue = VecDeque::from([source]);

        while let Some(u) = queue.pop_front() {
            let next_level = level[u].map(|l| l + 1);
            for &e in &self.adj[u] {
                let edge = &self.edges[e];
                if edge.cap > 0 && level[edge.to].is_none() {
                    level[edge.to] = next_level;
                    queue.push_back(edge.to);
                }
            }
        }
        level[sink].is_some()
    }

    /// Pushes one augmenting path of at most `limit` units along the
    /// level graph. Returns the amount pushed (0 when blocked).
    fn augment(
        &mut self,
        u: usize,
        sink: usize,
        limit: u32,
        level: &[Option<u32>],
        next: &mut [usize],
    ) -> u32 {
        if u == sink {
            return limit;
        }
        while next[u] < self.adj[u].len() {
            let e = self.adj[u][next[u]];
            let Edge { to, cap } = self.edges[e];
            let forward = matches!((level[u], level[to]), (Some(a), Some(b)) if b == a + 1);

            if cap > 0 && forward {
                let pushed = self.augment(to, sink, limit.min(cap), level, next);
                if pushed > 0 {
                    self.edges[e].cap -= pushed;
                    self.edges[e ^ 1].cap += pushed;
                    return pushed;
                }
            }
            next[u] += 1;
        }
        0
    }
}
