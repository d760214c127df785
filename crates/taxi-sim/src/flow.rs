//! A minimal reference min-cost flow solver.
//!
//! `SPEC_FULL.md` §4.4 treats the min-cost flow solve as an external oracle
//! and only specifies the demand-vector construction and arc topology the
//! dynamic-transportation-problem handler needs; this module ships a small
//! in-process successive-shortest-paths solver sufficient for that
//! contract. Arc costs here are always non-negative trip times, so
//! Bellman-Ford (rather than Dijkstra with potentials) suffices without
//! risking a negative cycle.
//!
//! New code with no single teacher analog (see `DESIGN.md`); the standard
//! edge-pair-with-reverse-edge representation below is the idiomatic shape
//! for a from-scratch flow network in Rust.

use std::collections::VecDeque;

/// A directed graph supporting repeated min-cost max-flow queries via
/// successive shortest augmenting paths.
pub struct MinCostFlow {
    n: usize,
    adj: Vec<Vec<usize>>,
    to: Vec<usize>,
    cap: Vec<i64>,
    cost: Vec<i64>,
}

impl MinCostFlow {
    pub fn new(n: usize) -> Self {
        MinCostFlow {
            n,
            adj: vec![Vec::new(); n],
            to: Vec::new(),
            cap: Vec::new(),
            cost: Vec::new(),
        }
    }

    /// Add a directed arc `from -> to` with the given capacity and
    /// per-unit cost. Returns the forward edge's id, which can be passed to
    /// [`Self::flow_on`] after solving.
    pub fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: i64) -> usize {
        let id = self.to.len();
        self.adj[from].push(id);
        self.to.push(to);
        self.cap.push(cap);
        self.cost.push(cost);

        self.adj[to].push(id + 1);
        self.to.push(from);
        self.cap.push(0);
        self.cost.push(-cost);

        id
    }

    /// How much flow currently traverses forward edge `id` (its original
    /// capacity minus its residual capacity).
    pub fn flow_on(&self, id: usize) -> i64 {
        self.cap[id ^ 1]
    }

    /// Route exactly `flow_needed` units of flow from `source` to `sink`
    /// at minimum cost. Returns `(flow_routed, total_cost)`, or `None` if
    /// the network cannot carry `flow_needed` units.
    pub fn solve(&mut self, source: usize, sink: usize, flow_needed: i64) -> Option<(i64, i64)> {
        let mut total_flow = 0i64;
        let mut total_cost = 0i64;

        while total_flow < flow_needed {
            let (dist, prev_edge) = self.shortest_path(source);
            if dist[sink] == i64::MAX {
                return None;
            }

            let mut push = flow_needed - total_flow;
            let mut v = sink;
            while v != source {
                let eid = prev_edge[v];
                push = push.min(self.cap[eid]);
                v = self.to[eid ^ 1];
            }

            v = sink;
            while v != source {
                let eid = prev_edge[v];
                self.cap[eid] -= push;
                self.cap[eid ^ 1] += push;
                v = self.to[eid ^ 1];
            }

            total_flow += push;
            total_cost += push * dist[sink];
        }

        Some((total_flow, total_cost))
    }

    fn shortest_path(&self, source: usize) -> (Vec<i64>, Vec<usize>) {
        let mut dist = vec![i64::MAX; self.n];
        let mut in_queue = vec![false; self.n];
        let mut prev_edge = vec![usize::MAX; self.n];

        dist[source] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(source);
        in_queue[source] = true;

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            if dist[u] == i64::MAX {
                continue;
            }
            for &eid in &self.adj[u] {
                if self.cap[eid] <= 0 {
                    continue;
                }
                let v = self.to[eid];
                let nd = dist[u] + self.cost[eid];
                if nd < dist[v] {
                    dist[v] = nd;
                    prev_edge[v] = eid;
                    if !in_queue[v] {
                        queue.push_back(v);
                        in_queue[v] = true;
                    }
                }
            }
        }

        (dist, prev_edge)
    }
}
