// Copyright 2019 Karl Sundequist Blomdahl <karl.sundequist.blomdahl@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The search tree: an arena of `Node`s connected by `Point`-keyed edges,
//! mutated concurrently by the searcher pool under a single `RwLock`
//! (§3 `SearchTree`, "Tree").

use std::sync::RwLock;

use dg_go::Point;

/// One outgoing edge of a `Node`: the accumulated search statistics for
/// playing at `point` from that node.
#[derive(Clone, Debug)]
pub struct Edge {
    pub point: Point,
    pub prior: f32,
    pub visits: usize,
    pub total_value: f32,
    pub virtual_loss: usize,
    pub child: Option<usize>,
}

impl Edge {
    fn new(point: Point, prior: f32) -> Self {
        Self { point, prior, visits: 0, total_value: 0.0, virtual_loss: 0, child: None }
    }

    /// The mean value backed up through this edge so far, from the
    /// perspective of the player who owns the parent node.
    pub fn value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f32
        }
    }

    /// PUCB score (§3 `select_child`): balances exploitation of `value()`
    /// against exploration weighted by `prior` and the parent's visit
    /// count, penalized by any outstanding virtual loss from concurrent
    /// searchers walking the same edge.
    pub fn puct(&self, parent_visits: usize, c_puct: f32) -> f32 {
        let effective_visits = self.visits + self.virtual_loss;
        let exploration = c_puct * self.prior * (parent_visits as f32).sqrt() / (1.0 + effective_visits as f32);
        let exploitation = if effective_visits == 0 {
            0.0
        } else {
            self.total_value / effective_visits as f32
        };

        exploitation + exploration
    }

    pub fn ucb1(&self, parent_visits: usize, c_ucb: f32) -> f32 {
        if self.visits == 0 {
            f32::INFINITY
        } else {
            self.value() + c_ucb * ((parent_visits as f32).ln() / self.visits as f32).sqrt()
        }
    }
}

/// One node of the search tree: a board position reached via some path
/// from the root, with one `Edge` per candidate move (§3 `Node`).
#[derive(Debug)]
pub struct Node {
    pub to_move_is_black: bool,
    pub edges: Vec<Edge>,
    pub visits: usize,
}

impl Node {
    pub fn new(to_move_is_black: bool, pass_prior: f32, priors: Vec<(Point, f32)>) -> Self {
        let mut edges: Vec<Edge> = priors.into_iter().map(|(p, prior)| Edge::new(p, prior)).collect();
        edges.push(Edge::new(Point::pass(), pass_prior));

        Self { to_move_is_black, edges, visits: 0 }
    }

    pub fn total_child_visits(&self) -> usize {
        self.edges.iter().map(|e| e.visits).sum()
    }

    /// The index of the edge with the most visits, i.e. the recommended
    /// move once search has finished (§3 "Candidate").
    pub fn most_visited_edge(&self) -> usize {
        self.edges
            .iter()
            .enumerate()
            .max_by_key(|(_, e)| e.visits)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// The tree's arena: every allocated `Node`, and the index of the root.
/// Protected by a single lock -- the teacher's lock-free arena buys
/// throughput this engine does not need at the scale of a single GTP
/// opponent, and a plain `RwLock` keeps the mutation rules easy to audit.
pub struct SearchTree {
    pub nodes: RwLock<Vec<Node>>,
    pub root: usize,
}

impl SearchTree {
    pub fn new(root: Node) -> Self {
        Self { nodes: RwLock::new(vec![root]), root: 0 }
    }

    /// Allocates a new node and returns its index.
    pub fn alloc(&self, node: Node) -> usize {
        let mut nodes = self.nodes.write().unwrap();
        nodes.push(node);
        nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_visited_edge_prefers_higher_counts() {
        let mut node = Node::new(true, 0.1, vec![(Point::new(0, 0), 0.5), (Point::new(1, 1), 0.4)]);
        node.edges[1].visits = 10;
        node.edges[0].visits = 3;

        assert_eq!(node.most_visited_edge(), 1);
    }

    #[test]
    fn puct_favours_unvisited_high_prior_edges() {
        let edge = Edge::new(Point::new(0, 0), 0.9);

        assert!(edge.puct(100, 1.5) > 0.0);
    }
}
