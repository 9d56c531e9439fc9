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

//! The searcher pool: a fixed number of worker threads repeatedly walking
//! `tree::SearchTree` from the root, expanding one leaf per playout, until
//! a `TimeStrategy` says to stop (§3 "Searcher pool", §4.2 "Search loop").

use dg_go::{get_features, Board, Color, Point};
use dg_nn::{Prediction, Processor};
use dg_utils::{config, normalize_finite_f32};

use super::options::{PolicyChecker, SearchOptions};
use super::time_control::{TimeStrategy, TimeStrategyResult};
use super::tree::{Node, SearchTree};

/// Runs one forward pass through the model for `board` (to move: `to_move`)
/// and turns its output into a freshly expanded `Node` plus the leaf value
/// from `to_move`'s perspective. Only points `checker` accepts become edges.
fn create_node(board: &Board, to_move: Color, processor: &Processor, checker: &dyn PolicyChecker) -> (Node, f32) {
    let features = get_features(board, to_move);
    let row = processor.execute(features);
    let prediction = Prediction::from_row(&row);

    let mut priors: Vec<(Point, f32)> = board
        .enabled_moves(to_move)
        .into_iter()
        .filter(|&point| checker.is_policy_candidate(board, point))
        .map(|point| {
            let index = point.to_model_index(board.width(), board.height(), dg_go::MODEL_SIZE);
            (point, prediction.policy[index].max(0.0))
        })
        .collect();

    let mut policy_values: Vec<f32> = priors.iter().map(|&(_, p)| p).collect();
    policy_values.push(prediction.pass.max(0.0));
    let sum = dg_utils::sum_finite_f32(&policy_values);
    normalize_finite_f32(&mut policy_values, sum);

    let pass_prior = policy_values.pop().unwrap_or(0.0);
    for (i, &value) in policy_values.iter().enumerate() {
        priors[i].1 = value;
    }

    (Node::new(to_move == Color::Black, pass_prior, priors), prediction.value)
}

/// Creates the root node of a brand new search tree for `board`.
pub fn create_root(board: &Board, processor: &Processor, options: &dyn SearchOptions) -> SearchTree {
    let to_move = board.to_move();
    let checker = options.policy_checker(board, to_move);
    let (node, _) = create_node(board, to_move, processor, checker.as_ref());

    SearchTree::new(node)
}

fn select_edge(node: &Node, use_ucb1: bool) -> usize {
    let parent_visits = node.visits.max(1);
    let c_puct = *config::C_PUCT;
    let c_ucb = *config::C_UCB;

    (0..node.edges.len())
        .max_by(|&a, &b| {
            let score = |i: usize| {
                if use_ucb1 {
                    node.edges[i].ucb1(parent_visits, c_ucb)
                } else {
                    node.edges[i].puct(parent_visits, c_puct)
                }
            };

            score(a).partial_cmp(&score(b)).unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("a node always has at least the pass edge")
}

/// Walks one path from the root to a leaf, expands the leaf, and backs its
/// value up along the path.
fn playout(tree: &SearchTree, root_board: &Board, options: &dyn SearchOptions, processor: &Processor) {
    let mut board = root_board.clone();
    let mut to_move = root_board.to_move();
    let mut path: Vec<(usize, usize)> = Vec::new();
    let mut current = tree.root;

    let leaf_value = loop {
        let (edge_index, child, point) = {
            let mut nodes = tree.nodes.write().unwrap();
            let use_ucb1 = options.use_ucb1();
            let node = &mut nodes[current];
            let edge_index = select_edge(node, use_ucb1);

            node.edges[edge_index].virtual_loss += 1;
            node.visits += 1;

            (edge_index, node.edges[edge_index].child, node.edges[edge_index].point)
        };

        path.push((current, edge_index));

        if board.play(point, to_move).is_err() {
            // the policy checker should prevent this, but a defensive bail
            // avoids ever corrupting the tree over an illegal edge.
            break 0.0;
        }
        to_move = to_move.opposite();

        match child {
            Some(child_index) => {
                current = child_index;
            }
            None => {
                let checker = options.policy_checker(&board, to_move);
                let (node, value) = create_node(&board, to_move, processor, checker.as_ref());
                let child_index = tree.alloc(node);

                let mut nodes = tree.nodes.write().unwrap();
                nodes[current].edges[edge_index].child = Some(child_index);

                break value;
            }
        }
    };

    let mut value = leaf_value;
    let mut nodes = tree.nodes.write().unwrap();
    for &(node_index, edge_index) in path.iter().rev() {
        value = -value;

        let edge = &mut nodes[node_index].edges[edge_index];
        edge.total_value += value;
        edge.visits += 1;
        edge.virtual_loss = edge.virtual_loss.saturating_sub(1);
    }
}

/// Runs playouts against `tree` from as many threads as `config::NUM_THREADS`
/// until `time_strategy` signals that the search should stop.
pub fn search(
    tree: &SearchTree,
    root_board: &Board,
    options: &(dyn SearchOptions + Sync),
    processor: &Processor,
    time_strategy: &(dyn TimeStrategy + Sync),
) {
    let num_threads = if options.deterministic() { 1 } else { *config::NUM_THREADS };

    std::thread::scope(|scope| {
        for _ in 0..num_threads {
            scope.spawn(|| loop {
                if matches!(time_strategy.is_done(tree), TimeStrategyResult::Expired) {
                    break;
                }

                playout(tree, root_board, options, processor);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::StandardSearch;
    use crate::time_control::RolloutLimit;
    use dg_go::DEFAULT_KOMI;
    use dg_nn::RandomModel;
    use std::sync::Arc;

    #[test]
    fn search_increases_root_visits() {
        let board = Board::new(9, 9, DEFAULT_KOMI).unwrap();
        let processor = Processor::new(Arc::new(RandomModel::new()));
        let options = StandardSearch::new(false);
        let tree = create_root(&board, &processor, &options);
        let limit = RolloutLimit::new(16);

        search(&tree, &board, &options, &processor, &limit);

        let nodes = tree.nodes.read().unwrap();
        assert!(nodes[tree.root].total_child_visits() >= 16);
    }
}
