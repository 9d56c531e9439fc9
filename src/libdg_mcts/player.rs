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

//! A single opponent: one board, one rule set, and the search machinery
//! needed to produce candidate moves (§3 `Player`, grounded in the
//! original engine's `player.py`).

use std::sync::Arc;

use dg_go::{get_handicap_positions, get_owners, get_score, Board, Color, GoError, Point, Rule};
use dg_nn::Processor;
use rand::seq::SliceRandom;

use super::options::{SearchOptions, StandardDeterministicSearch, StandardSearch};
use super::pool;
use super::time_control::{compute_time_budget, ByoYomi, EitherOf, RolloutLimit};
use super::tree::{Edge, Node};

/// How long a principal variation descended from a candidate's child node
/// is allowed to run (§6.3 `pv`).
const PV_DEPTH: usize = 8;

/// Which statistic ranks candidates coming out of a search (§4.4 `criterion`).
/// The original engine defaults to `Lcb`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Criterion {
    Lcb,
    Visits,
}

/// One ranked move returned by `Player::evaluate` (§3 `Candidate`).
#[derive(Clone, Debug)]
pub struct Candidate {
    pub point: Point,
    pub color: Color,
    pub visits: usize,
    pub value: f32,
    pub policy: f32,
    /// The principal variation starting at `point`, descended by
    /// `criterion` down the search tree (§6.3 `pv`).
    pub variations: Vec<Point>,
}

impl Candidate {
    /// Probability of winning from this move, folded into `[0, 1]` from
    /// the raw `[-1, 1]` value estimate.
    pub fn win_chance(&self) -> f32 {
        self.value * 0.5 + 0.5
    }

    /// A conservative lower confidence bound on `win_chance`, used to
    /// avoid committing to a move on the strength of too few playouts.
    pub fn win_chance_lcb(&self) -> f32 {
        self.win_chance() - 1.96 * 0.25 / ((self.visits + 1) as f32).sqrt()
    }
}

/// The lower confidence bound of an edge's value, in the same units as
/// `Candidate::win_chance_lcb`.
fn edge_lcb(edge: &Edge) -> f32 {
    let win_chance = edge.value() * 0.5 + 0.5;

    win_chance - 1.96 * 0.25 / ((edge.visits + 1) as f32).sqrt()
}

/// The edge a `criterion`-following principal variation would continue
/// through, among `node`'s visited edges.
fn best_child(node: &Node, criterion: Criterion) -> usize {
    match criterion {
        Criterion::Visits => node.most_visited_edge(),
        Criterion::Lcb => node
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.visits > 0)
            .max_by(|(_, a), (_, b)| edge_lcb(a).partial_cmp(&edge_lcb(b)).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or_else(|| node.most_visited_edge()),
    }
}

/// Descends from `root_edge`'s child, repeatedly following `best_child`,
/// collecting the points visited along the way (§6.3 `pv`).
fn principal_variation(nodes: &[Node], root_edge: &Edge, criterion: Criterion) -> Vec<Point> {
    let mut pv = vec![root_edge.point];
    let mut next = root_edge.child;

    while let Some(child_index) = next {
        if pv.len() >= PV_DEPTH {
            break;
        }

        let node = &nodes[child_index];
        let edge_index = best_child(node, criterion);
        let edge = &node.edges[edge_index];
        if edge.visits == 0 {
            break;
        }

        pv.push(edge.point);
        next = edge.child;
    }

    pv
}

/// A single opponent: the current position, the rule it is scored under,
/// and the shared inference `Processor` used to evaluate it.
pub struct Player {
    board: Board,
    rule: Rule,
    use_ucb1: bool,
    processor: Arc<Processor>,
}

impl Player {
    pub fn new(width: usize, height: usize, komi: f32, rule: Rule, processor: Arc<Processor>) -> Result<Self, GoError> {
        Ok(Self { board: Board::new(width, height, komi)?, rule, use_ucb1: false, processor })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn set_use_ucb1(&mut self, use_ucb1: bool) {
        self.use_ucb1 = use_ucb1;
    }

    /// Places `handicap` star-point stones for `Black` and hands the move
    /// to `White` (§3 `set_handicap`).
    pub fn set_handicap(&mut self, handicap: usize) {
        for point in get_handicap_positions(self.board.width(), self.board.height(), handicap) {
            self.board.place_setup_stone(point, Color::Black);
        }
        self.board.reset_history();
    }

    pub fn is_valid_position(&self, point: Point, color: Color) -> bool {
        self.board.is_valid(point, color)
    }

    /// Places diagram setup stones -- as read from an SGF `AB`/`AW` property
    /// -- directly onto the board, then re-baselines superko history so the
    /// diagram itself is never flagged as a repeated position (§8 `load`).
    pub fn load_setup(&mut self, setup_black: &[Point], setup_white: &[Point]) {
        for &point in setup_black {
            self.board.place_setup_stone(point, Color::Black);
        }
        for &point in setup_white {
            self.board.place_setup_stone(point, Color::White);
        }
        self.board.reset_history();
    }

    /// Applies an external move -- one chosen by the opponent, or by
    /// `genmove` after search -- to the player's board (§9 `play`).
    pub fn play(&mut self, point: Point, color: Color) -> Result<(), GoError> {
        self.board.play(point, color)
    }

    /// Picks a uniformly random legal move for `color`, skipping the
    /// outermost ring of points unless `allow_outermost` is set, and
    /// retrying a bounded number of times before giving up and passing
    /// (§3 `get_random`).
    pub fn get_random(&self, color: Color, allow_outermost: bool) -> Point {
        let mut rng = rand::thread_rng();
        let candidates: Vec<Point> = self
            .board
            .enabled_moves(color)
            .into_iter()
            .filter(|p| allow_outermost || is_interior(*p, self.board.width(), self.board.height()))
            .collect();

        candidates.choose(&mut rng).copied().unwrap_or_else(Point::pass)
    }

    /// Runs a search and returns every candidate move, best first (§3
    /// `evaluate`). `num_rollout` overrides the visit-count budget;
    /// `timelimit`/`remaining` are fed through `compute_time_budget` when
    /// `num_rollout` is `None`. `criterion` picks the statistic candidates
    /// are ranked by.
    pub fn evaluate(
        &self,
        num_rollout: Option<usize>,
        timelimit: f64,
        remaining: f64,
        deterministic: bool,
        criterion: Criterion,
    ) -> Vec<Candidate> {
        let to_move = self.board.to_move();

        if deterministic {
            let options = StandardDeterministicSearch::new(self.use_ucb1);
            self.run_search(&options, num_rollout, timelimit, remaining, to_move, criterion)
        } else {
            let options = StandardSearch::new(self.use_ucb1);
            self.run_search(&options, num_rollout, timelimit, remaining, to_move, criterion)
        }
    }

    /// Whether playing `point` as `color` would recreate an earlier board
    /// position, i.e. a positional superko violation (§4.4 "Filters superko
    /// repetitions", grounded on `player.py`'s `is_superko_move`).
    pub fn is_superko_move(&self, point: Point, color: Color) -> bool {
        if point.is_pass() {
            return false;
        }

        let mut board = self.board.clone();
        matches!(board.play(point, color), Err(GoError::Superko(_)))
    }

    fn run_search(
        &self,
        options: &(dyn SearchOptions + Sync),
        num_rollout: Option<usize>,
        timelimit: f64,
        remaining: f64,
        to_move: Color,
        criterion: Criterion,
    ) -> Vec<Candidate> {
        if self.board.enabled_moves(to_move).is_empty() {
            return vec![Candidate {
                point: Point::pass(),
                color: to_move,
                visits: 1,
                value: 0.0,
                policy: 1.0,
                variations: vec![Point::pass()],
            }];
        }

        let tree = pool::create_root(&self.board, &self.processor, options);

        let budget = num_rollout.unwrap_or(*dg_utils::config::NUM_ROLLOUT);
        let seconds = compute_time_budget(timelimit, remaining);
        let time_strategy = EitherOf(
            RolloutLimit::new(budget),
            ByoYomi::new(std::time::Duration::from_secs_f64(seconds.max(0.05))),
        );

        pool::search(&tree, &self.board, options, &self.processor, &time_strategy);

        let nodes = tree.nodes.read().unwrap();
        let root = &nodes[tree.root];
        let mut candidates: Vec<Candidate> = root
            .edges
            .iter()
            .filter(|e| e.visits > 0)
            .map(|e| Candidate {
                point: e.point,
                color: to_move,
                visits: e.visits,
                value: e.value(),
                policy: e.prior,
                variations: principal_variation(&nodes, e, criterion),
            })
            .collect();

        candidates.retain(|c| !self.is_superko_move(c.point, c.color));

        if self.rule == Rule::Computer {
            for candidate in candidates.iter_mut() {
                if candidate.point.is_pass() {
                    if let Some(point) = self.get_cleanup_position(candidate.color) {
                        candidate.point = point;
                    }
                }
            }
        }

        match criterion {
            Criterion::Visits => candidates.sort_by(|a, b| b.visits.cmp(&a.visits)),
            Criterion::Lcb => {
                candidates.sort_by(|a, b| b.win_chance_lcb().partial_cmp(&a.win_chance_lcb()).unwrap_or(std::cmp::Ordering::Equal))
            }
        }

        if candidates.is_empty() {
            candidates.push(Candidate {
                point: Point::pass(),
                color: to_move,
                visits: 1,
                value: 0.0,
                policy: 1.0,
                variations: vec![Point::pass()],
            });
        }

        candidates
    }

    /// Final score under `self.rule` (§3 `get_score`, §9 `get_final_score`).
    pub fn get_final_score(&self) -> (f32, f32) {
        get_score(&self.board, self.rule)
    }

    /// Owner classification for every point on the board (§3 `get_owners`).
    pub fn get_territories(&self) -> Vec<Option<Color>> {
        get_owners(&self.board)
    }

    /// Under the `Computer` rule, `pass` is replaced by an explicit cleanup
    /// move: capturing the first opponent group in atari that sits inside
    /// territory that would otherwise be credited to `color` (§3
    /// `get_cleanup_position`). Returns `None` once no such group remains,
    /// meaning an ordinary `pass` is safe.
    pub fn get_cleanup_position(&self, color: Color) -> Option<Point> {
        let owners = self.get_territories();

        for (point, occupant) in self.board.colors() {
            if occupant != Some(color.opposite()) {
                continue;
            }
            if self.board.ren_space(point) != 1 {
                continue;
            }

            let index = point.y() as usize * self.board.width() + point.x() as usize;
            if owners[index] == Some(color) || owners[index].is_none() {
                for n in point.neighbours() {
                    if n.is_on_board(self.board.width(), self.board.height()) && self.board.at(n).is_none() {
                        return Some(n);
                    }
                }
            }
        }

        None
    }
}

fn is_interior(point: Point, width: usize, height: usize) -> bool {
    point.x() > 0 && point.y() > 0 && point.x() < width as i32 - 1 && point.y() < height as i32 - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_nn::RandomModel;

    fn player() -> Player {
        let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
        Player::new(9, 9, 7.5, Rule::Chinese, processor).unwrap()
    }

    #[test]
    fn handicap_places_stones_for_black() {
        let mut p = player();
        p.set_handicap(2);

        assert_eq!(p.board().at(Point::new(6, 6)), Some(Color::Black));
        assert_eq!(p.board().to_move(), Color::Black);
    }

    #[test]
    fn evaluate_returns_at_least_one_candidate() {
        let p = player();
        let candidates = p.evaluate(Some(8), 1.0, -1.0, true, Criterion::Lcb);

        assert!(!candidates.is_empty());
    }

    #[test]
    fn candidate_win_chance_is_bounded() {
        let candidate = Candidate {
            point: Point::new(0, 0),
            color: Color::Black,
            visits: 4,
            value: 0.5,
            policy: 0.2,
            variations: vec![Point::new(0, 0)],
        };

        assert!(candidate.win_chance() >= 0.0 && candidate.win_chance() <= 1.0);
        assert!(candidate.win_chance_lcb() <= candidate.win_chance());
    }
}
