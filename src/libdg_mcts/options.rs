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

use dg_go::{Board, Color, Point};

/// Decides which moves a search is even allowed to expand (§3 `PolicyChecker`).
pub trait PolicyChecker {
    fn is_policy_candidate(&self, board: &Board, point: Point) -> bool;
}

/// Per-search configuration: how moves are filtered, and whether the
/// search process should behave deterministically (§4.1 `deterministic`).
pub trait SearchOptions: Send + Sync {
    fn policy_checker(&self, board: &Board, to_move: Color) -> Box<dyn PolicyChecker>;

    fn deterministic(&self) -> bool;

    fn use_ucb1(&self) -> bool;
}

pub struct StandardPolicyChecker {
    to_move: Color,
}

impl PolicyChecker for StandardPolicyChecker {
    fn is_policy_candidate(&self, board: &Board, point: Point) -> bool {
        point.is_pass() || board.is_valid(point, self.to_move)
    }
}

#[derive(Clone, Default)]
pub struct StandardSearch {
    use_ucb1: bool,
}

impl StandardSearch {
    pub fn new(use_ucb1: bool) -> Self {
        Self { use_ucb1 }
    }
}

impl SearchOptions for StandardSearch {
    fn policy_checker(&self, _board: &Board, to_move: Color) -> Box<dyn PolicyChecker> {
        Box::new(StandardPolicyChecker { to_move })
    }

    fn deterministic(&self) -> bool {
        false
    }

    fn use_ucb1(&self) -> bool {
        self.use_ucb1
    }
}

/// Identical move filtering to `StandardSearch`, but forces single-threaded,
/// submission-ordered batching through the `Processor` so that repeated
/// searches over the same position return the same tree (§4.1, §5).
#[derive(Clone, Default)]
pub struct StandardDeterministicSearch {
    use_ucb1: bool,
}

impl StandardDeterministicSearch {
    pub fn new(use_ucb1: bool) -> Self {
        Self { use_ucb1 }
    }
}

impl SearchOptions for StandardDeterministicSearch {
    fn policy_checker(&self, _board: &Board, to_move: Color) -> Box<dyn PolicyChecker> {
        Box::new(StandardPolicyChecker { to_move })
    }

    fn deterministic(&self) -> bool {
        true
    }

    fn use_ucb1(&self) -> bool {
        self.use_ucb1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_go::DEFAULT_KOMI;

    #[test]
    fn pass_is_always_a_candidate() {
        let board = Board::new(9, 9, DEFAULT_KOMI).unwrap();
        let options = StandardSearch::new(false);
        let checker = options.policy_checker(&board, Color::Black);

        assert!(checker.is_policy_candidate(&board, Point::pass()));
    }
}
