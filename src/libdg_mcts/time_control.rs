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

use std::time::{Duration, Instant};

use super::tree::SearchTree;

pub enum TimeStrategyResult {
    NotExpired,
    Expired,
}

/// Decides when a search should stop (§4.5 "Time budgeting").
pub trait TimeStrategy {
    fn is_done(&self, tree: &SearchTree) -> TimeStrategyResult;
}

/// Splits whatever time remains on the clock (`remaining`, in seconds)
/// into a per-move budget. With `remaining < 0` the clock is untimed and
/// `timelimit` is used directly; otherwise the budget leaves a 20-stone,
/// 2%-per-stone reserve so the clock is never run down to zero.
pub fn compute_time_budget(timelimit: f64, remaining: f64) -> f64 {
    if remaining < 0.0 {
        timelimit
    } else {
        timelimit.min((remaining - 20.0) * 0.02).max(0.0)
    }
}

/// Stops once a wall-clock deadline passes.
pub struct ByoYomi {
    deadline: Instant,
}

impl ByoYomi {
    pub fn new(budget: Duration) -> Self {
        Self { deadline: Instant::now() + budget }
    }
}

impl TimeStrategy for ByoYomi {
    fn is_done(&self, _tree: &SearchTree) -> TimeStrategyResult {
        if Instant::now() >= self.deadline {
            TimeStrategyResult::Expired
        } else {
            TimeStrategyResult::NotExpired
        }
    }
}

/// Stops once the root has accumulated at least `target` visits.
pub struct RolloutLimit {
    target: usize,
}

impl RolloutLimit {
    pub fn new(target: usize) -> Self {
        Self { target }
    }
}

impl TimeStrategy for RolloutLimit {
    fn is_done(&self, tree: &SearchTree) -> TimeStrategyResult {
        let nodes = tree.nodes.read().unwrap();
        let root = &nodes[tree.root];

        if root.total_child_visits() >= self.target {
            TimeStrategyResult::Expired
        } else {
            TimeStrategyResult::NotExpired
        }
    }
}

/// Stops on whichever of `a` or `b` triggers first -- typically a rollout
/// count cap paired with a wall-clock safety net, or vice-versa.
pub struct EitherOf<A, B>(pub A, pub B);

impl<A: TimeStrategy, B: TimeStrategy> TimeStrategy for EitherOf<A, B> {
    fn is_done(&self, tree: &SearchTree) -> TimeStrategyResult {
        match self.0.is_done(tree) {
            TimeStrategyResult::Expired => TimeStrategyResult::Expired,
            TimeStrategyResult::NotExpired => self.1.is_done(tree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untimed_clock_uses_timelimit_directly() {
        assert_eq!(compute_time_budget(5.0, -1.0), 5.0);
    }

    #[test]
    fn timed_clock_leaves_a_reserve() {
        // 120s remaining -> (120 - 20) * 0.02 = 2.0s, below the 5s cap.
        assert_eq!(compute_time_budget(5.0, 120.0), 2.0);
    }

    #[test]
    fn time_budget_never_goes_negative() {
        assert_eq!(compute_time_budget(5.0, 10.0), 0.0);
    }

    #[test]
    fn rollout_limit_expires_at_the_target() {
        use super::super::tree::{Node, SearchTree};
        use dg_go::Point;

        let mut node = Node::new(true, 0.1, vec![(Point::new(0, 0), 0.9)]);
        node.edges[0].visits = 10;
        let tree = SearchTree::new(node);
        let limit = RolloutLimit::new(10);

        assert!(matches!(limit.is_done(&tree), TimeStrategyResult::Expired));
    }
}
