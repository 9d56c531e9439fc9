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

//! Global tunables, read once from the environment at start-up. Every knob
//! enumerated by the search and GTP components (§4 of the specification)
//! has a default here so that the engine runs sensibly with no environment
//! configured at all.

use std::env;
use std::str::FromStr;

/// Parses the environment variable `name` as a `T`, falling back to
/// `default` if it is unset or fails to parse.
///
/// # Arguments
///
/// * `name` -
/// * `default` -
///
fn from_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

lazy_static! {
    /// Number of searcher threads in the pool (§4.3 `threads`).
    pub static ref NUM_THREADS: usize = from_env("NUM_THREADS", 16);

    /// Maximum batch size accepted by the `Processor` (§4.1 `batch_size`).
    pub static ref BATCH_SIZE: usize = from_env("BATCH_SIZE", 16);

    /// Accelerators to dispatch batches to, `-1` meaning CPU. A single `-1`
    /// by default, matching a CPU-only deployment.
    pub static ref GPUS: Vec<i32> = {
        env::var("GPUS")
            .ok()
            .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .filter(|v: &Vec<i32>| !v.is_empty())
            .unwrap_or_else(|| vec! [-1])
    };

    /// Number of dispatcher threads per accelerator (§4.1).
    pub static ref THREADS_PER_GPU: usize = from_env("THREADS_PER_GPU", 1);

    /// Whether half-precision features are requested. Forced off by the
    /// `Processor` whenever any accelerator is CPU (§4.1).
    pub static ref FP16: bool = from_env("FP16", false);

    /// Whether batching (and hence search) should be made reproducible
    /// (§4.1, §5 Determinism).
    pub static ref DETERMINISTIC: bool = from_env("DETERMINISTIC", false);

    /// PUCB exploration constant (§4.2).
    pub static ref C_PUCT: f32 = from_env("C_PUCT", 1.5);

    /// UCB1 exploration constant, used when `use_ucb1` is set (§4.2).
    pub static ref C_UCB: f32 = from_env("C_UCB", 1.4142135);

    /// Root policy temperature, applied when the move count is small
    /// (dream_go's historical `get_random_komi`-adjacent heuristic).
    pub static ref TEMPERATURE: f32 = from_env("TEMPERATURE", 1.0);

    /// Default target number of root visits for `evaluate` (§4.2).
    pub static ref NUM_ROLLOUT: usize = from_env("NUM_ROLLOUT", 1600);

    /// Default per-move time limit in seconds (§4.5 `timelimit`).
    pub static ref TIME_LIMIT: f64 = from_env("TIME_LIMIT", 10.0);

    /// Win-chance threshold below which `genmove` resigns (§4.5).
    pub static ref RESIGN_THRESHOLD: f32 = from_env("RESIGN_THRESHOLD", 0.0);

    /// Minimum `|score|` required before resignation is even considered.
    pub static ref RESIGN_SCORE: f32 = from_env("RESIGN_SCORE", 0.0);

    /// Minimum turn number before resignation is considered.
    pub static ref RESIGN_TURN: usize = from_env("RESIGN_TURN", 0);

    /// Number of initial turns played by sampling the raw policy instead
    /// of running a full search (§4.4 `get_random`).
    pub static ref INITIAL_TURN: usize = from_env("INITIAL_TURN", 0);
}
