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

//! Monte-Carlo tree search over `dg_go` boards, guided by a `dg_nn`
//! `Processor`, and the Go Text Protocol front-end that drives it (§3, §4).

#[macro_use] extern crate lazy_static;
extern crate dg_go;
extern crate dg_nn;
extern crate dg_utils;
extern crate rand;
extern crate regex;

mod tree;
mod options;
mod time_control;
mod pool;
pub mod player;
pub mod gtp;

pub use self::options::{PolicyChecker, SearchOptions, StandardDeterministicSearch, StandardSearch, StandardPolicyChecker};
pub use self::player::{Candidate, Criterion, Player};
pub use self::time_control::{compute_time_budget, ByoYomi, EitherOf, RolloutLimit, TimeStrategy, TimeStrategyResult};
pub use self::gtp::GtpEngine;
