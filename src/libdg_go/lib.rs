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

//! Pure, single-threaded board rules. Everything here is a value type --
//! searchers hold their own copies of a `Board` when walking a path through
//! the search tree and never touch the game's root board (§9 "Board rules
//! as a sibling module").

#[macro_use] extern crate lazy_static;
extern crate regex;

mod color;
mod point;
mod error;
mod board;
mod features;
mod territory;
mod handicap;
pub mod record;

pub use self::color::*;
pub use self::point::*;
pub use self::error::*;
pub use self::board::*;
pub use self::features::*;
pub use self::territory::*;
pub use self::handicap::*;

/// Maximum board edge supported by the engine (§4.5 `boardsize` rejects
/// anything larger, and the model's feature planes are fixed at this size).
pub const MODEL_SIZE: usize = 19;

/// Number of per-cell feature planes the model consumes, not counting the
/// turn-parity plane (§3 `InferenceRequest`).
pub const MODEL_FEATURES: usize = 32;

/// Number of scalar game-level features appended after the board planes.
pub const MODEL_INFOS: usize = 7;

/// Number of per-cell predictions the model emits (§6.2).
pub const MODEL_PREDICTIONS: usize = 6;

/// Number of scalar predictions the model emits (§6.2).
pub const MODEL_VALUES: usize = 3;

/// Total length of a single `Processor` input row.
pub const MODEL_INPUT_SIZE: usize = (MODEL_FEATURES + 1) * MODEL_SIZE * MODEL_SIZE + MODEL_INFOS;

/// Total length of a single `Processor` output row.
pub const MODEL_OUTPUT_SIZE: usize = MODEL_PREDICTIONS * MODEL_SIZE * MODEL_SIZE + MODEL_VALUES;

/// Default komi used when none is specified.
pub const DEFAULT_KOMI: f32 = 7.5;

/// Default board size used when none is specified.
pub const DEFAULT_SIZE: usize = 19;

/// Rule governing pass behaviour and final scoring (§3 `Rule`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rule {
    /// Chinese scoring: fill enclosed empty regions with the surrounding color.
    Chinese,

    /// Japanese scoring: subtract the move-count difference; a settled
    /// boundary allows passing.
    Japanese,

    /// Computer-vs-computer rule: substitutes `Pass` with an explicit
    /// dead-stone cleanup move.
    Computer,
}

impl Default for Rule {
    fn default() -> Self {
        Rule::Chinese
    }
}
