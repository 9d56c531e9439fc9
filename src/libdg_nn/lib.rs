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

//! The neural network front-end: a black-box `Model` and the batched
//! `Processor` that schedules requests across it (§3 `InferenceRequest`,
//! "Processor").

extern crate crossbeam_channel;
extern crate dg_go;
extern crate dg_utils;

mod model;
mod processor;

pub use self::model::*;
pub use self::processor::*;
