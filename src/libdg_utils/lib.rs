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

#[macro_use] extern crate lazy_static;

pub mod config;
pub mod types;

/// Returns the sum of all finite elements in `values`, treating `-Inf`
/// entries (used to mark illegal moves in a policy vector) as zero.
///
/// # Arguments
///
/// * `values` -
///
pub fn sum_finite_f32(values: &[f32]) -> f32 {
    values.iter().filter(|v| v.is_finite()).sum()
}

/// Divides every finite element of `values` by `denom` in-place, leaving
/// non-finite (illegal move) entries untouched.
///
/// # Arguments
///
/// * `values` -
/// * `denom` -
///
pub fn normalize_finite_f32(values: &mut [f32], denom: f32) {
    let recip = denom.recip();

    for v in values.iter_mut() {
        if v.is_finite() {
            *v *= recip;
        }
    }
}
