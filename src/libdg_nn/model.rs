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

use dg_go::{MODEL_INPUT_SIZE, MODEL_OUTPUT_SIZE, MODEL_PREDICTIONS, MODEL_SIZE, MODEL_VALUES};

/// A loaded neural network. The engine treats this as a black box: given a
/// batch of feature tensors it returns one prediction row per input row
/// (§3 `InferenceRequest`, "Model" -- Non-goal: training or loading model
/// weights from disk in any particular format).
pub trait Model: Send + Sync {
    /// Runs inference over `batch_size` rows of `MODEL_INPUT_SIZE` floats
    /// each, packed consecutively in `input`. Returns `batch_size` rows of
    /// `MODEL_OUTPUT_SIZE` floats each, packed the same way.
    fn infer(&self, batch_size: usize, input: &[f32]) -> Vec<f32>;
}

/// A single parsed prediction row: the per-point policy distribution (plus
/// pass), and the value head's win/score/ownership summary.
#[derive(Clone, Debug)]
pub struct Prediction {
    pub policy: Vec<f32>,
    pub pass: f32,
    pub value: f32,
    pub ownership: Vec<f32>,
}

impl Prediction {
    /// Splits one `MODEL_OUTPUT_SIZE` row into its constituent parts. The
    /// first `MODEL_SIZE * MODEL_SIZE` entries of the predictions block are
    /// the move policy, the remainder of that block are unused auxiliary
    /// prediction planes, and `MODEL_VALUES` scalars (value, pass, score)
    /// follow.
    pub fn from_row(row: &[f32]) -> Self {
        let plane_size = MODEL_SIZE * MODEL_SIZE;
        let policy = row[0..plane_size].to_vec();
        let ownership = row[plane_size..2 * plane_size].to_vec();
        let values = &row[MODEL_PREDICTIONS * plane_size..MODEL_PREDICTIONS * plane_size + MODEL_VALUES];

        Self {
            policy,
            pass: values.first().copied().unwrap_or(0.0),
            value: values.get(1).copied().unwrap_or(0.0),
            ownership,
        }
    }
}

/// Deterministic but non-trained stand-in for a loaded model, used in
/// tests and as a default when no weights file is available. Emits a
/// uniform policy and a value derived from a cheap hash of the input, so
/// that repeated calls on the same position are repeatable.
pub struct RandomModel;

impl RandomModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for RandomModel {
    fn infer(&self, batch_size: usize, input: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; batch_size * MODEL_OUTPUT_SIZE];

        for b in 0..batch_size {
            let row = &input[b * MODEL_INPUT_SIZE..(b + 1) * MODEL_INPUT_SIZE];
            let seed: f32 = row.iter().fold(0.0, |acc, &x| acc + x) % 1.0;
            let out_row = &mut out[b * MODEL_OUTPUT_SIZE..(b + 1) * MODEL_OUTPUT_SIZE];

            let plane_size = MODEL_SIZE * MODEL_SIZE;
            for v in out_row[0..plane_size].iter_mut() {
                *v = 1.0;
            }

            let values_offset = MODEL_PREDICTIONS * plane_size;
            out_row[values_offset] = 0.02; // pass logit
            out_row[values_offset + 1] = seed * 2.0 - 1.0; // value in [-1, 1)
            out_row[values_offset + 2] = 0.0;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_model_produces_the_expected_shape() {
        let model = RandomModel::new();
        let input = vec![0.0f32; 3 * MODEL_INPUT_SIZE];
        let output = model.infer(3, &input);

        assert_eq!(output.len(), 3 * MODEL_OUTPUT_SIZE);
    }

    #[test]
    fn prediction_splits_a_row_into_its_parts() {
        let model = RandomModel::new();
        let input = vec![0.0f32; MODEL_INPUT_SIZE];
        let output = model.infer(1, &input);
        let prediction = Prediction::from_row(&output);

        assert_eq!(prediction.policy.len(), MODEL_SIZE * MODEL_SIZE);
        assert!(prediction.value >= -1.0 && prediction.value <= 1.0);
    }
}
