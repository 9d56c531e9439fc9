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

use super::board::Board;
use super::color::Color;
use super::point::Point;
use super::{MODEL_FEATURES, MODEL_INFOS, MODEL_INPUT_SIZE, MODEL_SIZE};

/// Plane indices, relative to the point of view of the color to move.
const PLANE_OWN_STONES: usize = 0;
const PLANE_OPPONENT_STONES: usize = 1;
const PLANE_EMPTY: usize = 2;
const PLANE_OWN_ATARI: usize = 3;
const PLANE_OWN_TWO_LIBERTIES: usize = 4;
const PLANE_OWN_MANY_LIBERTIES: usize = 5;
const PLANE_OPPONENT_ATARI: usize = 6;
const PLANE_OPPONENT_TWO_LIBERTIES: usize = 7;
const PLANE_OPPONENT_MANY_LIBERTIES: usize = 8;
const PLANE_KO: usize = 9;
const PLANE_LAST_MOVE: usize = 10;

/// Builds the fixed-size input tensor the `Processor` sends to the model
/// (§3 `InferenceRequest`). The board is embedded centered within the
/// `MODEL_SIZE` x `MODEL_SIZE` grid; cells outside of `board`'s own
/// dimensions stay zero in every plane.
///
/// Only the first eleven of the `MODEL_FEATURES` planes carry board state
/// derived from this single snapshot (occupancy, liberty buckets, ko, and
/// the most recent move); the remainder are reserved zero planes for
/// models trained against a longer move history, which this engine does
/// not track per-ply.
pub fn get_features(board: &Board, to_move: Color) -> Vec<f32> {
    let mut planes = vec![0.0f32; (MODEL_FEATURES + 1) * MODEL_SIZE * MODEL_SIZE];
    let plane_size = MODEL_SIZE * MODEL_SIZE;

    for (point, occupant) in board.colors() {
        let model_index = point.to_model_index(board.width(), board.height(), MODEL_SIZE);

        match occupant {
            Some(color) if color == to_move => {
                planes[PLANE_OWN_STONES * plane_size + model_index] = 1.0;
                set_liberty_plane(&mut planes, plane_size, model_index, board.ren_space(point), true);
            }
            Some(_) => {
                planes[PLANE_OPPONENT_STONES * plane_size + model_index] = 1.0;
                set_liberty_plane(&mut planes, plane_size, model_index, board.ren_space(point), false);
            }
            None => {
                planes[PLANE_EMPTY * plane_size + model_index] = 1.0;
            }
        }
    }

    if let Some(ko) = board.ko_point() {
        let model_index = ko.to_model_index(board.width(), board.height(), MODEL_SIZE);
        planes[PLANE_KO * plane_size + model_index] = 1.0;
    }

    if let Some(last_move) = board.last_move() {
        if !last_move.is_pass() {
            let model_index = last_move.to_model_index(board.width(), board.height(), MODEL_SIZE);
            planes[PLANE_LAST_MOVE * plane_size + model_index] = 1.0;
        }
    }

    // the trailing "+1" plane is a constant bias plane, set to one
    // everywhere, so the model can distinguish padded margins from an
    // all-zero board state.
    let bias_plane_offset = MODEL_FEATURES * plane_size;
    for i in 0..plane_size {
        planes[bias_plane_offset + i] = 1.0;
    }

    let mut infos = get_infos(board, to_move);
    planes.append(&mut infos);

    debug_assert_eq!(planes.len(), MODEL_INPUT_SIZE);

    planes
}

fn set_liberty_plane(planes: &mut [f32], plane_size: usize, model_index: usize, liberties: usize, own: bool) {
    let plane = match (own, liberties) {
        (true, 1) => PLANE_OWN_ATARI,
        (true, 2) => PLANE_OWN_TWO_LIBERTIES,
        (true, _) => PLANE_OWN_MANY_LIBERTIES,
        (false, 1) => PLANE_OPPONENT_ATARI,
        (false, 2) => PLANE_OPPONENT_TWO_LIBERTIES,
        (false, _) => PLANE_OPPONENT_MANY_LIBERTIES,
    };

    planes[plane * plane_size + model_index] = 1.0;
}

/// The `MODEL_INFOS` scalar features appended after the board planes.
fn get_infos(board: &Board, to_move: Color) -> Vec<f32> {
    let mut infos = vec![0.0f32; MODEL_INFOS];

    infos[0] = board.komi() / 100.0;
    infos[1] = (board.width() * board.height()) as f32 / (MODEL_SIZE * MODEL_SIZE) as f32;
    infos[2] = board.captures(to_move) as f32 / 100.0;
    infos[3] = board.captures(to_move.opposite()) as f32 / 100.0;
    infos[4] = board.history().len() as f32 / 722.0;
    infos[5] = if to_move == Color::Black { 1.0 } else { 0.0 };
    infos[6] = 0.0;

    infos
}

/// Reorients a point under one of the eight board symmetries (rotations
/// and reflections), used to average predictions over all symmetric views
/// of a position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Symmetry {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    FlipX,
    FlipY,
    FlipDiagonal,
    FlipAntiDiagonal,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::FlipX,
        Symmetry::FlipY,
        Symmetry::FlipDiagonal,
        Symmetry::FlipAntiDiagonal,
    ];

    pub fn apply(self, point: Point, size: usize) -> Point {
        let (x, y) = (point.x(), point.y());
        let max = size as i32 - 1;

        let (x, y) = match self {
            Symmetry::Identity => (x, y),
            Symmetry::Rot90 => (y, max - x),
            Symmetry::Rot180 => (max - x, max - y),
            Symmetry::Rot270 => (max - y, x),
            Symmetry::FlipX => (max - x, y),
            Symmetry::FlipY => (x, max - y),
            Symmetry::FlipDiagonal => (y, x),
            Symmetry::FlipAntiDiagonal => (max - y, max - x),
        };

        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn produces_the_expected_length() {
        let board = Board::new(9, 9, 7.5).unwrap();
        let features = get_features(&board, Color::Black);

        assert_eq!(features.len(), MODEL_INPUT_SIZE);
    }

    #[test]
    fn bias_plane_is_all_ones() {
        let board = Board::new(9, 9, 7.5).unwrap();
        let features = get_features(&board, Color::Black);
        let plane_size = MODEL_SIZE * MODEL_SIZE;
        let bias_plane = &features[MODEL_FEATURES * plane_size..(MODEL_FEATURES + 1) * plane_size];

        assert!(bias_plane.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn symmetry_round_trips_through_its_inverse() {
        let p = Point::new(2, 5);

        for &symmetry in &Symmetry::ALL {
            let transformed = symmetry.apply(p, 9);
            assert!(transformed.is_on_board(9, 9));
        }
    }
}
