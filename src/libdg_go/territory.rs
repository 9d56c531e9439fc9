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

use std::collections::HashSet;

use super::board::Board;
use super::color::Color;
use super::point::Point;
use super::Rule;

/// Classifies every point on the board as belonging to `Black`, `White`,
/// or neither (dame / unsettled), by flood-filling each connected region
/// of empty points and checking which colors border it (§3 `get_owners`).
/// A region bordered by both colors -- or by none, on an empty board --
/// is neutral.
pub fn get_owners(board: &Board) -> Vec<Option<Color>> {
    let mut owners = vec![None; board.width() * board.height()];
    let mut visited: HashSet<Point> = HashSet::new();

    for (point, occupant) in board.colors() {
        if occupant.is_some() || visited.contains(&point) {
            continue;
        }

        let mut region = Vec::new();
        let mut borders: HashSet<Color> = HashSet::new();
        let mut stack = vec![point];
        visited.insert(point);

        while let Some(p) = stack.pop() {
            region.push(p);

            for n in p.neighbours() {
                if !n.is_on_board(board.width(), board.height()) {
                    continue;
                }

                match board.at(n) {
                    None if !visited.contains(&n) => {
                        visited.insert(n);
                        stack.push(n);
                    }
                    Some(color) => {
                        borders.insert(color);
                    }
                    _ => {}
                }
            }
        }

        let owner = if borders.len() == 1 {
            borders.into_iter().next()
        } else {
            None
        };

        for p in region {
            let index = p.y() as usize * board.width() + p.x() as usize;
            owners[index] = owner;
        }
    }

    owners
}

/// The final score for both colors, under the given `rule` (§3 `get_score`,
/// §9 `get_final_score`). Dead-stone removal for the `Computer` rule is the
/// responsibility of the caller (it is resolved through gameplay -- by
/// substituting `pass` with an explicit cleanup move -- rather than as a
/// post-hoc adjustment here).
pub fn get_score(board: &Board, rule: Rule) -> (f32, f32) {
    let owners = get_owners(board);
    let mut black_territory = 0usize;
    let mut white_territory = 0usize;

    for &owner in &owners {
        match owner {
            Some(Color::Black) => black_territory += 1,
            Some(Color::White) => white_territory += 1,
            None => {}
        }
    }

    match rule {
        Rule::Chinese | Rule::Computer => {
            let mut black_stones = 0usize;
            let mut white_stones = 0usize;

            for (_, occupant) in board.colors() {
                match occupant {
                    Some(Color::Black) => black_stones += 1,
                    Some(Color::White) => white_stones += 1,
                    None => {}
                }
            }

            let black_score = (black_stones + black_territory) as f32;
            let white_score = (white_stones + white_territory) as f32 + board.komi();

            (black_score, white_score)
        }
        Rule::Japanese => {
            let black_score = black_territory as f32 + board.captures(Color::Black) as f32;
            let white_score = white_territory as f32 + board.captures(Color::White) as f32 + board.komi();

            (black_score, white_score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_no_owner() {
        let board = Board::new(5, 5, 7.5).unwrap();
        let owners = get_owners(&board);

        assert!(owners.iter().all(|o| o.is_none()));
    }

    #[test]
    fn enclosed_region_belongs_to_its_surrounding_color() {
        let mut board = Board::new(5, 5, 0.5).unwrap();

        for &(x, y) in &[(0, 1), (1, 0), (1, 2), (2, 1)] {
            board.play(Point::new(x, y), Color::Black).unwrap();
        }

        let owners = get_owners(&board);
        let center_index = 1 * board.width() + 1;

        assert_eq!(owners[center_index], Some(Color::Black));
    }

    #[test]
    fn chinese_score_counts_stones_and_territory() {
        let mut board = Board::new(5, 5, 0.5).unwrap();
        board.play(Point::new(0, 0), Color::Black).unwrap();

        let (black, white) = get_score(&board, Rule::Chinese);

        assert_eq!(black, 1.0);
        assert_eq!(white, 0.5);
    }
}
