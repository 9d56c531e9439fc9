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

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::color::Color;
use super::error::GoError;
use super::point::Point;
use super::{DEFAULT_KOMI, DEFAULT_SIZE, MODEL_SIZE};

/// A single position of the game, and every rule needed to mutate it (§9
/// "Board rules as a sibling module"). A `Board` is a plain value -- workers
/// clone it when walking a path through the search tree and never touch the
/// game's root board.
#[derive(Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    komi: f32,
    cells: Vec<Option<Color>>,
    captures_black: usize,
    captures_white: usize,
    ko_point: Option<Point>,
    last_move: Option<Point>,
    to_move: Color,

    /// Fingerprints of every position reached so far, including the
    /// current one, used to enforce positional superko (§3 `superko`).
    history: Vec<u64>,
}

impl Board {
    pub fn new(width: usize, height: usize, komi: f32) -> Result<Self, GoError> {
        if width > MODEL_SIZE || height > MODEL_SIZE {
            return Err(GoError::BoardTooLarge(width.max(height)));
        }

        let mut board = Self {
            width,
            height,
            komi,
            cells: vec![None; width * height],
            captures_black: 0,
            captures_white: 0,
            ko_point: None,
            last_move: None,
            to_move: Color::Black,
            history: Vec::new(),
        };
        board.history.push(board.fingerprint());

        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn ko_point(&self) -> Option<Point> {
        self.ko_point
    }

    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    pub fn captures(&self, color: Color) -> usize {
        match color {
            Color::Black => self.captures_black,
            Color::White => self.captures_white,
        }
    }

    fn index(&self, point: Point) -> usize {
        point.y() as usize * self.width + point.x() as usize
    }

    pub fn at(&self, point: Point) -> Option<Color> {
        if point.is_on_board(self.width, self.height) {
            self.cells[self.index(point)]
        } else {
            None
        }
    }

    /// Places a stone without checking legality or resolving captures, and
    /// without recording the resulting position in `history`. Used only for
    /// handicap and SGF setup stones, which are diagram state rather than
    /// played moves.
    pub fn place_setup_stone(&mut self, point: Point, color: Color) {
        if point.is_on_board(self.width, self.height) {
            let index = self.index(point);
            self.cells[index] = Some(color);
        }
    }

    /// Re-baselines positional superko history to the current position.
    /// Called after setup stones have been placed, so that the diagram a
    /// game starts from is never itself treated as a repeated position.
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.history.push(self.fingerprint());
    }

    /// Every point on the board, in row-major order, together with its
    /// occupant (§3 `get_colors`).
    pub fn colors(&self) -> impl Iterator<Item = (Point, Option<Color>)> + '_ {
        Point::all(self.width, self.height).map(move |p| (p, self.at(p)))
    }

    /// A hash of the stone configuration and the color to move, used for
    /// positional superko detection and as a transposition key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.cells.hash(&mut hasher);
        self.to_move.hash(&mut hasher);
        hasher.finish()
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    fn neighbours_on_board(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        point.neighbours().into_iter().filter(move |p| p.is_on_board(self.width, self.height))
    }

    /// Flood-fills the group containing `point`, returning its stones and
    /// the set of distinct empty liberty points. Panics if `point` is empty.
    fn group_and_liberties(&self, point: Point) -> (HashSet<Point>, HashSet<Point>) {
        let color = self.at(point).expect("group_and_liberties on an empty point");
        let mut group = HashSet::new();
        let mut liberties = HashSet::new();
        let mut stack = vec![point];

        group.insert(point);
        while let Some(p) = stack.pop() {
            for n in self.neighbours_on_board(p) {
                match self.at(n) {
                    None => {
                        liberties.insert(n);
                    }
                    Some(c) if c == color && !group.contains(&n) => {
                        group.insert(n);
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }

        (group, liberties)
    }

    /// The number of stones in the group occupying `point` (§3 `get_ren_size`).
    pub fn ren_size(&self, point: Point) -> usize {
        if self.at(point).is_none() {
            0
        } else {
            self.group_and_liberties(point).0.len()
        }
    }

    /// The number of liberties of the group occupying `point` (§3 `get_ren_space`).
    pub fn ren_space(&self, point: Point) -> usize {
        if self.at(point).is_none() {
            0
        } else {
            self.group_and_liberties(point).1.len()
        }
    }

    /// Whether `color` playing at `point` would be legal, without mutating
    /// the board (§3 `is_valid_position`).
    pub fn is_valid(&self, point: Point, color: Color) -> bool {
        if point.is_pass() {
            return true;
        }

        let mut clone = self.clone();
        clone.play(point, color).is_ok()
    }

    /// Every legal move for `color`, not counting `pass` (§3 `get_enableds`).
    pub fn enabled_moves(&self, color: Color) -> Vec<Point> {
        Point::all(self.width, self.height)
            .filter(|&p| self.at(p).is_none() && self.is_valid(p, color))
            .collect()
    }

    pub fn is_enabled(&self, point: Point, color: Color) -> bool {
        self.at(point).is_none() && self.is_valid(point, color)
    }

    /// Plays a move, mutating the board in place. On error the board is
    /// left exactly as it was (§9 `play`).
    pub fn play(&mut self, point: Point, color: Color) -> Result<(), GoError> {
        if point.is_pass() {
            self.last_move = Some(point);
            self.ko_point = None;
            self.to_move = color.opposite();
            self.history.push(self.fingerprint());

            return Ok(());
        }

        if !point.is_on_board(self.width, self.height) {
            return Err(GoError::OutOfBounds(point));
        }
        if self.at(point).is_some() {
            return Err(GoError::NotEmpty(point));
        }
        if self.ko_point == Some(point) {
            return Err(GoError::Superko(point));
        }

        let index = self.index(point);
        self.cells[index] = Some(color);

        let mut captured = HashSet::new();
        for n in self.neighbours_on_board(point).collect::<Vec<_>>() {
            if self.at(n) == Some(color.opposite()) {
                let (group, liberties) = self.group_and_liberties(n);
                if liberties.is_empty() {
                    captured.extend(group);
                }
            }
        }
        for &p in &captured {
            self.cells[self.index(p)] = None;
        }

        let (own_group, own_liberties) = self.group_and_liberties(point);
        if own_liberties.is_empty() {
            // suicide -- undo and reject.
            for &p in &captured {
                self.cells[self.index(p)] = Some(color.opposite());
            }
            self.cells[index] = None;

            return Err(GoError::Suicide(point));
        }

        let fingerprint = self.fingerprint();
        if self.history.contains(&fingerprint) {
            for &p in &captured {
                self.cells[self.index(p)] = Some(color.opposite());
            }
            self.cells[index] = None;

            return Err(GoError::Superko(point));
        }

        match color {
            Color::Black => self.captures_black += captured.len(),
            Color::White => self.captures_white += captured.len(),
        }

        // simple ko: capturing exactly one stone into a one-stone,
        // one-liberty group recreates the classic ko shape.
        self.ko_point = if captured.len() == 1 && own_group.len() == 1 && own_liberties.len() == 1 {
            captured.iter().next().copied()
        } else {
            None
        };

        self.last_move = Some(point);
        self.to_move = color.opposite();
        self.history.push(fingerprint);

        Ok(())
    }

    /// A crude ladder reader: does the group occupying `point` die to a
    /// straightforward atari-chase within `width + height` moves (§3
    /// `is_shicho`)? This is a heuristic, not an exhaustive search.
    pub fn is_shicho(&self, point: Point) -> bool {
        let Some(color) = self.at(point) else { return false };
        let mut board = self.clone();
        let max_steps = self.width + self.height;

        for _ in 0..max_steps {
            let (group, liberties) = board.group_and_liberties(point);
            if liberties.len() != 1 {
                return liberties.is_empty();
            }

            let escape = *liberties.iter().next().unwrap();
            if board.play(escape, color).is_err() {
                return true;
            }

            let (_, liberties) = board.group_and_liberties(point);
            if liberties.len() > 2 {
                return false;
            }

            let chase = liberties.into_iter().find(|&p| p != escape);
            match chase {
                Some(chase) if board.play(chase, color.opposite()).is_ok() => {}
                _ => return false,
            }

            if group.len() > max_steps {
                return false;
            }
        }

        false
    }
}

impl fmt::Display for Board {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let mark = match self.at(Point::new(x as i32, y as i32)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(fmt, "{}", mark)?;
            }
            writeln!(fmt)?;
        }

        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE, DEFAULT_KOMI).expect("default board size is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_a_surrounded_stone() {
        let mut board = Board::new(5, 5, 7.5).unwrap();

        board.play(Point::new(1, 0), Color::Black).unwrap();
        board.play(Point::new(0, 0), Color::White).unwrap();
        board.play(Point::new(0, 1), Color::Black).unwrap();

        assert_eq!(board.at(Point::new(0, 0)), None);
        assert_eq!(board.captures(Color::Black), 1);
    }

    #[test]
    fn rejects_suicide() {
        let mut board = Board::new(5, 5, 7.5).unwrap();

        board.play(Point::new(0, 1), Color::Black).unwrap();
        board.play(Point::new(1, 0), Color::Black).unwrap();
        board.play(Point::new(2, 2), Color::White).unwrap();

        let err = board.play(Point::new(0, 0), Color::White);

        assert_eq!(err, Err(GoError::Suicide(Point::new(0, 0))));
    }

    #[test]
    fn rejects_simple_ko_recapture() {
        let mut board = Board::new(5, 5, 7.5).unwrap();

        // standard corner ko shape.
        board.play(Point::new(1, 0), Color::Black).unwrap();
        board.play(Point::new(2, 0), Color::White).unwrap();
        board.play(Point::new(0, 1), Color::Black).unwrap();
        board.play(Point::new(1, 1), Color::White).unwrap();
        board.play(Point::new(2, 1), Color::Black).unwrap();
        board.play(Point::new(1, 2), Color::White).unwrap();

        // black captures the ko stone at (1, 1)...
        board.play(Point::new(1, 1), Color::Black).unwrap();
        // ...white may not recapture immediately.
        let err = board.play(Point::new(1, 1), Color::White);

        assert!(matches!(err, Err(GoError::Superko(_))));
    }

    #[test]
    fn pass_flips_the_color_to_move() {
        let mut board = Board::new(5, 5, 7.5).unwrap();

        board.play(Point::pass(), Color::Black).unwrap();

        assert_eq!(board.to_move(), Color::White);
        assert_eq!(board.last_move(), Some(Point::pass()));
    }
}
