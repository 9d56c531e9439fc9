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

use std::fmt;

/// A board coordinate (§3 `Position`). The sentinel `Point::pass()` (`x =
/// y = -1`) represents passing. Resignation has no coordinate and is
/// represented at the `Player`/GTP layer as `Option<Point>` being `None`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Point {
    x: i8,
    y: i8,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x: x as i8, y: y as i8 }
    }

    pub fn pass() -> Self {
        Self { x: -1, y: -1 }
    }

    pub fn x(self) -> i32 {
        self.x as i32
    }

    pub fn y(self) -> i32 {
        self.y as i32
    }

    pub fn is_pass(self) -> bool {
        self.x < 0 || self.y < 0
    }

    /// Returns whether this point lies within a `width` x `height` board.
    pub fn is_on_board(self, width: usize, height: usize) -> bool {
        !self.is_pass() && self.x() >= 0 && (self.x() as usize) < width
            && self.y() >= 0 && (self.y() as usize) < height
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x() + dx, self.y() + dy)
    }

    /// The four orthogonally adjacent points, without any board-bounds
    /// filtering (callers combine this with `is_on_board`).
    pub fn neighbours(self) -> [Point; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// Iterates over every point of a `width` x `height` board, in
    /// row-major order.
    pub fn all(width: usize, height: usize) -> impl Iterator<Item = Point> {
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x as i32, y as i32)))
    }

    /// Maps this point into the model's fixed 19x19 grid, centering boards
    /// smaller than 19x19 the way `Player.get_territories` does when it
    /// slices `begin_x..end_x, begin_y..end_y` out of the model output.
    pub fn to_model_index(self, width: usize, height: usize, model_size: usize) -> usize {
        let begin_x = (model_size - width) / 2;
        let begin_y = (model_size - height) / 2;

        (self.y() as usize + begin_y) * model_size + (self.x() as usize + begin_x)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if self.is_pass() {
            write!(fmt, "pass")
        } else {
            write!(fmt, "({}, {})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_off_board() {
        assert!(!Point::pass().is_on_board(19, 19));
        assert!(Point::pass().is_pass());
    }

    #[test]
    fn on_board_bounds() {
        assert!(Point::new(0, 0).is_on_board(9, 9));
        assert!(Point::new(8, 8).is_on_board(9, 9));
        assert!(!Point::new(9, 0).is_on_board(9, 9));
        assert!(!Point::new(-1, 0).is_on_board(9, 9));
    }

    #[test]
    fn all_covers_every_cell() {
        let points: Vec<_> = Point::all(3, 2).collect();

        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Point::new(0, 0));
        assert_eq!(points[5], Point::new(2, 1));
    }

    #[test]
    fn model_index_centers_small_boards() {
        // a 9x9 board sits centered inside the 19x19 model grid, with a
        // 5-cell margin on every side.
        let p = Point::new(0, 0).to_model_index(9, 9, 19);

        assert_eq!(p, 5 * 19 + 5);
    }
}
