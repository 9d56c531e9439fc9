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

use std::error;
use std::fmt;

use super::point::Point;

/// Reasons a move can be rejected (§3 `is_valid_position`, §9 `play`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GoError {
    /// The point does not lie on the board.
    OutOfBounds(Point),

    /// The point is already occupied by a stone.
    NotEmpty(Point),

    /// The move has no liberties after captures are resolved (suicide).
    Suicide(Point),

    /// The move would recreate a board position that has occurred before
    /// with the same color to play (§3 `superko`).
    Superko(Point),

    /// The board size given does not fit within `MODEL_SIZE`.
    BoardTooLarge(usize),
}

impl fmt::Display for GoError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            GoError::OutOfBounds(point) => write!(fmt, "{} is not on the board", point),
            GoError::NotEmpty(point) => write!(fmt, "{} is not empty", point),
            GoError::Suicide(point) => write!(fmt, "{} has no liberties", point),
            GoError::Superko(point) => write!(fmt, "{} repeats a previous position", point),
            GoError::BoardTooLarge(size) => write!(fmt, "board size {} is too large", size),
        }
    }
}

impl error::Error for GoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_human_readable_message() {
        let err = GoError::Suicide(Point::new(3, 3));

        assert_eq!(format!("{}", err), "(3, 3) has no liberties");
    }
}
