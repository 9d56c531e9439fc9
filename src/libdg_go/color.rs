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

/// The color of a stone to play (§3 `Color`). Board cells additionally
/// need an `Empty` state, which is represented by `Option<Color>` rather
/// than folded into this enum, and by the signed `i8` values `+1`/`-1`/`0`
/// wherever the specification calls for arithmetic over the three values
/// (territory sums, owner maps).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the opposing color.
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns `+1` for `Black`, `-1` for `White`, matching the signed
    /// encoding used throughout territory and score arithmetic.
    pub fn as_signed(self) -> i8 {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }

    pub fn from_signed(value: i8) -> Option<Color> {
        match value {
            1 => Some(Color::Black),
            -1 => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Color::Black => write!(fmt, "black"),
            Color::White => write!(fmt, "white"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        assert_eq!(Color::Black.opposite().opposite(), Color::Black);
        assert_eq!(Color::White.opposite(), Color::Black);
    }

    #[test]
    fn signed_round_trips() {
        assert_eq!(Color::from_signed(Color::Black.as_signed()), Some(Color::Black));
        assert_eq!(Color::from_signed(Color::White.as_signed()), Some(Color::White));
        assert_eq!(Color::from_signed(0), None);
    }
}
