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

use super::point::Point;

/// The conventional star-point handicap positions for a `width` x `height`
/// board (§3 `set_handicap`). Star points sit on the 4th line on boards of
/// 13 or larger, and the 3rd line on smaller boards. Returns an empty
/// vector for `handicap < 2`, since one-stone handicaps are just a normal
/// opening move.
pub fn get_handicap_positions(width: usize, height: usize, handicap: usize) -> Vec<Point> {
    if handicap < 2 {
        return Vec::new();
    }

    let inset = if width.max(height) >= 13 { 3 } else { 2 } as i32;
    let w = width as i32;
    let h = height as i32;

    let ur = Point::new(w - 1 - inset, h - 1 - inset);
    let ll = Point::new(inset, inset);
    let ul = Point::new(inset, h - 1 - inset);
    let lr = Point::new(w - 1 - inset, inset);
    let left_mid = Point::new(inset, h / 2);
    let right_mid = Point::new(w - 1 - inset, h / 2);
    let top_mid = Point::new(w / 2, h - 1 - inset);
    let bottom_mid = Point::new(w / 2, inset);
    let center = Point::new(w / 2, h / 2);

    let mut points = match handicap.min(9) {
        2 => vec![ur, ll],
        3 => vec![ur, ll, ul],
        4 => vec![ur, ll, ul, lr],
        5 => vec![ur, ll, ul, lr, center],
        6 => vec![ur, ll, ul, lr, left_mid, right_mid],
        7 => vec![ur, ll, ul, lr, left_mid, right_mid, center],
        8 => vec![ur, ll, ul, lr, left_mid, right_mid, top_mid, bottom_mid],
        _ => vec![ur, ll, ul, lr, left_mid, right_mid, top_mid, bottom_mid, center],
    };

    points.truncate(handicap);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_stones_sit_on_opposing_corners() {
        let points = get_handicap_positions(19, 19, 2);

        assert_eq!(points, vec![Point::new(15, 15), Point::new(3, 3)]);
    }

    #[test]
    fn nine_stones_includes_the_center() {
        let points = get_handicap_positions(19, 19, 9);

        assert_eq!(points.len(), 9);
        assert!(points.contains(&Point::new(9, 9)));
    }

    #[test]
    fn small_boards_use_the_third_line() {
        let points = get_handicap_positions(9, 9, 2);

        assert_eq!(points, vec![Point::new(6, 6), Point::new(2, 2)]);
    }

    #[test]
    fn handicap_below_two_is_empty() {
        assert!(get_handicap_positions(19, 19, 1).is_empty());
        assert!(get_handicap_positions(19, 19, 0).is_empty());
    }
}
