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

//! A minimal SGF reader and writer (§8 "Game records"). Only the
//! properties this engine cares about are recognized -- board size, komi,
//! rule, handicap, setup stones, and the mainline of moves -- everything
//! else is ignored rather than rejected, since SGF files in the wild carry
//! plenty of annotation properties we have no use for.

use std::error;
use std::fmt;

use regex::Regex;

use super::color::Color;
use super::point::Point;
use super::Rule;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    Malformed(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            RecordError::Malformed(reason) => write!(fmt, "malformed SGF record: {}", reason),
        }
    }
}

impl error::Error for RecordError {}

/// A parsed game record: the setup needed to reconstruct the starting
/// position, plus the sequence of moves that follow it.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub width: usize,
    pub height: usize,
    pub komi: f32,
    pub rule: Rule,
    pub handicap: usize,
    pub setup_black: Vec<Point>,
    pub setup_white: Vec<Point>,
    pub moves: Vec<(Color, Point)>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            width: super::DEFAULT_SIZE,
            height: super::DEFAULT_SIZE,
            komi: super::DEFAULT_KOMI,
            rule: Rule::Chinese,
            handicap: 0,
            setup_black: Vec::new(),
            setup_white: Vec::new(),
            moves: Vec::new(),
        }
    }
}

fn sgf_to_point(text: &str, height: usize) -> Option<Point> {
    let mut chars = text.chars();
    let col = chars.next()?;
    let row = chars.next()?;

    if !col.is_ascii_lowercase() || !row.is_ascii_lowercase() {
        return None;
    }

    let x = (col as u8 - b'a') as i32;
    let sgf_row = (row as u8 - b'a') as i32;

    Some(Point::new(x, height as i32 - 1 - sgf_row))
}

fn point_to_sgf(point: Point, height: usize) -> String {
    let col = (b'a' + point.x() as u8) as char;
    let row = (b'a' + (height as i32 - 1 - point.y()) as u8) as char;

    format!("{}{}", col, row)
}

fn rule_to_sgf(rule: Rule) -> &'static str {
    match rule {
        Rule::Chinese => "Chinese",
        Rule::Japanese => "Japanese",
        Rule::Computer => "Computer",
    }
}

fn rule_from_sgf(text: &str) -> Rule {
    match text.to_ascii_lowercase().as_str() {
        "japanese" | "jp" => Rule::Japanese,
        "computer" | "com" => Rule::Computer,
        _ => Rule::Chinese,
    }
}

impl Record {
    /// Parses the properties of every node of the (assumed mainline-only)
    /// game tree in `text`.
    pub fn parse(text: &str) -> Result<Record, RecordError> {
        lazy_static! {
            static ref NODE: Regex = Regex::new(r";([^;()]*)").unwrap();
            static ref PROPERTY: Regex = Regex::new(r"([A-Z]{1,2})((?:\[[^\]]*\])+)").unwrap();
            static ref VALUE: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
        }

        if !text.trim_start().starts_with('(') {
            return Err(RecordError::Malformed("missing opening '('".into()));
        }

        let mut record = Record::default();
        let mut height = record.height;

        for node in NODE.captures_iter(text) {
            let body = &node[1];

            for property in PROPERTY.captures_iter(body) {
                let key = &property[1];
                let values: Vec<&str> = VALUE
                    .captures_iter(&property[2])
                    .map(|c| c.get(1).unwrap().as_str())
                    .collect();

                match key {
                    "SZ" => {
                        if let Some(size) = values.first() {
                            if let Some((w, h)) = size.split_once(':') {
                                record.width = w.parse().unwrap_or(record.width);
                                record.height = h.parse().unwrap_or(record.height);
                            } else if let Ok(size) = size.parse() {
                                record.width = size;
                                record.height = size;
                            }
                            height = record.height;
                        }
                    }
                    "KM" => {
                        if let Some(komi) = values.first().and_then(|v| v.parse().ok()) {
                            record.komi = komi;
                        }
                    }
                    "RU" => {
                        if let Some(rule) = values.first() {
                            record.rule = rule_from_sgf(rule);
                        }
                    }
                    "HA" => {
                        if let Some(handicap) = values.first().and_then(|v| v.parse().ok()) {
                            record.handicap = handicap;
                        }
                    }
                    "AB" => {
                        for value in &values {
                            if let Some(point) = sgf_to_point(value, height) {
                                record.setup_black.push(point);
                            }
                        }
                    }
                    "AW" => {
                        for value in &values {
                            if let Some(point) = sgf_to_point(value, height) {
                                record.setup_white.push(point);
                            }
                        }
                    }
                    "B" | "W" => {
                        let color = if key == "B" { Color::Black } else { Color::White };
                        if let Some(value) = values.first() {
                            let point = if value.is_empty() {
                                Point::pass()
                            } else {
                                sgf_to_point(value, height)
                                    .ok_or_else(|| RecordError::Malformed(format!("bad coordinate {:?}", value)))?
                            };
                            record.moves.push((color, point));
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(record)
    }

    /// Serializes this record back to SGF text. `Record::parse` applied to
    /// this output reproduces an equivalent `Record`.
    pub fn to_sgf(&self) -> String {
        let mut out = String::from("(;GM[1]FF[4]");

        out.push_str(&format!("SZ[{}:{}]", self.width, self.height));
        out.push_str(&format!("KM[{}]", self.komi));
        out.push_str(&format!("RU[{}]", rule_to_sgf(self.rule)));
        if self.handicap > 0 {
            out.push_str(&format!("HA[{}]", self.handicap));
        }
        if !self.setup_black.is_empty() {
            out.push_str("AB");
            for &p in &self.setup_black {
                out.push_str(&format!("[{}]", point_to_sgf(p, self.height)));
            }
        }
        if !self.setup_white.is_empty() {
            out.push_str("AW");
            for &p in &self.setup_white {
                out.push_str(&format!("[{}]", point_to_sgf(p, self.height)));
            }
        }

        for &(color, point) in &self.moves {
            let key = if color == Color::Black { "B" } else { "W" };
            let value = if point.is_pass() { String::new() } else { point_to_sgf(point, self.height) };
            out.push_str(&format!(";{}[{}]", key, value));
        }

        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_board_size_and_komi() {
        let record = Record::parse("(;GM[1]FF[4]SZ[19]KM[7.5])").unwrap();

        assert_eq!(record.width, 19);
        assert_eq!(record.height, 19);
        assert_eq!(record.komi, 7.5);
    }

    #[test]
    fn parses_a_move_sequence() {
        let record = Record::parse("(;GM[1]SZ[9]KM[5.5];B[ee];W[gg];B[])").unwrap();

        assert_eq!(record.moves.len(), 3);
        assert_eq!(record.moves[0].0, Color::Black);
        assert!(record.moves[2].1.is_pass());
    }

    #[test]
    fn round_trips_through_to_sgf() {
        let mut record = Record::default();
        record.width = 9;
        record.height = 9;
        record.komi = 5.5;
        record.moves.push((Color::Black, Point::new(2, 2)));
        record.moves.push((Color::White, Point::pass()));

        let text = record.to_sgf();
        let parsed = Record::parse(&text).unwrap();

        assert_eq!(parsed.width, 9);
        assert_eq!(parsed.height, 9);
        assert_eq!(parsed.komi, 5.5);
        assert_eq!(parsed.moves, record.moves);
    }

    #[test]
    fn handicap_setup_stones_round_trip() {
        let mut record = Record::default();
        record.handicap = 2;
        record.setup_black.push(Point::new(3, 3));
        record.setup_black.push(Point::new(15, 15));

        let parsed = Record::parse(&record.to_sgf()).unwrap();

        assert_eq!(parsed.handicap, 2);
        assert_eq!(parsed.setup_black.len(), 2);
    }
}
