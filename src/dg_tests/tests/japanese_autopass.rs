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

//! Under the `Japanese` rule a settled position should be passed rather
//! than played out to the last dame (§4.5 "auto-pass").

use std::io::Cursor;
use std::sync::Arc;

use dg_go::record::Record;
use dg_go::{Point, Rule};
use dg_mcts::GtpEngine;
use dg_nn::{Processor, RandomModel};

fn settled_record() -> Record {
    let mut record = Record::default();
    record.width = 7;
    record.height = 7;
    record.komi = 6.5;
    record.rule = Rule::Japanese;

    for y in 0..7 {
        for x in 0..7 {
            if x < 3 {
                record.setup_black.push(Point::new(x, y));
            } else {
                record.setup_white.push(Point::new(x, y));
            }
        }
    }

    record
}

#[test]
fn genmove_passes_once_every_point_is_settled() {
    let path = std::env::temp_dir().join("dg_tests_japanese_autopass.sgf");
    std::fs::write(&path, settled_record().to_sgf()).unwrap();

    let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
    let mut output = Vec::new();

    {
        let mut engine = GtpEngine::new(Cursor::new(b"genmove black\nquit\n".to_vec()), &mut output, processor);
        engine.load(path.to_str().unwrap()).unwrap();
        engine.run();
    }

    std::fs::remove_file(&path).ok();

    let text = String::from_utf8(output).unwrap();
    let vertex = text
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.trim_start_matches('=').trim())
        .find(|v| !v.is_empty())
        .unwrap();

    assert_eq!(vertex, "pass");
}
