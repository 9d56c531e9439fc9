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

//! End-to-end scenarios driven through `GtpEngine::run`, scripted as raw
//! GTP command text the way a real controller (GoGui, gomill) would send it.

use std::io::Cursor;
use std::sync::Arc;

use dg_mcts::GtpEngine;
use dg_nn::{Processor, RandomModel};

fn run(commands: &str) -> String {
    let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
    let mut output = Vec::new();

    {
        let mut engine = GtpEngine::new(Cursor::new(commands.as_bytes().to_vec()), &mut output, processor);
        engine.run();
    }

    String::from_utf8(output).unwrap()
}

#[test]
fn genmove_on_an_empty_board_returns_a_legal_vertex() {
    let output = run("boardsize 9\nclear_board\ngenmove black\nquit\n");
    let lines: Vec<&str> = output.lines().filter(|l| !l.is_empty()).collect();

    let vertex = lines
        .iter()
        .map(|l| l.trim_start_matches('=').trim())
        .find(|v| !v.is_empty())
        .unwrap();

    assert!(!vertex.is_empty());
}

#[test]
fn play_rejects_a_move_on_an_occupied_point() {
    let output = run("boardsize 9\nclear_board\nplay black C3\nplay white C3\nquit\n");

    assert!(output.contains("?"));
}

#[test]
fn known_command_distinguishes_real_commands_from_made_up_ones() {
    let output = run("known_command genmove\nknown_command made_up_command\nquit\n");
    let replies: Vec<&str> = output.split("\n\n").filter(|s| !s.is_empty()).collect();

    assert!(replies[0].contains("true"));
    assert!(replies[1].contains("false"));
}

#[test]
fn protocol_version_and_name_answer_without_a_board() {
    let output = run("protocol_version\nname\nquit\n");

    assert!(output.contains("= 2"));
    assert!(output.contains("= dream_go"));
}

#[test]
fn undo_restores_the_previous_position() {
    let output = run("boardsize 9\nclear_board\nplay black C3\nundo\nplay white C3\nquit\n");

    assert!(!output.contains('?'));
}
