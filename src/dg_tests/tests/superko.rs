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

//! Positional superko, driven end-to-end through the GTP `play` command
//! rather than directly against `dg_go::Board` (§3 `superko`).

use std::io::Cursor;
use std::sync::Arc;

use dg_mcts::GtpEngine;
use dg_nn::{Processor, RandomModel};

#[test]
fn recapturing_a_corner_ko_immediately_is_rejected() {
    let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
    let mut output = Vec::new();

    // the standard corner ko shape on a 5x5 board, then black recaptures
    // and white is refused the immediate recapture back.
    let script = concat!(
        "boardsize 5\n",
        "clear_board\n",
        "play black B5\n",
        "play white C5\n",
        "play black A4\n",
        "play white B4\n",
        "play black C4\n",
        "play white B3\n",
        "play black B4\n", // captures the white stone at B4
        "play white B4\n", // illegal: recreates the position before black's capture
        "quit\n",
    );

    {
        let mut engine = GtpEngine::new(Cursor::new(script.as_bytes().to_vec()), &mut output, processor);
        engine.run();
    }

    let text = String::from_utf8(output).unwrap();
    let replies: Vec<&str> = text.split("\n\n").filter(|s| !s.is_empty()).collect();

    // the final play (white's recapture) is the second-to-last reply, since
    // `quit` itself always succeeds.
    let recapture_reply = replies[replies.len() - 2];
    assert!(recapture_reply.starts_with('?'), "expected rejection, got {:?}", recapture_reply);
}
