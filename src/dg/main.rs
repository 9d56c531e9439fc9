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

use std::io::{self, BufReader};
use std::sync::Arc;

use clap::Parser;
use cpu_time::ProcessTime;

use dg_mcts::GtpEngine;
use dg_nn::{Processor, RandomModel};

/// Command-line front-end. Reads GTP commands from standard input and
/// writes responses to standard output until `quit`.
#[derive(Parser, Debug)]
#[command(name = "dream_go", version)]
struct Args {
    /// Replay the mainline of an SGF file before entering the GTP loop.
    #[arg(long)]
    load: Option<String>,

    /// Print the measured process CPU time to stderr on exit.
    #[arg(long)]
    report_cpu_time: bool,
}

fn main() {
    let args = Args::parse();
    let started_at = ProcessTime::now();

    let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut engine = GtpEngine::new(BufReader::new(stdin.lock()), stdout.lock(), processor);

    if let Some(path) = &args.load {
        if let Err(err) = engine.load(path) {
            eprintln!("failed to load {}: {}", path, err);
        }
    }

    engine.run();

    if args.report_cpu_time {
        eprintln!("cpu time: {:?}", started_at.elapsed());
    }
}
