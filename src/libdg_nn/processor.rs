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

use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use dg_go::MODEL_OUTPUT_SIZE;
use dg_utils::config;

use super::model::Model;

struct Request {
    features: Vec<f32>,
    reply: Sender<Vec<f32>>,
}

/// Batches feature tensors from many concurrent callers and dispatches
/// them to a `Model` in groups of up to `config::BATCH_SIZE` (§3
/// "Processor"). One dispatcher thread runs per entry of `config::GPUS`
/// times `config::THREADS_PER_GPU`, mirroring the one-thread-per-accelerator
/// layout of the original `processor.py`.
pub struct Processor {
    sender: Sender<Request>,
    dispatchers: Vec<JoinHandle<()>>,
    fp16: bool,
}

impl Processor {
    pub fn new(model: Arc<dyn Model>) -> Self {
        let (sender, receiver) = unbounded();
        let gpus = config::GPUS.clone();
        let any_cpu = gpus.iter().any(|&g| g < 0);
        let fp16 = *config::FP16 && !any_cpu;
        let deterministic = *config::DETERMINISTIC;

        let num_dispatchers = if deterministic {
            1
        } else {
            (gpus.len() * *config::THREADS_PER_GPU).max(1)
        };
        let batch_size = if deterministic { 1 } else { *config::BATCH_SIZE };

        let dispatchers = (0..num_dispatchers)
            .map(|_| {
                let receiver: Receiver<Request> = receiver.clone();
                let model = Arc::clone(&model);

                thread::spawn(move || dispatch_loop(receiver, model, batch_size))
            })
            .collect();

        Self { sender, dispatchers, fp16 }
    }

    /// Whether half-precision inference is active. Always `false` when any
    /// entry of `config::GPUS` is `-1` (CPU), since half-precision math is
    /// only worthwhile on accelerators that support it natively.
    pub fn fp16_enabled(&self) -> bool {
        self.fp16
    }

    /// Submits one feature tensor and blocks until its prediction row is
    /// ready. Safe to call from many threads at once -- that concurrency is
    /// the entire point of the batching dispatcher.
    pub fn execute(&self, features: Vec<f32>) -> Vec<f32> {
        let (reply_tx, reply_rx) = bounded(1);

        self.sender
            .send(Request { features, reply: reply_tx })
            .expect("processor dispatcher thread has stopped");

        reply_rx.recv().expect("processor dispatcher dropped the reply channel")
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        // dropping `self.sender` closes the channel, which unblocks every
        // dispatcher's `recv` with a `Disconnected` error so it can exit.
        let dispatchers = std::mem::take(&mut self.dispatchers);

        for handle in dispatchers {
            let _ = handle.join();
        }
    }
}

fn dispatch_loop(receiver: Receiver<Request>, model: Arc<dyn Model>, batch_size: usize) {
    loop {
        let first = match receiver.recv() {
            Ok(request) => request,
            Err(_) => return,
        };

        let mut batch = vec![first];
        while batch.len() < batch_size {
            match receiver.try_recv() {
                Ok(request) => batch.push(request),
                Err(_) => break,
            }
        }

        let mut input = Vec::with_capacity(batch.iter().map(|r| r.features.len()).sum());
        for request in &batch {
            input.extend_from_slice(&request.features);
        }

        let output = model.infer(batch.len(), &input);

        for (i, request) in batch.into_iter().enumerate() {
            let row = output[i * MODEL_OUTPUT_SIZE..(i + 1) * MODEL_OUTPUT_SIZE].to_vec();
            let _ = request.reply.send(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RandomModel;
    use dg_go::MODEL_INPUT_SIZE;

    #[test]
    fn executes_a_single_request() {
        let processor = Processor::new(Arc::new(RandomModel::new()));
        let features = vec![0.0f32; MODEL_INPUT_SIZE];
        let output = processor.execute(features);

        assert_eq!(output.len(), MODEL_OUTPUT_SIZE);
    }

    #[test]
    fn serves_many_concurrent_callers() {
        let processor = Arc::new(Processor::new(Arc::new(RandomModel::new())));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let processor = Arc::clone(&processor);

                thread::spawn(move || {
                    let output = processor.execute(vec![0.0f32; MODEL_INPUT_SIZE]);
                    assert_eq!(output.len(), MODEL_OUTPUT_SIZE);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
