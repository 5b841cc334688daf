// Copyright 2025 Fernando Borretti
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
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio::time::interval;

use crate::cmd::serve::state::QuizSlot;
use crate::cmd::serve::state::lock;

/// Drives the quiz clock. The task is aborted when the ticker is dropped.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Tick the quiz once per `period` for as long as `run` is current.
    pub fn spawn(quiz: Arc<Mutex<QuizSlot>>, period: Duration, run: u64) -> Self {
        let handle = tokio::spawn(async move {
            let mut clock = interval(period);
            clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            clock.tick().await;
            loop {
                clock.tick().await;
                let mut slot = lock(&quiz);
                // Aborting only takes effect at an await, so a replaced
                // ticker can still get here.
                if slot.run != run {
                    log::debug!("Ticker for run {run} is stale, stopping");
                    break;
                }
                slot.engine.tick();
                if !slot.engine.state().is_in_progress() {
                    log::debug!("Quiz finished, stopping the clock");
                    break;
                }
            }
        });
        Self { handle }
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use flashquiz_core::quiz::QuizConfig;
    use flashquiz_core::quiz::QuizEngine;
    use flashquiz_core::samples::sample_catalog;
    use tokio::time::sleep;

    use super::*;
    use crate::cmd::serve::state::QuizSlot;

    fn slot(time_limit: u32) -> Arc<Mutex<QuizSlot>> {
        let config = QuizConfig {
            time_limit,
            ..QuizConfig::default()
        };
        let engine = QuizEngine::new(sample_catalog().unwrap(), config);
        Arc::new(Mutex::new(QuizSlot {
            engine,
            ticker: None,
            run: 0,
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let quiz = slot(15);
        lock(&quiz).engine.start(None);
        let ticker = Ticker::spawn(quiz.clone(), Duration::from_secs(1), 0);
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(lock(&quiz).engine.state().time_left, 12);
        drop(ticker);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stops_the_clock() {
        let quiz = slot(15);
        lock(&quiz).engine.start(None);
        let ticker = Ticker::spawn(quiz.clone(), Duration::from_secs(1), 0);
        sleep(Duration::from_millis(1500)).await;
        drop(ticker);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(lock(&quiz).engine.state().time_left, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_quiz_completes() {
        let quiz = slot(0);
        lock(&quiz).engine.start(Some("Literature"));
        let ticker = Ticker::spawn(quiz.clone(), Duration::from_secs(1), 0);
        sleep(Duration::from_millis(1500)).await;
        assert!(lock(&quiz).engine.state().is_quiz_completed());
        sleep(Duration::from_secs(1)).await;
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticker_leaves_the_new_run_alone() {
        let quiz = slot(15);
        lock(&quiz).engine.start(None);
        let ticker = Ticker::spawn(quiz.clone(), Duration::from_secs(1), 0);
        {
            // A new run began while the old ticker was still alive.
            let mut slot = lock(&quiz);
            slot.engine.start(Some("Science"));
            slot.run = 1;
        }
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(lock(&quiz).engine.state().time_left, 15);
        assert!(ticker.is_finished());
    }
}
