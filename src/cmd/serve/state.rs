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
use std::sync::MutexGuard;
use std::time::Duration;

use flashquiz_core::error::Outcome;
use flashquiz_core::quiz::QuizEngine;
use flashquiz_core::quiz::QuizEvent;
use flashquiz_core::rng::TinyRng;
use flashquiz_core::store::MemoryDeckStore;
use flashquiz_core::study::StudySession;
use tokio::sync::oneshot::Sender;

use crate::cmd::serve::ticker::Ticker;

#[derive(Clone)]
pub struct ServerState {
    pub quiz: Arc<Mutex<QuizSlot>>,
    pub study: Arc<Mutex<StudySlot>>,
    pub tick_period: Duration,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct QuizSlot {
    pub engine: QuizEngine,
    /// Present exactly while the quiz is in progress.
    pub ticker: Option<Ticker>,
    /// Bumped whenever the ticker is replaced or cleared. A ticker only
    /// drives the run it was spawned for.
    pub run: u64,
}

pub struct StudySlot {
    pub store: MemoryDeckStore,
    pub session: Option<StudySession>,
    pub rng: TinyRng,
    /// An error from the last deck edit, shown once.
    pub flash: Option<String>,
}

/// Lock a mutex, carrying on if a handler panicked while holding it.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ServerState {
    /// Feed an event to the quiz, then start or stop the ticker to match
    /// the new phase.
    pub fn dispatch_quiz(&self, event: QuizEvent) -> Outcome {
        let mut slot = lock(&self.quiz);
        let restart_timer = matches!(event, QuizEvent::Start(_));
        let outcome = slot.engine.dispatch(event);
        if !slot.engine.state().is_in_progress() {
            if slot.ticker.take().is_some() {
                slot.run += 1;
            }
        } else if restart_timer && outcome.is_applied() {
            slot.run += 1;
            slot.ticker = Some(Ticker::spawn(self.quiz.clone(), self.tick_period, slot.run));
        }
        outcome
    }
}
