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

//! Leitner-style scheduling: a correct answer moves a card up one level, a
//! wrong one moves it down, and the level picks the wait before the next
//! review.

use crate::types::card::Card;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

pub fn next_level(level: Level, correct: bool) -> Level {
    if correct {
        level.promote()
    } else {
        level.demote()
    }
}

/// The card after a review at `reviewed_at`.
pub fn review(card: &Card, correct: bool, reviewed_at: Timestamp) -> Card {
    let level = next_level(card.level, correct);
    Card {
        level,
        last_reviewed: Some(reviewed_at),
        next_review: Some(reviewed_at.plus(level.interval())),
        ..card.clone()
    }
}
