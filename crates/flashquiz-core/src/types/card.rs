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

use serde::Deserialize;
use serde::Serialize;

use crate::markdown::markdown_to_html;
use crate::types::id::CardId;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

/// A flashcard and its scheduling state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    /// When the card was last reviewed. `None` until the first review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<Timestamp>,
    /// When the card should next be reviewed. `None` until the first review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<Timestamp>,
    #[serde(default)]
    pub level: Level,
}

impl Card {
    /// A card that has never been reviewed.
    pub fn new(id: CardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            last_reviewed: None,
            next_review: None,
            level: Level::MIN,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
    }

    /// Whether the card is due at `now`. New cards are always due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_review {
            None => true,
            Some(next) => next <= now,
        }
    }

    pub fn html_front(&self) -> String {
        markdown_to_html(&self.front)
    }

    pub fn html_back(&self) -> String {
        markdown_to_html(&self.back)
    }
}
