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

//! flashquiz-core: Core library for flashquiz.
//!
//! This library provides WASM-compatible types and state machines for:
//! - Timed multiple-choice quizzes with category filtering
//! - Flashcard study sessions with level-based spaced repetition
//! - Parsing question catalogs and decks from TOML
//! - Markdown to HTML rendering

pub mod catalog;
pub mod error;
pub mod markdown;
pub mod parser;
pub mod quiz;
pub mod rng;
pub mod samples;
pub mod scheduler;
pub mod store;
pub mod study;
pub mod types;

// Re-exports for convenience
pub use catalog::Catalog;
pub use error::{ErrorReport, Fallible, Ignored, Outcome, fail};
pub use parser::{parse_catalog, parse_decks};
pub use quiz::{QuizConfig, QuizEngine, QuizEvent, QuizState};
pub use store::MemoryDeckStore;
pub use study::{DeckStore, StudySession, StudyView};
pub use types::card::Card;
pub use types::deck::Deck;
pub use types::id::{CardId, DeckId};
pub use types::level::Level;
pub use types::question::QuizQuestion;
pub use types::timestamp::Timestamp;
