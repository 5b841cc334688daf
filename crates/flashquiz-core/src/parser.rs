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

//! TOML formats for question catalogs and decks.
//!
//! A catalog file is a list of `[[question]]` tables:
//!
//! ```toml
//! [[question]]
//! id = 5
//! question = "What is the chemical symbol for gold?"
//! options = ["Au", "Ag", "Fe", "Gd"]
//! correct_answer = 0
//! category = "Science"
//! ```
//!
//! A deck file is a list of `[[deck]]` tables, each with `[[deck.card]]`
//! entries. Ids are optional in deck files and generated when missing.

use std::collections::HashSet;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::id::CardId;
use crate::types::id::DeckId;
use crate::types::level::Level;
use crate::types::question::QuizQuestion;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    question: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecksFile {
    #[serde(default)]
    deck: Vec<DeckEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckEntry {
    id: Option<DeckId>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    card: Vec<CardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CardEntry {
    id: Option<CardId>,
    front: String,
    back: String,
    #[serde(default)]
    level: Level,
    last_reviewed: Option<Timestamp>,
    next_review: Option<Timestamp>,
}

/// Parse a question catalog.
///
/// `source_path` is only used in error messages.
pub fn parse_catalog(source_path: &str, text: &str) -> Fallible<Catalog> {
    let file: CatalogFile = toml::from_str(text).map_err(|e| in_file(source_path, e))?;
    Catalog::new(file.question).map_err(|e| in_file(source_path, e))
}

/// Parse a deck file into decks, generating any missing ids.
///
/// `source_path` is only used in error messages.
pub fn parse_decks(source_path: &str, text: &str) -> Fallible<Vec<Deck>> {
    let file: DecksFile = toml::from_str(text).map_err(|e| in_file(source_path, e))?;
    let mut decks: Vec<Deck> = Vec::new();
    let mut seen: HashSet<DeckId> = HashSet::new();
    for (index, entry) in file.deck.into_iter().enumerate() {
        let deck = build_deck(entry, index as u64).map_err(|e| in_file(source_path, e))?;
        if !seen.insert(deck.id().clone()) {
            return fail(format!("{source_path}: duplicate deck id '{}'", deck.id()));
        }
        decks.push(deck);
    }
    Ok(decks)
}

fn build_deck(entry: DeckEntry, index: u64) -> Fallible<Deck> {
    if entry.name.trim().is_empty() {
        return fail(format!("deck {} has no name", index + 1));
    }
    let id = entry
        .id
        .unwrap_or_else(|| DeckId::generate(&entry.name, index));
    let cards: Vec<Card> = entry
        .card
        .into_iter()
        .enumerate()
        .map(|(seq, card)| Card {
            id: card
                .id
                .unwrap_or_else(|| CardId::generate(&id, &card.front, &card.back, seq as u64)),
            front: card.front,
            back: card.back,
            last_reviewed: card.last_reviewed,
            next_review: card.next_review,
            level: card.level,
        })
        .collect();
    Deck::new(id, entry.name, entry.description, cards)
}

fn in_file(source_path: &str, e: impl Into<ErrorReport>) -> ErrorReport {
    let e: ErrorReport = e.into();
    let message = e.to_string();
    let message = message.strip_prefix("error: ").unwrap_or(&message);
    ErrorReport::new(format!("{source_path}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() -> Fallible<()> {
        let text = r#"
[[question]]
id = 1
question = "What is React?"
options = ["A library", "A language"]
correct_answer = 0
category = "Programming"

[[question]]
id = 4
question = "What is the largest planet in our solar system?"
options = ["Earth", "Saturn", "Jupiter", "Neptune"]
correct_answer = 2
category = "Science"
"#;
        let catalog = parse_catalog("quiz.toml", text)?;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.categories(), &["Programming", "Science"]);
        assert_eq!(catalog.questions()[1].options[2], "Jupiter");
        Ok(())
    }

    #[test]
    fn test_parse_empty_catalog() {
        assert_eq!(
            parse_catalog("quiz.toml", "").unwrap_err().to_string(),
            "error: quiz.toml: the question catalog is empty"
        );
    }

    #[test]
    fn test_parse_invalid_answer() {
        let text = r#"
[[question]]
id = 1
question = "Q?"
options = ["a", "b"]
correct_answer = 2
category = "C"
"#;
        let err = parse_catalog("quiz.toml", text).unwrap_err().to_string();
        assert!(err.starts_with("error: quiz.toml: question 1"), "{err}");
    }

    #[test]
    fn test_parse_unknown_field() {
        let text = r#"
[[question]]
id = 1
question = "Q?"
options = ["a", "b"]
answer = 1
correct_answer = 1
category = "C"
"#;
        let err = parse_catalog("quiz.toml", text).unwrap_err().to_string();
        assert!(err.starts_with("error: quiz.toml: TOML error"), "{err}");
    }

    #[test]
    fn test_parse_decks() -> Fallible<()> {
        let text = r#"
[[deck]]
id = "1"
name = "Spanish Basics"
description = "Common Spanish words and phrases"

[[deck.card]]
id = "1-1"
front = "Hello"
back = "Hola"

[[deck.card]]
front = "Goodbye"
back = "Adiós"
level = 9
last_reviewed = "2024-01-01T12:00:00.000Z"
next_review = "2024-01-31T12:00:00.000Z"

[[deck]]
name = "Empty"
"#;
        let decks = parse_decks("decks.toml", text)?;
        assert_eq!(decks.len(), 2);
        let spanish = &decks[0];
        assert_eq!(spanish.id(), &DeckId::new("1"));
        assert_eq!(spanish.cards()[0].id, CardId::new("1-1"));
        let goodbye = &spanish.cards()[1];
        assert_eq!(goodbye.id.as_str().len(), 16);
        assert_eq!(goodbye.level, Level::MAX);
        assert!(!goodbye.is_new());
        assert!(decks[1].is_empty());
        assert_eq!(decks[1].id(), &DeckId::generate("Empty", 1));
        Ok(())
    }

    #[test]
    fn test_parse_decks_duplicate_card_ids() {
        let text = r#"
[[deck]]
id = "1"
name = "D"

[[deck.card]]
id = "x"
front = "a"
back = "b"

[[deck.card]]
id = "x"
front = "c"
back = "d"
"#;
        assert_eq!(
            parse_decks("decks.toml", text).unwrap_err().to_string(),
            "error: decks.toml: duplicate card id 'x' in deck '1'"
        );
    }

    #[test]
    fn test_parse_decks_duplicate_deck_ids() {
        let text = r#"
[[deck]]
id = "1"
name = "A"

[[deck]]
id = "1"
name = "B"
"#;
        assert!(parse_decks("decks.toml", text).is_err());
    }

    #[test]
    fn test_identical_cards_get_distinct_ids() -> Fallible<()> {
        let text = r#"
[[deck]]
name = "D"

[[deck.card]]
front = "a"
back = "b"

[[deck.card]]
front = "a"
back = "b"
"#;
        let decks = parse_decks("decks.toml", text)?;
        assert_eq!(decks[0].len(), 2);
        Ok(())
    }
}
