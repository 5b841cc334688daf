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

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::id::CardId;
use crate::types::id::DeckId;

/// A named, ordered collection of cards. Card ids are unique within a deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDeck")]
pub struct Deck {
    id: DeckId,
    pub name: String,
    pub description: String,
    cards: Vec<Card>,
}

#[derive(Deserialize)]
struct RawDeck {
    id: DeckId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cards: Vec<Card>,
}

impl TryFrom<RawDeck> for Deck {
    type Error = crate::error::ErrorReport;

    fn try_from(raw: RawDeck) -> Result<Self, Self::Error> {
        Deck::new(raw.id, raw.name, raw.description, raw.cards)
    }
}

impl Deck {
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        description: impl Into<String>,
        cards: Vec<Card>,
    ) -> Fallible<Self> {
        let mut seen: HashSet<&CardId> = HashSet::new();
        for card in cards.iter() {
            if !seen.insert(&card.id) {
                return fail(format!("duplicate card id '{}' in deck '{id}'", card.id));
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            cards,
        })
    }

    pub fn id(&self) -> &DeckId {
        &self.id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.card(id).is_some()
    }

    /// Append a card, rejecting a duplicate id.
    pub fn push(&mut self, card: Card) -> Fallible<()> {
        if self.contains(&card.id) {
            return fail(format!(
                "duplicate card id '{}' in deck '{}'",
                card.id, self.id
            ));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Replace the card with the same id, keeping its position. Returns
    /// `false` if the deck has no such card.
    pub fn replace(&mut self, card: Card) -> bool {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    /// Remove a card by id, returning it.
    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        let index = self.cards.iter().position(|card| &card.id == id)?;
        Some(self.cards.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Card {
        Card::new(CardId::new(id), format!("front {id}"), format!("back {id}"))
    }

    fn deck() -> Deck {
        Deck::new(
            DeckId::new("1"),
            "Spanish Basics",
            "Common Spanish words and phrases",
            vec![card("a"), card("b"), card("c")],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Deck::new(DeckId::new("1"), "D", "", vec![card("a"), card("a")]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: duplicate card id 'a' in deck '1'"
        );
    }

    #[test]
    fn test_push() {
        let mut deck = deck();
        assert!(deck.push(card("a")).is_err());
        assert!(deck.push(card("d")).is_ok());
        assert_eq!(deck.len(), 4);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut deck = deck();
        let mut updated = card("b");
        updated.back = "changed".to_string();
        assert!(deck.replace(updated));
        assert_eq!(deck.cards()[1].back, "changed");
        assert!(!deck.replace(card("z")));
    }

    #[test]
    fn test_remove() {
        let mut deck = deck();
        assert_eq!(deck.remove(&CardId::new("b")), Some(card("b")));
        assert_eq!(deck.remove(&CardId::new("b")), None);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"id": "1", "name": "D", "cards": [
            {"id": "a", "front": "f", "back": "b"},
            {"id": "a", "front": "f", "back": "b"}
        ]}"#;
        assert!(serde_json::from_str::<Deck>(json).is_err());
    }
}
