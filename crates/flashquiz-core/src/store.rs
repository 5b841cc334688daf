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

//! In-memory deck storage. Nothing here touches the disk.

use crate::error::Fallible;
use crate::error::fail;
use crate::study::DeckStore;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::id::CardId;
use crate::types::id::DeckId;

#[derive(Clone, Debug, Default)]
pub struct MemoryDeckStore {
    decks: Vec<Deck>,
    selected: Option<DeckId>,
    /// Bumped for every generated id.
    seq: u64,
}

impl MemoryDeckStore {
    /// A store holding `decks`. The first deck is selected.
    pub fn new(decks: Vec<Deck>) -> Fallible<Self> {
        let mut store = Self::default();
        for deck in decks {
            if store.get(deck.id()).is_some() {
                return fail(format!("duplicate deck id '{}'", deck.id()));
            }
            store.decks.push(deck);
        }
        store.selected = store.decks.first().map(|d| d.id().clone());
        Ok(store)
    }

    pub fn list(&self) -> &[Deck] {
        &self.decks
    }

    pub fn get(&self, id: &DeckId) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id() == id)
    }

    fn get_mut(&mut self, id: &DeckId) -> Fallible<&mut Deck> {
        match self.decks.iter_mut().find(|d| d.id() == id) {
            Some(deck) => Ok(deck),
            None => fail(format!("no deck with id '{id}'")),
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Create an empty deck with a fresh id and select it.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Fallible<DeckId> {
        let name = name.into();
        if name.trim().is_empty() {
            return fail("a deck needs a name");
        }
        let id = loop {
            let id = DeckId::generate(&name, self.next_seq());
            if self.get(&id).is_none() {
                break id;
            }
        };
        let deck = Deck::new(id.clone(), name, description, Vec::new())?;
        log::debug!("Created deck '{}' ({id})", deck.name);
        self.decks.push(deck);
        self.selected = Some(id.clone());
        Ok(id)
    }

    /// Replace the deck with the same id.
    pub fn update(&mut self, deck: Deck) -> Fallible<()> {
        let slot = self.get_mut(deck.id())?;
        *slot = deck;
        Ok(())
    }

    /// Remove a deck. If it was selected, the first remaining deck becomes
    /// the selection.
    pub fn delete(&mut self, id: &DeckId) -> bool {
        let before = self.decks.len();
        self.decks.retain(|d| d.id() != id);
        let removed = self.decks.len() != before;
        if removed && self.selected.as_ref() == Some(id) {
            self.selected = self.decks.first().map(|d| d.id().clone());
        }
        removed
    }

    pub fn select(&mut self, id: &DeckId) -> Fallible<()> {
        if self.get(id).is_none() {
            return fail(format!("no deck with id '{id}'"));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn selected(&self) -> Option<&Deck> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Add a new card to a deck. Both sides must have text.
    pub fn add_card(&mut self, deck: &DeckId, front: &str, back: &str) -> Fallible<CardId> {
        let (front, back) = (front.trim(), back.trim());
        if front.is_empty() || back.is_empty() {
            return fail("a card needs both a front and a back");
        }
        // Ids generated while parsing the deck file can collide with ours.
        let id = loop {
            let seq = self.next_seq();
            let id = CardId::generate(deck, front, back, seq);
            if !self.get_mut(deck)?.contains(&id) {
                break id;
            }
        };
        self.get_mut(deck)?.push(Card::new(id.clone(), front, back))?;
        Ok(id)
    }

    pub fn remove_card(&mut self, deck: &DeckId, card: &CardId) -> Fallible<Card> {
        match self.get_mut(deck)?.remove(card) {
            Some(card) => Ok(card),
            None => fail(format!("no card with id '{card}' in deck '{deck}'")),
        }
    }
}

impl DeckStore for MemoryDeckStore {
    fn update_deck(&mut self, deck: &Deck) {
        if let Err(e) = self.update(deck.clone()) {
            log::warn!("Dropping update to deck '{}': {e}", deck.name);
        }
    }
}
