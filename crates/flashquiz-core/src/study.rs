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

//! A flashcard study session.
//!
//! The session keeps two containers: `study_cards`, a shuffled copy of the
//! deck that is traversed in order, and `deck`, the deck itself in its
//! original order. A review updates the card in both, matching the deck
//! copy by id, and then hands the whole deck to a [`DeckStore`].

use serde::Serialize;

use crate::error::Ignored;
use crate::error::Outcome;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::scheduler::review;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

/// Whoever owns the decks. Called every time a review changes a card.
pub trait DeckStore {
    fn update_deck(&mut self, deck: &Deck);
}

impl<F: FnMut(&Deck)> DeckStore for F {
    fn update_deck(&mut self, deck: &Deck) {
        self(deck)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudySession {
    deck: Deck,
    study_cards: Vec<Card>,
    current_index: usize,
    is_flipped: bool,
    completed: bool,
    reviewed: usize,
}

/// What to show for a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyView<'a> {
    /// The deck has no cards to study.
    NoCards,
    Completed {
        total: usize,
        reviewed: usize,
    },
    Card {
        card: &'a Card,
        /// 1-based position in the session.
        position: usize,
        total: usize,
        flipped: bool,
        /// Fraction of the session already behind the cursor, in [0, 1).
        progress: f64,
        can_retreat: bool,
    },
}

impl StudySession {
    /// Start a session over a shuffled copy of the deck's cards. An empty
    /// deck yields a session that is already completed.
    pub fn begin(deck: Deck, rng: &mut TinyRng) -> Self {
        let study_cards = shuffle(deck.cards().to_vec(), rng);
        let completed = study_cards.is_empty();
        log::debug!(
            "Beginning study session on deck '{}' with {} cards",
            deck.name,
            study_cards.len()
        );
        Self {
            deck,
            study_cards,
            current_index: 0,
            is_flipped: false,
            completed,
            reviewed: 0,
        }
    }

    /// Start over with a fresh shuffle of the deck's current cards,
    /// including any reviews recorded in this session.
    pub fn restart(&mut self, rng: &mut TinyRng) {
        *self = Self::begin(self.deck.clone(), rng);
    }

    /// Start over on a deck that was changed outside the session.
    pub fn rebegin(&mut self, deck: Deck, rng: &mut TinyRng) {
        *self = Self::begin(deck, rng);
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn study_cards(&self) -> &[Card] {
        &self.study_cards
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of outcomes recorded since the session began.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn current_card(&self) -> Option<&Card> {
        if self.completed {
            return None;
        }
        self.study_cards.get(self.current_index)
    }

    /// Checks shared by every operation on the current card.
    fn guard(&self) -> Result<(), Ignored> {
        if self.study_cards.is_empty() {
            return Err(Ignored::EmptyInput);
        }
        if self.current_index >= self.study_cards.len() {
            return Err(Ignored::OutOfRange);
        }
        if self.completed {
            return Err(Ignored::InvalidTransition);
        }
        Ok(())
    }

    pub fn flip(&mut self) -> Outcome {
        if let Err(reason) = self.guard() {
            return Outcome::ignored(reason, "flip");
        }
        self.is_flipped = !self.is_flipped;
        Outcome::Applied
    }

    /// Move to the next card, or complete the session after the last one.
    pub fn advance(&mut self) -> Outcome {
        if let Err(reason) = self.guard() {
            return Outcome::ignored(reason, "advance");
        }
        if self.current_index + 1 < self.study_cards.len() {
            self.current_index += 1;
            self.is_flipped = false;
        } else {
            log::debug!("Study session on '{}' completed", self.deck.name);
            self.completed = true;
        }
        Outcome::Applied
    }

    pub fn retreat(&mut self) -> Outcome {
        if let Err(reason) = self.guard() {
            return Outcome::ignored(reason, "retreat");
        }
        if self.current_index == 0 {
            return Outcome::ignored(Ignored::InvalidTransition, "retreat");
        }
        self.current_index -= 1;
        self.is_flipped = false;
        Outcome::Applied
    }

    /// Record whether the current card was answered correctly, write the
    /// rescheduled card back into the session and the deck, pass the deck
    /// to `store`, and move on.
    pub fn record_outcome(
        &mut self,
        correct: bool,
        now: Timestamp,
        store: &mut impl DeckStore,
    ) -> Outcome {
        if let Err(reason) = self.guard() {
            return Outcome::ignored(reason, "record outcome");
        }
        let updated = review(&self.study_cards[self.current_index], correct, now);
        if !self.deck.replace(updated.clone()) {
            log::warn!(
                "Card '{}' is no longer in deck '{}'",
                updated.id,
                self.deck.name
            );
        }
        self.study_cards[self.current_index] = updated;
        self.reviewed += 1;
        store.update_deck(&self.deck);
        self.advance()
    }

    pub fn view(&self) -> StudyView<'_> {
        let total = self.study_cards.len();
        if total == 0 {
            return StudyView::NoCards;
        }
        if self.completed {
            return StudyView::Completed {
                total,
                reviewed: self.reviewed,
            };
        }
        match self.study_cards.get(self.current_index) {
            Some(card) => StudyView::Card {
                card,
                position: self.current_index + 1,
                total,
                flipped: self.is_flipped,
                progress: self.current_index as f64 / total as f64,
                can_retreat: self.current_index > 0,
            },
            None => StudyView::NoCards,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::types::id::CardId;
    use crate::types::id::DeckId;
    use crate::types::level::Level;

    fn make_timestamp(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn deck_of(n: usize) -> Deck {
        let cards = (0..n)
            .map(|i| {
                Card::new(
                    CardId::new(format!("c{i}")),
                    format!("front {i}"),
                    format!("back {i}"),
                )
            })
            .collect();
        Deck::new(DeckId::new("d"), "Deck", "", cards).unwrap()
    }

    fn ids(cards: &[Card]) -> Vec<CardId> {
        cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_begin_is_a_permutation() {
        for seed in 0..20 {
            let deck = deck_of(7);
            let session = StudySession::begin(deck.clone(), &mut TinyRng::from_seed(seed));
            let mut shuffled = ids(session.study_cards());
            let mut original = ids(deck.cards());
            shuffled.sort();
            original.sort();
            assert_eq!(shuffled, original);
            assert_eq!(session.current_index(), 0);
            assert!(!session.is_flipped());
            assert!(!session.is_completed());
        }
    }

    #[test]
    fn test_begin_shuffles() {
        let deck = deck_of(10);
        let orders: HashSet<Vec<CardId>> = (0..10)
            .map(|seed| {
                ids(StudySession::begin(deck.clone(), &mut TinyRng::from_seed(seed)).study_cards())
            })
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_empty_deck_is_completed_immediately() {
        let mut session = StudySession::begin(deck_of(0), &mut TinyRng::from_seed(1));
        assert!(session.is_completed());
        assert!(session.study_cards().is_empty());
        assert_eq!(session.view(), StudyView::NoCards);

        let empty = Outcome::Ignored(Ignored::EmptyInput);
        let mut calls = 0;
        let mut store = |_: &Deck| calls += 1;
        let now = make_timestamp("2024-01-01T00:00:00.000Z");
        assert_eq!(session.flip(), empty);
        assert_eq!(session.advance(), empty);
        assert_eq!(session.retreat(), empty);
        assert_eq!(session.record_outcome(true, now, &mut store), empty);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_flip_twice_is_identity() {
        let mut session = StudySession::begin(deck_of(3), &mut TinyRng::from_seed(1));
        let before = session.clone();
        session.flip();
        assert!(session.is_flipped());
        session.flip();
        assert_eq!(session, before);
    }

    #[test]
    fn test_advance_and_retreat() {
        let mut session = StudySession::begin(deck_of(3), &mut TinyRng::from_seed(1));
        assert_eq!(
            session.retreat(),
            Outcome::Ignored(Ignored::InvalidTransition)
        );
        session.flip();
        session.advance();
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_flipped());
        session.flip();
        session.retreat();
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_flipped());
        session.advance();
        session.advance();
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.advance(), Outcome::Applied);
        assert!(session.is_completed());
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.current_card(), None);
        assert_eq!(
            session.advance(),
            Outcome::Ignored(Ignored::InvalidTransition)
        );
    }

    #[test]
    fn test_record_outcome_updates_both_containers() {
        let deck = deck_of(4);
        let mut session = StudySession::begin(deck, &mut TinyRng::from_seed(3));
        let now = make_timestamp("2024-01-01T12:00:00.000Z");
        let mut stored: Vec<Deck> = Vec::new();
        let mut store = |deck: &Deck| stored.push(deck.clone());

        let reviewed_id = session.current_card().unwrap().id.clone();
        assert_eq!(session.record_outcome(true, now, &mut store), Outcome::Applied);

        let in_session = &session.study_cards()[0];
        assert_eq!(in_session.id, reviewed_id);
        assert_eq!(in_session.level, Level::new(1));
        assert_eq!(in_session.last_reviewed, Some(now));
        assert_eq!(in_session.next_review, Some(now.plus_hours(24)));
        assert_eq!(session.deck().card(&reviewed_id), Some(in_session));
        assert_eq!(session.current_index(), 1);
        assert!(!session.is_flipped());

        assert_eq!(stored.len(), 1);
        let written = &stored[0];
        assert_eq!(written.card(&reviewed_id), Some(in_session));
        // The deck keeps its own order.
        assert_eq!(ids(written.cards()), ids(deck_of(4).cards()));
        let untouched = written
            .cards()
            .iter()
            .filter(|c| c.id != reviewed_id)
            .all(|c| c.is_new());
        assert!(untouched);
    }

    #[test]
    fn test_reviewing_every_card_completes() {
        let mut session = StudySession::begin(deck_of(3), &mut TinyRng::from_seed(9));
        let now = make_timestamp("2024-01-01T12:00:00.000Z");
        let mut writes = 0;
        let mut store = |_: &Deck| writes += 1;
        session.record_outcome(true, now, &mut store);
        session.record_outcome(false, now, &mut store);
        session.record_outcome(true, now, &mut store);
        assert_eq!(writes, 3);
        assert!(session.is_completed());
        assert_eq!(
            session.view(),
            StudyView::Completed {
                total: 3,
                reviewed: 3
            }
        );
        assert!(session.deck().cards().iter().all(|c| !c.is_new()));
    }

    #[test]
    fn test_restart_uses_updated_cards() {
        let mut rng = TinyRng::from_seed(5);
        let mut session = StudySession::begin(deck_of(2), &mut rng);
        let now = make_timestamp("2024-01-01T12:00:00.000Z");
        let mut store = |_: &Deck| {};
        session.record_outcome(true, now, &mut store);
        session.record_outcome(true, now, &mut store);
        assert!(session.is_completed());

        session.restart(&mut rng);
        assert!(!session.is_completed());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.reviewed(), 0);
        assert!(
            session
                .study_cards()
                .iter()
                .all(|c| c.level == Level::new(1))
        );
    }

    #[test]
    fn test_rebegin_with_edited_deck() {
        let mut rng = TinyRng::from_seed(5);
        let mut session = StudySession::begin(deck_of(2), &mut rng);
        session.rebegin(deck_of(5), &mut rng);
        assert_eq!(session.study_cards().len(), 5);
        session.rebegin(deck_of(0), &mut rng);
        assert!(session.is_completed());
    }

    #[test]
    fn test_view() {
        let mut session = StudySession::begin(deck_of(4), &mut TinyRng::from_seed(2));
        session.advance();
        session.flip();
        let StudyView::Card {
            card,
            position,
            total,
            flipped,
            progress,
            can_retreat,
        } = session.view()
        else {
            panic!("expected a card");
        };
        assert_eq!(card, &session.study_cards()[1]);
        assert_eq!(position, 2);
        assert_eq!(total, 4);
        assert!(flipped);
        assert!((progress - 0.25).abs() < f64::EPSILON);
        assert!(can_retreat);
    }
}
