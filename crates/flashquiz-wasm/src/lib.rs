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

//! WASM bindings for flashquiz - runs the quiz and the flashcards in the browser.
//!
//! The JavaScript side owns the quiz timer: it calls `QuizApp::tick` from a
//! `setInterval` while `QuizApp::is_running` is true, and clears the
//! interval as soon as it turns false.

use wasm_bindgen::prelude::*;
use web_sys::console;

use flashquiz_core::catalog::Catalog;
use flashquiz_core::error::ErrorReport;
use flashquiz_core::parser::parse_catalog;
use flashquiz_core::parser::parse_decks;
use flashquiz_core::quiz::EmptyCategoryPolicy;
use flashquiz_core::quiz::QuizConfig;
use flashquiz_core::quiz::QuizEngine;
use flashquiz_core::quiz::ReselectPolicy;
use flashquiz_core::rng::TinyRng;
use flashquiz_core::samples::sample_catalog;
use flashquiz_core::samples::sample_decks;
use flashquiz_core::store::MemoryDeckStore;
use flashquiz_core::study::DeckStore;
use flashquiz_core::study::StudySession;
use flashquiz_core::types::deck::Deck;
use flashquiz_core::types::id::CardId;
use flashquiz_core::types::id::DeckId;
use flashquiz_core::types::timestamp::Timestamp;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"flashquiz WASM initialized".into());
}

fn js_error(e: ErrorReport) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("JSON error: {e}")))
}

/// A quiz, driven from JavaScript.
#[wasm_bindgen]
pub struct QuizApp {
    engine: QuizEngine,
}

#[wasm_bindgen]
impl QuizApp {
    /// Create a quiz from a TOML catalog, or the built-in sample catalog
    /// when `catalog_toml` is omitted.
    ///
    /// `reselect` is "locked" or "overwrite"; `empty_category` is "reject"
    /// or "all".
    #[wasm_bindgen(constructor)]
    pub fn new(
        catalog_toml: Option<String>,
        time_limit: Option<u32>,
        reselect: Option<String>,
        empty_category: Option<String>,
    ) -> Result<QuizApp, JsValue> {
        let catalog: Catalog = match catalog_toml {
            Some(text) => parse_catalog("catalog", &text),
            None => sample_catalog(),
        }
        .map_err(js_error)?;
        let defaults = QuizConfig::default();
        let config = QuizConfig {
            time_limit: time_limit.unwrap_or(defaults.time_limit),
            reselect: match reselect {
                Some(s) => ReselectPolicy::try_from(s).map_err(js_error)?,
                None => defaults.reselect,
            },
            empty_category: match empty_category {
                Some(s) => EmptyCategoryPolicy::try_from(s).map_err(js_error)?,
                None => defaults.empty_category,
            },
        };
        Ok(Self {
            engine: QuizEngine::new(catalog, config),
        })
    }

    /// Start a quiz. An omitted or empty category means all questions.
    /// Returns whether the quiz started.
    #[wasm_bindgen]
    pub fn start(&mut self, category: Option<String>) -> bool {
        self.engine.start(category.as_deref()).is_applied()
    }

    #[wasm_bindgen]
    pub fn select_answer(&mut self, index: usize) -> bool {
        self.engine.select_answer(index).is_applied()
    }

    #[wasm_bindgen]
    pub fn advance(&mut self) -> bool {
        self.engine.advance().is_applied()
    }

    /// Call once per second while `is_running` is true.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> bool {
        self.engine.tick().is_applied()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> bool {
        self.engine.reset().is_applied()
    }

    /// Whether the timer should be running.
    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.engine.state().is_in_progress()
    }

    /// The full quiz state as JSON.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.state())
    }

    /// The result as JSON, or `null` while the quiz is not completed.
    #[wasm_bindgen]
    pub fn summary_json(&self) -> Result<String, JsValue> {
        to_json(&self.engine.state().summary())
    }

    /// Per-option feedback for the current question: "neutral", "correct"
    /// or "wrong".
    #[wasm_bindgen]
    pub fn option_feedback(&self, index: usize) -> String {
        use flashquiz_core::quiz::OptionFeedback;
        match self.engine.state().option_feedback(index) {
            OptionFeedback::Neutral => "neutral",
            OptionFeedback::Correct => "correct",
            OptionFeedback::Wrong => "wrong",
        }
        .to_string()
    }
}

/// Decks and a study session, driven from JavaScript.
#[wasm_bindgen]
pub struct StudyApp {
    store: MemoryDeckStore,
    session: Option<StudySession>,
    on_deck_updated: Option<js_sys::Function>,
    rng: TinyRng,
}

#[wasm_bindgen]
impl StudyApp {
    /// Load decks from TOML, or the built-in sample decks when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(decks_toml: Option<String>) -> Result<StudyApp, JsValue> {
        let decks: Vec<Deck> = match decks_toml {
            Some(text) => parse_decks("decks", &text),
            None => sample_decks(),
        }
        .map_err(js_error)?;
        Ok(Self {
            store: MemoryDeckStore::new(decks).map_err(js_error)?,
            session: None,
            on_deck_updated: None,
            rng: TinyRng::from_seed(js_sys::Date::now() as u64),
        })
    }

    /// Register a function that receives the JSON of a deck whenever a
    /// review changes one of its cards.
    #[wasm_bindgen]
    pub fn set_on_deck_updated(&mut self, callback: js_sys::Function) {
        self.on_deck_updated = Some(callback);
    }

    /// All decks as JSON.
    #[wasm_bindgen]
    pub fn decks_json(&self) -> Result<String, JsValue> {
        to_json(&self.store.list())
    }

    #[wasm_bindgen]
    pub fn selected_deck_id(&self) -> Option<String> {
        self.store.selected().map(|d| d.id().to_string())
    }

    #[wasm_bindgen]
    pub fn select_deck(&mut self, deck_id: &str) -> Result<(), JsValue> {
        self.store.select(&DeckId::new(deck_id)).map_err(js_error)
    }

    /// Create a deck and return its id.
    #[wasm_bindgen]
    pub fn create_deck(&mut self, name: &str, description: &str) -> Result<String, JsValue> {
        let id = self.store.create(name, description).map_err(js_error)?;
        Ok(id.to_string())
    }

    /// Replace a deck with the given JSON.
    #[wasm_bindgen]
    pub fn update_deck(&mut self, deck_json: &str) -> Result<(), JsValue> {
        let deck: Deck = serde_json::from_str(deck_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse deck: {e}")))?;
        self.store.update(deck).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn delete_deck(&mut self, deck_id: &str) -> bool {
        let id = DeckId::new(deck_id);
        if self.session.as_ref().map(|s| s.deck().id()) == Some(&id) {
            self.session = None;
        }
        self.store.delete(&id)
    }

    /// Add a card to a deck and return its id.
    #[wasm_bindgen]
    pub fn add_card(&mut self, deck_id: &str, front: &str, back: &str) -> Result<String, JsValue> {
        let id = self
            .store
            .add_card(&DeckId::new(deck_id), front, back)
            .map_err(js_error)?;
        Ok(id.to_string())
    }

    #[wasm_bindgen]
    pub fn remove_card(&mut self, deck_id: &str, card_id: &str) -> Result<(), JsValue> {
        self.store
            .remove_card(&DeckId::new(deck_id), &CardId::new(card_id))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Begin studying a deck.
    #[wasm_bindgen]
    pub fn begin_session(&mut self, deck_id: &str) -> Result<(), JsValue> {
        let deck = self
            .store
            .get(&DeckId::new(deck_id))
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("No deck with id '{deck_id}'")))?;
        self.session = Some(StudySession::begin(deck, &mut self.rng));
        Ok(())
    }

    /// Study the current deck again with a fresh shuffle.
    #[wasm_bindgen]
    pub fn restart_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart(&mut self.rng);
        }
    }

    #[wasm_bindgen]
    pub fn flip(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.flip().is_applied())
    }

    #[wasm_bindgen]
    pub fn advance(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.advance().is_applied())
    }

    #[wasm_bindgen]
    pub fn retreat(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.retreat().is_applied())
    }

    /// Record the outcome for the current card. `now` is an ISO-8601
    /// timestamp, such as the result of `now_timestamp()`.
    #[wasm_bindgen]
    pub fn record_outcome(&mut self, correct: bool, now: &str) -> Result<bool, JsValue> {
        let now = Timestamp::try_from(now.to_string()).map_err(js_error)?;
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        let store = &mut self.store;
        let callback = &self.on_deck_updated;
        let mut sink = |deck: &Deck| {
            store.update_deck(deck);
            if let Some(callback) = callback {
                match serde_json::to_string(deck) {
                    Ok(json) => {
                        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                            console::error_2(&"deck update callback failed:".into(), &e);
                        }
                    }
                    Err(e) => console::error_1(&format!("Failed to serialize deck: {e}").into()),
                }
            }
        };
        Ok(session.record_outcome(correct, now, &mut sink).is_applied())
    }

    /// The current study view as JSON, or `null` without a session.
    #[wasm_bindgen]
    pub fn view_json(&self) -> Result<String, JsValue> {
        to_json(&self.session.as_ref().map(|s| s.view()))
    }
}

/// Get the current timestamp as an ISO string.
#[wasm_bindgen]
pub fn now_timestamp() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
