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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use flashquiz_core::error::Fallible;
use flashquiz_core::error::fail;
use flashquiz_core::store::MemoryDeckStore;
use flashquiz_core::types::deck::Deck;
use flashquiz_core::types::id::CardId;
use flashquiz_core::types::id::DeckId;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::lock;
use crate::cmd::serve::template::page_template;

#[derive(Deserialize)]
pub struct DeckForm {
    action: String,
    deck: Option<String>,
    card: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    front: String,
    #[serde(default)]
    back: String,
}

pub async fn decks_get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut slot = lock(&state.study);
    let flash = slot.flash.take();
    let body = render_decks(&slot.store, flash.as_deref());
    let html = page_template("Decks", body, None).into_string();
    (StatusCode::OK, Html(html))
}

pub async fn decks_post_handler(
    State(state): State<ServerState>,
    Form(form): Form<DeckForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let mut slot = lock(&state.study);
    let result = match form.action.as_str() {
        "CreateDeck" => slot
            .store
            .create(form.name.trim(), form.description.trim())
            .map(|_| ()),
        "SelectDeck" => deck_id(&form).and_then(|id| slot.store.select(&id)),
        "DeleteDeck" => deck_id(&form).and_then(|id| {
            if slot.store.delete(&id) {
                Ok(())
            } else {
                fail(format!("no deck with id '{id}'"))
            }
        }),
        "AddCard" => deck_id(&form)
            .and_then(|id| slot.store.add_card(&id, &form.front, &form.back))
            .map(|_| ()),
        "RemoveCard" => deck_id(&form).and_then(|deck| {
            let card = match &form.card {
                Some(card) => CardId::new(card.clone()),
                None => return fail("missing card"),
            };
            slot.store.remove_card(&deck, &card).map(|_| ())
        }),
        other => return Err((StatusCode::BAD_REQUEST, format!("unknown action: {other}"))),
    };
    if let Err(e) = result {
        log::debug!("Deck action '{}' failed: {e}", form.action);
        slot.flash = Some(e.to_string());
    }
    Ok(Redirect::to("/decks"))
}

fn deck_id(form: &DeckForm) -> Fallible<DeckId> {
    match &form.deck {
        Some(id) => Ok(DeckId::new(id.clone())),
        None => fail("missing deck"),
    }
}

fn render_decks(store: &MemoryDeckStore, flash: Option<&str>) -> Markup {
    let selected = store.selected();
    html! {
        h1 { "Flashcard Decks" }
        @if let Some(message) = flash {
            p.flash { (message) }
        }
        @if store.list().is_empty() {
            p.muted { "No decks yet. Create one below." }
        }
        div.decks {
            @for deck in store.list() {
                @let is_selected = selected.map(|s| s.id() == deck.id()).unwrap_or(false);
                div.deck.selected[is_selected] {
                    h3 { (deck.name) }
                    @if !deck.description.is_empty() {
                        p.muted { (deck.description) }
                    }
                    p.muted { (deck.len()) " cards" }
                    div.controls {
                        @if !is_selected {
                            form action="/decks" method="post" {
                                input type="hidden" name="action" value="SelectDeck";
                                input type="hidden" name="deck" value=(deck.id());
                                button type="submit" { "Select" }
                            }
                        }
                        form action="/decks" method="post" {
                            input type="hidden" name="action" value="DeleteDeck";
                            input type="hidden" name="deck" value=(deck.id());
                            button type="submit" { "Delete" }
                        }
                    }
                }
            }
        }
        h2 { "New Deck" }
        form.stacked action="/decks" method="post" {
            input type="hidden" name="action" value="CreateDeck";
            input type="text" name="name" placeholder="Name";
            input type="text" name="description" placeholder="Description";
            button.primary type="submit" { "Create Deck" }
        }
        @if let Some(deck) = selected {
            (render_cards(deck))
        }
    }
}

fn render_cards(deck: &Deck) -> Markup {
    html! {
        h2 { (deck.name) }
        @if deck.is_empty() {
            p.muted { "This deck has no cards yet." }
        } @else {
            table.cards {
                thead {
                    tr {
                        th { "Front" }
                        th { "Back" }
                        th { "Level" }
                        th { "Next Review" }
                        th {}
                    }
                }
                tbody {
                    @for card in deck.cards() {
                        tr {
                            td { (PreEscaped(card.html_front())) }
                            td { (PreEscaped(card.html_back())) }
                            td { (card.level) }
                            td {
                                @match &card.next_review {
                                    Some(next) => { (next) }
                                    None => { "New" }
                                }
                            }
                            td {
                                form action="/decks" method="post" {
                                    input type="hidden" name="action" value="RemoveCard";
                                    input type="hidden" name="deck" value=(deck.id());
                                    input type="hidden" name="card" value=(card.id);
                                    button type="submit" { "Remove" }
                                }
                            }
                        }
                    }
                }
            }
        }
        h3 { "Add Card" }
        form.stacked action="/decks" method="post" {
            input type="hidden" name="action" value="AddCard";
            input type="hidden" name="deck" value=(deck.id());
            textarea name="front" placeholder="Front" {}
            textarea name="back" placeholder="Back" {}
            button.primary type="submit" { "Add Card" }
        }
    }
}
