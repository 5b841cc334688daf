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
use flashquiz_core::study::StudySession;
use flashquiz_core::study::StudyView;
use flashquiz_core::types::card::Card;
use flashquiz_core::types::timestamp::Timestamp;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::StudySlot;
use crate::cmd::serve::state::lock;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::template::progress_bar;

#[derive(Deserialize)]
pub struct StudyForm {
    action: String,
}

enum Action {
    Flip,
    Next,
    Previous,
    Again,
    GotIt,
    Restart,
}

impl TryFrom<&str> for Action {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Flip" => Ok(Action::Flip),
            "Next" => Ok(Action::Next),
            "Previous" => Ok(Action::Previous),
            "Again" => Ok(Action::Again),
            "GotIt" => Ok(Action::GotIt),
            "Restart" => Ok(Action::Restart),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Make the session follow the selected deck. A session is begun afresh
/// whenever the selected deck was switched or edited since it started.
fn sync_session(slot: &mut StudySlot) {
    let StudySlot {
        store,
        session,
        rng,
        ..
    } = slot;
    let Some(deck) = store.selected() else {
        *session = None;
        return;
    };
    if let Some(current) = session.as_mut() {
        if current.deck() != deck {
            log::debug!("Deck '{}' changed, beginning a new session", deck.name);
            current.rebegin(deck.clone(), rng);
        }
        return;
    }
    *session = Some(StudySession::begin(deck.clone(), rng));
}

pub async fn study_get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut slot = lock(&state.study);
    sync_session(&mut slot);
    let body = match &slot.session {
        Some(session) => render_session(session),
        None => html! {
            h1 { "Study" }
            p.muted { "Please select a deck with cards to study." }
            a href="/decks" { "Go to decks" }
        },
    };
    let html = page_template("Study", body, None).into_string();
    (StatusCode::OK, Html(html))
}

pub async fn study_post_handler(
    State(state): State<ServerState>,
    Form(form): Form<StudyForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let action = Action::try_from(form.action.as_str()).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let mut guard = lock(&state.study);
    sync_session(&mut guard);
    let StudySlot {
        store,
        session,
        rng,
        ..
    } = &mut *guard;
    if let Some(session) = session {
        match action {
            Action::Flip => {
                session.flip();
            }
            Action::Next => {
                session.advance();
            }
            Action::Previous => {
                session.retreat();
            }
            Action::Again => {
                session.record_outcome(false, Timestamp::now(), store);
            }
            Action::GotIt => {
                session.record_outcome(true, Timestamp::now(), store);
            }
            Action::Restart => session.restart(rng),
        }
    }
    Ok(Redirect::to("/study"))
}

fn render_session(session: &StudySession) -> Markup {
    let deck = session.deck();
    let view = match session.view() {
        StudyView::NoCards => html! {
            p.muted { "This deck has no cards to study." }
            a href="/decks" { "Add some cards" }
        },
        StudyView::Completed { total, reviewed } => html! {
            div.results {
                div.emoji { "🎓" }
                h2 { "Session Complete!" }
                p { "You reviewed " (reviewed) " of " (total) " cards." }
                form action="/study" method="post" {
                    input type="hidden" name="action" value="Restart";
                    button.primary type="submit" { "Study Again" }
                }
            }
        },
        StudyView::Card {
            card,
            position,
            total,
            flipped,
            progress,
            can_retreat,
        } => render_card(card, position, total, flipped, progress, can_retreat),
    };
    html! {
        h1 { (deck.name) }
        @if !deck.description.is_empty() {
            p.muted { (deck.description) }
        }
        (view)
    }
}

fn render_card(
    card: &Card,
    position: usize,
    total: usize,
    flipped: bool,
    progress: f64,
    can_retreat: bool,
) -> Markup {
    let content = if flipped {
        card.html_back()
    } else {
        card.html_front()
    };
    let flip_label = if flipped {
        "Show Question"
    } else {
        "Reveal Answer"
    };
    html! {
        div.status {
            span { "Card " (position) " of " (total) }
            span { "Level " (card.level) }
        }
        (progress_bar(progress * 100.0))
        div.card.flipped[flipped] {
            div.content { (PreEscaped(content)) }
        }
        div.controls {
            form action="/study" method="post" {
                input type="hidden" name="action" value="Previous";
                button type="submit" disabled[!can_retreat] { "Previous" }
            }
            form action="/study" method="post" {
                input type="hidden" name="action" value="Flip";
                button.primary type="submit" { (flip_label) }
            }
            form action="/study" method="post" {
                input type="hidden" name="action" value="Next";
                button type="submit" { "Next" }
            }
        }
        @if flipped {
            div.controls.grades {
                form action="/study" method="post" {
                    input type="hidden" name="action" value="Again";
                    button.again type="submit" { "Again" }
                }
                form action="/study" method="post" {
                    input type="hidden" name="action" value="GotIt";
                    button.got-it type="submit" { "Got it" }
                }
            }
        }
    }
}
