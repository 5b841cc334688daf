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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Form;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::Redirect;
use axum::routing::get;
use axum::routing::post;
use flashquiz_core::error::Fallible;
use flashquiz_core::quiz::QuizConfig;
use flashquiz_core::quiz::QuizEngine;
use flashquiz_core::rng::TinyRng;
use flashquiz_core::store::MemoryDeckStore;
use maud::html;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::serve::decks::decks_get_handler;
use crate::cmd::serve::decks::decks_post_handler;
use crate::cmd::serve::quiz::quiz_get_handler;
use crate::cmd::serve::quiz::quiz_post_handler;
use crate::cmd::serve::state::QuizSlot;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::StudySlot;
use crate::cmd::serve::state::lock;
use crate::cmd::serve::study::study_get_handler;
use crate::cmd::serve::study::study_post_handler;
use crate::cmd::serve::template::page_template;
use crate::collection::Collection;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path to a quiz catalog file. The built-in catalog is used if absent.
    pub catalog: Option<String>,
    /// Path to a deck file. The built-in decks are used if absent.
    pub decks: Option<String>,
    pub quiz: QuizConfig,
    /// How long one second of the quiz clock lasts.
    pub tick_period: Duration,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let Collection { catalog, decks } = Collection::new(config.catalog, config.decks)?;
    log::debug!(
        "Loaded {} questions in {} categories and {} decks",
        catalog.len(),
        catalog.categories().len(),
        decks.len()
    );

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        quiz: Arc::new(Mutex::new(QuizSlot {
            engine: QuizEngine::new(catalog, config.quiz),
            ticker: None,
            run: 0,
        })),
        study: Arc::new(Mutex::new(StudySlot {
            store: MemoryDeckStore::new(decks)?,
            session: None,
            rng: TinyRng::from_clock(),
            flash: None,
        })),
        tick_period: config.tick_period,
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(home_handler));
    let app = app.route("/", post(home_post_handler));
    let app = app.route("/quiz", get(quiz_get_handler));
    let app = app.route("/quiz", post(quiz_post_handler));
    let app = app.route("/decks", get(decks_get_handler));
    let app = app.route("/decks", post(decks_post_handler));
    let app = app.route("/study", get(study_get_handler));
    let app = app.route("/study", post(study_post_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or the quit button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    // Stop the quiz clock before the runtime goes away.
    lock(&state.quiz).ticker = None;
    Ok(())
}

async fn home_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let (questions, categories) = {
        let slot = lock(&state.quiz);
        let catalog = slot.engine.catalog();
        (catalog.len(), catalog.categories().len())
    };
    let decks = lock(&state.study).store.list().len();
    let body = html! {
        h1 { "flashquiz" }
        div.decks {
            div.deck {
                h3 { a href="/quiz" { "Quiz" } }
                p.muted { (questions) " questions in " (categories) " categories" }
            }
            div.deck {
                h3 { a href="/decks" { "Decks" } }
                p.muted { (decks) " flashcard decks" }
            }
            div.deck {
                h3 { a href="/study" { "Study" } }
                p.muted { "Review the selected deck" }
            }
        }
        form action="/" method="post" {
            input type="hidden" name="action" value="Shutdown";
            button type="submit" { "Quit" }
        }
    };
    let html = page_template("Home", body, None).into_string();
    (StatusCode::OK, Html(html))
}

#[derive(Deserialize)]
struct HomeForm {
    action: String,
}

async fn home_post_handler(
    State(state): State<ServerState>,
    Form(form): Form<HomeForm>,
) -> Result<Redirect, (StatusCode, String)> {
    match form.action.as_str() {
        "Shutdown" => {
            if let Some(tx) = lock(&state.shutdown_tx).take() {
                let _ = tx.send(());
            }
            Ok(Redirect::to("/"))
        }
        other => Err((StatusCode::BAD_REQUEST, format!("unknown action: {other}"))),
    }
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
