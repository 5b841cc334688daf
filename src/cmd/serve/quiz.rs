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
use flashquiz_core::markdown::inline_markdown_to_html;
use flashquiz_core::markdown::markdown_to_html;
use flashquiz_core::quiz::OptionFeedback;
use flashquiz_core::quiz::QuizEngine;
use flashquiz_core::quiz::QuizEvent;
use flashquiz_core::quiz::QuizState;
use flashquiz_core::quiz::QuizSummary;
use flashquiz_core::quiz::QuizView;
use flashquiz_core::quiz::Rating;
use flashquiz_core::types::question::QuizQuestion;
use flashquiz_core::types::question::option_label;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::lock;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::template::progress_bar;

/// The value of the category selector that means "no filter".
const ALL_CATEGORIES: &str = "all";

#[derive(Deserialize)]
pub struct QuizForm {
    action: String,
    answer: Option<usize>,
    category: Option<String>,
}

pub async fn quiz_get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let slot = lock(&state.quiz);
    let engine: &QuizEngine = &slot.engine;
    let (body, refresh) = match engine.state().view() {
        QuizView::Start => (render_start(engine), None),
        QuizView::Question(question) => (
            render_question(engine.state(), question, engine.config().time_limit),
            Some(1),
        ),
        QuizView::Results(summary) => (render_results(&summary), None),
    };
    let html = page_template("Quiz", body, refresh).into_string();
    (StatusCode::OK, Html(html))
}

pub async fn quiz_post_handler(
    State(state): State<ServerState>,
    Form(form): Form<QuizForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let event = match form.action.as_str() {
        "Start" => QuizEvent::Start(form.category.filter(|c| c != ALL_CATEGORIES)),
        "Select" => match form.answer {
            Some(answer) => QuizEvent::SelectAnswer(answer),
            None => return Err((StatusCode::BAD_REQUEST, "missing answer".to_string())),
        },
        "Next" => QuizEvent::Advance,
        "Reset" => QuizEvent::Reset,
        other => return Err((StatusCode::BAD_REQUEST, format!("unknown action: {other}"))),
    };
    state.dispatch_quiz(event);
    Ok(Redirect::to("/quiz"))
}

fn render_start(engine: &QuizEngine) -> Markup {
    let state = engine.state();
    html! {
        div.start {
            h1 { "Interactive Quiz" }
            p.muted {
                "Test your knowledge with this interactive quiz. Choose a category and start answering questions!"
            }
            form.stacked action="/quiz" method="post" {
                select name="category" {
                    option value=(ALL_CATEGORIES) { "All Categories" }
                    @for category in state.categories.iter() {
                        option value=(category) { (category) }
                    }
                }
                input type="hidden" name="action" value="Start";
                button.primary type="submit" { "Start Quiz" }
            }
            p.muted { "Available Categories: " (state.categories.join(", ")) }
            p.muted { "Total Questions: " (state.questions.len()) }
        }
    }
}

fn render_question(state: &QuizState, question: &QuizQuestion, time_limit: u32) -> Markup {
    let percent = if time_limit == 0 {
        0.0
    } else {
        (state.time_left as f64 / time_limit as f64) * 100.0
    };
    let answered = state.selected_answer.is_some();
    let next_label = if state.is_last_question() {
        "Finish Quiz"
    } else {
        "Next Question"
    };
    html! {
        div.question {
            div.status {
                span.time-left { "Time Left: " (state.time_left) "s" }
                span { "Question " (state.current_question_index + 1) " of " (state.questions.len()) }
            }
            (progress_bar(percent))
            div.prompt { (PreEscaped(markdown_to_html(&question.question))) }
            form.options action="/quiz" method="post" {
                input type="hidden" name="action" value="Select";
                @for (index, option) in question.options.iter().enumerate() {
                    @let class = match state.option_feedback(index) {
                        OptionFeedback::Neutral => "neutral",
                        OptionFeedback::Correct => "correct",
                        OptionFeedback::Wrong => "wrong",
                    };
                    button class=(class) type="submit" name="answer" value=(index) disabled[answered] {
                        (option_label(index)) ". " (PreEscaped(inline_markdown_to_html(option)))
                    }
                }
            }
            @if answered {
                form.next action="/quiz" method="post" {
                    input type="hidden" name="action" value="Next";
                    button.primary type="submit" { (next_label) }
                }
            }
            p.muted { "Category: " (question.category) }
        }
    }
}

fn rating_emoji(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "🏆",
        Rating::Great => "🎉",
        Rating::Good => "👍",
        Rating::KeepPracticing => "📚",
    }
}

fn render_results(summary: &QuizSummary) -> Markup {
    html! {
        div.results {
            div.emoji { (rating_emoji(summary.rating)) }
            h2 { (summary.rating.message()) }
            p { "Your Score: " (summary.score) "/" (summary.total) }
            p.muted { (format!("{:.0}", summary.percentage)) "% Correct" }
            @if let Some(category) = &summary.category {
                p.muted { "Category: " (category) }
            }
            form action="/quiz" method="post" {
                input type="hidden" name="action" value="Reset";
                button.primary type="submit" { "Try Another Quiz" }
            }
            h3 { "Performance Summary" }
            div.summary {
                div { p.correct { (summary.score) } p.muted { "Correct" } }
                div { p.wrong { (summary.wrong) } p.muted { "Wrong" } }
            }
        }
    }
}
