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

//! The timed multiple-choice quiz.
//!
//! A quiz moves through three phases: not started, in progress and
//! completed. Every event replaces the whole [`QuizState`]; the engine holds
//! no timer of its own, so whoever drives it must call [`QuizEngine::tick`]
//! once per second while the quiz is in progress and stop doing so when it
//! ends.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::ErrorReport;
use crate::error::Ignored;
use crate::error::Outcome;
use crate::error::fail;
use crate::types::question::QuizQuestion;

/// Seconds allowed per question.
pub const DEFAULT_TIME_LIMIT: u32 = 15;

/// What to do when an answer is selected for a question that already has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReselectPolicy {
    /// The first answer stands; later selections are ignored.
    #[default]
    Locked,
    /// The selection is replaced. A question still scores at most once.
    Overwrite,
}

/// What to do when the chosen category has no questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCategoryPolicy {
    /// Refuse to start; the quiz stays on the start screen.
    #[default]
    Reject,
    /// Start with every question in the catalog.
    All,
}

impl Display for ReselectPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReselectPolicy::Locked => write!(f, "locked"),
            ReselectPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl TryFrom<String> for ReselectPolicy {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "locked" => Ok(ReselectPolicy::Locked),
            "overwrite" => Ok(ReselectPolicy::Overwrite),
            _ => fail(format!("invalid reselect policy: {value}")),
        }
    }
}

impl Display for EmptyCategoryPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyCategoryPolicy::Reject => write!(f, "reject"),
            EmptyCategoryPolicy::All => write!(f, "all"),
        }
    }
}

impl TryFrom<String> for EmptyCategoryPolicy {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "reject" => Ok(EmptyCategoryPolicy::Reject),
            "all" => Ok(EmptyCategoryPolicy::All),
            _ => fail(format!("invalid empty category policy: {value}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub time_limit: u32,
    pub reselect: ReselectPolicy,
    pub empty_category: EmptyCategoryPolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            reselect: ReselectPolicy::default(),
            empty_category: EmptyCategoryPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

/// A snapshot of a quiz. Renderers read it; only the engine writes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizState {
    /// The questions of the current run, fixed once the run starts.
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
    pub score: usize,
    /// Seconds left for the current question.
    pub time_left: u32,
    pub selected_answer: Option<usize>,
    pub phase: Phase,
    /// Every category in the catalog.
    pub categories: Vec<String>,
    /// The filter the current run was started with. `None` means all.
    pub selected_category: Option<String>,
}

impl QuizState {
    fn initial(catalog: &Catalog, config: &QuizConfig) -> Self {
        Self {
            questions: catalog.questions().to_vec(),
            current_question_index: 0,
            score: 0,
            time_left: config.time_limit,
            selected_answer: None,
            phase: Phase::NotStarted,
            categories: catalog.categories().to_vec(),
            selected_category: None,
        }
    }

    pub fn is_quiz_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn is_quiz_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_question_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions.len()
    }

    /// How an option of the current question should be shown.
    pub fn option_feedback(&self, index: usize) -> OptionFeedback {
        let (Some(selected), Some(question)) = (self.selected_answer, self.current_question())
        else {
            return OptionFeedback::Neutral;
        };
        if question.is_correct(index) {
            OptionFeedback::Correct
        } else if index == selected {
            OptionFeedback::Wrong
        } else {
            OptionFeedback::Neutral
        }
    }

    /// The final result, once the quiz is completed.
    pub fn summary(&self) -> Option<QuizSummary> {
        if !self.is_quiz_completed() {
            return None;
        }
        Some(QuizSummary::new(
            self.score,
            self.questions.len(),
            self.selected_category.clone(),
        ))
    }

    /// Which screen to show.
    pub fn view(&self) -> QuizView<'_> {
        match self.phase {
            Phase::NotStarted => QuizView::Start,
            Phase::InProgress => match self.current_question() {
                Some(question) => QuizView::Question(question),
                None => QuizView::Start,
            },
            Phase::Completed => match self.summary() {
                Some(summary) => QuizView::Results(summary),
                None => QuizView::Start,
            },
        }
    }

    /// Move to the next question, or complete the quiz after the last one.
    fn next_question(self, config: &QuizConfig) -> Self {
        let next = self.current_question_index + 1;
        let (index, phase) = if next >= self.questions.len() {
            (self.current_question_index, Phase::Completed)
        } else {
            (next, Phase::InProgress)
        };
        if phase == Phase::Completed {
            log::debug!("Quiz completed with score {}/{}", self.score, self.questions.len());
        }
        Self {
            current_question_index: index,
            phase,
            selected_answer: None,
            time_left: config.time_limit,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionFeedback {
    /// No answer yet, or an option that was neither chosen nor correct.
    Neutral,
    /// The correct option, revealed once an answer is selected.
    Correct,
    /// The option the user chose, which was wrong.
    Wrong,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizView<'a> {
    Start,
    Question(&'a QuizQuestion),
    Results(QuizSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

impl Rating {
    fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Rating::Excellent
        } else if percentage >= 60.0 {
            Rating::Great
        } else if percentage >= 40.0 {
            Rating::Good
        } else {
            Rating::KeepPracticing
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rating::Excellent => "Excellent! You're a quiz master!",
            Rating::Great => "Great job! You did well!",
            Rating::Good => "Good effort! Keep learning!",
            Rating::KeepPracticing => "Keep practicing! You'll improve!",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub wrong: usize,
    pub percentage: f64,
    pub rating: Rating,
    pub category: Option<String>,
}

impl QuizSummary {
    fn new(score: usize, total: usize, category: Option<String>) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (score as f64 / total as f64) * 100.0
        };
        Self {
            score,
            total,
            wrong: total.saturating_sub(score),
            percentage,
            rating: Rating::from_percentage(percentage),
            category,
        }
    }
}

/// Everything that can happen to a quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    /// Start a run, optionally restricted to one category.
    Start(Option<String>),
    SelectAnswer(usize),
    Advance,
    /// One second of wall-clock time has passed.
    Tick,
    Reset,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            QuizEvent::Start(_) => "start",
            QuizEvent::SelectAnswer(_) => "select answer",
            QuizEvent::Advance => "advance",
            QuizEvent::Tick => "tick",
            QuizEvent::Reset => "reset",
        }
    }
}

/// Compute the state that follows `state` after `event`.
pub fn transition(
    catalog: &Catalog,
    config: &QuizConfig,
    state: &QuizState,
    event: QuizEvent,
) -> Result<QuizState, Ignored> {
    match event {
        QuizEvent::Start(category) => {
            // A blank category means no filter.
            let category = category.filter(|c| !c.trim().is_empty());
            let mut questions = catalog.filter(category.as_deref());
            if questions.is_empty() {
                match config.empty_category {
                    EmptyCategoryPolicy::Reject => return Err(Ignored::EmptyInput),
                    EmptyCategoryPolicy::All => questions = catalog.filter(None),
                }
            }
            log::debug!(
                "Starting quiz with {} questions (category: {:?})",
                questions.len(),
                category
            );
            Ok(QuizState {
                questions,
                current_question_index: 0,
                score: 0,
                time_left: config.time_limit,
                selected_answer: None,
                phase: Phase::InProgress,
                categories: catalog.categories().to_vec(),
                selected_category: category,
            })
        }
        QuizEvent::SelectAnswer(answer) => {
            if !state.is_in_progress() {
                return Err(Ignored::InvalidTransition);
            }
            let question = state.current_question().ok_or(Ignored::OutOfRange)?;
            if answer >= question.options.len() {
                return Err(Ignored::OutOfRange);
            }
            let already_scored = match (state.selected_answer, config.reselect) {
                (None, _) => false,
                (Some(_), ReselectPolicy::Locked) => return Err(Ignored::InvalidTransition),
                (Some(previous), ReselectPolicy::Overwrite) => question.is_correct(previous),
            };
            let gained = question.is_correct(answer) && !already_scored;
            Ok(QuizState {
                selected_answer: Some(answer),
                score: state.score + usize::from(gained),
                ..state.clone()
            })
        }
        QuizEvent::Advance => {
            if !state.is_in_progress() {
                return Err(Ignored::InvalidTransition);
            }
            Ok(state.clone().next_question(config))
        }
        QuizEvent::Tick => {
            if !state.is_in_progress() {
                return Err(Ignored::InvalidTransition);
            }
            if state.time_left > 0 {
                Ok(QuizState {
                    time_left: state.time_left - 1,
                    ..state.clone()
                })
            } else {
                Ok(state.clone().next_question(config))
            }
        }
        QuizEvent::Reset => Ok(QuizState::initial(catalog, config)),
    }
}

/// Owns one quiz: its catalog, its configuration and its current state.
#[derive(Clone, Debug)]
pub struct QuizEngine {
    catalog: Catalog,
    config: QuizConfig,
    state: QuizState,
}

impl QuizEngine {
    pub fn new(catalog: Catalog, config: QuizConfig) -> Self {
        let state = QuizState::initial(&catalog, &config);
        Self {
            catalog,
            config,
            state,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn dispatch(&mut self, event: QuizEvent) -> Outcome {
        let name = event.name();
        match transition(&self.catalog, &self.config, &self.state, event) {
            Ok(next) => {
                self.state = next;
                Outcome::Applied
            }
            Err(reason) => Outcome::ignored(reason, name),
        }
    }

    /// Start a run. `None` means every category.
    pub fn start(&mut self, category: Option<&str>) -> Outcome {
        self.dispatch(QuizEvent::Start(category.map(String::from)))
    }

    pub fn select_answer(&mut self, answer: usize) -> Outcome {
        self.dispatch(QuizEvent::SelectAnswer(answer))
    }

    pub fn advance(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Advance)
    }

    pub fn tick(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Tick)
    }

    pub fn reset(&mut self) -> Outcome {
        self.dispatch(QuizEvent::Reset)
    }
}
