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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// A multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub category: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.question.trim().is_empty() {
            return fail(format!("question {} has no text", self.id));
        }
        if self.options.len() < 2 {
            return fail(format!("question {} needs at least two options", self.id));
        }
        if self.correct_answer >= self.options.len() {
            return fail(format!(
                "question {}: correct answer {} is out of range (it has {} options)",
                self.id,
                self.correct_answer,
                self.options.len()
            ));
        }
        if self.category.trim().is_empty() {
            return fail(format!("question {} has no category", self.id));
        }
        Ok(())
    }
}

/// The letter shown next to an option: A, B, C, ...
pub fn option_label(index: usize) -> char {
    match u8::try_from(index) {
        Ok(i) if i < 26 => (b'A' + i) as char,
        _ => '?',
    }
}
