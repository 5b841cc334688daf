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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::question::QuizQuestion;

/// The fixed, validated set of questions a quiz draws from.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    questions: Vec<QuizQuestion>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new(questions: Vec<QuizQuestion>) -> Fallible<Self> {
        if questions.is_empty() {
            return fail("the question catalog is empty");
        }
        let mut ids = HashSet::new();
        for question in questions.iter() {
            question.validate()?;
            if !ids.insert(question.id) {
                return fail(format!("duplicate question id {}", question.id));
            }
        }
        let mut categories: Vec<String> = Vec::new();
        for question in questions.iter() {
            if !categories.contains(&question.category) {
                categories.push(question.category.clone());
            }
        }
        Ok(Self {
            questions,
            categories,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions in `category`, or all questions for `None`, in catalog order.
    pub fn filter(&self, category: Option<&str>) -> Vec<QuizQuestion> {
        match category {
            Some(category) => self
                .questions
                .iter()
                .filter(|q| q.category == category)
                .cloned()
                .collect(),
            None => self.questions.clone(),
        }
    }
}
