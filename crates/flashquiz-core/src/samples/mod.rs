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

//! Built-in data, used when no catalog or deck file is given.

use crate::catalog::Catalog;
use crate::error::Fallible;
use crate::parser::parse_catalog;
use crate::parser::parse_decks;
use crate::types::deck::Deck;

pub const SAMPLE_CATALOG: &str = include_str!("quiz.toml");
pub const SAMPLE_DECKS: &str = include_str!("decks.toml");

pub fn sample_catalog() -> Fallible<Catalog> {
    parse_catalog("<built-in quiz>", SAMPLE_CATALOG)
}

pub fn sample_decks() -> Fallible<Vec<Deck>> {
    parse_decks("<built-in decks>", SAMPLE_DECKS)
}
