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

use flashquiz_core::error::Fallible;
use flashquiz_core::types::timestamp::Timestamp;

use crate::collection::Collection;

/// Load the catalog and decks, failing on the first invalid entry, and
/// print what was found.
pub fn check_collection(catalog: Option<String>, decks: Option<String>) -> Fallible<()> {
    let collection = Collection::new(catalog, decks)?;
    print!("{}", report(&collection, Timestamp::now()));
    Ok(())
}

fn report(collection: &Collection, now: Timestamp) -> String {
    let catalog = &collection.catalog;
    let mut out = format!(
        "Catalog: {} questions in {} categories ({})\n",
        catalog.len(),
        catalog.categories().len(),
        catalog.categories().join(", ")
    );
    out.push_str(&format!("Decks: {}\n", collection.decks.len()));
    for deck in collection.decks.iter() {
        let due = deck.cards().iter().filter(|c| c.is_due(now)).count();
        out.push_str(&format!(
            "  {} ({}): {} cards, {} due\n",
            deck.name,
            deck.id(),
            deck.len(),
            due
        ));
    }
    out
}
