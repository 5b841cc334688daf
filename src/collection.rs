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

use std::fs::read_to_string;
use std::path::Path;

use flashquiz_core::catalog::Catalog;
use flashquiz_core::error::Fallible;
use flashquiz_core::error::fail;
use flashquiz_core::parser::parse_catalog;
use flashquiz_core::parser::parse_decks;
use flashquiz_core::samples::sample_catalog;
use flashquiz_core::samples::sample_decks;
use flashquiz_core::types::deck::Deck;

/// The quiz catalog and the decks a server starts with.
pub struct Collection {
    pub catalog: Catalog,
    pub decks: Vec<Deck>,
}

impl Collection {
    /// Load the catalog and decks from the given files, falling back to the
    /// built-in samples for whichever is not given.
    pub fn new(catalog: Option<String>, decks: Option<String>) -> Fallible<Self> {
        let catalog = match catalog {
            Some(path) => {
                log::debug!("Loading quiz catalog from {path}");
                parse_catalog(&path, &read_file(&path)?)?
            }
            None => sample_catalog()?,
        };
        let decks = match decks {
            Some(path) => {
                log::debug!("Loading decks from {path}");
                parse_decks(&path, &read_file(&path)?)?
            }
            None => sample_decks()?,
        };
        Ok(Self { catalog, decks })
    }
}

fn read_file(path: &str) -> Fallible<String> {
    if !Path::new(path).is_file() {
        return fail(format!("file does not exist: {path}"));
    }
    Ok(read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults_to_samples() -> Fallible<()> {
        let collection = Collection::new(None, None)?;
        assert_eq!(collection.catalog.len(), 9);
        assert_eq!(collection.decks.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = Collection::new(Some("./derpherp.toml".to_string()), None);
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: file does not exist: ./derpherp.toml".to_string())
        );
    }

    #[test]
    fn test_loads_files() -> Fallible<()> {
        let dir = tempdir()?;
        let catalog = dir.path().join("quiz.toml");
        write(
            &catalog,
            r#"
[[question]]
id = 1
question = "What is 2 + 2?"
options = ["3", "4"]
correct_answer = 1
category = "Math"
"#,
        )?;
        let decks = dir.path().join("decks.toml");
        write(
            &decks,
            r#"
[[deck]]
name = "Capitals"

[[deck.card]]
front = "France"
back = "Paris"
"#,
        )?;
        let collection = Collection::new(
            Some(catalog.display().to_string()),
            Some(decks.display().to_string()),
        )?;
        assert_eq!(collection.catalog.categories(), &["Math".to_string()]);
        assert_eq!(collection.decks.len(), 1);
        assert_eq!(collection.decks[0].name, "Capitals");
        assert_eq!(collection.decks[0].len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_catalog_names_the_file() -> Fallible<()> {
        let dir = tempdir()?;
        let catalog = dir.path().join("quiz.toml");
        write(&catalog, "[[question]]\nid = 1\n")?;
        let path = catalog.display().to_string();
        let result = Collection::new(Some(path.clone()), None);
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains(&path));
        Ok(())
    }
}
