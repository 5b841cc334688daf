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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

/// Wrap a page body. `refresh` reloads the page every so many seconds,
/// which keeps the quiz countdown moving without any script.
pub fn page_template(title: &str, body: Markup, refresh: Option<u32>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if let Some(seconds) = refresh {
                    meta http-equiv="refresh" content=(seconds);
                }
                title { (title) " · flashquiz" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                nav.top {
                    a href="/" { "flashquiz" }
                    a href="/quiz" { "Quiz" }
                    a href="/decks" { "Decks" }
                    a href="/study" { "Study" }
                }
                main { (body) }
            }
        }
    }
}

pub fn progress_bar(percent: f64) -> Markup {
    let percent = percent.clamp(0.0, 100.0);
    let style = format!("width: {percent:.0}%;");
    html! {
        div.progress-bar {
            div.progress-fill style=(style) {}
        }
    }
}
