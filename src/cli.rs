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

use std::process::exit;
use std::time::Duration;

use clap::Parser;
use flashquiz_core::error::Fallible;
use flashquiz_core::quiz::DEFAULT_TIME_LIMIT;
use flashquiz_core::quiz::EmptyCategoryPolicy;
use flashquiz_core::quiz::QuizConfig;
use flashquiz_core::quiz::ReselectPolicy;
use tokio::spawn;

use crate::cmd::check::check_collection;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Take quizzes and study flashcards through a web interface.
    Serve {
        /// Path to a quiz catalog TOML file. By default, the built-in questions are used.
        #[arg(long)]
        catalog: Option<String>,
        /// Path to a deck TOML file. By default, the built-in decks are used.
        #[arg(long)]
        decks: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
        /// Seconds allowed per quiz question.
        #[arg(long, default_value_t = DEFAULT_TIME_LIMIT)]
        time_limit: u32,
        /// What to do with a second answer to the same question: `locked` or `overwrite`.
        #[arg(long, default_value_t = ReselectPolicy::Locked, value_parser = parse_reselect)]
        reselect: ReselectPolicy,
        /// What to do when a category has no questions: `reject` or `all`.
        #[arg(
            long,
            default_value_t = EmptyCategoryPolicy::Reject,
            value_parser = parse_empty_category
        )]
        empty_category: EmptyCategoryPolicy,
    },
    /// Check that the catalog and deck files load.
    Check {
        /// Path to a quiz catalog TOML file. By default, the built-in questions are used.
        #[arg(long)]
        catalog: Option<String>,
        /// Path to a deck TOML file. By default, the built-in decks are used.
        #[arg(long)]
        decks: Option<String>,
    },
}

fn parse_reselect(value: &str) -> Result<ReselectPolicy, String> {
    ReselectPolicy::try_from(value.to_string()).map_err(|e| e.to_string())
}

fn parse_empty_category(value: &str) -> Result<EmptyCategoryPolicy, String> {
    EmptyCategoryPolicy::try_from(value.to_string()).map_err(|e| e.to_string())
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            catalog,
            decks,
            host,
            port,
            open_browser,
            time_limit,
            reselect,
            empty_category,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                host,
                port,
                catalog,
                decks,
                quiz: QuizConfig {
                    time_limit,
                    reselect,
                    empty_category,
                },
                tick_period: Duration::from_secs(1),
            };
            start_server(config).await
        }
        Command::Check { catalog, decks } => check_collection(catalog, decks),
    }
}
