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

mod decks;
mod quiz;
pub mod server;
mod state;
mod study;
mod template;
mod ticker;

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::time::Duration;

    use flashquiz_core::quiz::QuizConfig;
    use portpicker::pick_unused_port;
    use reqwest::Client;
    use reqwest::StatusCode;
    use reqwest::redirect::Policy;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::cmd::serve::server::ServerConfig;
    use crate::cmd::serve::server::start_server;
    use crate::utils::wait_for_server;

    type TestResult = Result<(), Box<dyn Error>>;

    const TEST_HOST: &str = "127.0.0.1";

    fn config(port: u16) -> ServerConfig {
        ServerConfig {
            host: TEST_HOST.to_string(),
            port,
            catalog: None,
            decks: None,
            quiz: QuizConfig::default(),
            tick_period: Duration::from_secs(3600),
        }
    }

    async fn serve(config: ServerConfig) -> Result<u16, Box<dyn Error>> {
        let port = config.port;
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok(port)
    }

    async fn get(client: &Client, port: u16, path: &str) -> Result<String, Box<dyn Error>> {
        let response = client
            .get(format!("http://{TEST_HOST}:{port}{path}"))
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    async fn post(
        client: &Client,
        port: u16,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<String, Box<dyn Error>> {
        let response = client
            .post(format!("http://{TEST_HOST}:{port}{path}"))
            .form(form)
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_with_missing_catalog() -> TestResult {
        let port = pick_unused_port().unwrap();
        let config = ServerConfig {
            catalog: Some("./derpherp.toml".to_string()),
            ..config(port)
        };
        let result = start_server(config).await;
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: file does not exist: ./derpherp.toml".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_static_routes() -> TestResult {
        let port = serve(config(pick_unused_port().unwrap())).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("9 questions in 4 categories"));
        assert!(html.contains("2 flashcard decks"));
        Ok(())
    }

    #[tokio::test]
    async fn test_quiz_e2e() -> TestResult {
        let port = serve(config(pick_unused_port().unwrap())).await?;
        let client = Client::new();

        let html = get(&client, port, "/quiz").await?;
        assert!(html.contains("Interactive Quiz"));
        assert!(html.contains("Total Questions: 9"));
        assert!(html.contains("Programming, Science, Literature, Geography"));

        // Start a one-question run.
        let html = post(
            &client,
            port,
            "/quiz",
            &[("action", "Start"), ("category", "Literature")],
        )
        .await?;
        assert!(html.contains("Question 1 of 1"));
        assert!(html.contains("Time Left: 15s"));
        assert!(html.contains("<em>Romeo and Juliet</em>"));
        assert!(html.contains(r#"http-equiv="refresh""#));

        // Answer it correctly.
        let html = post(
            &client,
            port,
            "/quiz",
            &[("action", "Select"), ("answer", "1")],
        )
        .await?;
        assert!(html.contains(r#"class="correct""#));
        assert!(html.contains("Finish Quiz"));

        // A second selection is ignored.
        let html = post(
            &client,
            port,
            "/quiz",
            &[("action", "Select"), ("answer", "0")],
        )
        .await?;
        assert!(!html.contains(r#"class="wrong""#));

        let html = post(&client, port, "/quiz", &[("action", "Next")]).await?;
        assert!(html.contains("Your Score: 1/1"));
        assert!(html.contains("100% Correct"));
        assert!(html.contains("Category: Literature"));
        assert!(html.contains("Excellent!"));
        assert!(!html.contains(r#"http-equiv="refresh""#));

        let html = post(&client, port, "/quiz", &[("action", "Reset")]).await?;
        assert!(html.contains("Interactive Quiz"));

        // Unknown actions are rejected.
        let response = client
            .post(format!("http://{TEST_HOST}:{port}/quiz"))
            .form(&[("action", "Derp")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_quiz_times_out() -> TestResult {
        let config = ServerConfig {
            quiz: QuizConfig {
                time_limit: 2,
                ..QuizConfig::default()
            },
            tick_period: Duration::from_millis(10),
            ..config(pick_unused_port().unwrap())
        };
        let port = serve(config).await?;
        let client = Client::new();
        post(
            &client,
            port,
            "/quiz",
            &[("action", "Start"), ("category", "Geography")],
        )
        .await?;
        let mut finished = false;
        for _ in 0..200 {
            let html = get(&client, port, "/quiz").await?;
            if html.contains("Your Score: 0/2") {
                finished = true;
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert!(finished);
        Ok(())
    }

    #[tokio::test]
    async fn test_decks_and_study_e2e() -> TestResult {
        let port = serve(config(pick_unused_port().unwrap())).await?;
        let client = Client::new();

        let html = get(&client, port, "/decks").await?;
        assert!(html.contains("Spanish Basics"));
        assert!(html.contains("French Basics"));
        assert!(html.contains("Hola"));

        // Blank cards are refused with a message.
        let html = post(
            &client,
            port,
            "/decks",
            &[("action", "AddCard"), ("deck", "1"), ("front", "Yes"), ("back", " ")],
        )
        .await?;
        assert!(html.contains("a card needs both a front and a back"));
        let html = get(&client, port, "/decks").await?;
        assert!(!html.contains("a card needs both a front and a back"));

        // Study the Spanish deck through to the end.
        let html = get(&client, port, "/study").await?;
        assert!(html.contains("Card 1 of 4"));
        assert!(html.contains("Reveal Answer"));
        let html = post(&client, port, "/study", &[("action", "Flip")]).await?;
        assert!(html.contains("Got it"));
        for position in 2..=4 {
            let html = post(&client, port, "/study", &[("action", "GotIt")]).await?;
            assert!(html.contains(&format!("Card {position} of 4")));
        }
        let html = post(&client, port, "/study", &[("action", "Again")]).await?;
        assert!(html.contains("Session Complete!"));
        assert!(html.contains("You reviewed 4 of 4 cards."));

        // The reviews reached the deck.
        let html = get(&client, port, "/decks").await?;
        assert!(!html.contains(">New<"));

        let html = post(&client, port, "/study", &[("action", "Restart")]).await?;
        assert!(html.contains("Card 1 of 4"));

        // Editing the deck begins a new session.
        post(
            &client,
            port,
            "/decks",
            &[("action", "AddCard"), ("deck", "1"), ("front", "Yes"), ("back", "Sí")],
        )
        .await?;
        let html = get(&client, port, "/study").await?;
        assert!(html.contains("Card 1 of 5"));

        // A new deck is selected and has nothing to study.
        let html = post(
            &client,
            port,
            "/decks",
            &[("action", "CreateDeck"), ("name", "Capitals"), ("description", "")],
        )
        .await?;
        assert!(html.contains("Capitals"));
        assert!(html.contains("This deck has no cards yet."));
        let html = get(&client, port, "/study").await?;
        assert!(html.contains("This deck has no cards to study."));

        // Deleting the other decks keeps the selected one.
        for id in ["1", "2"] {
            post(&client, port, "/decks", &[("action", "DeleteDeck"), ("deck", id)]).await?;
        }
        let html = get(&client, port, "/decks").await?;
        assert!(!html.contains("Spanish Basics"));
        assert!(html.contains("Capitals"));
        Ok(())
    }

    #[tokio::test]
    async fn test_select_deck_and_remove_card() -> TestResult {
        let port = serve(config(pick_unused_port().unwrap())).await?;
        let client = Client::new();

        let html = post(
            &client,
            port,
            "/decks",
            &[("action", "SelectDeck"), ("deck", "2")],
        )
        .await?;
        assert!(html.contains("Bonjour"));
        let html = get(&client, port, "/study").await?;
        assert!(html.contains("Card 1 of 3"));

        let html = post(
            &client,
            port,
            "/decks",
            &[("action", "RemoveCard"), ("deck", "2"), ("card", "2-1")],
        )
        .await?;
        assert!(!html.contains("Bonjour"));
        let html = get(&client, port, "/study").await?;
        assert!(html.contains("Card 1 of 2"));

        let html = post(
            &client,
            port,
            "/decks",
            &[("action", "SelectDeck"), ("deck", "derp")],
        )
        .await?;
        assert!(html.contains("no deck with id"));
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown() -> TestResult {
        let port = pick_unused_port().unwrap();
        let handle = spawn(start_server(config(port)));
        wait_for_server(TEST_HOST, port).await?;
        let client = Client::builder().redirect(Policy::none()).build()?;
        let response = client
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        handle.await??;
        Ok(())
    }
}
