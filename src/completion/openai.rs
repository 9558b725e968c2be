use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

use super::{Completer, Completion, TokenUsage};

const COMPLETIONS_PATH: &str = "/v1/completions";

/// A completer that calls the OpenAI text completions API.
pub struct OpenAiCompleter {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompleter {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: format!(
                "{}{}",
                config.openai_base_url.trim_end_matches('/'),
                COMPLETIONS_PATH
            ),
            api_key: config.openai_api_key.clone(),
            model: config.completion_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn extract_text(resp: ApiResponse) -> Result<Completion> {
        let usage = resp.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });

        let Some(choice) = resp.choices.into_iter().next() else {
            bail!("completion API returned no choices");
        };

        Ok(Completion {
            text: choice.text,
            usage,
        })
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let body = ApiRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("completion request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("completion API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .context("failed to decode completion response")?;

        let completion = Self::extract_text(api_resp)?;
        if let Some(usage) = completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total(),
                "completion usage"
            );
        }
        Ok(completion)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(base_url: &str) -> Config {
        Config {
            openai_base_url: base_url.to_string(),
            openai_api_key: "sk-test".to_string(),
            ..Config::for_tests()
        }
    }

    #[tokio::test]
    async fn sends_model_prompt_and_budget() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "text-davinci-002",
                "prompt": "what is 2+2?",
                "max_tokens": 100
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"text":"\n\n4"}],"usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#,
            )
            .create_async()
            .await;

        let completer = OpenAiCompleter::new(&config_for(&server.url())).unwrap();
        let completion = completer.complete("what is 2+2?").await.unwrap();

        assert_eq!(completion.text, "\n\n4");
        assert_eq!(completion.usage.unwrap().total(), 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let completer = OpenAiCompleter::new(&config_for(&server.url())).unwrap();
        let err = completer.complete("hi").await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("upstream exploded"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let completer = OpenAiCompleter::new(&config_for(&server.url())).unwrap();
        let err = completer.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn undecodable_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let completer = OpenAiCompleter::new(&config_for(&server.url())).unwrap();
        assert!(completer.complete("hi").await.is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let completer = OpenAiCompleter::new(&config_for("http://localhost:1/")).unwrap();
        assert_eq!(completer.url, "http://localhost:1/v1/completions");
    }
}
