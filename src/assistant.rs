use std::env;

use serde_json::{json, Value};
use strum_macros::Display;

use crate::config::Network;
use crate::constants::network::{API_KEY_ENV, GENERATIVE_URL};
use crate::debug;
use crate::error::*;
use crate::fetcher::{validate_url, HttpClient};

/// Rewriting tasks delegated to the generative text service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Task {
    #[strum(serialize = "grammar")]
    FixGrammar,
    #[strum(serialize = "comment")]
    ImproveComment,
}

impl Task {
    pub fn prompt(&self, text: &str) -> String {
        match self {
            Task::FixGrammar => format!(
                "Fix the grammar and improve this English text while keeping its original meaning:\n\n\"{}\"\n\n\
                 Return only the corrected text without any additional commentary or explanations.",
                text
            ),
            Task::ImproveComment => format!(
                "Improve this comment by fixing grammar, making it more polite and engaging, and adding relevant emojis. \
                 Keep the original meaning but enhance the tone. Return only the improved comment:\n\n\"{}\"",
                text
            ),
        }
    }
}

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client of a `generateContent` style endpoint
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    client: HttpClient,
    url: String,
    api_key: String,
}

impl GenerativeClient {
    pub fn new<U: Into<String>, K: Into<String>>(client: HttpClient, url: U, api_key: K) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client reading the API key from the environment variable
    /// named in the network settings
    ///
    /// # Errors
    /// `ConfigError` if the variable is not set or empty
    pub fn from_env(client: HttpClient, network: &Network) -> Result<Self> {
        let var = if network.api_key_env.is_empty() {
            API_KEY_ENV
        } else {
            network.api_key_env.as_str()
        };
        let api_key = env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::ConfigError(format!("API key not found, please set {}", var)))?;
        let url = if network.assistant_url.is_empty() {
            GENERATIVE_URL
        } else {
            network.assistant_url.as_str()
        };
        Ok(Self::new(client, url, api_key))
    }

    pub fn fix_grammar(&self, text: &str) -> Result<String> {
        self.run(Task::FixGrammar, text)
    }

    pub fn improve_comment(&self, text: &str) -> Result<String> {
        self.run(Task::ImproveComment, text)
    }

    /// Sends the prompt for `task` and returns the first candidate text
    ///
    /// # Errors
    /// * `ValidationError` - the text is blank
    /// * `NetworkError` - the request fails or the response has no candidate
    pub fn run(&self, task: Task, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(invalid("please enter some text"));
        }
        let endpoint = validate_url(&self.url)?;
        debug!("Running {} task on {} chars", task, text.chars().count());

        let body = json!({
            "contents": [{ "parts": [{ "text": task.prompt(text) }] }]
        });
        let response = self.client.post_json(
            endpoint.as_str(),
            &[
                ("Content-Type", "application/json"),
                (API_KEY_HEADER, self.api_key.as_str()),
            ],
            &body,
        )?;
        candidate_text(&response).ok_or_else(|| Error::NetworkError {
            url: self.url.clone(),
            cause: "no valid response from API".to_string(),
        })
    }
}

/// Extracts `candidates[0].content.parts[0].text`
fn candidate_text(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_candidate_text() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Fixed." }], "role": "model" } }]
        });
        assert_eq!(candidate_text(&response).as_deref(), Some("Fixed."));
        assert_eq!(candidate_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_fix_grammar() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/generate")
                .header("x-goog-api-key", "secret")
                .body_contains("Fix the grammar")
                .body_contains("i has a apple");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "I have an apple." }] } }]
            }));
        });

        let assistant = GenerativeClient::new(HttpClient::default(), server.url("/generate"), "secret");
        assert_eq!(assistant.fix_grammar("i has a apple").unwrap(), "I have an apple.");
        mock.assert_hits(1);
    }

    #[test]
    fn test_empty_answer() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(200).json_body(json!({ "candidates": [] }));
        });

        let assistant = GenerativeClient::new(HttpClient::default(), server.url("/generate"), "k");
        assert!(matches!(
            assistant.improve_comment("nice post"),
            Err(Error::NetworkError { .. })
        ));
        assert!(matches!(
            assistant.improve_comment("  "),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejected_key_stays_secret() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(403).body("forbidden");
        });

        let assistant =
            GenerativeClient::new(HttpClient::default(), server.url("/generate"), "SECRET-KEY-123");
        let error = assistant.fix_grammar("i has a apple").unwrap_err();
        mock.assert_hits(1);
        assert!(matches!(error, Error::NetworkError { .. }));
        assert!(!error.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{:?}", error).contains("SECRET-KEY-123"));
    }

    #[test]
    fn test_missing_api_key() {
        let network = Network {
            api_key_env: "TOOLSHED_TEST_MISSING_KEY".to_string(),
            ..Network::default()
        };
        assert!(matches!(
            GenerativeClient::from_env(HttpClient::default(), &network),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_prompts() {
        assert!(Task::ImproveComment.prompt("hello").ends_with("\"hello\""));
        assert!(Task::FixGrammar.prompt("x").contains("\"x\""));
    }
}
