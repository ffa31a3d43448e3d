// src/services/completion.rs
//
// Client for the Perplexity chat-completions API. A request is tried against
// each configured model tier in order; the first 2xx wins, and the error
// reported after all tiers fail is the primary tier's, since that is the one
// worth diagnosing.

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, DEFAULT_SYSTEM_PROMPT};
use crate::error::AppError;
use crate::message::{ChatMessage, Role};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    return_images: bool,
    return_related_questions: bool,
    search_mode: &'static str,
    reasoning_effort: &'static str,
    top_k: u32,
    stream: bool,
    presence_penalty: f64,
    frequency_penalty: f64,
    web_search_options: WebSearchOptions,
}

#[derive(Serialize)]
struct WebSearchOptions {
    search_context_size: &'static str,
}

impl<'a> CompletionRequest<'a> {
    // Fixed generation settings: bounded output, low randomness, no
    // streaming, small web-search context.
    fn new(model: &'a str, messages: &'a [ChatMessage]) -> Self {
        Self {
            model,
            messages,
            max_tokens: 1000,
            temperature: 0.2,
            top_p: 0.9,
            return_images: false,
            return_related_questions: false,
            search_mode: "web",
            reasoning_effort: "medium",
            top_k: 0,
            stream: false,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            web_search_options: WebSearchOptions {
                search_context_size: "low",
            },
        }
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    models: Vec<String>,
}

impl CompletionClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            models: config.model_tiers.clone(),
        }
    }

    /// Prepends the system message: the caller's override forwarded
    /// verbatim when non-empty, otherwise the default persona. The caller's
    /// messages follow in their original order.
    pub fn build_messages(
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let system = system_prompt
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let mut outbound = Vec::with_capacity(messages.len() + 1);
        outbound.push(ChatMessage::new(Role::System, system));
        outbound.extend_from_slice(messages);
        outbound
    }

    /// Generates a reply for the conversation, falling back through the
    /// model tiers. Transport and parse errors abort immediately; only a
    /// non-success status from the API advances to the next tier.
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        system_prompt: Option<&str>,
    ) -> Result<String, AppError> {
        if messages.is_empty() {
            return Err(AppError::BadRequest(
                "messages must not be empty".to_string(),
            ));
        }

        let outbound = Self::build_messages(system_prompt, messages);
        let url = format!("{}/chat/completions", self.base_url);
        let mut first_failure: Option<(u16, String)> = None;

        for model in &self.models {
            let request = CompletionRequest::new(model, &outbound);
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                tracing::debug!(%model, %status, "completion succeeded");
                let parsed = response.json::<CompletionResponse>().await?;
                return parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "upstream response contained no choices"
                        ))
                    });
            }

            let body = response.text().await.unwrap_or_default();
            tracing::error!(%model, %status, %body, "completion tier failed");
            if first_failure.is_none() {
                first_failure = Some((status.as_u16(), body));
            }
        }

        match first_failure {
            Some((status, body)) => Err(AppError::Upstream { status, body }),
            None => Err(AppError::Internal(anyhow::anyhow!(
                "no model tiers configured"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_when_no_override() {
        let messages = vec![ChatMessage::new(Role::User, "hello")];
        let outbound = CompletionClient::build_messages(None, &messages);
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(outbound[0].content, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(outbound[1].content, "hello");
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let messages = vec![ChatMessage::new(Role::User, "hello")];
        let outbound = CompletionClient::build_messages(Some(""), &messages);
        assert_eq!(outbound[0].content, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn whitespace_override_is_forwarded_verbatim() {
        let messages = vec![ChatMessage::new(Role::User, "hello")];
        let outbound = CompletionClient::build_messages(Some("   "), &messages);
        assert_eq!(outbound[0].content, "   ");
    }

    #[test]
    fn override_is_used_verbatim() {
        let messages = vec![ChatMessage::new(Role::User, "hello")];
        let outbound =
            CompletionClient::build_messages(Some("You are a grader."), &messages);
        assert_eq!(outbound[0].content, "You are a grader.");
    }

    #[test]
    fn caller_message_order_is_preserved() {
        let messages = vec![
            ChatMessage::new(Role::User, "first"),
            ChatMessage::new(Role::Assistant, "second"),
            ChatMessage::new(Role::User, "third"),
        ];
        let outbound = CompletionClient::build_messages(None, &messages);
        let contents: Vec<&str> = outbound[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn request_body_carries_fixed_generation_settings() {
        let messages = vec![ChatMessage::new(Role::User, "hi")];
        let body =
            serde_json::to_value(CompletionRequest::new("sonar-pro", &messages)).unwrap();
        assert_eq!(body["model"], "sonar-pro");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["stream"], false);
        assert_eq!(body["search_mode"], "web");
        assert_eq!(body["web_search_options"]["search_context_size"], "low");
    }
}
