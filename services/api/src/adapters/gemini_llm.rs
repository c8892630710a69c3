//! services/api/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the persona text model.
//! It implements the `TextGenerationService` port from the `core` crate by talking
//! to Gemini through its OpenAI-compatible chat-completions endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use persona_voice_core::ports::{PortError, PortResult, TextGenerationService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using a Gemini model.
#[derive(Clone)]
pub struct GeminiTextAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiTextAdapter {
    /// Creates a new `GeminiTextAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the client for Gemini's OpenAI-compatible API.
    pub fn client(api_key: &str, api_base: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Client::with_config(config)
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for GeminiTextAdapter {
    /// Sends the composed prompt as the only user message and returns the raw reply.
    async fn complete(&self, prompt: &str) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Upstream("Text model response contained no text content.".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({ "model": "gemini-2.0-flash" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "chatcmpl-1",
                    "object": "chat.completion",
                    "created": 1,
                    "model": "gemini-2.0-flash",
                    "choices": [{
                        "index": 0,
                        "message": { "role": "assistant", "content": "**Ahoy** there" },
                        "finish_reason": "stop"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let adapter = GeminiTextAdapter::new(
            GeminiTextAdapter::client("test-key", &server.url()),
            "gemini-2.0-flash".to_string(),
        );
        let raw = adapter.complete("Persona: pirate\n\nUser: hi").await.unwrap();

        assert_eq!(raw, "**Ahoy** there");
        mock.assert_async().await;
    }
}
