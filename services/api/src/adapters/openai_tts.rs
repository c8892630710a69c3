//! services/api/src/adapters/openai_tts.rs
//!
//! This module contains the adapter for OpenAI's Text-to-Speech (TTS) service.
//! It implements the `TextToSpeechService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::audio::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use persona_voice_core::{
    ports::{PortError, PortResult, TextToSpeechService},
    SynthesizedAudio,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TextToSpeechService` port using the OpenAI TTS API.
#[derive(Clone)]
pub struct OpenAiTtsAdapter {
    client: Client<OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
}

impl OpenAiTtsAdapter {
    /// Creates a new `OpenAiTtsAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: SpeechModel, voice: Voice) -> Self {
        Self {
            client,
            model,
            voice,
        }
    }

    /// Maps a configured voice name onto the API's voice enum.
    pub fn parse_voice(name: &str) -> Option<Voice> {
        match name.to_lowercase().as_str() {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }
}

//=========================================================================================
// `TextToSpeechService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextToSpeechService for OpenAiTtsAdapter {
    /// Generates MP3 audio from the given text.
    async fn generate_audio(&self, text: &str) -> PortResult<SynthesizedAudio> {
        let request = CreateSpeechRequest {
            model: self.model.clone(),
            input: text.to_string(),
            voice: self.voice.clone(),
            response_format: Some(SpeechResponseFormat::Mp3),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .speech()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let audio = SynthesizedAudio::mp3(response.bytes);
        if audio.is_empty() {
            return Err(PortError::Upstream("OpenAI TTS returned no audio".to_string()));
        }
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_voices_parse_case_insensitively() {
        assert!(matches!(OpenAiTtsAdapter::parse_voice("Nova"), Some(Voice::Nova)));
        assert!(OpenAiTtsAdapter::parse_voice("rachel").is_none());
    }
}
