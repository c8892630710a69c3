//! services/api/src/adapters/elevenlabs_tts.rs
//!
//! Adapter for the ElevenLabs text-to-speech REST API.

use async_trait::async_trait;
use persona_voice_core::{
    ports::{PortError, PortResult, TextToSpeechService},
    SynthesizedAudio,
};
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Clone)]
pub struct ElevenLabsTtsAdapter {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    voice_id: String,
    model: String,
}

impl ElevenLabsTtsAdapter {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        api_base: String,
        voice_id: String,
        model: String,
    ) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            voice_id,
            model,
        }
    }
}

#[async_trait]
impl TextToSpeechService for ElevenLabsTtsAdapter {
    async fn generate_audio(&self, text: &str) -> PortResult<SynthesizedAudio> {
        info!(voice_id = %self.voice_id, "Generating speech from text using ElevenLabs...");
        let request = SpeechRequest {
            text,
            model_id: &self.model,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{}", self.api_base, self.voice_id))
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "ElevenLabs API Error: {}", body);
            return Err(PortError::Upstream(format!("ElevenLabs returned {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Upstream(e.without_url().to_string()))?;

        let audio = SynthesizedAudio::mp3(bytes);
        if audio.is_empty() {
            return Err(PortError::Upstream("ElevenLabs returned no audio".to_string()));
        }
        Ok(audio)
    }
}
