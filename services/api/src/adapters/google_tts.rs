//! services/api/src/adapters/google_tts.rs
//!
//! This module contains the adapter for Google Cloud Text-to-Speech.
//! It implements the `TextToSpeechService` port from the `core` crate.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use persona_voice_core::{
    ports::{PortError, PortResult, TextToSpeechService},
    SynthesizedAudio,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const LANGUAGE_CODE: &str = "en-US";
const SSML_GENDER: &str = "NEUTRAL";
const AUDIO_ENCODING: &str = "MP3";
const API_KEY_HEADER: &str = "x-goog-api-key";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: &'static str,
    ssml_gender: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that synthesizes MP3 speech with a fixed en-US neutral voice.
#[derive(Clone)]
pub struct GoogleTtsAdapter {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GoogleTtsAdapter {
    /// Creates a new `GoogleTtsAdapter`.
    pub fn new(client: reqwest::Client, api_key: String, api_base: String) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

//=========================================================================================
// `TextToSpeechService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextToSpeechService for GoogleTtsAdapter {
    async fn generate_audio(&self, text: &str) -> PortResult<SynthesizedAudio> {
        info!("Generating speech from text using Google Cloud TTS...");
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: LANGUAGE_CODE,
                ssml_gender: SSML_GENDER,
            },
            audio_config: AudioConfig {
                audio_encoding: AUDIO_ENCODING,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.api_base))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Google TTS API Error: {}", body);
            return Err(PortError::Upstream(format!("Google TTS returned {}", status)));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| {
                PortError::Upstream(format!("Malformed Google TTS response: {}", e.without_url()))
            })?;

        let bytes = STANDARD
            .decode(payload.audio_content)
            .map_err(|e| PortError::Upstream(format!("Invalid audioContent encoding: {}", e)))?;

        let audio = SynthesizedAudio::mp3(bytes);
        if audio.is_empty() {
            return Err(PortError::Upstream("Google TTS returned no audio".to_string()));
        }
        Ok(audio)
    }
}
