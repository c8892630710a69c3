pub mod elevenlabs_tts;
pub mod file_store;
pub mod gemini_llm;
pub mod google_tts;
pub mod openai_tts;

pub use elevenlabs_tts::ElevenLabsTtsAdapter;
pub use file_store::FsAudioStore;
pub use gemini_llm::GeminiTextAdapter;
pub use google_tts::GoogleTtsAdapter;
pub use openai_tts::OpenAiTtsAdapter;

use crate::config::{ConfigError, TtsSettings};
use async_openai::{config::OpenAIConfig, types::audio::SpeechModel, Client};
use persona_voice_core::ports::TextToSpeechService;
use std::sync::Arc;

/// Builds the speech adapter for whichever provider the configuration selected.
pub fn speech_adapter(
    settings: &TtsSettings,
    http: reqwest::Client,
) -> Result<Arc<dyn TextToSpeechService>, ConfigError> {
    let adapter: Arc<dyn TextToSpeechService> = match settings {
        TtsSettings::Google { api_key, api_base } => Arc::new(GoogleTtsAdapter::new(
            http,
            api_key.clone(),
            api_base.clone(),
        )),
        TtsSettings::ElevenLabs {
            api_key,
            api_base,
            voice_id,
            model,
        } => Arc::new(ElevenLabsTtsAdapter::new(
            http,
            api_key.clone(),
            api_base.clone(),
            voice_id.clone(),
            model.clone(),
        )),
        TtsSettings::OpenAi { api_key, voice } => {
            let voice = OpenAiTtsAdapter::parse_voice(voice).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "TTS_VOICE".to_string(),
                    format!("'{}' is not a valid OpenAI voice", voice),
                )
            })?;
            let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiTtsAdapter::new(client, SpeechModel::Tts1, voice))
        }
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_openai_voice_is_a_config_error() {
        let settings = TtsSettings::OpenAi {
            api_key: "k".to_string(),
            voice: "rachel".to_string(),
        };
        let err = speech_adapter(&settings, reqwest::Client::new()).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "TTS_VOICE"));
    }
}
