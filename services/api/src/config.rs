//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Credentials needed by the selected
//! providers are checked here, so a misconfigured server never starts.

use persona_voice_core::ResponseMode;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_GOOGLE_TTS_API_BASE: &str = "https://texttospeech.googleapis.com";
pub const DEFAULT_ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_monolingual_v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which text-to-speech API the synthesizer talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TtsProvider {
    Google,
    ElevenLabs,
    OpenAi,
}

impl std::str::FromStr for TtsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "elevenlabs" => Ok(Self::ElevenLabs),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("'{}' is not a supported TTS provider", other)),
        }
    }
}

/// Credentials and settings for the selected speech provider.
#[derive(Clone, Debug)]
pub enum TtsSettings {
    Google {
        api_key: String,
        api_base: String,
    },
    ElevenLabs {
        api_key: String,
        api_base: String,
        voice_id: String,
        model: String,
    },
    OpenAi {
        api_key: String,
        voice: String,
    },
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub response_mode: ResponseMode,
    pub output_dir: PathBuf,
    /// `None` only in text-only mode, where no synthesizer is built.
    pub tts: Option<TtsSettings>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address_str = match var("BIND_ADDRESS") {
            Some(address) => address,
            None => format!("0.0.0.0:{}", or_default("PORT", "3000")),
        };
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = or_default("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin = or_default("ALLOWED_ORIGIN", "http://localhost:3000");

        // --- Load Text Generation Settings ---
        let gemini_api_key = required("GEMINI_API_KEY")?;
        let gemini_api_base = or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE);
        let gemini_model = or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL);

        // --- Load Output Settings ---
        let response_mode = match var("RESPONSE_MODE") {
            Some(mode) => mode
                .parse::<ResponseMode>()
                .map_err(|e| ConfigError::InvalidValue("RESPONSE_MODE".to_string(), e))?,
            None => ResponseMode::default(),
        };
        let output_dir = PathBuf::from(or_default("OUTPUT_DIR", "./outputs"));

        // --- Load Speech Settings (skipped entirely in text-only mode) ---
        let tts = if response_mode == ResponseMode::TextOnly {
            None
        } else {
            let provider = or_default("TTS_PROVIDER", "google")
                .parse::<TtsProvider>()
                .map_err(|e| ConfigError::InvalidValue("TTS_PROVIDER".to_string(), e))?;
            Some(match provider {
                TtsProvider::Google => TtsSettings::Google {
                    api_key: required("GOOGLE_TTS_API_KEY")?,
                    api_base: or_default("GOOGLE_TTS_API_BASE", DEFAULT_GOOGLE_TTS_API_BASE),
                },
                TtsProvider::ElevenLabs => TtsSettings::ElevenLabs {
                    api_key: required("ELEVENLABS_API_KEY")?,
                    api_base: or_default("ELEVENLABS_API_BASE", DEFAULT_ELEVENLABS_API_BASE),
                    voice_id: or_default("ELEVENLABS_VOICE_ID", DEFAULT_ELEVENLABS_VOICE_ID),
                    model: or_default("ELEVENLABS_MODEL", DEFAULT_ELEVENLABS_MODEL),
                },
                TtsProvider::OpenAi => TtsSettings::OpenAi {
                    api_key: required("OPENAI_API_KEY")?,
                    voice: or_default("TTS_VOICE", "alloy"),
                },
            })
        };

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            response_mode,
            output_dir,
            tts,
        })
    }
}
