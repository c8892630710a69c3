//! crates/persona_voice_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any HTTP framework or serialization format.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Characters the text model uses for markup that a speech engine would read aloud.
pub const MARKUP_CHARS: [char; 5] = ['*', '#', '_', '~', '`'];

/// Raised when a request lacks one of its mandatory fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must contain both a \"persona\" and a \"prompt\" field.")]
    MissingFields,
}

/// A validated request to voice a prompt as a given persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    persona: String,
    prompt: String,
}

impl GenerationRequest {
    /// Builds a request, rejecting absent or blank fields.
    pub fn new(persona: Option<String>, prompt: Option<String>) -> Result<Self, ValidationError> {
        match (non_blank(persona), non_blank(prompt)) {
            (Some(persona), Some(prompt)) => Ok(Self { persona, prompt }),
            _ => Err(ValidationError::MissingFields),
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The single input handed to the text model.
    pub fn composed_prompt(&self) -> String {
        format!("Persona: {}\n\nUser: {}", self.persona, self.prompt)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Model output with markup characters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText(String);

impl GeneratedText {
    /// Strips every markup character from `raw` in a single pass.
    pub fn from_raw(raw: &str) -> Self {
        Self(strip_markup(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for GeneratedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Removes `*`, `#`, `_`, `~` and backticks. Idempotent.
pub fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

/// Encoded audio returned by a speech provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub mime_type: &'static str,
}

impl SynthesizedAudio {
    pub fn mp3(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: "audio/mpeg",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 (with padding), as sent in JSON response bodies.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// The full result of the generate-and-synthesize pipeline.
#[derive(Debug, Clone)]
pub struct Narration {
    pub text: GeneratedText,
    pub audio: SynthesizedAudio,
}

/// Represents an audio file written to disk by the file output mode.
#[derive(Debug, Clone)]
pub struct StoredAudio {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// How a successful result crosses the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Text plus base64 audio in the JSON body.
    #[default]
    Inline,
    /// Audio written to the output directory; the body carries its path.
    File,
    /// Generation only, the synthesizer is never called.
    TextOnly,
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "file" => Ok(Self::File),
            "text" | "text_only" => Ok(Self::TextOnly),
            other => Err(format!("'{}' is not a valid response mode", other)),
        }
    }
}
