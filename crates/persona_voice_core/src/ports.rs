//! crates/persona_voice_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete text, speech and storage providers.

use async_trait::async_trait;
use crate::domain::{StoredAudio, SynthesizedAudio};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The upstream API failed, returned a non-success status, or sent a malformed body.
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends the fully composed prompt to the model and returns its raw output.
    async fn complete(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    /// Generates audio data from a string of text.
    async fn generate_audio(&self, text: &str) -> PortResult<SynthesizedAudio>;
}

#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Persists the audio verbatim and reports where it was written.
    async fn save(&self, audio: &SynthesizedAudio) -> PortResult<StoredAudio>;
}
