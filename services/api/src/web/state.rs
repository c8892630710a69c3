//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::ConfigError;
use persona_voice_core::{ports::AudioStore, Orchestrator, ResponseMode};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// How a successful pipeline result leaves the server, with the store the file mode needs.
#[derive(Clone)]
pub enum OutputMode {
    Inline,
    File(Arc<dyn AudioStore>),
    TextOnly,
}

impl OutputMode {
    pub fn response_mode(&self) -> ResponseMode {
        match self {
            OutputMode::Inline => ResponseMode::Inline,
            OutputMode::File(_) => ResponseMode::File,
            OutputMode::TextOnly => ResponseMode::TextOnly,
        }
    }
}

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub output: OutputMode,
}

impl AppState {
    /// Inline and file output both need audio, so they require an orchestrator with a synthesizer.
    pub fn new(orchestrator: Orchestrator, output: OutputMode) -> Result<Self, ConfigError> {
        if !matches!(output, OutputMode::TextOnly) && !orchestrator.can_synthesize() {
            return Err(ConfigError::InvalidValue(
                "RESPONSE_MODE".to_string(),
                format!(
                    "{:?} output requires a speech synthesizer",
                    output.response_mode()
                ),
            ));
        }
        Ok(Self {
            orchestrator,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use persona_voice_core::ports::{PortResult, TextGenerationService};

    struct Silent;

    #[async_trait]
    impl TextGenerationService for Silent {
        async fn complete(&self, _prompt: &str) -> PortResult<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn audio_output_without_a_synthesizer_is_rejected() {
        let text_only = || Orchestrator::text_only(Arc::new(Silent));

        assert!(matches!(
            AppState::new(text_only(), OutputMode::Inline),
            Err(ConfigError::InvalidValue(ref var, _)) if var == "RESPONSE_MODE"
        ));
        assert!(AppState::new(text_only(), OutputMode::TextOnly).is_ok());
    }
}
