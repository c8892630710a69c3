pub mod domain;
pub mod orchestrator;
pub mod ports;

pub use domain::{
    strip_markup, GeneratedText, GenerationRequest, Narration, ResponseMode, StoredAudio,
    SynthesizedAudio, ValidationError, MARKUP_CHARS,
};
pub use orchestrator::{Orchestrator, PipelineError, PipelineResult, Stage};
pub use ports::{AudioStore, PortError, PortResult, TextGenerationService, TextToSpeechService};
