//! crates/persona_voice_core/src/orchestrator.rs
//!
//! Sequences text generation and speech synthesis into a single operation.
//!
//! Each request walks `Idle -> Validating -> Generating -> Synthesizing -> Done`,
//! and any stage may drop straight to `Failed`. Nothing is retried and nothing is
//! returned from a run that did not reach `Done`.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::{GeneratedText, GenerationRequest, Narration, SynthesizedAudio};
use crate::ports::{PortError, TextGenerationService, TextToSpeechService};

//=========================================================================================
// Pipeline Stages and Errors
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Generating,
    Synthesizing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Generating => "generating",
            Stage::Synthesizing => "synthesizing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The single error surface of the pipeline, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Text generation failed: {0}")]
    Generation(#[source] PortError),
    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[source] PortError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Generation(_) => Stage::Generating,
            PipelineError::Synthesis(_) => Stage::Synthesizing,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

//=========================================================================================
// The Orchestrator
//=========================================================================================

/// Holds the injected upstream clients. Cheap to clone and safe to share across requests.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn TextGenerationService>,
    synthesizer: Option<Arc<dyn TextToSpeechService>>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerationService>,
        synthesizer: Arc<dyn TextToSpeechService>,
    ) -> Self {
        Self {
            generator,
            synthesizer: Some(synthesizer),
        }
    }

    /// An orchestrator that can only generate text.
    pub fn text_only(generator: Arc<dyn TextGenerationService>) -> Self {
        Self {
            generator,
            synthesizer: None,
        }
    }

    pub fn can_synthesize(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Composes the persona prompt, calls the model and strips markup from its answer.
    pub async fn generate(&self, request: &GenerationRequest) -> PipelineResult<GeneratedText> {
        transition(Stage::Validating, Stage::Generating);
        let raw = self
            .generator
            .complete(&request.composed_prompt())
            .await
            .map_err(|e| fail(PipelineError::Generation(e)))?;

        let text = GeneratedText::from_raw(&raw);
        debug!(cleaned_text = %text, "Generated text (cleaned)");
        Ok(text)
    }

    /// Turns already-cleaned text into audio.
    pub async fn synthesize(&self, text: &GeneratedText) -> PipelineResult<SynthesizedAudio> {
        let synthesizer = self.synthesizer.as_ref().ok_or_else(|| {
            fail(PipelineError::Synthesis(PortError::Unexpected(
                "no speech synthesizer is configured".to_string(),
            )))
        })?;

        transition(Stage::Generating, Stage::Synthesizing);
        let audio = synthesizer
            .generate_audio(text.as_str())
            .await
            .map_err(|e| fail(PipelineError::Synthesis(e)))?;

        info!(bytes = audio.bytes.len(), "Audio content generated");
        Ok(audio)
    }

    /// Runs generation then synthesis. The synthesizer only ever sees cleaned text,
    /// and a synthesis failure discards the generated text.
    pub async fn generate_and_synthesize(
        &self,
        request: &GenerationRequest,
    ) -> PipelineResult<Narration> {
        let text = self.generate(request).await?;
        let audio = self.synthesize(&text).await?;
        transition(Stage::Synthesizing, Stage::Done);
        Ok(Narration { text, audio })
    }
}

fn transition(from: Stage, to: Stage) {
    debug!(%from, %to, "Pipeline stage transition");
}

fn fail(err: PipelineError) -> PipelineError {
    error!(stage = %err.stage(), to = %Stage::Failed, "Pipeline failed: {}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct EchoGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl EchoGenerator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl TextGenerationService for EchoGenerator {
        async fn complete(&self, prompt: &str) -> PortResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PortError::Upstream("model unavailable".to_string()));
            }
            Ok(format!("**{}** _said_ `this`", prompt))
        }
    }

    struct RecordingSynthesizer {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingSynthesizer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl TextToSpeechService for RecordingSynthesizer {
        async fn generate_audio(&self, text: &str) -> PortResult<SynthesizedAudio> {
            self.seen.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(PortError::Upstream("voice rejected".to_string()));
            }
            Ok(SynthesizedAudio::mp3(text.as_bytes().to_vec()))
        }
    }

    fn request(persona: &str, prompt: &str) -> GenerationRequest {
        GenerationRequest::new(Some(persona.to_string()), Some(prompt.to_string())).unwrap()
    }

    #[tokio::test]
    async fn synthesizer_receives_cleaned_text() {
        let generator = EchoGenerator::new(false);
        let synthesizer = RecordingSynthesizer::new(false);
        let orchestrator = Orchestrator::new(generator.clone(), synthesizer.clone());

        let narration = orchestrator
            .generate_and_synthesize(&request("pirate", "Tell me about the sea"))
            .await
            .unwrap();

        assert_eq!(
            narration.text.as_str(),
            "Persona: pirate\n\nUser: Tell me about the sea said this"
        );
        assert_eq!(
            synthesizer.seen.lock().unwrap().as_slice(),
            [narration.text.as_str().to_string()]
        );
        assert_eq!(narration.audio.bytes.as_ref(), narration.text.as_str().as_bytes());
    }

    #[tokio::test]
    async fn generation_failure_skips_synthesis() {
        let generator = EchoGenerator::new(true);
        let synthesizer = RecordingSynthesizer::new(false);
        let orchestrator = Orchestrator::new(generator.clone(), synthesizer.clone());

        let err = orchestrator
            .generate_and_synthesize(&request("pirate", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Generating);
        assert!(synthesizer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn synthesis_failure_calls_generator_once() {
        let generator = EchoGenerator::new(false);
        let synthesizer = RecordingSynthesizer::new(true);
        let orchestrator = Orchestrator::new(generator.clone(), synthesizer.clone());

        let err = orchestrator
            .generate_and_synthesize(&request("pirate", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Synthesis(PortError::Upstream(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(synthesizer.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn text_only_orchestrator_refuses_to_synthesize() {
        let orchestrator = Orchestrator::text_only(EchoGenerator::new(false));
        assert!(!orchestrator.can_synthesize());

        let text = orchestrator.generate(&request("bard", "sing")).await.unwrap();
        assert!(!text.as_str().contains('*'));

        let err = orchestrator.synthesize(&text).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Synthesizing);
    }

    #[tokio::test]
    async fn concurrent_runs_keep_their_own_payloads() {
        let orchestrator =
            Orchestrator::new(EchoGenerator::new(false), RecordingSynthesizer::new(false));

        let (a, b) = futures::future::join(
            orchestrator.generate_and_synthesize(&request("pirate", "sea")),
            orchestrator.generate_and_synthesize(&request("knight", "castle")),
        )
        .await;
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(a.text.as_str().contains("pirate") && a.text.as_str().contains("sea"));
        assert!(b.text.as_str().contains("knight") && b.text.as_str().contains("castle"));
        assert_eq!(a.audio.bytes.as_ref(), a.text.as_str().as_bytes());
        assert_eq!(b.audio.bytes.as_ref(), b.text.as_str().as_bytes());
    }
}
