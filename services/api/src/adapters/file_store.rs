//! services/api/src/adapters/file_store.rs
//!
//! Persists synthesized audio under a local output directory.
//! It implements the `AudioStore` port from the `core` crate.

use async_trait::async_trait;
use chrono::Utc;
use persona_voice_core::{
    ports::{AudioStore, PortError, PortResult},
    StoredAudio, SynthesizedAudio,
};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Writes each clip to `<output_dir>/speech-<timestamp>-<uuid>.mp3`.
#[derive(Clone, Debug)]
pub struct FsAudioStore {
    output_dir: PathBuf,
}

impl FsAudioStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl AudioStore for FsAudioStore {
    async fn save(&self, audio: &SynthesizedAudio) -> PortResult<StoredAudio> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to create output directory: {}", e)))?;

        let created_at = Utc::now();
        let file_name = format!(
            "speech-{}-{}.mp3",
            created_at.format("%Y%m%dT%H%M%SZ"),
            Uuid::new_v4()
        );
        let path = self.output_dir.join(file_name);

        tokio::fs::write(&path, &audio.bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to write audio file: {}", e)))?;

        debug!(bytes = audio.bytes.len(), "Audio written");
        Ok(StoredAudio { path, created_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_directory_and_writes_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path().join("outputs"));

        let stored = store.save(&SynthesizedAudio::mp3(b"ID3 audio".to_vec())).await.unwrap();

        assert!(stored.path.starts_with(dir.path().join("outputs")));
        assert_eq!(stored.path.extension().unwrap(), "mp3");
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"ID3 audio");
    }

    #[tokio::test]
    async fn concurrent_saves_never_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path());

        let first = SynthesizedAudio::mp3(b"first".to_vec());
        let second = SynthesizedAudio::mp3(b"second".to_vec());
        let (a, b) = tokio::join!(store.save(&first), store.save(&second));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.path, b.path);
        assert_eq!(tokio::fs::read(&a.path).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(&b.path).await.unwrap(), b"second");
    }
}
