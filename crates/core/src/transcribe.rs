use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::error::{PovarError, Result};
use crate::provider::TranscriberConfig;

/// Turns an audio file into plain transcript text.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads the audio file to a hosted speech-to-text endpoint and returns
/// the transcript verbatim.
pub struct ApiTranscriber {
    config: TranscriberConfig,
    client: reqwest::Client,
}

impl ApiTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SpeechTranscriber for ApiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let api_key = self.config.validate_api_key()?;
        let audio = tokio::fs::read(audio_path).await?;

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let form = multipart::Form::new().text("model", self.config.model).part(
            "file",
            multipart::Part::bytes(audio)
                .file_name(file_name)
                .mime_str("audio/wav")?,
        );

        let response = self
            .client
            .post(self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PovarError::TranscriptionFailed {
                audio_path: audio_path.to_path_buf(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let transcription: TranscriptionResponse = response.json().await?;
        Ok(transcription.text)
    }
}
