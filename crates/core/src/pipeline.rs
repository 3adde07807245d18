use std::io::ErrorKind;

use tokio::fs;

use crate::acquire::MediaAcquirer;
use crate::analyze::RecipeAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::frames::FrameTextSampler;
use crate::transcribe::SpeechTranscriber;
use crate::types::{MediaArtifact, ScreenText, combine_text};

/// Pipeline stages in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Transcribe,
    SampleFrames,
    Analyze,
    Persist,
    Cleanup,
}

/// Receives stage transitions so a front-end can render progress.
pub trait ProgressSink: Send + Sync {
    fn started(&self, stage: Stage);
    fn finished(&self, stage: Stage, detail: &str);
    /// A soft failure: the stage contributes nothing but the run continues.
    fn degraded(&self, stage: Stage, reason: &str);
}

/// Sink that reports nothing.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn started(&self, _stage: Stage) {}
    fn finished(&self, _stage: Stage, _detail: &str) {}
    fn degraded(&self, _stage: Stage, _reason: &str) {}
}

/// Sequences acquisition, transcription, frame sampling, analysis and
/// persistence for a single run.
///
/// Acquisition and analysis failures abort the run. Transcription and
/// sampling failures degrade to empty contributions. Temporary media files
/// are removed whenever acquisition created them, whether or not analysis
/// succeeded; absence is ignored.
pub struct Pipeline<A, T, S, R> {
    config: Config,
    acquirer: A,
    transcriber: T,
    sampler: S,
    analyzer: R,
}

impl<A, T, S, R> Pipeline<A, T, S, R>
where
    A: MediaAcquirer,
    T: SpeechTranscriber,
    S: FrameTextSampler,
    R: RecipeAnalyzer,
{
    pub fn new(config: Config, acquirer: A, transcriber: T, sampler: S, analyzer: R) -> Self {
        Self {
            config,
            acquirer,
            transcriber,
            sampler,
            analyzer,
        }
    }

    /// Run the whole pipeline for one URL, returning the recipe report that
    /// was written to the output file.
    pub async fn run(&self, url: &str, progress: &dyn ProgressSink) -> Result<String> {
        progress.started(Stage::Acquire);
        // Nothing exists on disk yet, so there is nothing to clean up on
        // this failure path.
        let media = self.acquirer.acquire(url).await?;
        progress.finished(Stage::Acquire, &media.video_path.display().to_string());

        progress.started(Stage::Transcribe);
        let transcript = match self.transcriber.transcribe(&media.audio_path).await {
            Ok(text) => {
                progress.finished(Stage::Transcribe, &format!("{} chars", text.len()));
                text
            }
            Err(e) => {
                log::warn!("transcription unavailable, continuing without it: {e}");
                progress.degraded(Stage::Transcribe, &e.to_string());
                String::new()
            }
        };

        progress.started(Stage::SampleFrames);
        let screen_text = match self.sampler.sample_text(&media.video_path).await {
            Ok(screen_text) => {
                progress.finished(
                    Stage::SampleFrames,
                    &format!("{} fragments", screen_text.fragments.len()),
                );
                screen_text
            }
            Err(e) => {
                log::warn!("screen text unavailable, continuing without it: {e}");
                progress.degraded(Stage::SampleFrames, &e.to_string());
                ScreenText::default()
            }
        };

        let combined = combine_text(&transcript, &screen_text);

        progress.started(Stage::Analyze);
        let report = match self.analyzer.analyze(&combined).await {
            Ok(report) => report,
            Err(e) => {
                // No report to persist, but the media files exist by now.
                self.cleanup(&media, progress).await;
                return Err(e);
            }
        };
        progress.finished(Stage::Analyze, "");

        progress.started(Stage::Persist);
        if let Err(e) = fs::write(&self.config.output_path, &report).await {
            self.cleanup(&media, progress).await;
            return Err(e.into());
        }
        progress.finished(Stage::Persist, &self.config.output_path.display().to_string());

        self.cleanup(&media, progress).await;

        Ok(report)
    }

    async fn cleanup(&self, media: &MediaArtifact, progress: &dyn ProgressSink) {
        progress.started(Stage::Cleanup);
        for path in [&media.video_path, &media.audio_path] {
            match fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => log::warn!("failed to remove {}: {e}", path.display()),
            }
        }
        progress.finished(Stage::Cleanup, "");
    }
}
