use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;

use crate::config::Config;
use crate::error::{PovarError, Result};
use crate::process::CommandRunner;
use crate::types::MediaArtifact;

/// Produces local media files for a video URL.
#[async_trait]
pub trait MediaAcquirer: Send + Sync {
    async fn acquire(&self, url: &str) -> Result<MediaArtifact>;
}

/// Downloads with yt-dlp, re-encoding with ffmpeg when the preferred mp4
/// container is not available, then extracts the audio track.
pub struct YtDlpAcquirer {
    config: Config,
    runner: Arc<dyn CommandRunner>,
}

impl YtDlpAcquirer {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    async fn download(&self, url: &str) -> Result<PathBuf> {
        let output_template = self.config.work_dir.join("temp_video.%(ext)s");
        let args: Vec<OsString> = vec![
            url.into(),
            "-f".into(),
            "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4".into(),
            "--extractor-args".into(),
            "youtube:player_client=android,web".into(),
            "--quiet".into(),
            "-o".into(),
            output_template.into_os_string(),
        ];
        let output = self.runner.run(&self.config.yt_dlp_bin, &args).await?;

        if !output.success {
            return Err(PovarError::DownloadFailed {
                url: url.to_string(),
                reason: output.stderr_lossy(),
            });
        }

        let video_path = self.config.video_path();
        if fs::try_exists(&video_path).await? {
            return Ok(video_path);
        }

        // Downloader fell back to webm; re-encode into the preferred
        // container and drop the intermediate.
        let fallback = self.config.fallback_video_path();
        if fs::try_exists(&fallback).await? {
            log::info!("converting {} to mp4", fallback.display());
            self.transcode(&fallback, &video_path).await?;
            fs::remove_file(&fallback).await?;
            return Ok(video_path);
        }

        Err(PovarError::DownloadFailed {
            url: url.to_string(),
            reason: "downloader produced no video file".to_string(),
        })
    }

    async fn transcode(&self, source: &Path, dest: &Path) -> Result<()> {
        let args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            source.as_os_str().to_os_string(),
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "aac".into(),
            dest.as_os_str().to_os_string(),
        ];
        let output = self.runner.run(&self.config.ffmpeg_bin, &args).await?;

        if !output.success {
            return Err(PovarError::TranscodeFailed {
                path: source.to_path_buf(),
                reason: output.stderr_lossy(),
            });
        }

        Ok(())
    }

    async fn extract_audio(&self, video_path: &Path) -> Result<PathBuf> {
        let audio_path = self.config.audio_path();
        let args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            video_path.as_os_str().to_os_string(),
            "-vn".into(),
            "-acodec".into(),
            "pcm_s16le".into(),
            "-ar".into(),
            "16000".into(),
            "-ac".into(),
            "1".into(),
            audio_path.clone().into_os_string(),
        ];
        let output = self.runner.run(&self.config.ffmpeg_bin, &args).await?;

        if !output.success {
            return Err(PovarError::AudioExtractionFailed {
                video_path: video_path.to_path_buf(),
                reason: output.stderr_lossy(),
            });
        }

        Ok(audio_path)
    }
}

#[async_trait]
impl MediaAcquirer for YtDlpAcquirer {
    async fn acquire(&self, url: &str) -> Result<MediaArtifact> {
        let video_path = self.download(url).await?;
        let audio_path = self.extract_audio(&video_path).await?;
        Ok(MediaArtifact {
            video_path,
            audio_path,
        })
    }
}
