use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;

use crate::config::Config;
use crate::error::{PovarError, Result};
use crate::process::CommandRunner;
use crate::types::ScreenText;

/// Reads on-screen text from sampled video frames.
#[async_trait]
pub trait FrameTextSampler: Send + Sync {
    async fn sample_text(&self, video_path: &Path) -> Result<ScreenText>;
}

/// Samples every Nth frame with ffmpeg and runs each through the tesseract
/// binary.
///
/// An unreadable source is an error the caller may degrade; a failed OCR on
/// an individual frame is logged and skipped.
pub struct TesseractSampler {
    config: Config,
    runner: Arc<dyn CommandRunner>,
}

impl TesseractSampler {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Decode the video, keeping every `frame_stride`-th frame as a
    /// grayscale png, capped at `max_frame_samples` images.
    async fn dump_frames(&self, video_path: &Path, frames_dir: &Path) -> Result<()> {
        let filter = format!(
            "select=not(mod(n\\,{})),format=gray",
            self.config.frame_stride
        );
        let pattern = frames_dir.join("frame_%06d.png");
        let args: Vec<OsString> = vec![
            "-i".into(),
            video_path.as_os_str().to_os_string(),
            "-vf".into(),
            filter.into(),
            "-vsync".into(),
            "vfr".into(),
            "-frames:v".into(),
            self.config.max_frame_samples.to_string().into(),
            pattern.into_os_string(),
        ];
        let output = self.runner.run(&self.config.ffmpeg_bin, &args).await?;

        if !output.success {
            return Err(PovarError::UnreadableMedia {
                path: video_path.to_path_buf(),
                reason: output.stderr_lossy(),
            });
        }

        Ok(())
    }

    async fn ocr_frame(&self, frame: &Path) -> Result<String> {
        let args: Vec<OsString> = vec![frame.as_os_str().to_os_string(), "stdout".into()];
        let output = self.runner.run(&self.config.tesseract_bin, &args).await?;

        if !output.success {
            return Err(PovarError::OcrFailed {
                frame: frame.to_path_buf(),
                reason: output.stderr_lossy(),
            });
        }

        Ok(output.stdout_lossy().trim().to_string())
    }

    /// Dumped frames sorted by name; the zero-padded numbering makes that
    /// frame-index order.
    fn list_frames(frames_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut frames: Vec<PathBuf> = std::fs::read_dir(frames_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        frames.sort();
        Ok(frames)
    }
}

#[async_trait]
impl FrameTextSampler for TesseractSampler {
    async fn sample_text(&self, video_path: &Path) -> Result<ScreenText> {
        let frames_dir = self.config.frames_dir();
        // Stale frames from an aborted run would pollute the scan.
        if fs::try_exists(&frames_dir).await? {
            fs::remove_dir_all(&frames_dir).await?;
        }
        fs::create_dir_all(&frames_dir).await?;

        if let Err(e) = self.dump_frames(video_path, &frames_dir).await {
            let _ = fs::remove_dir_all(&frames_dir).await;
            return Err(e);
        }

        let frames = Self::list_frames(&frames_dir)?;
        let mut fragments = Vec::new();
        let mut processed = 0usize;
        for frame in frames.iter().take(self.config.max_frame_samples as usize) {
            processed += 1;
            match self.ocr_frame(frame).await {
                Ok(text) if !text.is_empty() => fragments.push(text),
                Ok(_) => {}
                Err(e) => log::warn!("skipping frame: {e}"),
            }
        }
        log::info!(
            "OCR processed {} sampled frames, {} with text",
            processed,
            fragments.len()
        );

        let _ = fs::remove_dir_all(&frames_dir).await;

        Ok(ScreenText { fragments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAMES_DIR;
    use crate::process::testing::{ScriptedCall, ScriptedRunner};

    fn config_in(dir: &Path) -> Config {
        Config {
            work_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    fn frame_path(dir: &Path, index: u32) -> PathBuf {
        dir.join(FRAMES_DIR).join(format!("frame_{index:06}.png"))
    }

    #[tokio::test]
    async fn encodes_stride_and_cap_into_decode_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new(vec![ScriptedCall::ok()]));
        let sampler = TesseractSampler::new(config_in(dir.path()), runner.clone());

        let screen_text = sampler.sample_text(&dir.path().join("v.mp4")).await.unwrap();

        assert!(screen_text.is_empty());
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        let args = &calls[0].1;
        assert!(args.contains(&OsString::from("select=not(mod(n\\,30)),format=gray")));
        assert!(args.contains(&OsString::from("500")));
    }

    #[tokio::test]
    async fn unopenable_source_is_unreadable_media() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new(vec![ScriptedCall::fail(
            "moov atom not found",
        )]));
        let sampler = TesseractSampler::new(config_in(dir.path()), runner);

        let err = sampler
            .sample_text(&dir.path().join("v.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, PovarError::UnreadableMedia { .. }));
        assert!(!dir.path().join(FRAMES_DIR).exists());
    }

    #[tokio::test]
    async fn collects_nonempty_fragments_in_frame_order() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new(vec![
            ScriptedCall::ok()
                .creating(frame_path(dir.path(), 1), b"png")
                .creating(frame_path(dir.path(), 2), b"png")
                .creating(frame_path(dir.path(), 3), b"png"),
            ScriptedCall::ok_with_stdout("2 cups flour\n"),
            ScriptedCall::ok_with_stdout("   \n"),
            ScriptedCall::ok_with_stdout("mix well"),
        ]));
        let sampler = TesseractSampler::new(config_in(dir.path()), runner.clone());

        let screen_text = sampler.sample_text(&dir.path().join("v.mp4")).await.unwrap();

        assert_eq!(
            screen_text.fragments,
            vec!["2 cups flour".to_string(), "mix well".to_string()]
        );
        // one decode call plus one OCR call per dumped frame
        assert_eq!(runner.calls().len(), 4);
        // scratch directory is gone afterwards
        assert!(!dir.path().join(FRAMES_DIR).exists());
    }

    #[tokio::test]
    async fn per_frame_ocr_failure_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ScriptedRunner::new(vec![
            ScriptedCall::ok()
                .creating(frame_path(dir.path(), 1), b"png")
                .creating(frame_path(dir.path(), 2), b"png")
                .creating(frame_path(dir.path(), 3), b"png"),
            ScriptedCall::ok_with_stdout("preheat oven"),
            ScriptedCall::fail("cannot read image"),
            ScriptedCall::ok_with_stdout("350 degrees"),
        ]));
        let sampler = TesseractSampler::new(config_in(dir.path()), runner);

        let screen_text = sampler.sample_text(&dir.path().join("v.mp4")).await.unwrap();

        assert_eq!(
            screen_text.fragments,
            vec!["preheat oven".to_string(), "350 degrees".to_string()]
        );
    }

    #[tokio::test]
    async fn never_processes_more_than_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            max_frame_samples: 2,
            ..config_in(dir.path())
        };
        let runner = Arc::new(ScriptedRunner::new(vec![
            // decoder overshooting the cap must not widen the scan
            ScriptedCall::ok()
                .creating(frame_path(dir.path(), 1), b"png")
                .creating(frame_path(dir.path(), 2), b"png")
                .creating(frame_path(dir.path(), 3), b"png"),
            ScriptedCall::ok_with_stdout("one"),
            ScriptedCall::ok_with_stdout("two"),
        ]));
        let sampler = TesseractSampler::new(config, runner.clone());

        let screen_text = sampler.sample_text(&dir.path().join("v.mp4")).await.unwrap();

        assert_eq!(
            screen_text.fragments,
            vec!["one".to_string(), "two".to_string()]
        );
        assert_eq!(runner.calls().len(), 3);
    }
}
