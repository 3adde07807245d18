use std::path::PathBuf;

/// Fixed file names used inside the work directory. Two concurrent runs in
/// the same directory will collide on these.
pub const TEMP_VIDEO: &str = "temp_video.mp4";
pub const TEMP_VIDEO_FALLBACK: &str = "temp_video.webm";
pub const TEMP_AUDIO: &str = "temp_audio.wav";
pub const FRAMES_DIR: &str = "temp_frames";
pub const DEFAULT_OUTPUT: &str = "recipe_info.txt";

/// Everything the pipeline needs besides API keys: where temporary files
/// live, which external tools to invoke, and the frame-sampling parameters.
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub output_path: PathBuf,
    pub yt_dlp_bin: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub tesseract_bin: PathBuf,
    /// OCR every Nth frame, by zero-based frame index.
    pub frame_stride: u32,
    /// Stop after this many frames have been OCR-processed.
    pub max_frame_samples: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            yt_dlp_bin: PathBuf::from("yt-dlp"),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            tesseract_bin: PathBuf::from("tesseract"),
            frame_stride: 30,
            max_frame_samples: 500,
        }
    }
}

impl Config {
    pub fn video_path(&self) -> PathBuf {
        self.work_dir.join(TEMP_VIDEO)
    }

    pub fn fallback_video_path(&self) -> PathBuf {
        self.work_dir.join(TEMP_VIDEO_FALLBACK)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.work_dir.join(TEMP_AUDIO)
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.work_dir.join(FRAMES_DIR)
    }
}

/// Check which of the configured external tools resolve on PATH.
pub fn check_dependencies(config: &Config) -> Vec<(String, bool)> {
    [&config.yt_dlp_bin, &config.ffmpeg_bin, &config.tesseract_bin]
        .into_iter()
        .map(|bin| {
            let available = bin.is_absolute() && bin.exists() || which::which(bin).is_ok();
            (bin.display().to_string(), available)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_paths_land_in_work_dir() {
        let config = Config {
            work_dir: PathBuf::from("/tmp/run"),
            ..Config::default()
        };
        assert_eq!(config.video_path(), PathBuf::from("/tmp/run/temp_video.mp4"));
        assert_eq!(config.audio_path(), PathBuf::from("/tmp/run/temp_audio.wav"));
        assert_eq!(config.frames_dir(), PathBuf::from("/tmp/run/temp_frames"));
    }

    #[test]
    fn check_dependencies_reports_missing_tools() {
        let config = Config {
            yt_dlp_bin: PathBuf::from("definitely-not-a-real-tool"),
            ..Config::default()
        };
        let report = check_dependencies(&config);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0], ("definitely-not-a-real-tool".to_string(), false));
    }
}
