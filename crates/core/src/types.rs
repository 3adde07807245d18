use std::path::PathBuf;

/// Local media files produced by acquisition. Both are transient: the
/// pipeline removes them at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaArtifact {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
}

/// On-screen text recognized from sampled frames, ordered by frame index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenText {
    pub fragments: Vec<String>,
}

impl ScreenText {
    pub fn joined(&self) -> String {
        self.fragments.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Combine the transcript and the screen text into the analyzer input.
///
/// The layout is fixed: transcript, a blank line, then the newline-joined
/// fragments. Either side may be empty when its stage degraded.
pub fn combine_text(transcript: &str, screen_text: &ScreenText) -> String {
    format!("{}\n\n{}", transcript, screen_text.joined())
}
