//! Povar Core Library
//!
//! Core functionality for downloading cooking videos, transcribing speech,
//! reading on-screen text from sampled frames, and extracting structured
//! recipe reports with an AI provider.

pub mod acquire;
pub mod analyze;
pub mod config;
pub mod error;
pub mod frames;
pub mod pipeline;
pub mod process;
pub mod provider;
pub mod transcribe;
pub mod types;

// Re-export commonly used items at crate root
pub use acquire::{MediaAcquirer, YtDlpAcquirer};
pub use analyze::{ChatAnalyzer, RecipeAnalyzer};
pub use config::{Config, check_dependencies};
pub use error::{PovarError, Result};
pub use frames::{FrameTextSampler, TesseractSampler};
pub use pipeline::{Pipeline, ProgressSink, SilentProgress, Stage};
pub use process::{CommandRunner, ProcessOutput, SystemRunner};
pub use provider::{Provider, ProviderConfig, TranscriberConfig};
pub use transcribe::{ApiTranscriber, SpeechTranscriber};
pub use types::{MediaArtifact, ScreenText, combine_text};
