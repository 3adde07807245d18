use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use povar_core::{
    ApiTranscriber, ChatAnalyzer, CommandRunner, Config, Pipeline, ProgressSink, Provider, Stage,
    SystemRunner, TesseractSampler, TranscriberConfig, YtDlpAcquirer, check_dependencies,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "povar")]
#[command(
    about = "Download a cooking video, transcribe it, read on-screen text, and extract a structured recipe"
)]
struct Cli {
    /// Video URL. Prompted for interactively when omitted.
    url: Option<String>,

    /// AI provider for recipe analysis
    #[arg(short, long, default_value = "openai")]
    provider: CliProvider,

    /// Output file for the recipe report
    #[arg(short, long, default_value = "recipe_info.txt")]
    output: PathBuf,

    /// Directory for temporary media files
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// OCR every Nth frame
    #[arg(long, default_value_t = 30)]
    stride: u32,

    /// Maximum number of frames to OCR
    #[arg(long, default_value_t = 500)]
    max_frames: u32,

    /// Path to the tesseract binary
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Drives one spinner per pipeline stage.
struct SpinnerProgress {
    active: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }

    fn label(stage: Stage) -> &'static str {
        match stage {
            Stage::Acquire => "Downloading video and extracting audio...",
            Stage::Transcribe => "Transcribing audio...",
            Stage::SampleFrames => "Reading on-screen text...",
            Stage::Analyze => "Analyzing recipe...",
            Stage::Persist => "Saving report...",
            Stage::Cleanup => "Removing temporary files...",
        }
    }

    fn done_label(stage: Stage) -> &'static str {
        match stage {
            Stage::Acquire => "Media ready",
            Stage::Transcribe => "Transcribed",
            Stage::SampleFrames => "Screen text read",
            Stage::Analyze => "Recipe analyzed",
            Stage::Persist => "Report saved",
            Stage::Cleanup => "Temporary files removed",
        }
    }

    fn degraded_label(stage: Stage) -> &'static str {
        match stage {
            Stage::Transcribe => "No transcript",
            Stage::SampleFrames => "No screen text",
            _ => "Skipped",
        }
    }

    /// Clear any spinner left behind by an aborted run.
    fn clear(&self) {
        if let Some(pb) = self.active.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressSink for SpinnerProgress {
    fn started(&self, stage: Stage) {
        let mut active = self.active.lock().unwrap();
        *active = Some(create_spinner(Self::label(stage)));
    }

    fn finished(&self, stage: Stage, detail: &str) {
        if let Some(pb) = self.active.lock().unwrap().take() {
            let suffix = if detail.is_empty() {
                String::new()
            } else {
                format!(" {}", style(format!("({detail})")).dim())
            };
            pb.finish_with_message(format!(
                "{} {}{}",
                style("✓").green().bold(),
                Self::done_label(stage),
                suffix
            ));
        }
    }

    fn degraded(&self, stage: Stage, reason: &str) {
        if let Some(pb) = self.active.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} {} {}",
                style("!").yellow().bold(),
                Self::degraded_label(stage),
                style(format!("({reason})")).dim()
            ));
        }
    }
}

fn prompt_for_url() -> Result<String> {
    print!("{} ", style("Paste the video link:").cyan().bold());
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();
    let transcriber_config = TranscriberConfig::default();

    // Validate API keys early
    for key_check in [
        provider.validate_api_key(),
        transcriber_config.validate_api_key(),
    ] {
        if let Err(e) = key_check {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };
    if url.is_empty() {
        eprintln!("{} no video URL given", style("Error:").red().bold());
        std::process::exit(1);
    }

    println!(
        "\n{}  {}\n",
        style("povar").cyan().bold(),
        style("Recipe Extractor").dim()
    );

    let config = Config {
        work_dir: cli.work_dir,
        output_path: cli.output,
        tesseract_bin: cli.tesseract,
        frame_stride: cli.stride,
        max_frame_samples: cli.max_frames,
        ..Config::default()
    };

    for (tool, available) in check_dependencies(&config) {
        if !available {
            println!(
                "{} {} not found on PATH",
                style("!").yellow().bold(),
                style(tool).bold()
            );
        }
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let pipeline = Pipeline::new(
        config.clone(),
        YtDlpAcquirer::new(config.clone(), runner.clone()),
        ApiTranscriber::new(transcriber_config),
        TesseractSampler::new(config.clone(), runner),
        ChatAnalyzer::new(provider),
    );

    let progress = SpinnerProgress::new();
    let total_start = Instant::now();

    let report = match pipeline.run(&url, &progress).await {
        Ok(report) => report,
        Err(e) => {
            progress.clear();
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(config.output_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", report);

    Ok(())
}
