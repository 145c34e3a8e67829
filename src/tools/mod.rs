/*!
 * External collaborators used by the video pipeline.
 *
 * Each stage that depends on an outside program goes through a trait so the
 * pipeline can run against real tools or in-process mocks:
 * - `gtts`: speech synthesis through `gtts-cli`
 * - `ffmpeg`: audio concatenation, duration probing and video compositing
 * - `whisper`: speech recognition through the `whisper` CLI
 * - `mock`: deterministic stand-ins for tests
 */

use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::Config;
use crate::errors::ToolError;
use crate::subtitles::{Segment, TrackFormat};

pub mod ffmpeg;
pub mod gtts;
pub mod mock;
pub mod whisper;

/// Turns text into a spoken audio clip
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize `text` in `language` (ISO 639-1) into `output`
    async fn synthesize(&self, text: &str, language: &str, output: &Path) -> Result<(), ToolError>;
}

/// Joins audio clips and measures them
#[async_trait]
pub trait AudioToolkit: Send + Sync + Debug {
    /// Write `first` followed by `second` into `output`
    async fn concatenate(&self, first: &Path, second: &Path, output: &Path) -> Result<(), ToolError>;

    /// Duration of a clip in seconds
    async fn duration(&self, clip: &Path) -> Result<f64, ToolError>;
}

/// Parameters for a recognition run
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// ISO 639-1 language code
    pub language: String,

    /// Ask for per-word timing
    pub word_timestamps: bool,

    /// Where the recognizer may write its own files
    pub output_dir: PathBuf,
}

/// Recognizes speech in an audio clip
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Ordered recognized segments, with word timing when requested and available
    async fn transcribe(&self, audio: &Path, request: &TranscriptionRequest) -> Result<Vec<Segment>, ToolError>;
}

/// Everything the compositor needs for one render
#[derive(Debug, Clone)]
pub struct CompositionJob {
    pub background: PathBuf,
    pub narration: PathBuf,
    pub title_image: PathBuf,
    pub subtitles: PathBuf,
    pub subtitle_format: TrackFormat,
    pub fonts_dir: PathBuf,
    /// The title image is shown during `[0, title_cutoff]`
    pub title_cutoff: f64,
    pub output: PathBuf,
}

/// Renders the final video
#[async_trait]
pub trait Compositor: Send + Sync + Debug {
    async fn compose(&self, job: &CompositionJob) -> Result<(), ToolError>;
}

/// The set of collaborators a pipeline run uses
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub audio: Arc<dyn AudioToolkit>,
    pub transcriber: Arc<dyn Transcriber>,
    pub compositor: Arc<dyn Compositor>,
}

impl Toolchain {
    /// Real command line tools as configured
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.tools.timeout_secs);
        let tools = &config.tools;

        Self {
            synthesizer: Arc::new(gtts::GttsCli::new(&tools.tts_command, timeout)),
            audio: Arc::new(ffmpeg::FfmpegAudio::new(&tools.ffmpeg, &tools.ffprobe, timeout)),
            transcriber: Arc::new(whisper::WhisperCli::new(
                &tools.whisper_command,
                &tools.whisper_model,
                timeout,
            )),
            compositor: Arc::new(ffmpeg::FfmpegCompositor::new(
                &tools.ffmpeg,
                timeout,
                config.render.clone(),
                config.subtitle.clone(),
            )),
        }
    }
}

/// Run an external program to completion, failing on timeout or non-zero exit
pub async fn run_tool(mut command: Command, tool: &str, timeout: Duration) -> Result<Output, ToolError> {
    command.stdin(Stdio::null()).kill_on_drop(true);
    debug!("Running {}: {:?}", tool, command.as_std());

    let output = tokio::select! {
        result = command.output() => {
            result.map_err(|source| ToolError::Spawn { tool: tool.to_string(), source })?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(ToolError::Timeout { tool: tool.to_string(), timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: filter_tool_stderr(&stderr),
        });
    }

    Ok(output)
}

/// Keep only the meaningful tail of a tool's stderr, without the ffmpeg
/// version banner, build configuration and stream metadata noise.
pub fn filter_tool_stderr(stderr: &str) -> String {
    const NOISE_PREFIXES: &[&str] = &[
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];
    const MAX_LINES: usize = 20;

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        return "no error output".to_string();
    }

    meaningful[meaningful.len().saturating_sub(MAX_LINES)..].join("\n")
}
