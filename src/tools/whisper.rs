use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use super::{TranscriptionRequest, Transcriber, run_tool};
use crate::errors::ToolError;
use crate::subtitles::{Segment, WordToken};

// @module: Speech recognition through the openai-whisper command line

/// Top level of whisper's `--output_format json` result
#[derive(Debug, Deserialize)]
struct WhisperResult {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    start: f64,
    end: f64,
}

impl From<WhisperSegment> for Segment {
    fn from(segment: WhisperSegment) -> Self {
        let words = segment
            .words
            .into_iter()
            .map(|w| WordToken::new(w.word, w.start, w.end))
            .collect();
        Segment::new(segment.start, segment.end, segment.text, words)
    }
}

/// Parse whisper's JSON result into segments
pub fn parse_transcript(json: &str) -> Result<Vec<Segment>, ToolError> {
    let result: WhisperResult = serde_json::from_str(json).map_err(|e| ToolError::InvalidOutput {
        tool: "whisper".to_string(),
        message: format!("failed to parse transcript JSON: {}", e),
    })?;
    Ok(result.segments.into_iter().map(Segment::from).collect())
}

/// Read a whisper JSON result from disk
pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>, ToolError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| ToolError::InvalidOutput {
        tool: "whisper".to_string(),
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_transcript(&json)
}

/// Path of the JSON file whisper writes for `audio` into `output_dir`
pub fn transcript_path(audio: &Path, output_dir: &Path) -> PathBuf {
    let stem = audio.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// The `whisper` command line client
#[derive(Debug, Clone)]
pub struct WhisperCli {
    command: String,
    model: String,
    timeout: Duration,
}

impl WhisperCli {
    pub fn new(command: &str, model: &str, timeout: Duration) -> Self {
        Self {
            command: command.to_string(),
            model: model.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio: &Path, request: &TranscriptionRequest) -> Result<Vec<Segment>, ToolError> {
        let word_timestamps = if request.word_timestamps { "True" } else { "False" };

        let mut command = Command::new(&self.command);
        command
            .arg(audio)
            .args(["--model", self.model.as_str()])
            .args(["--language", request.language.as_str()])
            .args(["--task", "transcribe"])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(&request.output_dir)
            .args(["--word_timestamps", word_timestamps])
            .args(["--fp16", "False"])
            .args(["--verbose", "False"]);

        run_tool(command, &self.command, self.timeout).await?;

        let path = transcript_path(audio, &request.output_dir);
        let segments = load_transcript(&path)?;

        info!("Recognized {} segment(s) with model {}", segments.len(), self.model);
        for segment in &segments {
            debug!(
                "Segment {:.2}s-{:.2}s ({} words): {}",
                segment.start,
                segment.end,
                segment.words.len(),
                segment.text.trim()
            );
        }

        Ok(segments)
    }
}
