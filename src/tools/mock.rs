/*!
 * Mock collaborators for testing the pipeline without external programs.
 *
 * Every mock records what it was asked to do. Audio "clips" are small text
 * files so tests can check which text ended up where:
 * - `MockSynthesizer` writes the text it was given
 * - `MockAudio` concatenates files and reports a fixed title duration
 * - `MockTranscriber` returns canned segments
 * - `MockCompositor` writes a placeholder video and keeps the job
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{AudioToolkit, CompositionJob, Compositor, SpeechSynthesizer, Toolchain, TranscriptionRequest, Transcriber};
use crate::errors::ToolError;
use crate::subtitles::Segment;

fn failure(tool: &str) -> ToolError {
    ToolError::Failed {
        tool: tool.to_string(),
        status: "exit status: 1".to_string(),
        stderr: "simulated failure".to_string(),
    }
}

fn write_file(tool: &str, path: &Path, content: &[u8]) -> Result<(), ToolError> {
    std::fs::write(path, content).map_err(|e| ToolError::InvalidOutput {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Records `(text, language, output)` for every synthesis
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    pub calls: Mutex<Vec<(String, String, PathBuf)>>,
    pub fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, language: &str, output: &Path) -> Result<(), ToolError> {
        if self.fail {
            return Err(failure("mock-tts"));
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), language.to_string(), output.to_path_buf()));
        }
        write_file("mock-tts", output, text.as_bytes())
    }
}

/// Concatenates files byte-wise and reports `title_duration` for every probe
#[derive(Debug)]
pub struct MockAudio {
    pub title_duration: f64,
    pub probed: Mutex<Vec<PathBuf>>,
    pub concatenations: Mutex<usize>,
}

impl MockAudio {
    pub fn new(title_duration: f64) -> Self {
        Self {
            title_duration,
            probed: Mutex::new(Vec::new()),
            concatenations: Mutex::new(0),
        }
    }
}

#[async_trait]
impl AudioToolkit for MockAudio {
    async fn concatenate(&self, first: &Path, second: &Path, output: &Path) -> Result<(), ToolError> {
        let read = |path: &Path| {
            std::fs::read(path).map_err(|e| ToolError::InvalidOutput {
                tool: "mock-ffmpeg".to_string(),
                message: e.to_string(),
            })
        };
        let mut joined = read(first)?;
        joined.extend(read(second)?);
        if let Ok(mut count) = self.concatenations.lock() {
            *count += 1;
        }
        write_file("mock-ffmpeg", output, &joined)
    }

    async fn duration(&self, clip: &Path) -> Result<f64, ToolError> {
        if let Ok(mut probed) = self.probed.lock() {
            probed.push(clip.to_path_buf());
        }
        Ok(self.title_duration)
    }
}

/// Returns the same segments for every clip
#[derive(Debug, Default)]
pub struct MockTranscriber {
    pub segments: Vec<Segment>,
    pub requests: Mutex<Vec<TranscriptionRequest>>,
}

impl MockTranscriber {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &Path, request: &TranscriptionRequest) -> Result<Vec<Segment>, ToolError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(self.segments.clone())
    }
}

/// Keeps every job and writes a placeholder output file
#[derive(Debug, Default)]
pub struct MockCompositor {
    pub jobs: Mutex<Vec<CompositionJob>>,
    pub fail: bool,
}

impl MockCompositor {
    pub fn failing() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Compositor for MockCompositor {
    async fn compose(&self, job: &CompositionJob) -> Result<(), ToolError> {
        if self.fail {
            return Err(failure("mock-compositor"));
        }
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job.clone());
        }
        write_file("mock-compositor", &job.output, b"video")
    }
}

/// Handles on the mocks behind a [`Toolchain`], for inspection after a run
#[derive(Debug, Clone)]
pub struct MockTools {
    pub synthesizer: Arc<MockSynthesizer>,
    pub audio: Arc<MockAudio>,
    pub transcriber: Arc<MockTranscriber>,
    pub compositor: Arc<MockCompositor>,
}

impl MockTools {
    pub fn new(title_duration: f64, segments: Vec<Segment>) -> Self {
        Self {
            synthesizer: Arc::new(MockSynthesizer::default()),
            audio: Arc::new(MockAudio::new(title_duration)),
            transcriber: Arc::new(MockTranscriber::new(segments)),
            compositor: Arc::new(MockCompositor::default()),
        }
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            synthesizer: self.synthesizer.clone(),
            audio: self.audio.clone(),
            transcriber: self.transcriber.clone(),
            compositor: self.compositor.clone(),
        }
    }
}
