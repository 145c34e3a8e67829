/*!
 * Data types shared by the subtitle pipeline.
 *
 * Times are floating point seconds measured from the start of the
 * concatenated narration clip (title followed by body).
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SubtitleError;

/// A single recognized word with its timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    /// Word text as recognized, possibly with surrounding whitespace
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl WordToken {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Spoken duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check that the timing is usable: finite values with `end >= start`
    pub fn validate(&self, index: usize) -> Result<(), SubtitleError> {
        if !self.start.is_finite() || !self.end.is_finite() || self.end < self.start {
            return Err(SubtitleError::MalformedWord {
                index,
                text: self.text.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A recognized stretch of speech, optionally with word-level timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Full segment text
    #[serde(default)]
    pub text: String,

    /// Word timings, empty when the recognizer did not provide them
    #[serde(default)]
    pub words: Vec<WordToken>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>, words: Vec<WordToken>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words,
        }
    }

    /// Whether per-word timing is available for karaoke rendering
    pub fn has_word_timing(&self) -> bool {
        !self.words.is_empty()
    }
}

/// Final display interval of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueTiming {
    pub start: f64,
    pub end: f64,
}

impl CueTiming {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A timed subtitle display unit, ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Start time in seconds, after offset and clamping
    pub start: f64,

    /// End time in seconds, after offset and clamping
    pub end: f64,

    /// Rendered text: karaoke markup, escaped plain text or raw plain text
    /// depending on the track format
    pub text: String,
}

impl Cue {
    pub fn new(timing: CueTiming, text: String) -> Self {
        Self {
            start: timing.start,
            end: timing.end,
            text,
        }
    }
}

/// Output subtitle file variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFormat {
    /// Styled Advanced SubStation Alpha track with karaoke highlighting
    #[default]
    Ass,
    /// Numbered SubRip cues with plain text
    Srt,
}

impl TrackFormat {
    /// File extension used for tracks of this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ass => "ass",
            Self::Srt => "srt",
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for TrackFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ass" | "ssa" => Ok(Self::Ass),
            "srt" => Ok(Self::Srt),
            _ => Err(anyhow::anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}
