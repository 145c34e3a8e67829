use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use super::model::{Cue, TrackFormat};
use super::timestamp::format_timestamp;
use crate::app_config::SubtitleConfig;
use crate::errors::SubtitleError;

// @module: Subtitle track serialization

/// Name of the single style every dialogue line refers to
pub const STYLE_NAME: &str = "Default";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// A complete subtitle track, serialized in one piece
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    /// Output variant
    pub format: TrackFormat,

    /// Cues in display order
    pub cues: Vec<Cue>,

    /// Presentation style written into the ASS header
    pub style: SubtitleConfig,

    /// Rendering canvas width in pixels
    pub width: u32,

    /// Rendering canvas height in pixels
    pub height: u32,
}

impl SubtitleTrack {
    pub fn new(format: TrackFormat, style: SubtitleConfig, width: u32, height: u32) -> Self {
        Self {
            format,
            cues: Vec::new(),
            style,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Serialize the track in its own format
    pub fn serialize(&self) -> String {
        match self.format {
            TrackFormat::Ass => self.to_ass_string(),
            TrackFormat::Srt => self.to_srt_string(),
        }
    }

    /// `[Script Info]`, `[V4+ Styles]` and `[Events]` sections
    pub fn to_ass_string(&self) -> String {
        let style = &self.style;
        let mut out = String::new();

        out.push_str("[Script Info]\n");
        out.push_str("ScriptType: v4.00+\n");
        let _ = writeln!(out, "PlayResX: {}", self.width);
        let _ = writeln!(out, "PlayResY: {}", self.height);
        let _ = writeln!(out, "WrapStyle: {}", style.wrap_style);
        out.push_str("ScaledBorderAndShadow: yes\n\n");

        out.push_str("[V4+ Styles]\n");
        out.push_str(STYLE_FORMAT);
        out.push('\n');
        let _ = writeln!(
            out,
            "Style: {},{},{},{},{},{},{},{},0,0,0,100,100,0,0,{},{},{},{},{},{},{},1",
            STYLE_NAME,
            style.font_name,
            style.font_size,
            style.primary_colour,
            style.secondary_colour,
            style.outline_colour,
            style.back_colour,
            if style.bold { -1 } else { 0 },
            style.border_style,
            style.outline,
            style.shadow,
            style.alignment,
            style.margin_l,
            style.margin_r,
            style.margin_v,
        );
        out.push('\n');

        out.push_str("[Events]\n");
        out.push_str(EVENT_FORMAT);
        out.push('\n');
        for cue in &self.cues {
            let _ = writeln!(out, "{}", AssDialogue(cue));
        }

        out
    }

    /// Numbered SubRip cues
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for (i, cue) in self.cues.iter().enumerate() {
            let _ = write!(out, "{}", SrtEntry(i + 1, cue));
        }
        out
    }

    /// Write the fully formed track to `path` in a single write
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())?;
        Ok(())
    }
}

struct AssDialogue<'a>(&'a Cue);

impl fmt::Display for AssDialogue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},,0,0,0,,{}",
            format_timestamp(self.0.start, TrackFormat::Ass),
            format_timestamp(self.0.end, TrackFormat::Ass),
            STYLE_NAME,
            self.0.text
        )
    }
}

struct SrtEntry<'a>(usize, &'a Cue);

impl fmt::Display for SrtEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.0)?;
        writeln!(
            f,
            "{} --> {}",
            format_timestamp(self.1.start, TrackFormat::Srt),
            format_timestamp(self.1.end, TrackFormat::Srt)
        )?;
        writeln!(f, "{}", self.1.text)?;
        writeln!(f)
    }
}
