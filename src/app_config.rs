use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::subtitles::TrackFormat;

// @const: ASS colour literal, &HBBGGRR or &HAABBGGRR
static ASS_COLOUR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&H([0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})&?$").unwrap()
});

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Narration language code (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of characters kept from the story's first line
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Subtitle style and timing
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Video rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// File system locations used by a run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    // @field: Story text, title on the first line
    #[serde(default = "default_story_file")]
    pub story_file: PathBuf,

    // @field: Folder holding the title PNG
    #[serde(default = "default_image_folder")]
    pub image_folder: PathBuf,

    // @field: Folder holding background MP4 clips
    #[serde(default = "default_background_folder")]
    pub background_folder: PathBuf,

    // @field: Fonts passed to the subtitle renderer
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,

    // @field: Rendered video
    #[serde(default = "default_output_video")]
    pub output_video: PathBuf,

    /// Directory for intermediate files; a temporary directory is used
    /// and removed afterwards when unset
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Where to keep a copy of the generated subtitle track
    #[serde(default)]
    pub subtitle_output: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            story_file: default_story_file(),
            image_folder: default_image_folder(),
            background_folder: default_background_folder(),
            fonts_dir: default_fonts_dir(),
            output_video: default_output_video(),
            work_dir: None,
            subtitle_output: None,
        }
    }
}

/// Subtitle presentation and timing.
///
/// Colours use the ASS `&HAABBGGRR` notation. In karaoke tracks the primary
/// colour is the highlight and the secondary colour is the not-yet-spoken
/// base colour.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleConfig {
    /// Track variant to produce
    #[serde(default)]
    pub format: TrackFormat,

    /// Request word-level timestamps from the recognizer
    #[serde(default = "default_true")]
    pub word_timestamps: bool,

    #[serde(default = "default_font_name")]
    pub font_name: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_primary_colour")]
    pub primary_colour: String,

    #[serde(default = "default_secondary_colour")]
    pub secondary_colour: String,

    #[serde(default = "default_outline_colour")]
    pub outline_colour: String,

    #[serde(default = "default_back_colour")]
    pub back_colour: String,

    #[serde(default = "default_true")]
    pub bold: bool,

    /// 1 = outline and drop shadow, 3 = opaque box
    #[serde(default = "default_border_style")]
    pub border_style: u8,

    #[serde(default = "default_outline")]
    pub outline: f32,

    #[serde(default)]
    pub shadow: f32,

    /// Numpad-style alignment, 2 = bottom centre
    #[serde(default = "default_alignment")]
    pub alignment: u8,

    #[serde(default = "default_margin_h")]
    pub margin_l: u32,

    #[serde(default = "default_margin_h")]
    pub margin_r: u32,

    #[serde(default = "default_margin_v")]
    pub margin_v: u32,

    /// ASS WrapStyle header value
    #[serde(default)]
    pub wrap_style: u8,

    /// Words per displayed line
    #[serde(default = "default_max_words_per_line")]
    pub max_words_per_line: usize,

    /// Signed correction in seconds added to every recognized timestamp
    #[serde(default)]
    pub timing_offset: f64,

    /// Seconds between the end of the title narration and the first cue
    #[serde(default = "default_min_title_gap")]
    pub min_title_gap: f64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            format: TrackFormat::default(),
            word_timestamps: true,
            font_name: default_font_name(),
            font_size: default_font_size(),
            primary_colour: default_primary_colour(),
            secondary_colour: default_secondary_colour(),
            outline_colour: default_outline_colour(),
            back_colour: default_back_colour(),
            bold: true,
            border_style: default_border_style(),
            outline: default_outline(),
            shadow: 0.0,
            alignment: default_alignment(),
            margin_l: default_margin_h(),
            margin_r: default_margin_h(),
            margin_v: default_margin_v(),
            wrap_style: 0,
            max_words_per_line: default_max_words_per_line(),
            timing_offset: 0.0,
            min_title_gap: default_min_title_gap(),
        }
    }
}

impl SubtitleConfig {
    /// Style overrides for renderers that take plain SubRip input
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},Fontsize={},PrimaryColour={},OutlineColour={},BorderStyle={},Outline={},Shadow={},Alignment={},MarginV={}",
            self.font_name,
            self.font_size,
            self.primary_colour,
            self.outline_colour,
            self.border_style,
            self.outline,
            self.shadow,
            self.alignment,
            self.margin_v
        )
    }

    fn validate(&self) -> Result<()> {
        if self.max_words_per_line == 0 {
            return Err(anyhow!("subtitle.max_words_per_line must be at least 1"));
        }
        if !self.timing_offset.is_finite() {
            return Err(anyhow!("subtitle.timing_offset must be a finite number"));
        }
        if !self.min_title_gap.is_finite() || self.min_title_gap < 0.0 {
            return Err(anyhow!("subtitle.min_title_gap must be a non-negative number"));
        }
        if self.font_size == 0 {
            return Err(anyhow!("subtitle.font_size must be positive"));
        }
        for (name, colour) in [
            ("primary_colour", &self.primary_colour),
            ("secondary_colour", &self.secondary_colour),
            ("outline_colour", &self.outline_colour),
            ("back_colour", &self.back_colour),
        ] {
            if !ASS_COLOUR_REGEX.is_match(colour) {
                return Err(anyhow!(
                    "subtitle.{} must use the &HAABBGGRR notation, got {:?}",
                    name,
                    colour
                ));
            }
        }
        Ok(())
    }
}

/// Video rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Maximum width of the title image overlay in pixels
    #[serde(default = "default_overlay_max_width")]
    pub overlay_max_width: u32,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            overlay_max_width: default_overlay_max_width(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            sample_rate: default_sample_rate(),
            pixel_format: default_pixel_format(),
        }
    }
}

/// External tool settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolsConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,

    /// Text-to-speech command line client
    #[serde(default = "default_tts_command")]
    pub tts_command: String,

    /// Speech recognition command line client
    #[serde(default = "default_whisper_command")]
    pub whisper_command: String,

    #[serde(default = "default_whisper_model")]
    pub whisper_model: String,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            tts_command: default_tts_command(),
            whisper_command: default_whisper_command(),
            whisper_model: default_whisper_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_max_title_chars() -> usize {
    23
}

fn default_story_file() -> PathBuf {
    PathBuf::from("story.txt")
}

fn default_image_folder() -> PathBuf {
    PathBuf::from("images")
}

fn default_background_folder() -> PathBuf {
    PathBuf::from("backgrounds")
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_output_video() -> PathBuf {
    PathBuf::from("output.mp4")
}

fn default_true() -> bool {
    true
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    72
}

fn default_primary_colour() -> String {
    // Yellow highlight
    "&H0000FFFF".to_string()
}

fn default_secondary_colour() -> String {
    "&H00FFFFFF".to_string()
}

fn default_outline_colour() -> String {
    "&H00000000".to_string()
}

fn default_back_colour() -> String {
    "&H64000000".to_string()
}

fn default_border_style() -> u8 {
    1
}

fn default_outline() -> f32 {
    3.0
}

fn default_alignment() -> u8 {
    2
}

fn default_margin_h() -> u32 {
    60
}

fn default_margin_v() -> u32 {
    300
}

fn default_max_words_per_line() -> usize {
    3
}

fn default_min_title_gap() -> f64 {
    0.05
}

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    1920
}

fn default_overlay_max_width() -> u32 {
    864
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_pixel_format() -> String {
    "yuv420p".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_tts_command() -> String {
    "gtts-cli".to_string()
}

fn default_whisper_command() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "small.en".to_string()
}

fn default_timeout_secs() -> u64 {
    600 // model download on first recognition run can be slow
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let language = crate::language_utils::normalize_to_part1_or_part2t(&self.language)?;

        // English-only whisper models cannot transcribe other languages
        if self.tools.whisper_model.ends_with(".en") && !crate::language_utils::language_codes_match(&language, "en") {
            return Err(anyhow!(
                "Whisper model {} only supports English, but language is {}",
                self.tools.whisper_model,
                self.language
            ));
        }

        if self.max_title_chars == 0 {
            return Err(anyhow!("max_title_chars must be at least 1"));
        }

        self.subtitle.validate()?;

        if self.render.width == 0 || self.render.height == 0 {
            return Err(anyhow!("render.width and render.height must be positive"));
        }
        if self.render.overlay_max_width == 0 {
            return Err(anyhow!("render.overlay_max_width must be positive"));
        }

        if self.tools.timeout_secs == 0 {
            return Err(anyhow!("tools.timeout_secs must be positive"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            max_title_chars: default_max_title_chars(),
            paths: PathsConfig::default(),
            subtitle: SubtitleConfig::default(),
            render: RenderConfig::default(),
            tools: ToolsConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
