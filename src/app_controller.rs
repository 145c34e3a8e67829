use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::story::Story;
use crate::subtitles::{Segment, SubtitleBuilder};
use crate::tools::whisper::load_transcript;
use crate::tools::{CompositionJob, Toolchain, TranscriptionRequest};

// @module: Application controller for story video rendering

const TITLE_CLIP: &str = "title_narration.mp3";
const BODY_CLIP: &str = "body_narration.mp3";
const NARRATION_CLIP: &str = "narration.mp3";
const STAGE_COUNT: u64 = 6;

/// Audio produced by the narration stage
#[derive(Debug, Clone)]
pub struct Narration {
    /// Title-only clip
    pub title_clip: PathBuf,

    /// Title followed by body
    pub narration_clip: PathBuf,

    /// Length of the title clip in seconds; no subtitles before this point
    pub title_duration: f64,
}

/// Media picked from the asset folders
#[derive(Debug, Clone)]
pub struct Assets {
    pub title_image: PathBuf,
    pub background: PathBuf,
}

/// Subtitle track written by the subtitle stage
#[derive(Debug, Clone)]
pub struct WrittenTrack {
    pub path: PathBuf,
    pub cue_count: usize,
}

/// Summary of a completed render
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub video: PathBuf,
    pub title: String,
    pub title_duration: f64,
    pub cue_count: usize,
    /// Where the track can still be found after the run, if anywhere
    pub subtitles: Option<PathBuf>,
}

/// Work directory for intermediates, removed on drop when temporary
enum WorkDir {
    Kept(PathBuf),
    Temporary(TempDir),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Kept(path) => path,
            WorkDir::Temporary(dir) => dir.path(),
        }
    }
}

/// Main application controller for story video rendering
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: External collaborators
    tools: Toolchain,

    // @field: Draw a stage progress bar
    show_progress: bool,
}

impl Controller {
    /// Create a controller backed by the configured command line tools
    pub fn with_config(config: Config) -> Result<Self> {
        let tools = Toolchain::from_config(&config);
        Self::with_toolchain(config, tools)
    }

    /// Create a controller with explicit collaborators
    pub fn with_toolchain(config: Config, tools: Toolchain) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            tools,
            show_progress: true,
        })
    }

    /// Disable the stage progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline: story, assets, narration, recognition,
    /// subtitles and compositing
    pub async fn run(&self) -> Result<RenderOutcome> {
        let start_time = Instant::now();
        let progress = self.stage_progress();

        progress.set_message("Loading story");
        let story = Story::load(&self.config.paths.story_file, self.config.max_title_chars)
            .map_err(AppError::from)?;
        progress.inc(1);

        // Missing media is cheaper to report before narration and recognition
        progress.set_message("Selecting assets");
        let assets = self.select_assets()?;
        progress.inc(1);

        let work_dir = self.prepare_work_dir()?;
        debug!("Intermediate files in {:?}", work_dir.path());

        progress.set_message("Synthesizing narration");
        let narration = self.synthesize_narration(&story, work_dir.path()).await?;
        progress.inc(1);

        progress.set_message("Transcribing narration");
        let segments = self.transcribe(&narration, work_dir.path()).await?;
        progress.inc(1);

        progress.set_message("Writing subtitles");
        let track = self.write_subtitles(&segments, narration.title_duration, work_dir.path())?;
        progress.inc(1);

        progress.set_message("Rendering video");
        self.compose(&assets, &narration, &track).await?;
        progress.inc(1);
        progress.finish_and_clear();

        let subtitles = match (&work_dir, &self.config.paths.subtitle_output) {
            (_, Some(copy)) => Some(copy.clone()),
            (WorkDir::Kept(_), None) => Some(track.path.clone()),
            (WorkDir::Temporary(_), None) => None,
        };

        info!(
            "Rendered {:?} in {}",
            self.config.paths.output_video,
            Self::format_duration(start_time.elapsed())
        );

        Ok(RenderOutcome {
            video: self.config.paths.output_video.clone(),
            title: story.title,
            title_duration: narration.title_duration,
            cue_count: track.cue_count,
            subtitles,
        })
    }

    /// Synthesize title and body, join them and measure the title
    pub async fn synthesize_narration(&self, story: &Story, work_dir: &Path) -> Result<Narration, AppError> {
        let language = language_utils::normalize_to_part1_or_part2t(&self.config.language)
            .map_err(|e| AppError::Config(e.to_string()))?;

        let title_clip = work_dir.join(TITLE_CLIP);
        let narration_clip = work_dir.join(NARRATION_CLIP);

        self.tools.synthesizer.synthesize(&story.title, &language, &title_clip).await?;

        if story.has_body() {
            let body_clip = work_dir.join(BODY_CLIP);
            self.tools.synthesizer.synthesize(&story.body, &language, &body_clip).await?;
            self.tools.audio.concatenate(&title_clip, &body_clip, &narration_clip).await?;
        } else {
            warn!("Story has no body, narration is the title only");
            FileManager::copy_file(&title_clip, &narration_clip)?;
        }

        let title_duration = self.tools.audio.duration(&title_clip).await?;
        info!("Title narration lasts {:.2}s", title_duration);

        Ok(Narration {
            title_clip,
            narration_clip,
            title_duration,
        })
    }

    /// Recognize the full narration
    pub async fn transcribe(&self, narration: &Narration, work_dir: &Path) -> Result<Vec<Segment>, AppError> {
        let request = TranscriptionRequest {
            language: language_utils::normalize_to_part1_or_part2t(&self.config.language)
                .map_err(|e| AppError::Config(e.to_string()))?,
            word_timestamps: self.config.subtitle.word_timestamps,
            output_dir: work_dir.to_path_buf(),
        };

        let segments = self.tools.transcriber.transcribe(&narration.narration_clip, &request).await?;
        if segments.is_empty() {
            warn!("Recognizer returned no speech segments");
        }
        Ok(segments)
    }

    /// Build the subtitle track and write it once, fully formed
    pub fn write_subtitles(&self, segments: &[Segment], title_cutoff: f64, work_dir: &Path) -> Result<WrittenTrack, AppError> {
        let subtitle = &self.config.subtitle;
        let builder = SubtitleBuilder::new(subtitle.clone(), title_cutoff);
        let track = builder.build_track(segments, self.config.render.width, self.config.render.height)?;

        if track.is_empty() {
            warn!("No subtitle cues survived the title window, the video will have no captions");
        }

        let path = work_dir.join(format!("subtitles.{}", subtitle.format.extension()));
        track.write_to_file(&path)?;
        info!("Subtitles saved as {:?}", path);

        if let Some(copy) = &self.config.paths.subtitle_output {
            FileManager::copy_file(&path, copy)?;
            info!("Subtitle copy saved as {:?}", copy);
        }

        Ok(WrittenTrack {
            path,
            cue_count: track.cues.len(),
        })
    }

    /// Newest title PNG and a random background clip
    pub fn select_assets(&self) -> Result<Assets, AppError> {
        let paths = &self.config.paths;

        let title_image = FileManager::newest_file(&paths.image_folder, "png")
            .map_err(|e| AppError::Asset(e.to_string()))?
            .ok_or_else(|| {
                AppError::Asset(format!("No PNG files found in {}", paths.image_folder.display()))
            })?;
        info!("Using PNG: {:?}", title_image);

        let background = FileManager::random_file(&paths.background_folder, "mp4")
            .map_err(|e| AppError::Asset(e.to_string()))?
            .ok_or_else(|| {
                AppError::Asset(format!("No .mp4 files found in {}", paths.background_folder.display()))
            })?;
        info!("Using background video: {:?}", background);

        Ok(Assets {
            title_image,
            background,
        })
    }

    /// Render the final video
    pub async fn compose(&self, assets: &Assets, narration: &Narration, track: &WrittenTrack) -> Result<(), AppError> {
        let output = &self.config.paths.output_video;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            FileManager::ensure_dir(parent)?;
        }

        let job = CompositionJob {
            background: assets.background.clone(),
            narration: narration.narration_clip.clone(),
            title_image: assets.title_image.clone(),
            subtitles: Self::absolute(&track.path),
            subtitle_format: self.config.subtitle.format,
            fonts_dir: Self::absolute(&FileManager::resolve_fonts_dir(&self.config.paths.fonts_dir)),
            title_cutoff: narration.title_duration,
            output: output.clone(),
        };

        self.tools.compositor.compose(&job).await?;
        Ok(())
    }

    /// Build a track from an existing whisper JSON result, without running any tool
    pub fn subtitles_from_transcript(config: &Config, transcript: &Path, title_cutoff: f64, output: &Path) -> Result<usize> {
        config.validate().context("Configuration validation failed")?;

        let segments = load_transcript(transcript)
            .with_context(|| format!("Failed to load transcript {:?}", transcript))?;

        let builder = SubtitleBuilder::new(config.subtitle.clone(), title_cutoff);
        let track = builder.build_track(&segments, config.render.width, config.render.height)?;
        track
            .write_to_file(output)
            .with_context(|| format!("Failed to write subtitles to {:?}", output))?;

        info!("Wrote {} cue(s) to {:?}", track.cues.len(), output);
        Ok(track.cues.len())
    }

    fn prepare_work_dir(&self) -> Result<WorkDir> {
        match &self.config.paths.work_dir {
            Some(dir) => {
                FileManager::ensure_dir(dir)?;
                Ok(WorkDir::Kept(dir.clone()))
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("storyreel-")
                    .tempdir()
                    .context("Failed to create temporary work directory")?;
                Ok(WorkDir::Temporary(dir))
            }
        }
    }

    fn stage_progress(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(STAGE_COUNT);
        let style = ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }

    fn absolute(path: &Path) -> PathBuf {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }

    /// Format a duration as `1m 05s` or `4.2s`
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
