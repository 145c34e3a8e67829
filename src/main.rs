// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use storyreel::app_config::{self, Config};
use storyreel::subtitles::TrackFormat;
use storyreel::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for TrackFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTrackFormat {
    Ass,
    Srt,
}

impl From<CliTrackFormat> for TrackFormat {
    fn from(cli_format: CliTrackFormat) -> Self {
        match cli_format {
            CliTrackFormat::Ass => TrackFormat::Ass,
            CliTrackFormat::Srt => TrackFormat::Srt,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the story into a video (default command)
    Render(RenderArgs),

    /// Build a subtitle track from an existing whisper JSON result
    Subtitles(SubtitlesArgs),

    /// Generate shell completions for storyreel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Subtitle overrides shared by `render` and `subtitles`
#[derive(Args, Debug, Clone, Default)]
struct SubtitleOverrides {
    /// Subtitle track format
    #[arg(long, value_enum)]
    format: Option<CliTrackFormat>,

    /// Seconds added to every recognized timestamp (may be negative)
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<f64>,

    /// Maximum words per subtitle line
    #[arg(long)]
    max_words: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
struct RenderArgs {
    /// Story text file, title on the first line
    #[arg(short, long)]
    story: Option<PathBuf>,

    /// Output video file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep intermediate audio and subtitle files in this directory
    #[arg(short, long, value_name = "DIR")]
    keep_intermediates: Option<PathBuf>,

    /// Also save the subtitle track to this file
    #[arg(long, value_name = "FILE")]
    subtitle_output: Option<PathBuf>,

    #[command(flatten)]
    subtitle: SubtitleOverrides,
}

#[derive(Args, Debug, Clone)]
struct SubtitlesArgs {
    /// Whisper JSON result to read
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Seconds of title narration; no cue is shown before this point
    #[arg(short, long, default_value_t = 0.0)]
    title_cutoff: f64,

    /// Subtitle file to write
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    subtitle: SubtitleOverrides,
}

/// storyreel - narrated, captioned vertical videos from short stories
///
/// Reads a story, narrates it, transcribes the narration with word timings
/// and renders a 1080x1920 video with karaoke-style subtitles.
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(version)]
#[command(about = "Story to vertical video renderer")]
#[command(long_about = "storyreel narrates a story, transcribes the narration and renders a captioned vertical video.

EXAMPLES:
    storyreel                                   # Render using conf.json
    storyreel -s story.txt -o out/video.mp4     # Override story and output
    storyreel --format srt --max-words 4        # Plain SRT captions, 4 words per line
    storyreel -k work/                          # Keep narration and subtitle files
    storyreel subtitles narration.json -t 2.4 -o subs.ass
    storyreel completions bash > storyreel.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

EXTERNAL TOOLS:
    gtts-cli  - text to speech
    whisper   - speech recognition (openai-whisper)
    ffmpeg    - audio joins and video rendering (ffprobe for durations)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    #[command(flatten)]
    render: RenderArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker for log level
    fn get_marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_colour_for_level(level),
                now,
                Self::get_marker_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is narrowed once the config is known; Trace lets every
    // later set_max_level take effect
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "storyreel", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Subtitles(args)) => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_subtitles(config, args)
        }
        Some(Commands::Render(args)) => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_render(config, args).await
        }
        None => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            run_render(config, cli.render).await
        }
    }
}

/// Load the JSON config, writing a default one when it is missing
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    match cli_log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    Ok(config)
}

fn apply_subtitle_overrides(config: &mut Config, overrides: &SubtitleOverrides) {
    if let Some(format) = overrides.format {
        config.subtitle.format = format.into();
    }
    if let Some(offset) = overrides.offset {
        config.subtitle.timing_offset = offset;
    }
    if let Some(max_words) = overrides.max_words {
        config.subtitle.max_words_per_line = max_words;
    }
}

async fn run_render(mut config: Config, args: RenderArgs) -> Result<()> {
    if let Some(story) = args.story {
        config.paths.story_file = story;
    }
    if let Some(output) = args.output {
        config.paths.output_video = output;
    }
    if let Some(work_dir) = args.keep_intermediates {
        config.paths.work_dir = Some(work_dir);
    }
    if let Some(subtitle_output) = args.subtitle_output {
        config.paths.subtitle_output = Some(subtitle_output);
    }
    apply_subtitle_overrides(&mut config, &args.subtitle);

    let controller = Controller::with_config(config)?;
    let outcome = controller.run().await?;

    info!(
        "Success: {:?} ({} subtitle cue(s), title shown for {:.2}s)",
        outcome.video, outcome.cue_count, outcome.title_duration
    );
    if let Some(subtitles) = outcome.subtitles {
        info!("Subtitles: {:?}", subtitles);
    }

    Ok(())
}

fn run_subtitles(mut config: Config, args: SubtitlesArgs) -> Result<()> {
    apply_subtitle_overrides(&mut config, &args.subtitle);

    let cues = Controller::subtitles_from_transcript(&config, &args.transcript, args.title_cutoff, &args.output)?;
    info!("Success: {:?} ({} cue(s))", args.output, cues);

    Ok(())
}
