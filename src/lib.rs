/*!
 * # storyreel - short story to vertical video
 *
 * A Rust library that turns a plain-text story into a narrated, captioned
 * 1080x1920 video.
 *
 * ## Features
 *
 * - Title/body narration through a text-to-speech command line tool
 * - Word-level speech recognition of the narration
 * - Subtitle generation:
 *   - Short cues of a few words each
 *   - Karaoke highlighting in ASS (`{\k}` tags)
 *   - Plain SRT output
 *   - No captions while the title card is on screen
 * - Final compositing with ffmpeg (background crop, title overlay, burnt-in subtitles)
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `story`: Story file loading
 * - `subtitles`: Subtitle timing and markup:
 *   - `subtitles::chunker`: Splitting segments into cue-sized chunks
 *   - `subtitles::timing`: Offset and title-window clamping
 *   - `subtitles::karaoke`: Karaoke markup
 *   - `subtitles::track`: ASS and SRT serialization
 * - `tools`: External collaborators:
 *   - `tools::gtts`: Speech synthesis
 *   - `tools::ffmpeg`: Audio joins, probing and video compositing
 *   - `tools::whisper`: Speech recognition
 *   - `tools::mock`: In-process stand-ins for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod story;
pub mod subtitles;
pub mod tools;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, StoryError, SubtitleError, ToolError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part1_or_part2t};
pub use story::Story;
pub use subtitles::{Cue, Segment, SubtitleBuilder, SubtitleTrack, TrackFormat, WordToken};
