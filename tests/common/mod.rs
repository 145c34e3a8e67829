/*!
 * Common test utilities for the storyreel test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use storyreel::Config;
use storyreel::subtitles::{Segment, WordToken};

/// Initialize env_logger once for tests that want log output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Set a file's modification time relative to now
pub fn set_modified_ago(path: &Path, ago: Duration) -> Result<()> {
    let file = fs::File::options().write(true).open(path)?;
    file.set_modified(SystemTime::now() - ago)?;
    Ok(())
}

/// The narration used across the pipeline tests: a one second title and
/// a body whose first segment straddles the end of the title
pub fn sample_segments() -> Vec<Segment> {
    vec![
        Segment::new(
            0.0,
            2.0,
            " It was dark.",
            vec![
                WordToken::new(" It", 0.00, 0.30),
                WordToken::new(" was", 0.30, 0.55),
                WordToken::new(" dark", 0.55, 1.10),
                WordToken::new(".", 1.10, 1.15),
            ],
        ),
        Segment::new(
            1.2,
            3.0,
            " The wind howled outside tonight.",
            vec![
                WordToken::new(" The", 1.20, 1.40),
                WordToken::new(" wind", 1.40, 1.80),
                WordToken::new(" howled", 1.80, 2.30),
                WordToken::new(" outside", 2.30, 2.70),
                WordToken::new(" tonight.", 2.70, 3.00),
            ],
        ),
    ]
}

/// Whisper JSON equivalent of `sample_segments`
pub const SAMPLE_TRANSCRIPT_JSON: &str = r#"{
    "text": " It was dark. The wind howled outside tonight.",
    "segments": [
        {"id": 0, "start": 0.0, "end": 2.0, "text": " It was dark.",
         "words": [
            {"word": " It", "start": 0.0, "end": 0.3, "probability": 0.97},
            {"word": " was", "start": 0.3, "end": 0.55, "probability": 0.98},
            {"word": " dark", "start": 0.55, "end": 1.1, "probability": 0.95},
            {"word": ".", "start": 1.1, "end": 1.15, "probability": 0.91}
         ]},
        {"id": 1, "start": 1.2, "end": 3.0, "text": " The wind howled outside tonight.",
         "words": [
            {"word": " The", "start": 1.2, "end": 1.4, "probability": 0.99},
            {"word": " wind", "start": 1.4, "end": 1.8, "probability": 0.99},
            {"word": " howled", "start": 1.8, "end": 2.3, "probability": 0.93},
            {"word": " outside", "start": 2.3, "end": 2.7, "probability": 0.96},
            {"word": " tonight.", "start": 2.7, "end": 3.0, "probability": 0.94}
         ]}
    ],
    "language": "en"
}"#;

/// A workspace with a story, a title image and a background clip, and a
/// config pointing at it
pub struct TestWorkspace {
    pub dir: TempDir,
    pub config: Config,
}

impl TestWorkspace {
    pub fn new(story: &str) -> Result<Self> {
        let dir = create_temp_dir()?;
        let root = dir.path();

        create_test_file(root, "story.txt", story)?;
        create_test_file(root, "images/title.png", "png")?;
        create_test_file(root, "backgrounds/forest.mp4", "mp4")?;
        fs::create_dir_all(root.join("fonts"))?;

        let mut config = Config::default();
        config.paths.story_file = root.join("story.txt");
        config.paths.image_folder = root.join("images");
        config.paths.background_folder = root.join("backgrounds");
        config.paths.fonts_dir = root.join("fonts");
        config.paths.output_video = root.join("out/video.mp4");
        config.paths.work_dir = Some(root.join("work"));
        config.subtitle.max_words_per_line = 4;

        Ok(Self { dir, config })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
