use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::errors::StoryError;

// @module: Story text loading

/// A story split into its narrated parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// First line, truncated to the configured number of characters
    pub title: String,

    /// Everything after the first line, possibly empty
    pub body: String,
}

impl Story {
    /// Split story text into title and body.
    ///
    /// The title is truncated by characters, never inside a UTF-8 sequence.
    pub fn parse(text: &str, max_title_chars: usize) -> Result<Self, StoryError> {
        let text = text.trim();
        let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));

        let title: String = first_line.trim().chars().take(max_title_chars).collect();
        let title = title.trim_end().to_string();
        if title.is_empty() {
            return Err(StoryError::EmptyTitle);
        }

        Ok(Self {
            title,
            body: rest.trim().to_string(),
        })
    }

    /// Load and split a UTF-8 story file
    pub fn load<P: AsRef<Path>>(path: P, max_title_chars: usize) -> Result<Self, StoryError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoryError::NotFound(path.display().to_string()));
        }

        let text = fs::read_to_string(path).map_err(|source| StoryError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;

        let story = Self::parse(&text, max_title_chars)?;
        info!("Story loaded: {}", story.title);
        debug!("Story body has {} characters", story.body.chars().count());
        Ok(story)
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
