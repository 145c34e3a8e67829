/*!
 * Error types for the storyreel application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building a subtitle track
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A word token whose timing cannot be used
    #[error("Malformed word timing for {text:?} (word {index}): start {start}s, end {end}s")]
    MalformedWord {
        /// Position of the word inside its segment
        index: usize,
        /// Word text as recognized
        text: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },

    /// Chunking was asked for zero words per line
    #[error("Invalid chunk size: {0} (at least one word per line is required)")]
    InvalidChunkSize(usize),

    /// The serialized track could not be persisted
    #[error("Failed to write subtitle track: {0}")]
    Write(#[from] std::io::Error),
}

/// Errors raised by external collaborators (speech synthesis, recognition, compositing)
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be started
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        /// Executable name
        tool: String,
        /// Underlying launch error
        #[source]
        source: std::io::Error,
    },

    /// The executable ran but reported failure
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        /// Executable name
        tool: String,
        /// Exit status description
        status: String,
        /// Filtered standard error output
        stderr: String,
    },

    /// The executable did not finish in time
    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Executable name
        tool: String,
        /// Configured limit
        timeout: Duration,
    },

    /// The executable finished but its result could not be understood
    #[error("Unexpected output from {tool}: {message}")]
    InvalidOutput {
        /// Executable name
        tool: String,
        /// What was wrong with the output
        message: String,
    },
}

/// Errors that can occur while loading the story text
#[derive(Error, Debug)]
pub enum StoryError {
    /// The story file does not exist
    #[error("Story file not found: {0}")]
    NotFound(String),

    /// The story file exists but could not be read
    #[error("Failed to read story file {path}: {source}")]
    Unreadable {
        /// Story file path
        path: String,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// The first line of the story is blank
    #[error("Story has no title line")]
    EmptyTitle,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required media asset is missing
    #[error("Asset error: {0}")]
    Asset(String),

    /// Error from the story loader
    #[error("Story error: {0}")]
    Story(#[from] StoryError),

    /// Error from an external tool
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error from subtitle generation
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
