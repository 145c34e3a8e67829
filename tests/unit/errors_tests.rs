/*!
 * Tests for error types and conversions
 */

use std::time::Duration;
use storyreel::errors::{AppError, StoryError, SubtitleError, ToolError};

/// Test that malformed word errors name the word and its timing
#[test]
fn test_subtitle_error_withMalformedWord_shouldDescribeWord() {
    let error = SubtitleError::MalformedWord {
        index: 2,
        text: "dark".to_string(),
        start: 1.5,
        end: 1.2,
    };
    let message = error.to_string();
    assert!(message.contains("\"dark\""));
    assert!(message.contains("word 2"));
    assert!(message.contains("1.5"));
}

/// Test that tool errors convert into the application error
#[test]
fn test_app_error_fromToolError_shouldWrapIt() {
    let error: AppError = ToolError::Timeout {
        tool: "whisper".to_string(),
        timeout: Duration::from_secs(600),
    }
    .into();

    assert!(matches!(error, AppError::Tool(ToolError::Timeout { .. })));
    assert_eq!(error.to_string(), "Tool error: whisper timed out after 600s");
}

/// Test that story errors convert into the application error
#[test]
fn test_app_error_fromStoryError_shouldWrapIt() {
    let error: AppError = StoryError::NotFound("story.txt".to_string()).into();
    assert_eq!(error.to_string(), "Story error: Story file not found: story.txt");
}

/// Test that io errors become file errors
#[test]
fn test_app_error_fromIoError_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(ref message) if message == "gone"));
}

/// Test that anyhow errors become unknown errors
#[test]
fn test_app_error_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "boom"));
}
