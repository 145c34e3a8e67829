/*!
 * Integration tests for building subtitle files from recognition results
 */

use anyhow::Result;

use storyreel::Controller;
use storyreel::app_config::Config;
use storyreel::file_utils::FileManager;
use storyreel::subtitles::TrackFormat;
use storyreel::subtitles::timestamp::parse_timestamp;
use crate::common;

fn dialogue_times(ass: &str) -> Result<Vec<(f64, f64)>> {
    ass.lines()
        .filter_map(|line| line.strip_prefix("Dialogue: "))
        .map(|rest| {
            let fields: Vec<&str> = rest.splitn(10, ',').collect();
            Ok((parse_timestamp(fields[1])?, parse_timestamp(fields[2])?))
        })
        .collect()
}

/// Test the offline workflow from a whisper JSON file to an ASS track
#[test]
fn test_subtitles_from_transcript_withWhisperJson_shouldWriteKaraokeTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "narration.json", common::SAMPLE_TRANSCRIPT_JSON)?;
    let output = temp_dir.path().join("subs/narration.ass");

    let mut config = Config::default();
    config.subtitle.max_words_per_line = 4;

    let count = Controller::subtitles_from_transcript(&config, &transcript, 1.0, &output)?;
    assert_eq!(count, 3);

    let ass = FileManager::read_to_string(&output)?;
    assert!(ass.starts_with("[Script Info]"));
    assert!(ass.contains("{\\k30}It {\\k25}was {\\k55}dark."));

    let times = dialogue_times(&ass)?;
    assert_eq!(times.len(), 3);
    assert!(times.iter().all(|(start, end)| *start >= 1.05 - 1e-9 && start < end));
    Ok(())
}

/// Test that a later title cutoff removes the cues it covers
#[test]
fn test_subtitles_from_transcript_withLongTitle_shouldDropCoveredCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "narration.json", common::SAMPLE_TRANSCRIPT_JSON)?;
    let output = temp_dir.path().join("narration.ass");

    let mut config = Config::default();
    config.subtitle.max_words_per_line = 4;

    // Only the last word ends after 2.8s
    let count = Controller::subtitles_from_transcript(&config, &transcript, 2.8, &output)?;
    assert_eq!(count, 1);

    let times = dialogue_times(&FileManager::read_to_string(&output)?)?;
    assert!((times[0].0 - 2.85).abs() < 1e-9);
    assert!((times[0].1 - 3.0).abs() < 1e-9);
    Ok(())
}

/// Test the SRT variant with a sync offset
#[test]
fn test_subtitles_from_transcript_withSrtAndOffset_shouldShiftCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "narration.json", common::SAMPLE_TRANSCRIPT_JSON)?;
    let output = temp_dir.path().join("narration.srt");

    let mut config = Config::default();
    config.subtitle.format = TrackFormat::Srt;
    config.subtitle.max_words_per_line = 2;
    config.subtitle.timing_offset = 0.5;

    Controller::subtitles_from_transcript(&config, &transcript, 0.0, &output)?;

    let srt = FileManager::read_to_string(&output)?;
    assert!(srt.starts_with("1\n00:00:00,500 --> 00:00:01,050\nIt was\n\n2\n00:00:01,050 --> 00:00:01,650\ndark.\n\n"));
    assert!(srt.contains("\nThe wind\n"));
    assert!(srt.contains("\nhowled outside\n"));
    assert!(srt.trim_end().ends_with("tonight."));
    Ok(())
}

/// Test that segments without word timing fall back to whole-segment cues
#[test]
fn test_subtitles_from_transcript_withoutWordTiming_shouldUseSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = r#"{"segments": [
        {"start": 0.0, "end": 2.5, "text": " My Story. Once upon a time"},
        {"start": 2.5, "end": 5.0, "text": " there was {nothing}."}
    ]}"#;
    let transcript = common::create_test_file(temp_dir.path(), "plain.json", json)?;
    let output = temp_dir.path().join("plain.ass");

    let count = Controller::subtitles_from_transcript(&Config::default(), &transcript, 1.2, &output)?;
    assert_eq!(count, 2);

    let ass = FileManager::read_to_string(&output)?;
    assert!(ass.contains("Dialogue: 0,0:00:01.25,0:00:02.50,Default,,0,0,0,,My Story. Once upon a time\n"));
    assert!(ass.contains("Dialogue: 0,0:00:02.50,0:00:05.00,Default,,0,0,0,,there was \\{nothing\\}.\n"));
    Ok(())
}

/// Test that an unreadable transcript is reported and nothing is written
#[test]
fn test_subtitles_from_transcript_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    let output = temp_dir.path().join("broken.ass");

    assert!(Controller::subtitles_from_transcript(&Config::default(), &transcript, 0.0, &output).is_err());
    assert!(!output.exists());
    Ok(())
}

/// Test that reversed word timing aborts the track without writing it
#[test]
fn test_subtitles_from_transcript_withReversedWord_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let json = r#"{"segments": [
        {"start": 0.0, "end": 1.0, "text": " Bad", "words": [{"word": " Bad", "start": 0.9, "end": 0.4}]}
    ]}"#;
    let transcript = common::create_test_file(temp_dir.path(), "bad.json", json)?;
    let output = temp_dir.path().join("bad.ass");

    let error = Controller::subtitles_from_transcript(&Config::default(), &transcript, 0.0, &output).unwrap_err();
    assert!(error.to_string().contains("Malformed word timing"));
    assert!(!output.exists());
    Ok(())
}
