/*!
 * Tests for subtitle track serialization
 */

use anyhow::Result;
use storyreel::app_config::SubtitleConfig;
use storyreel::subtitles::timestamp::{format_timestamp, parse_timestamp};
use storyreel::subtitles::{Cue, CueTiming, SubtitleTrack, TrackFormat};
use crate::common;

fn sample_track(format: TrackFormat) -> SubtitleTrack {
    let mut track = SubtitleTrack::new(format, SubtitleConfig::default(), 1080, 1920);
    track.cues.push(Cue::new(
        CueTiming { start: 1.05, end: 1.15 },
        "{\\k30}It {\\k25}was {\\k55}dark.".to_string(),
    ));
    track.cues.push(Cue::new(
        CueTiming { start: 61.5, end: 3723.456 },
        "Later".to_string(),
    ));
    track
}

/// Test the ASS header carries the canvas size and the default style
#[test]
fn test_to_ass_string_withDefaultStyle_shouldWriteHeaderSections() {
    let ass = sample_track(TrackFormat::Ass).to_ass_string();

    assert!(ass.starts_with("[Script Info]\nScriptType: v4.00+\n"));
    assert!(ass.contains("PlayResX: 1080\nPlayResY: 1920\n"));
    assert!(ass.contains("\n[V4+ Styles]\nFormat: Name, Fontname, Fontsize, PrimaryColour,"));
    assert!(ass.contains(
        "Style: Default,Arial,72,&H0000FFFF,&H00FFFFFF,&H00000000,&H64000000,-1,0,0,0,100,100,0,0,1,3,0,2,60,60,300,1\n"
    ));
    assert!(ass.contains("\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
}

/// Test the dialogue lines use centisecond timestamps and keep the markup
#[test]
fn test_to_ass_string_withCues_shouldWriteDialogueLines() {
    let ass = sample_track(TrackFormat::Ass).to_ass_string();

    assert!(ass.contains("Dialogue: 0,0:00:01.05,0:00:01.15,Default,,0,0,0,,{\\k30}It {\\k25}was {\\k55}dark.\n"));
    assert!(ass.contains("Dialogue: 0,0:01:01.50,1:02:03.46,Default,,0,0,0,,Later\n"));
    assert_eq!(ass.matches("Dialogue:").count(), 2);
}

/// Test that custom style values flow into the style line
#[test]
fn test_to_ass_string_withCustomStyle_shouldReflectStyle() {
    let style = SubtitleConfig {
        font_name: "Montserrat".to_string(),
        font_size: 64,
        bold: false,
        alignment: 5,
        margin_v: 0,
        ..SubtitleConfig::default()
    };
    let track = SubtitleTrack::new(TrackFormat::Ass, style, 720, 1280);
    let ass = track.to_ass_string();

    assert!(ass.contains("Style: Default,Montserrat,64,"));
    assert!(ass.contains(",0,0,0,0,100,100,0,0,1,3,0,5,60,60,0,1\n"));
    assert!(ass.contains("PlayResX: 720\nPlayResY: 1280\n"));
}

/// Test SRT output numbering and millisecond timestamps
#[test]
fn test_to_srt_string_withCues_shouldNumberEntries() {
    let srt = sample_track(TrackFormat::Srt).to_srt_string();

    assert_eq!(
        srt,
        "1\n00:00:01,050 --> 00:00:01,150\n{\\k30}It {\\k25}was {\\k55}dark.\n\n\
         2\n00:01:01,500 --> 01:02:03,456\nLater\n\n"
    );
}

/// Test that an empty track still serializes to a valid header
#[test]
fn test_serialize_withNoCues_shouldWriteHeaderOnly() {
    let track = SubtitleTrack::new(TrackFormat::Ass, SubtitleConfig::default(), 1080, 1920);
    assert!(track.is_empty());

    let ass = track.serialize();
    assert!(ass.contains("[Events]"));
    assert!(!ass.contains("Dialogue:"));
    assert!(SubtitleTrack::new(TrackFormat::Srt, SubtitleConfig::default(), 1080, 1920).serialize().is_empty());
}

/// Test writing the track creates parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested/dir/subtitles.srt");

    let track = sample_track(TrackFormat::Srt);
    track.write_to_file(&path)?;

    assert_eq!(std::fs::read_to_string(&path)?, track.to_srt_string());
    Ok(())
}

/// Test timestamp parsing accepts both formats
#[test]
fn test_parse_timestamp_withBothFormats_shouldReturnSeconds() -> Result<()> {
    assert!((parse_timestamp("0:00:01.05")? - 1.05).abs() < 1e-9);
    assert!((parse_timestamp("01:02:03,456")? - 3723.456).abs() < 1e-9);
    assert!(parse_timestamp("1:2:3").is_err());
    assert!(parse_timestamp("00:61:00,000").is_err());
    Ok(())
}

/// Test that formatting then parsing stays within one unit of resolution
#[test]
fn test_format_timestamp_withParse_shouldStayWithinResolution() -> Result<()> {
    for seconds in [0.0, 0.004, 1.05, 59.995, 3599.999, 7322.5] {
        let ass = parse_timestamp(&format_timestamp(seconds, TrackFormat::Ass))?;
        let srt = parse_timestamp(&format_timestamp(seconds, TrackFormat::Srt))?;
        assert!((ass - seconds).abs() <= 0.005 + 1e-9, "ass {} vs {}", ass, seconds);
        assert!((srt - seconds).abs() <= 0.0005 + 1e-9, "srt {} vs {}", srt, seconds);
    }
    Ok(())
}
