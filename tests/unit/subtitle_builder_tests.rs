/*!
 * Tests for turning recognized segments into timed cues
 */

use storyreel::app_config::SubtitleConfig;
use storyreel::errors::SubtitleError;
use storyreel::subtitles::{
    MIN_CUE_DURATION, Segment, SubtitleBuilder, TrackFormat, WordToken, chunk_segment,
};
use crate::common;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn config(max_words: usize) -> SubtitleConfig {
    SubtitleConfig {
        max_words_per_line: max_words,
        ..SubtitleConfig::default()
    }
}

fn timed_words(n: usize, step: f64, first_start: f64) -> Vec<WordToken> {
    (0..n)
        .map(|i| {
            let start = first_start + i as f64 * step;
            WordToken::new(format!(" word{}", i), start, start + step * 0.8)
        })
        .collect()
}

/// Test the reference narration: the first cue straddles the title and gets clamped
#[test]
fn test_build_cues_withSampleNarration_shouldClampFirstCueAfterTitle() {
    common::init_test_logging();
    let builder = SubtitleBuilder::new(config(4), 1.0);
    let cues = builder.build_cues(&common::sample_segments()).unwrap();

    assert_eq!(cues.len(), 3);

    assert!(approx(cues[0].start, 1.05));
    assert!(approx(cues[0].end, 1.15));
    assert_eq!(cues[0].text, "{\\k30}It {\\k25}was {\\k55}dark.");

    assert!(approx(cues[1].start, 1.2));
    assert!(approx(cues[1].end, 2.7));
    assert_eq!(cues[1].text, "{\\k20}The {\\k40}wind {\\k50}howled {\\k40}outside");

    assert!(approx(cues[2].start, 2.7));
    assert!(approx(cues[2].end, 3.0));
    assert_eq!(cues[2].text, "{\\k30}tonight.");
}

/// Test that no cue ever starts inside the title window
#[test]
fn test_build_cues_withLongNarration_shouldNeverStartBeforeCutoffPlusGap() {
    let cutoff = 3.3;
    let builder = SubtitleBuilder::new(config(3), cutoff);
    let segments: Vec<Segment> = (0..10)
        .map(|i| {
            let start = i as f64;
            Segment::new(start, start + 1.0, "", timed_words(5, 0.2, start))
        })
        .collect();

    let cues = builder.build_cues(&segments).unwrap();

    assert!(!cues.is_empty());
    for cue in &cues {
        assert!(cue.start >= cutoff + 0.05 - 1e-9, "cue at {} starts in the title", cue.start);
        assert!(cue.end - cue.start >= MIN_CUE_DURATION - 1e-9);
    }
}

/// Test that cues ending at or before the cutoff are discarded
#[test]
fn test_build_cues_withSegmentEndingAtCutoff_shouldDropIt() {
    let builder = SubtitleBuilder::new(config(3), 2.0);
    let segment = Segment::new(
        1.0,
        2.0,
        "",
        vec![WordToken::new("Title", 1.0, 1.5), WordToken::new("words", 1.5, 2.0)],
    );

    assert!(builder.build_cues(&[segment]).unwrap().is_empty());
}

/// Test that a negative sync offset can push a chunk back into the title window
#[test]
fn test_build_cues_withNegativeOffset_shouldDropShiftedChunk() {
    let subtitle = SubtitleConfig {
        timing_offset: -0.5,
        ..config(3)
    };
    let builder = SubtitleBuilder::new(subtitle, 2.0);
    let segment = Segment::new(2.0, 2.4, "", vec![WordToken::new("late", 2.0, 2.4)]);

    assert!(builder.build_cues(&[segment]).unwrap().is_empty());
}

/// Test that a positive offset shifts cue times but not karaoke durations
#[test]
fn test_build_cues_withPositiveOffset_shouldShiftTimesOnly() {
    let subtitle = SubtitleConfig {
        timing_offset: 0.25,
        ..config(3)
    };
    let builder = SubtitleBuilder::new(subtitle, 0.0);
    let segment = Segment::new(1.0, 2.0, "", vec![WordToken::new("Hello", 1.0, 1.5)]);

    let cues = builder.build_cues(&[segment]).unwrap();
    assert_eq!(cues.len(), 1);
    assert!(approx(cues[0].start, 1.25));
    assert!(approx(cues[0].end, 1.75));
    assert_eq!(cues[0].text, "{\\k50}Hello");
}

/// Test that a chunk collapsed by clamping still gets the minimum duration
#[test]
fn test_build_cues_withChunkEndingInsideGap_shouldKeepMinimumDuration() {
    let builder = SubtitleBuilder::new(config(3), 1.0);
    let segment = Segment::new(0.5, 1.02, "", vec![WordToken::new("so", 0.5, 1.02)]);

    let cues = builder.build_cues(&[segment]).unwrap();
    assert_eq!(cues.len(), 1);
    assert!(approx(cues[0].start, 1.05));
    assert!(approx(cues[0].end, 1.05 + MIN_CUE_DURATION));
}

/// Test that segments without word timing become a single plain cue
#[test]
fn test_build_cues_withoutWordTiming_shouldUseSegmentText() {
    let builder = SubtitleBuilder::new(config(3), 0.0);
    let segment = Segment::new(0.5, 4.0, "  The end,\n  {truly}  ", Vec::new());

    let cues = builder.build_cues(&[segment]).unwrap();
    assert_eq!(cues.len(), 1);
    assert!(approx(cues[0].start, 0.5));
    assert!(approx(cues[0].end, 4.0));
    assert_eq!(cues[0].text, "The end, \\{truly\\}");
}

/// Test that SRT tracks get plain joined text instead of karaoke markup
#[test]
fn test_build_cues_withSrtFormat_shouldJoinWordsPlainly() {
    let subtitle = SubtitleConfig {
        format: TrackFormat::Srt,
        ..config(4)
    };
    let builder = SubtitleBuilder::new(subtitle, 1.0);
    let cues = builder.build_cues(&common::sample_segments()).unwrap();

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["It was dark.", "The wind howled outside", "tonight."]);
}

/// Test that one malformed word fails the whole build
#[test]
fn test_build_cues_withReversedWordTiming_shouldFail() {
    let builder = SubtitleBuilder::new(config(3), 0.0);
    let mut segments = common::sample_segments();
    segments.push(Segment::new(4.0, 5.0, "", vec![WordToken::new("oops", 4.6, 4.2)]));

    match builder.build_cues(&segments) {
        Err(SubtitleError::MalformedWord { index, text, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(text, "oops");
        }
        other => panic!("expected MalformedWord, got {:?}", other),
    }
}

/// Test that a zero chunk size is rejected
#[test]
fn test_chunk_segment_withZeroSize_shouldFail() {
    let segment = &common::sample_segments()[0];
    assert!(matches!(
        chunk_segment(segment, 0),
        Err(SubtitleError::InvalidChunkSize(0))
    ));
}

/// Test that chunks preserve word order and cover every word exactly once
#[test]
fn test_chunk_segment_withVariousSizes_shouldPartitionWordsInOrder() {
    for n in 1..12 {
        let words = timed_words(n, 0.3, 0.0);
        let segment = Segment::new(0.0, n as f64, "", words.clone());

        for k in 1..6 {
            let chunks: Vec<_> = chunk_segment(&segment, k).unwrap().collect();
            assert_eq!(chunks.len(), n.div_ceil(k));

            let mut flattened = Vec::new();
            for chunk in &chunks {
                match chunk {
                    storyreel::subtitles::Chunk::WordLevel(group) => {
                        assert!(!group.is_empty() && group.len() <= k);
                        flattened.extend(group.iter().cloned());
                    }
                    other => panic!("unexpected chunk {:?}", other),
                }
            }
            assert_eq!(flattened, words);
        }
    }
}

/// Test that every cue comes out with start before end and in order
#[test]
fn test_build_track_withSampleNarration_shouldKeepCuesOrdered() {
    let builder = SubtitleBuilder::new(config(2), 0.5);
    let track = builder.build_track(&common::sample_segments(), 1080, 1920).unwrap();

    assert_eq!(track.format, TrackFormat::Ass);
    assert_eq!((track.width, track.height), (1080, 1920));
    for pair in track.cues.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
    for cue in &track.cues {
        assert!(cue.start < cue.end);
    }
}
