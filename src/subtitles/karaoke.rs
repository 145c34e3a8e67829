use std::fmt::Write;

use super::chunker::Chunk;
use super::model::{TrackFormat, WordToken};
use super::tokens::{escape_ass_text, is_punctuation, join_tokens, needs_leading_space, normalize_whitespace};

// @module: Per-line text rendering (karaoke markup and plain text)

/// Highlight duration of a word in centiseconds, never below one
pub fn karaoke_centiseconds(word: &WordToken) -> u64 {
    let centis = (word.duration() * 100.0).round();
    if centis.is_finite() && centis >= 1.0 {
        centis as u64
    } else {
        1
    }
}

/// Render words as an ASS karaoke line: `{\k30}It {\k25}was {\k55}dark.`
///
/// Word durations come from the original, unclamped word timings. Punctuation
/// tokens attach to the previous word and carry no highlight directive.
/// Returns `None` when nothing printable is left.
pub fn build_karaoke_markup(words: &[WordToken]) -> Option<String> {
    let mut markup = String::new();

    for word in words {
        let token = word.text.trim();
        if token.is_empty() {
            continue;
        }

        if is_punctuation(token) {
            markup.push_str(&escape_ass_text(token));
            continue;
        }

        if needs_leading_space(token, markup.is_empty()) {
            markup.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(markup, "{{\\k{}}}{}", karaoke_centiseconds(word), escape_ass_text(token));
    }

    let markup = markup.trim();
    if markup.is_empty() {
        None
    } else {
        Some(markup.to_string())
    }
}

/// Render one chunk as cue text for the given track format
pub fn render_chunk(chunk: &Chunk<'_>, format: TrackFormat) -> Option<String> {
    let text = match (chunk, format) {
        (Chunk::WordLevel(words), TrackFormat::Ass) => return build_karaoke_markup(words),
        (Chunk::WordLevel(words), TrackFormat::Srt) => join_tokens(words.iter().map(|w| w.text.as_str())),
        (Chunk::SegmentLevel { text, .. }, TrackFormat::Ass) => escape_ass_text(text),
        (Chunk::SegmentLevel { text, .. }, TrackFormat::Srt) => normalize_whitespace(text),
    };

    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}
