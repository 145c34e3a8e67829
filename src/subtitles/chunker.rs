/*!
 * Groups a segment's timed words into display lines.
 *
 * Word-level segments are split into consecutive groups of at most `K`
 * words. A segment without word timing degrades to a single
 * segment-level chunk carrying the segment's own interval and text.
 */

use std::slice::Chunks;

use super::model::{Segment, WordToken};
use crate::errors::SubtitleError;

/// One display line worth of recognized speech
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk<'a> {
    /// Consecutive words with their own timing (1..=K of them)
    WordLevel(&'a [WordToken]),

    /// Whole segment without per-word timing
    SegmentLevel {
        start: f64,
        end: f64,
        text: &'a str,
    },
}

impl Chunk<'_> {
    /// Raw (recognized) start time of the chunk
    pub fn raw_start(&self) -> f64 {
        match self {
            Chunk::WordLevel(words) => words.first().map_or(0.0, |w| w.start),
            Chunk::SegmentLevel { start, .. } => *start,
        }
    }

    /// Raw (recognized) end time of the chunk
    pub fn raw_end(&self) -> f64 {
        match self {
            Chunk::WordLevel(words) => words.last().map_or(0.0, |w| w.end),
            Chunk::SegmentLevel { end, .. } => *end,
        }
    }
}

/// Lazy sequence of chunks over one segment.
///
/// Cloning the iterator restarts it from the current position; a fresh
/// call to [`chunk_segment`] restarts from the beginning.
#[derive(Debug, Clone)]
pub enum SegmentChunks<'a> {
    Words(Chunks<'a, WordToken>),
    Whole(Option<Chunk<'a>>),
}

impl<'a> Iterator for SegmentChunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SegmentChunks::Words(groups) => groups.next().map(Chunk::WordLevel),
            SegmentChunks::Whole(chunk) => chunk.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SegmentChunks::Words(groups) => groups.size_hint(),
            SegmentChunks::Whole(chunk) => {
                let n = usize::from(chunk.is_some());
                (n, Some(n))
            }
        }
    }
}

impl ExactSizeIterator for SegmentChunks<'_> {}

/// Split a segment into chunks of at most `max_words` words.
///
/// The whole segment is validated up front: a zero chunk size or any word
/// with `end < start` rejects the call before a single chunk is produced.
pub fn chunk_segment(segment: &Segment, max_words: usize) -> Result<SegmentChunks<'_>, SubtitleError> {
    if max_words == 0 {
        return Err(SubtitleError::InvalidChunkSize(max_words));
    }

    for (index, word) in segment.words.iter().enumerate() {
        word.validate(index)?;
    }

    if segment.has_word_timing() {
        Ok(SegmentChunks::Words(segment.words.chunks(max_words)))
    } else {
        Ok(SegmentChunks::Whole(Some(Chunk::SegmentLevel {
            start: segment.start,
            end: segment.end,
            text: segment.text.as_str(),
        })))
    }
}
