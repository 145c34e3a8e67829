/*!
 * Subtitle generation from recognized speech.
 *
 * Recognized segments flow through these submodules in order:
 *
 * - `chunker`: splits each segment's words into display lines
 * - `timing`: applies the sync offset and keeps cues out of the title window
 * - `karaoke`: renders each line as karaoke markup or plain text
 * - `track`: serializes the cues as an ASS or SRT track
 *
 * `timestamp` and `tokens` hold the shared formatting helpers.
 */

use log::{debug, info};

use crate::app_config::SubtitleConfig;
use crate::errors::SubtitleError;

pub use self::chunker::{Chunk, SegmentChunks, chunk_segment};
pub use self::karaoke::{build_karaoke_markup, render_chunk};
pub use self::model::{Cue, CueTiming, Segment, TrackFormat, WordToken};
pub use self::timing::{MIN_CUE_DURATION, TimingAdjuster};
pub use self::track::SubtitleTrack;

pub mod chunker;
pub mod karaoke;
pub mod model;
pub mod timestamp;
pub mod timing;
pub mod tokens;
pub mod track;

/// Turns recognized segments into a subtitle track for one narration
#[derive(Debug, Clone)]
pub struct SubtitleBuilder {
    config: SubtitleConfig,
    adjuster: TimingAdjuster,
}

impl SubtitleBuilder {
    /// Create a builder for a narration whose title clip lasts `title_cutoff` seconds
    pub fn new(config: SubtitleConfig, title_cutoff: f64) -> Self {
        let adjuster = TimingAdjuster::new(title_cutoff, config.timing_offset, config.min_title_gap);
        Self { config, adjuster }
    }

    pub fn adjuster(&self) -> &TimingAdjuster {
        &self.adjuster
    }

    /// Build cues for all segments, in order.
    ///
    /// Any malformed segment fails the whole call; no partial cue list is
    /// returned.
    pub fn build_cues(&self, segments: &[Segment]) -> Result<Vec<Cue>, SubtitleError> {
        let format = self.config.format;
        let mut cues = Vec::new();
        let mut dropped = 0usize;

        for segment in segments {
            for chunk in chunk_segment(segment, self.config.max_words_per_line)? {
                let Some(timing) = self.adjuster.adjust(chunk.raw_start(), chunk.raw_end()) else {
                    dropped += 1;
                    continue;
                };

                match render_chunk(&chunk, format) {
                    Some(text) => cues.push(Cue::new(timing, text)),
                    None => {
                        debug!(
                            "Skipping blank line at {:.2}s-{:.2}s",
                            chunk.raw_start(),
                            chunk.raw_end()
                        );
                        dropped += 1;
                    }
                }
            }
        }

        debug!(
            "Built {} cue(s) from {} segment(s), {} line(s) dropped",
            cues.len(),
            segments.len(),
            dropped
        );

        Ok(cues)
    }

    /// Build a complete track for the given canvas size
    pub fn build_track(&self, segments: &[Segment], width: u32, height: u32) -> Result<SubtitleTrack, SubtitleError> {
        let mut track = SubtitleTrack::new(self.config.format, self.config.clone(), width, height);
        track.cues = self.build_cues(segments)?;

        info!(
            "Generated {} {} cue(s), first cue not before {:.2}s",
            track.cues.len(),
            track.format,
            self.adjuster.earliest_start()
        );

        Ok(track)
    }
}
