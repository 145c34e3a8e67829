/*!
 * Sync offset and title-window clamping for cue timing.
 *
 * Body subtitles must never show while the title image is on screen. The
 * title window is `[0, title_cutoff]`; cues may start no earlier than
 * `title_cutoff + min_gap`.
 */

use log::trace;

use super::model::CueTiming;

/// Smallest display duration a cue can end up with after clamping
pub const MIN_CUE_DURATION: f64 = 0.01;

/// Applies the global sync offset and enforces the title exclusion window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingAdjuster {
    /// Duration of the title narration in seconds
    pub title_cutoff: f64,

    /// Signed correction added to every raw timestamp
    pub offset: f64,

    /// Buffer between the end of the title narration and the first cue
    pub min_gap: f64,
}

impl TimingAdjuster {
    pub fn new(title_cutoff: f64, offset: f64, min_gap: f64) -> Self {
        Self {
            title_cutoff,
            offset,
            min_gap,
        }
    }

    /// Earliest time any cue may start
    pub fn earliest_start(&self) -> f64 {
        (self.title_cutoff + self.min_gap).max(0.0)
    }

    /// Compute the display interval for a chunk with the given raw bounds.
    ///
    /// Returns `None` when the chunk belongs to the title period, either
    /// before or after the offset is applied.
    pub fn adjust(&self, raw_start: f64, raw_end: f64) -> Option<CueTiming> {
        if raw_end <= self.title_cutoff {
            trace!("Dropping chunk ending at {:.3}s inside the title window", raw_end);
            return None;
        }

        let start = raw_start + self.offset;
        let end = raw_end + self.offset;

        if end <= self.title_cutoff {
            trace!(
                "Dropping chunk ending at {:.3}s after a {:+.3}s offset",
                end,
                self.offset
            );
            return None;
        }

        let start = start.max(self.earliest_start());
        let end = end.max(start + MIN_CUE_DURATION);

        Some(CueTiming { start, end })
    }
}
