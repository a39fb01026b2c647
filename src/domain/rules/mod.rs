// Domain rules - Keep-segment planning

use crate::domain::errors::*;
use crate::domain::model::*;

/// Keep intervals separated by less than this are coalesced. Absorbs
/// millisecond rounding and avoids near-empty segments between cuts.
pub const MERGE_TOLERANCE_MS: i64 = 50;

/// Turns detected silences into the intervals to retain
pub struct KeepSegmentPlanner;

impl KeepSegmentPlanner {
    /// Plan keep intervals for a media of `total` length.
    ///
    /// A forward-only cursor walks the silences. Content before each silence
    /// is kept, extended `padding_ms` into the silence; the cursor then jumps
    /// to `padding_ms` before the silence ends, never moving backward. Keep
    /// intervals closer than [`MERGE_TOLERANCE_MS`] (including overlapping
    /// ones) are merged in a final pass.
    pub fn plan(
        total: MediaDuration,
        silences: &[Interval],
        padding_ms: u64,
    ) -> Result<Vec<Interval>, DomainError> {
        Self::validate_inputs(total, silences)?;

        let total_ms = total.as_ms();
        let mut keep = Vec::with_capacity(silences.len() + 1);
        let mut cursor = 0u64;

        for silence in silences {
            if silence.start_ms > cursor + padding_ms {
                let end = (silence.start_ms + padding_ms).min(total_ms);
                keep.push(Interval {
                    start_ms: cursor,
                    end_ms: end,
                });
            }
            cursor = silence.end_ms.saturating_sub(padding_ms).max(cursor);
        }

        if cursor < total_ms {
            keep.push(Interval {
                start_ms: cursor,
                end_ms: total_ms,
            });
        }

        Ok(Self::merge_close(keep))
    }

    /// Coalesce intervals whose gap is below the merge tolerance
    pub fn merge_close(intervals: Vec<Interval>) -> Vec<Interval> {
        let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match merged.last_mut() {
                Some(last) if last.gap_to(&interval) < MERGE_TOLERANCE_MS => {
                    last.end_ms = last.end_ms.max(interval.end_ms);
                }
                _ => merged.push(interval),
            }
        }
        merged
    }

    /// Trim silences to the media length. Decoded audio can run a few
    /// milliseconds past the container duration.
    pub fn clip_to_duration(total: MediaDuration, silences: &[Interval]) -> Vec<Interval> {
        let total_ms = total.as_ms();
        silences
            .iter()
            .filter(|silence| silence.start_ms < total_ms)
            .map(|silence| Interval {
                start_ms: silence.start_ms,
                end_ms: silence.end_ms.min(total_ms),
            })
            .collect()
    }

    /// Reject inputs the cursor scan cannot honour
    pub fn validate_inputs(total: MediaDuration, silences: &[Interval]) -> Result<(), DomainError> {
        if total.as_ms() == 0 {
            return Err(DomainError::InvalidDuration(
                "media duration must be greater than zero".to_string(),
            ));
        }

        let mut previous_start = 0u64;
        for (index, silence) in silences.iter().enumerate() {
            if silence.start_ms >= silence.end_ms {
                return Err(DomainError::InvalidInterval(format!(
                    "silence #{} has start {}ms >= end {}ms",
                    index, silence.start_ms, silence.end_ms
                )));
            }
            if !silence.fits_within(total) {
                return Err(DomainError::InvalidInterval(format!(
                    "silence #{} ends at {}ms, past media end {}ms",
                    index,
                    silence.end_ms,
                    total.as_ms()
                )));
            }
            if silence.start_ms < previous_start {
                return Err(DomainError::UnsortedIntervals(format!(
                    "silence #{} starts at {}ms, before the previous start {}ms",
                    index, silence.start_ms, previous_start
                )));
            }
            previous_start = silence.start_ms;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
