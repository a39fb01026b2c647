//! RMS window scan for silent stretches in mono PCM audio.
//!
//! A window of `min_silence_ms` slides over the audio one millisecond at a
//! time. Windows whose RMS is at or below the threshold are silent; runs of
//! silent window starts are grouped into intervals that end one window
//! length after the last silent start.

use crate::domain::model::{Interval, Waveform};

/// Peak magnitude of a signed 16-bit sample
pub const FULL_SCALE_I16: f64 = 32768.0;

/// Convert a dBFS level to a 16-bit sample amplitude
pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0) * FULL_SCALE_I16
}

/// Detect silent intervals in `waveform`.
///
/// Returns intervals sorted by start and non-overlapping. Audio shorter than
/// the window has no silences. A zero `min_silence_ms` scans with a 1 ms
/// window.
pub fn detect_silence(waveform: &Waveform, threshold_db: f64, min_silence_ms: u64) -> Vec<Interval> {
    let window = min_silence_ms.max(1);
    let len_ms = waveform.duration_ms();
    if len_ms < window {
        return Vec::new();
    }

    let energy = MillisecondEnergy::new(waveform, len_ms);
    let threshold = db_to_amplitude(threshold_db);
    let threshold_sq = threshold * threshold;

    let mut ranges = Vec::new();
    // (range start, previous silent window start)
    let mut current: Option<(u64, u64)> = None;

    for start in 0..=(len_ms - window) {
        if !energy.is_quiet(start, start + window, threshold_sq) {
            continue;
        }
        current = match current {
            None => Some((start, start)),
            Some((range_start, prev)) => {
                let continuous = start == prev + 1;
                let has_gap = start > prev + window;
                if !continuous && has_gap {
                    ranges.push(Interval {
                        start_ms: range_start,
                        end_ms: prev + window,
                    });
                    Some((start, start))
                } else {
                    Some((range_start, start))
                }
            }
        };
    }

    if let Some((range_start, prev)) = current {
        ranges.push(Interval {
            start_ms: range_start,
            end_ms: prev + window,
        });
    }

    ranges
}

/// Prefix sums of squared samples at every millisecond boundary
struct MillisecondEnergy {
    /// Sample index at each millisecond boundary
    frames: Vec<usize>,
    /// Sum of squares of all samples before each boundary
    prefix: Vec<u64>,
}

impl MillisecondEnergy {
    fn new(waveform: &Waveform, len_ms: u64) -> Self {
        let sample_count = waveform.samples.len();
        let rate = waveform.sample_rate as u64;

        let mut frames = Vec::with_capacity(len_ms as usize + 1);
        let mut prefix = Vec::with_capacity(len_ms as usize + 1);
        let mut running = 0u64;
        let mut cursor = 0usize;

        for ms in 0..=len_ms {
            let frame = ((ms * rate / 1000) as usize).min(sample_count);
            for &sample in &waveform.samples[cursor..frame] {
                let value = sample as i64;
                running += (value * value) as u64;
            }
            cursor = frame;
            frames.push(frame);
            prefix.push(running);
        }

        Self { frames, prefix }
    }

    /// Mean square over `[start_ms, end_ms)` compared against `threshold_sq`.
    /// A span with no samples counts as quiet.
    fn is_quiet(&self, start_ms: u64, end_ms: u64, threshold_sq: f64) -> bool {
        let (start, end) = (start_ms as usize, end_ms as usize);
        let count = self.frames[end] - self.frames[start];
        if count == 0 {
            return true;
        }
        let sum = self.prefix[end] - self.prefix[start];
        (sum as f64 / count as f64) <= threshold_sq
    }
}
