// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::time::format_ms;

/// Half-open span of media time in whole milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Interval {
    /// Create a new interval, rejecting empty or reversed spans
    pub fn new(start_ms: u64, end_ms: u64) -> Result<Self, DomainError> {
        if start_ms >= end_ms {
            return Err(DomainError::InvalidInterval(format!(
                "start ({}ms) must be less than end ({}ms)",
                start_ms, end_ms
            )));
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Start offset in seconds
    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// Length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }

    /// Signed distance from the end of `self` to the start of `next`.
    /// Negative when the two overlap.
    pub fn gap_to(&self, next: &Interval) -> i64 {
        next.start_ms as i64 - self.end_ms as i64
    }

    /// Check that the interval lies within a media of the given length
    pub fn fits_within(&self, total: MediaDuration) -> bool {
        self.end_ms <= total.as_ms()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_ms(self.start_ms), format_ms(self.end_ms))
    }
}

/// Full length of a media file in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaDuration(u64);

impl MediaDuration {
    pub fn from_ms(ms: u64) -> Self {
        Self(ms)
    }

    /// Convert a probe's float seconds, truncating to whole milliseconds
    pub fn from_seconds(seconds: f64) -> Result<Self, DomainError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(DomainError::InvalidDuration(format!(
                "duration must be a non-negative number of seconds, got {}",
                seconds
            )));
        }
        Ok(Self((seconds * 1000.0) as u64))
    }

    pub fn as_ms(&self) -> u64 {
        self.0
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for MediaDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_ms(self.0))
    }
}

/// Silence detection and cut tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSettings {
    /// Energy cutoff in dBFS; audio at or below it counts as silent
    pub silence_threshold_db: f64,
    /// Minimum contiguous silence that qualifies as a cut
    pub min_silence_ms: u64,
    /// Audio preserved on each side of a cut
    pub padding_ms: u64,
}

impl EditSettings {
    pub const DEFAULT_SILENCE_THRESHOLD_DB: f64 = -40.0;
    pub const DEFAULT_MIN_SILENCE_MS: u64 = 800;
    pub const DEFAULT_PADDING_MS: u64 = 100;

    /// Create settings with validation
    pub fn new(
        silence_threshold_db: f64,
        min_silence_ms: u64,
        padding_ms: u64,
    ) -> Result<Self, DomainError> {
        let settings = Self {
            silence_threshold_db,
            min_silence_ms,
            padding_ms,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Threshold must be a finite negative dB value. Millisecond fields are
    /// unsigned and need no further checks.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.silence_threshold_db.is_finite() || self.silence_threshold_db >= 0.0 {
            return Err(DomainError::InvalidSettings(format!(
                "silence threshold must be a negative dB value, got {}",
                self.silence_threshold_db
            )));
        }
        Ok(())
    }
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            silence_threshold_db: Self::DEFAULT_SILENCE_THRESHOLD_DB,
            min_silence_ms: Self::DEFAULT_MIN_SILENCE_MS,
            padding_ms: Self::DEFAULT_PADDING_MS,
        }
    }
}

/// Mono 16-bit PCM audio
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl Waveform {
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Result<Self, DomainError> {
        if sample_rate == 0 {
            return Err(DomainError::InvalidSettings(
                "Sample rate cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    /// Length in milliseconds, rounded to the nearest millisecond
    pub fn duration_ms(&self) -> u64 {
        let sr = self.sample_rate as u64;
        (self.samples.len() as u64 * 1000 + sr / 2) / sr
    }
}

/// Stage of an edit, used to tag failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPhase {
    Probe,
    AudioExtraction,
    Detection,
    Planning,
    Assembly,
    FinalProbe,
}

impl fmt::Display for EditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditPhase::Probe => "duration probe",
            EditPhase::AudioExtraction => "audio extraction",
            EditPhase::Detection => "silence detection",
            EditPhase::Planning => "segment planning",
            EditPhase::Assembly => "segment assembly",
            EditPhase::FinalProbe => "output probe",
        };
        f.write_str(name)
    }
}

/// Outcome of analysis: what would be kept and cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    pub source: PathBuf,
    pub duration: MediaDuration,
    pub settings: EditSettings,
    pub silences: Vec<Interval>,
    pub keep_segments: Vec<Interval>,
}

impl EditPlan {
    /// Sum of kept interval lengths
    pub fn kept_duration_ms(&self) -> u64 {
        self.keep_segments.iter().map(Interval::duration_ms).sum()
    }

    /// Sum of detected silence lengths
    pub fn total_silence_ms(&self) -> u64 {
        self.silences.iter().map(Interval::duration_ms).sum()
    }

    /// Expected reduction, before container rounding
    pub fn planned_removed_ms(&self) -> u64 {
        self.duration.as_ms().saturating_sub(self.kept_duration_ms())
    }
}

/// Summary of a finished edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResult {
    pub output_path: PathBuf,
    pub original_duration_ms: u64,
    pub final_duration_ms: u64,
    pub time_removed_ms: u64,
    pub total_silence_ms: u64,
    pub segments_kept: usize,
    pub silences_detected: usize,
    /// Keep segments dropped because their extraction failed
    #[serde(default)]
    pub segments_skipped: usize,
    pub settings: EditSettings,
}

impl EditResult {
    pub fn new(plan: &EditPlan, output_path: PathBuf, final_duration: MediaDuration) -> Self {
        Self {
            output_path,
            original_duration_ms: plan.duration.as_ms(),
            final_duration_ms: final_duration.as_ms(),
            time_removed_ms: plan.duration.as_ms().saturating_sub(final_duration.as_ms()),
            total_silence_ms: plan.total_silence_ms(),
            segments_kept: plan.keep_segments.len(),
            silences_detected: plan.silences.len(),
            segments_skipped: 0,
            settings: plan.settings.clone(),
        }
    }

    pub fn with_skipped(mut self, segments_skipped: usize) -> Self {
        self.segments_skipped = segments_skipped;
        self
    }
}

/// Request for a single edit
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub settings: EditSettings,
}

impl EditRequest {
    pub fn new(input_path: impl Into<PathBuf>, settings: EditSettings) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            settings,
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }
}
