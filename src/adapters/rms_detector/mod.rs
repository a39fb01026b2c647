//! In-process RMS silence detector

use tracing::debug;

use crate::domain::model::{Interval, Waveform};
use crate::domain::silence::detect_silence;
use crate::error::ToolResult;
use crate::ports::SilenceDetectPort;

/// Window-RMS detector over decoded PCM
#[derive(Debug, Default, Clone, Copy)]
pub struct RmsSilenceDetector;

impl RmsSilenceDetector {
    pub fn new() -> Self {
        Self
    }
}

impl SilenceDetectPort for RmsSilenceDetector {
    fn detect(
        &self,
        waveform: &Waveform,
        threshold_db: f64,
        min_silence_ms: u64,
    ) -> ToolResult<Vec<Interval>> {
        let silences = detect_silence(waveform, threshold_db, min_silence_ms);
        debug!(
            "Found {} silent interval(s) below {} dBFS lasting at least {}ms",
            silences.len(),
            threshold_db,
            min_silence_ms
        );
        Ok(silences)
    }
}
