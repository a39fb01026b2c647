// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::*;
use crate::error::ToolResult;

/// Port for media duration probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of a media file
    async fn probe_duration(&self, path: &Path) -> ToolResult<MediaDuration>;

    /// Verify the backing tool can be invoked
    async fn check_available(&self) -> ToolResult<()> {
        Ok(())
    }
}

/// Port for pulling a mono PCM track out of a container
#[async_trait]
pub trait AudioExtractPort: Send + Sync {
    /// Decode the audio of `path` to mono 16-bit PCM
    async fn extract_audio(&self, path: &Path) -> ToolResult<Waveform>;

    /// Verify the backing tool can be invoked
    async fn check_available(&self) -> ToolResult<()> {
        Ok(())
    }
}

/// Port for silence detection over decoded audio
pub trait SilenceDetectPort: Send + Sync {
    /// Sorted, non-overlapping silent intervals
    fn detect(
        &self,
        waveform: &Waveform,
        threshold_db: f64,
        min_silence_ms: u64,
    ) -> ToolResult<Vec<Interval>>;
}

/// Port for lossless sub-clip extraction and concatenation
#[async_trait]
pub trait SegmentToolPort: Send + Sync {
    /// Stream-copy `duration_ms` of `source` starting at `start_ms` into `dest`
    async fn extract_segment(
        &self,
        source: &Path,
        start_ms: u64,
        duration_ms: u64,
        dest: &Path,
    ) -> ToolResult<()>;

    /// Stream-copy every file listed in the concat `manifest` into `dest`
    async fn concat(&self, manifest: &Path, dest: &Path) -> ToolResult<()>;

    /// Verify the backing tool can be invoked
    async fn check_available(&self) -> ToolResult<()> {
        Ok(())
    }
}
