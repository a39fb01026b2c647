//! FFmpeg execution adapter
//!
//! Audio extraction, stream-copy segment extraction and concat-demuxer
//! joins, all by invoking the `ffmpeg` binary.

use std::ffi::OsString;
use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::adapters::process::{ToolRunner, ToolTimeouts};
use crate::domain::model::*;
use crate::error::{ToolError, ToolResult};
use crate::ports::*;
use crate::utils::time::ms_to_ffmpeg_seconds;

/// Sample rate of the analysis track
pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

/// Builder for FFmpeg argument lists
#[derive(Debug, Clone, Default)]
pub struct FfmpegCommand {
    input_args: Vec<OsString>,
    input: OsString,
    output_args: Vec<OsString>,
    output: OsString,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().as_os_str().to_os_string(),
            output: output.as_ref().as_os_str().to_os_string(),
            ..Self::default()
        }
    }

    /// Add input arguments (before -i)
    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add output arguments (after -i)
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-nostdin".into(), "-v".into(), "error".into()];
        args.extend(self.input_args.iter().cloned());
        args.push("-i".into());
        args.push(self.input.clone());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.clone());
        args
    }

    /// Mono 16 kHz signed 16-bit WAV, video dropped
    pub fn extract_audio(source: &Path, wav: &Path) -> Self {
        Self::new(source, wav).output_args([
            "-vn".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ar".to_string(),
            ANALYSIS_SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            "1".to_string(),
        ])
    }

    /// Fast seek to `start_ms`, then copy `duration_ms` without re-encoding
    pub fn extract_segment(source: &Path, start_ms: u64, duration_ms: u64, dest: &Path) -> Self {
        Self::new(source, dest)
            .input_args(["-ss".to_string(), ms_to_ffmpeg_seconds(start_ms)])
            .output_args([
                "-t".to_string(),
                ms_to_ffmpeg_seconds(duration_ms),
                "-c".to_string(),
                "copy".to_string(),
                "-avoid_negative_ts".to_string(),
                "make_zero".to_string(),
            ])
    }

    /// Join the files listed in a concat manifest by stream copy
    pub fn concat(manifest: &Path, dest: &Path) -> Self {
        Self::new(manifest, dest)
            .input_args(["-f", "concat", "-safe", "0"])
            .output_args(["-c", "copy"])
    }
}

/// FFmpeg-based execution adapter
pub struct FfmpegAdapter {
    runner: ToolRunner,
    timeouts: ToolTimeouts,
}

impl FfmpegAdapter {
    pub fn new(timeouts: ToolTimeouts) -> Self {
        Self {
            runner: ToolRunner::new("ffmpeg"),
            timeouts,
        }
    }

    /// Use a specific ffmpeg binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.runner = self.runner.with_program(program);
        self
    }
}

/// Decode WAV bytes into a mono 16-bit waveform
pub fn decode_wav(bytes: Vec<u8>) -> ToolResult<Waveform> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(ToolError::invalid_output(
            "ffmpeg",
            format!(
                "expected mono 16-bit PCM, got {} channel(s) of {}-bit {:?}",
                spec.channels, spec.bits_per_sample, spec.sample_format
            ),
        ));
    }
    let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Waveform::new(spec.sample_rate, samples)
        .map_err(|e| ToolError::invalid_output("ffmpeg", e.to_string()))
}

#[async_trait]
impl AudioExtractPort for FfmpegAdapter {
    async fn extract_audio(&self, path: &Path) -> ToolResult<Waveform> {
        // Removed when dropped, on every return path
        let wav = tempfile::Builder::new()
            .prefix("quietcut-audio-")
            .suffix(".wav")
            .tempfile()?;

        info!("Extracting audio track: {}", path.display());
        let cmd = FfmpegCommand::extract_audio(path, wav.path());
        self.runner.run(&cmd.build_args(), self.timeouts.audio_extract).await?;

        let bytes = tokio::fs::read(wav.path()).await?;
        let waveform = decode_wav(bytes)?;
        debug!(
            "Decoded {} samples at {} Hz ({}ms)",
            waveform.samples.len(),
            waveform.sample_rate,
            waveform.duration_ms()
        );
        Ok(waveform)
    }

    async fn check_available(&self) -> ToolResult<()> {
        self.runner.resolve().map(|_| ())
    }
}

#[async_trait]
impl SegmentToolPort for FfmpegAdapter {
    async fn extract_segment(
        &self,
        source: &Path,
        start_ms: u64,
        duration_ms: u64,
        dest: &Path,
    ) -> ToolResult<()> {
        let cmd = FfmpegCommand::extract_segment(source, start_ms, duration_ms, dest);
        self.runner.run(&cmd.build_args(), self.timeouts.segment).await?;
        Ok(())
    }

    async fn concat(&self, manifest: &Path, dest: &Path) -> ToolResult<()> {
        let cmd = FfmpegCommand::concat(manifest, dest);
        self.runner.run(&cmd.build_args(), self.timeouts.concat).await?;
        Ok(())
    }

    async fn check_available(&self) -> ToolResult<()> {
        self.runner.resolve().map(|_| ())
    }
}
