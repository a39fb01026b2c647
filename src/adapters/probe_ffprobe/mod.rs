//! FFprobe adapter for media duration probing

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::process::ToolRunner;
use crate::domain::model::*;
use crate::error::{ToolError, ToolResult};
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    runner: ToolRunner,
    timeout: std::time::Duration,
}

impl FfprobeAdapter {
    pub fn new(timeout: std::time::Duration) -> Self {
        Self {
            runner: ToolRunner::new("ffprobe"),
            timeout,
        }
    }

    /// Use a specific ffprobe binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.runner = self.runner.with_program(program);
        self
    }

    fn duration_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_os_string());
        args
    }
}

/// Parse the bare seconds value ffprobe prints for `format=duration`
pub fn parse_duration_output(stdout: &str) -> ToolResult<MediaDuration> {
    let value = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ToolError::invalid_output("ffprobe", "no duration reported"))?;

    let seconds: f64 = value.parse().map_err(|_| {
        ToolError::invalid_output("ffprobe", format!("unparseable duration '{}'", value))
    })?;

    MediaDuration::from_seconds(seconds)
        .map_err(|e| ToolError::invalid_output("ffprobe", e.to_string()))
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_duration(&self, path: &Path) -> ToolResult<MediaDuration> {
        let output = self
            .runner
            .run(&Self::duration_args(path), self.timeout)
            .await?;
        let duration = parse_duration_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!("Probed {}: {}", path.display(), duration);
        Ok(duration)
    }

    async fn check_available(&self) -> ToolResult<()> {
        self.runner.resolve().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_output("12.345678\n").unwrap().as_ms(), 12345);
        assert_eq!(parse_duration_output("\n 3.0 \n").unwrap().as_ms(), 3000);
    }

    #[test]
    fn test_parse_rejects_missing_duration() {
        assert!(matches!(
            parse_duration_output("N/A\n"),
            Err(ToolError::InvalidOutput { .. })
        ));
        assert!(matches!(
            parse_duration_output(""),
            Err(ToolError::InvalidOutput { .. })
        ));
        assert!(matches!(
            parse_duration_output("-1.5"),
            Err(ToolError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn test_duration_args_end_with_path() {
        let args = FfprobeAdapter::duration_args(Path::new("clip.mkv"));
        assert_eq!(args.last().unwrap(), "clip.mkv");
        assert!(args.iter().any(|arg| arg == "format=duration"));
    }
}
