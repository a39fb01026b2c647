//! External tool runner with PATH resolution and timeouts

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{ToolError, ToolResult};

/// Keep error messages readable when a tool dumps a long log
const STDERR_TAIL_CHARS: usize = 2000;

/// Time budget for each kind of tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolTimeouts {
    pub probe: Duration,
    pub audio_extract: Duration,
    pub segment: Duration,
    pub concat: Duration,
}

impl Default for ToolTimeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_secs(60),
            audio_extract: Duration::from_secs(300),
            segment: Duration::from_secs(120),
            concat: Duration::from_secs(600),
        }
    }
}

/// Runs one external program
#[derive(Debug, Clone)]
pub struct ToolRunner {
    /// Display name used in errors
    tool: String,
    /// Program name or explicit path
    program: String,
}

impl ToolRunner {
    pub fn new(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        Self {
            program: tool.clone(),
            tool,
        }
    }

    /// Use an explicit binary instead of a PATH lookup of the tool name
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Resolve the binary, failing with `NotFound` if it is not installed
    pub fn resolve(&self) -> ToolResult<PathBuf> {
        which::which(&self.program).map_err(|_| ToolError::NotFound {
            tool: self.tool.clone(),
        })
    }

    /// Run to completion within `timeout`, capturing stdout and stderr.
    ///
    /// The child is killed if the timeout elapses or the returned future is
    /// dropped. A non-zero exit becomes `ToolError::Failed`.
    pub async fn run(&self, args: &[OsString], timeout: Duration) -> ToolResult<Output> {
        let binary = self.resolve()?;
        debug!(
            "Running {}: {}",
            self.tool,
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let child = Command::new(&binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "{} timed out after {} seconds, killing process",
                    self.tool,
                    timeout.as_secs()
                );
                return Err(ToolError::Timeout {
                    tool: self.tool.clone(),
                    secs: timeout.as_secs(),
                });
            }
        };

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = stderr_tail(&output.stderr);
            Err(ToolError::failed(
                self.tool.clone(),
                last_line(&stderr).unwrap_or("exited with non-zero status"),
                Some(stderr.clone()),
                output.status.code(),
            ))
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let skip = text.chars().count().saturating_sub(STDERR_TAIL_CHARS);
    text.chars().skip(skip).collect()
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).last()
}
