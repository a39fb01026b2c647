//! Error handling module for QuietCut

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::model::EditPhase;

/// Failure of an external media tool invocation
#[derive(Error, Debug)]
pub enum ToolError {
    /// Binary not found on PATH
    #[error("{tool} not found in PATH")]
    NotFound { tool: String },

    /// Process ran and exited unsuccessfully
    #[error("{tool} failed (exit code {exit_code:?}): {message}")]
    Failed {
        tool: String,
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    /// Process exceeded its time budget and was killed
    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: String, secs: u64 },

    /// Process output could not be interpreted
    #[error("Unexpected output from {tool}: {message}")]
    InvalidOutput { tool: String, message: String },

    /// I/O error around the invocation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Extracted audio could not be decoded
    #[error("WAV decode error: {0}")]
    Wav(#[from] hound::Error),
}

impl ToolError {
    pub fn failed(
        tool: impl Into<String>,
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::Failed {
            tool: tool.into(),
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn invalid_output(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Only a plain non-zero exit may be skipped over; missing tools,
    /// timeouts and I/O problems end the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ToolError::Failed { .. })
    }
}

/// Result type alias for tool invocations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Main error type for QuietCut operations
#[derive(Error, Debug)]
pub enum QuietCutError {
    /// Source video missing
    #[error("Input file not found: {}", path.display())]
    InputFileNotFound { path: PathBuf },

    /// Required external tool not installed
    #[error("Required dependency unavailable: {tool}")]
    DependencyUnavailable { tool: String },

    /// Invalid settings or planner input
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A pipeline step failed
    #[error("{phase} failed: {source}")]
    Phase {
        phase: EditPhase,
        #[source]
        source: ToolError,
    },

    /// The planner rejected the detected silences
    #[error("segment planning failed: {source}")]
    Planning {
        #[source]
        source: DomainError,
    },

    /// Every millisecond of the source was classified as silence
    #[error("Nothing left to keep: the whole input is silent")]
    NothingToKeep,

    /// Configuration file problem
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl QuietCutError {
    /// Attach the failing phase to a tool error. A missing binary is reported
    /// as a dependency problem regardless of the phase it surfaced in.
    pub fn in_phase(phase: EditPhase, source: ToolError) -> Self {
        match source {
            ToolError::NotFound { tool } => QuietCutError::DependencyUnavailable { tool },
            source => QuietCutError::Phase { phase, source },
        }
    }

    /// Phase the error is tagged with, if any
    pub fn phase(&self) -> Option<EditPhase> {
        match self {
            QuietCutError::Phase { phase, .. } => Some(*phase),
            QuietCutError::Planning { .. } => Some(EditPhase::Planning),
            _ => None,
        }
    }
}

/// Result type alias for QuietCut operations
pub type QuietCutResult<T> = std::result::Result<T, QuietCutError>;
