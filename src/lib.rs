//! QuietCut Library
//!
//! Removes silent stretches from recorded video. Silence is found by an RMS
//! scan of the decoded audio, the remaining content is planned as padded keep
//! intervals, and those are cut and joined by stream copy with ffmpeg.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{EditPlan, EditRequest, EditResult, EditSettings, Interval, MediaDuration};
pub use domain::rules::KeepSegmentPlanner;
pub use error::{QuietCutError, QuietCutResult, ToolError};
