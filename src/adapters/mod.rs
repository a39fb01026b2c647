// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process;
pub mod rms_detector;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use process::{ToolRunner, ToolTimeouts};
pub use rms_detector::RmsSilenceDetector;
pub use toml_config::AppConfig;
