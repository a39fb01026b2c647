//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Upper bound for parallel segment extractions
pub const MAX_JOBS: usize = 64;

fn parse_jobs(s: &str) -> Result<usize, String> {
    clap_num::number_range(s, 1, MAX_JOBS)
}

/// Detection and cut tunables shared by every command.
///
/// Unset values fall back to the config file, then to the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Silence threshold in dBFS (negative)
    #[arg(long = "silence-thresh", env = "QUIETCUT_SILENCE_THRESH", allow_negative_numbers = true)]
    pub silence_thresh: Option<f64>,

    /// Minimum silence length in milliseconds
    #[arg(long = "min-silence", env = "QUIETCUT_MIN_SILENCE")]
    pub min_silence: Option<u64>,

    /// Milliseconds kept on each side of a cut
    #[arg(long, env = "QUIETCUT_PADDING")]
    pub padding: Option<u64>,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (default: <output dir>/edited_<name>_<timestamp>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Parallel segment extractions (1-64, default: CPU count)
    #[arg(long, env = "QUIETCUT_JOBS", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Where to save the edit summary (.json, .yaml or .yml)
    #[arg(long, conflicts_with = "no_result")]
    pub result: Option<PathBuf>,

    /// Do not save an edit summary
    #[arg(long)]
    pub no_result: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory to scan for videos
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Directory for edited files (default: config output dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// How deep to descend; 1 scans only the directory itself
    #[arg(long)]
    pub max_depth: Option<usize>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Parallel segment extractions per file (1-64, default: CPU count)
    #[arg(long, env = "QUIETCUT_JOBS", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Do not save per-file edit summaries
    #[arg(long)]
    pub no_result: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
