//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI > environment > config file > defaults. Clap folds the
//! environment into the same optional fields as the flags, so the layering
//! here only has to put parsed arguments over the file.

use std::path::PathBuf;

use tracing::debug;

use crate::adapters::process::ToolTimeouts;
use crate::adapters::toml_config::{AppConfig, ToolsSection};
use crate::app::edit_interactor::EditOptions;
use crate::cli::args::SettingsArgs;
use crate::cli::Cli;
use crate::domain::model::EditSettings;
use crate::error::QuietCutResult;

/// Effective configuration for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub settings: EditSettings,
    pub options: EditOptions,
    pub timeouts: ToolTimeouts,
    pub tools: ToolsSection,
    pub write_result: bool,
}

/// Logging choice, resolved before the subscriber is installed
pub fn resolve_logging(cli: &Cli, config: &AppConfig) -> (String, bool) {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    (level, cli.log_json || config.logging.json)
}

/// Layer command arguments over the config file
pub fn resolve(
    config: &AppConfig,
    settings: &SettingsArgs,
    jobs: Option<usize>,
    output_dir: Option<PathBuf>,
    no_result: bool,
) -> QuietCutResult<ResolvedConfig> {
    let settings = apply_settings(config.edit_settings(), settings);
    settings.validate()?;

    let jobs = jobs
        .or(config.runtime.jobs)
        .unwrap_or_else(num_cpus::get)
        .max(1);

    let resolved = ResolvedConfig {
        settings,
        options: EditOptions {
            output_dir: output_dir.unwrap_or_else(|| config.output.dir.clone()),
            jobs,
            work_dir: config.output.work_dir.clone(),
        },
        timeouts: config.timeouts.to_timeouts(),
        tools: config.tools.clone(),
        write_result: config.output.write_result && !no_result,
    };
    debug!("Resolved configuration: {:?}", resolved);
    Ok(resolved)
}

fn apply_settings(base: EditSettings, args: &SettingsArgs) -> EditSettings {
    EditSettings {
        silence_threshold_db: args.silence_thresh.unwrap_or(base.silence_threshold_db),
        min_silence_ms: args.min_silence.unwrap_or(base.min_silence_ms),
        padding_ms: args.padding.unwrap_or(base.padding_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config() -> AppConfig {
        AppConfig::from_toml_str(
            r#"
            [edit]
            silence_threshold_db = -50.0
            padding_ms = 200

            [output]
            dir = "cuts"
            write_result = false

            [runtime]
            jobs = 2

            [tools]
            ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_file_over_defaults() {
        let resolved = resolve(&file_config(), &SettingsArgs::default(), None, None, false).unwrap();
        assert_eq!(resolved.settings, EditSettings::new(-50.0, 800, 200).unwrap());
        assert_eq!(resolved.options.jobs, 2);
        assert_eq!(resolved.options.output_dir, PathBuf::from("cuts"));
        assert_eq!(resolved.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(resolved.tools.ffprobe, "ffprobe");
        assert!(!resolved.write_result);
    }

    #[test]
    fn test_arguments_over_file() {
        let args = SettingsArgs {
            silence_thresh: Some(-30.0),
            min_silence: Some(500),
            padding: None,
        };
        let resolved =
            resolve(&file_config(), &args, Some(6), Some(PathBuf::from("elsewhere")), false).unwrap();
        assert_eq!(resolved.settings, EditSettings::new(-30.0, 500, 200).unwrap());
        assert_eq!(resolved.options.jobs, 6);
        assert_eq!(resolved.options.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_defaults() {
        let resolved = resolve(&AppConfig::default(), &SettingsArgs::default(), None, None, false).unwrap();
        assert_eq!(resolved.settings, EditSettings::default());
        assert_eq!(resolved.options.jobs, num_cpus::get().max(1));
        assert!(resolved.write_result);
        assert!(!resolve(&AppConfig::default(), &SettingsArgs::default(), None, None, true)
            .unwrap()
            .write_result);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = SettingsArgs {
            silence_thresh: Some(0.0),
            ..SettingsArgs::default()
        };
        assert!(resolve(&AppConfig::default(), &args, None, None, false).is_err());
    }
}
