//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::toml_config::AppConfig;
use crate::app::batch_interactor::BatchReport;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::edit_interactor::{result_path_for, save_result};
use crate::cli::args::{AnalyzeArgs, BatchArgs, EditArgs};
use crate::config_initialization::resolve;
use crate::domain::model::{EditPlan, EditRequest, EditResult};
use crate::utils::format_file_size;
use crate::utils::time::format_ms;

/// Execute the edit command
pub async fn edit(config: &AppConfig, args: EditArgs) -> Result<()> {
    let resolved = resolve(config, &args.settings, args.jobs, None, args.no_result)?;
    let container = DefaultAppContainer::new(resolved.timeouts, &resolved.tools, resolved.options.clone());

    let mut request = EditRequest::new(args.input.clone(), resolved.settings.clone());
    if let Some(output) = args.output {
        request = request.with_output(output);
    }

    let result = container
        .edit_interactor()
        .edit(request)
        .await
        .with_context(|| format!("Failed to edit {}", args.input.display()))?;

    if resolved.write_result {
        let path = args.result.unwrap_or_else(|| result_path_for(&result));
        save_result(&result, &path)
            .await
            .with_context(|| format!("Failed to save result to {}", path.display()))?;
        info!("Result saved to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_edit_result(&result);
    }
    Ok(())
}

/// Execute the analyze command
pub async fn analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<()> {
    let resolved = resolve(config, &args.settings, None, None, true)?;
    let container = DefaultAppContainer::new(resolved.timeouts, &resolved.tools, resolved.options.clone());

    let plan = container
        .edit_interactor()
        .analyze(&args.input, &resolved.settings)
        .await
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }
    Ok(())
}

/// Execute the batch command
pub async fn batch(config: &AppConfig, args: BatchArgs) -> Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("Not a directory: {}", args.dir.display());
    }
    let resolved = resolve(
        config,
        &args.settings,
        args.jobs,
        args.output_dir.clone(),
        args.no_result,
    )?;
    let container = DefaultAppContainer::new(resolved.timeouts, &resolved.tools, resolved.options.clone());

    let report = container
        .batch_interactor()
        .with_max_depth(args.max_depth)
        .with_result_files(resolved.write_result)
        .run(&args.dir, &resolved.settings)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_batch_report(&report);
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} file(s) failed",
            report.failed.len(),
            report.failed.len() + report.succeeded.len()
        );
    }
    Ok(())
}

fn display_edit_result(result: &EditResult) {
    println!("Edit Summary");
    println!("============");
    println!("Output:            {}", result.output_path.display());
    if let Ok(metadata) = std::fs::metadata(&result.output_path) {
        println!("File Size:         {}", format_file_size(metadata.len()));
    }
    println!("Original Duration: {}", format_ms(result.original_duration_ms));
    println!("Final Duration:    {}", format_ms(result.final_duration_ms));
    println!("Time Removed:      {}", format_ms(result.time_removed_ms));
    println!(
        "Silences:          {} ({} total)",
        result.silences_detected,
        format_ms(result.total_silence_ms)
    );
    println!("Segments Kept:     {}", result.segments_kept);
    if result.segments_skipped > 0 {
        println!("Segments Skipped:  {}", result.segments_skipped);
    }
}

fn display_plan(plan: &EditPlan) {
    println!("Silence Analysis");
    println!("================");
    println!("File:      {}", plan.source.display());
    println!("Duration:  {}", plan.duration);
    println!(
        "Settings:  {} dBFS, min {}ms, padding {}ms",
        plan.settings.silence_threshold_db, plan.settings.min_silence_ms, plan.settings.padding_ms
    );
    println!();

    println!("Silences ({}):", plan.silences.len());
    for (i, silence) in plan.silences.iter().enumerate() {
        println!("  #{:<3} {}  ({}ms)", i + 1, silence, silence.duration_ms());
    }
    println!();

    println!("Keep Segments ({}):", plan.keep_segments.len());
    for (i, segment) in plan.keep_segments.iter().enumerate() {
        println!("  #{:<3} {}  ({}ms)", i + 1, segment, segment.duration_ms());
    }
    println!();

    println!("Kept:      {}", format_ms(plan.kept_duration_ms()));
    println!("Removed:   {}", format_ms(plan.planned_removed_ms()));
}

fn display_batch_report(report: &BatchReport) {
    println!("Batch Summary");
    println!("=============");
    println!("Succeeded: {}", report.succeeded.len());
    for result in &report.succeeded {
        println!(
            "  ✓ {} (-{})",
            result.output_path.display(),
            format_ms(result.time_removed_ms)
        );
    }
    println!("Failed:    {}", report.failed.len());
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.input.display(), failure.error);
    }
}
