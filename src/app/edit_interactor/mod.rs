// Edit interactor - Orchestrates the silence removal use case

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::assembler::SegmentAssembler;
use crate::domain::model::*;
use crate::domain::rules::KeepSegmentPlanner;
use crate::error::{QuietCutError, QuietCutResult, ToolError};
use crate::ports::*;
use crate::utils::path::{default_output_path, default_result_path};

/// Knobs that are not part of the per-edit settings
#[derive(Debug, Clone, PartialEq)]
pub struct EditOptions {
    /// Directory for auto-named outputs
    pub output_dir: PathBuf,
    /// Parallel segment extractions
    pub jobs: usize,
    /// Scratch directory override
    pub work_dir: Option<PathBuf>,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            jobs: num_cpus::get(),
            work_dir: None,
        }
    }
}

/// Interactor for the edit and analyze use cases
pub struct EditInteractor {
    probe_port: Arc<dyn ProbePort>,
    audio_port: Arc<dyn AudioExtractPort>,
    detect_port: Arc<dyn SilenceDetectPort>,
    segment_port: Arc<dyn SegmentToolPort>,
    assembler: SegmentAssembler,
    output_dir: PathBuf,
}

impl EditInteractor {
    /// Create new edit interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        audio_port: Arc<dyn AudioExtractPort>,
        detect_port: Arc<dyn SilenceDetectPort>,
        segment_port: Arc<dyn SegmentToolPort>,
        options: EditOptions,
    ) -> Self {
        let assembler = SegmentAssembler::new(Arc::clone(&segment_port), options.jobs)
            .with_work_dir(options.work_dir);
        Self {
            probe_port,
            audio_port,
            detect_port,
            segment_port,
            assembler,
            output_dir: options.output_dir,
        }
    }

    /// Remove the silences of `request.input_path` and write the result.
    pub async fn edit(&self, request: EditRequest) -> QuietCutResult<EditResult> {
        let input = request.input_path.as_path();
        self.check_request(input, &request.settings)?;
        self.check_tools(true).await?;

        let plan = self.build_plan(input, &request.settings).await?;
        let output = request
            .output_path
            .clone()
            .unwrap_or_else(|| self.auto_output_path(input));

        info!(
            "Assembling {} segment(s) into {}",
            plan.keep_segments.len(),
            output.display()
        );
        let report = self
            .assembler
            .assemble(input, &plan.keep_segments, &output)
            .await?;

        let final_duration = self
            .probe_port
            .probe_duration(&output)
            .await
            .map_err(|e| QuietCutError::in_phase(EditPhase::FinalProbe, e))?;

        let result =
            EditResult::new(&plan, output, final_duration).with_skipped(report.segments_skipped);
        info!(
            "Edit complete: {} -> {} ({}ms removed)",
            plan.duration, final_duration, result.time_removed_ms
        );
        Ok(result)
    }

    /// Dry run: detect and plan without writing anything
    pub async fn analyze(&self, input: &Path, settings: &EditSettings) -> QuietCutResult<EditPlan> {
        self.check_request(input, settings)?;
        self.check_tools(false).await?;
        self.build_plan(input, settings).await
    }

    /// `<output_dir>/edited_<stem>_<timestamp>.<ext>`
    pub fn auto_output_path(&self, input: &Path) -> PathBuf {
        default_output_path(input, &self.output_dir, chrono::Local::now())
    }

    fn check_request(&self, input: &Path, settings: &EditSettings) -> QuietCutResult<()> {
        settings.validate()?;
        if !input.is_file() {
            return Err(QuietCutError::InputFileNotFound {
                path: input.to_path_buf(),
            });
        }
        Ok(())
    }

    async fn check_tools(&self, with_segments: bool) -> QuietCutResult<()> {
        let unavailable = |e| QuietCutError::in_phase(EditPhase::Probe, e);
        self.probe_port.check_available().await.map_err(unavailable)?;
        self.audio_port.check_available().await.map_err(unavailable)?;
        if with_segments {
            self.segment_port.check_available().await.map_err(unavailable)?;
        }
        Ok(())
    }

    async fn build_plan(&self, input: &Path, settings: &EditSettings) -> QuietCutResult<EditPlan> {
        info!("Probing {}", input.display());
        let duration = self
            .probe_port
            .probe_duration(input)
            .await
            .map_err(|e| QuietCutError::in_phase(EditPhase::Probe, e))?;
        debug!("Source duration: {}", duration);

        let waveform = self
            .audio_port
            .extract_audio(input)
            .await
            .map_err(|e| QuietCutError::in_phase(EditPhase::AudioExtraction, e))?;

        info!(
            "Detecting silence (threshold {} dBFS, minimum {}ms)",
            settings.silence_threshold_db, settings.min_silence_ms
        );
        let detector = Arc::clone(&self.detect_port);
        let (threshold_db, min_silence_ms) = (settings.silence_threshold_db, settings.min_silence_ms);
        let silences = tokio::task::spawn_blocking(move || {
            detector.detect(&waveform, threshold_db, min_silence_ms)
        })
        .await
        .map_err(|e| {
            QuietCutError::in_phase(EditPhase::Detection, ToolError::Io(io::Error::other(e)))
        })?
        .map_err(|e| QuietCutError::in_phase(EditPhase::Detection, e))?;
        info!("Found {} silent interval(s)", silences.len());

        let silences = KeepSegmentPlanner::clip_to_duration(duration, &silences);
        let keep_segments = KeepSegmentPlanner::plan(duration, &silences, settings.padding_ms)
            .map_err(|source| QuietCutError::Planning { source })?;
        if keep_segments.is_empty() {
            return Err(QuietCutError::NothingToKeep);
        }
        info!("Planned {} keep segment(s)", keep_segments.len());

        Ok(EditPlan {
            source: input.to_path_buf(),
            duration,
            settings: settings.clone(),
            silences,
            keep_segments,
        })
    }
}

/// Write `result` as YAML for `.yaml`/`.yml` paths, JSON otherwise
pub async fn save_result(result: &EditResult, path: &Path) -> QuietCutResult<()> {
    let yaml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let content = if yaml {
        serde_yaml::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)? + "\n"
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    debug!("Saved result to {}", path.display());
    Ok(())
}

/// Where `save_result` goes when no path is given
pub fn result_path_for(result: &EditResult) -> PathBuf {
    default_result_path(&result.output_path)
}
