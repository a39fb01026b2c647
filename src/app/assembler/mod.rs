// Segment assembler - Extracts keep segments and joins them by stream copy

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::model::{EditPhase, Interval};
use crate::error::{QuietCutError, QuietCutResult, ToolError};
use crate::ports::SegmentToolPort;
use crate::utils::fs::move_file;
use crate::utils::path::container_extension;

/// Manifest file name inside the workspace
pub const MANIFEST_NAME: &str = "concat_list.txt";

const WORKSPACE_PREFIX: &str = ".quietcut-";

/// What the assembler actually joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyReport {
    pub segments_joined: usize,
    pub segments_skipped: usize,
}

/// Builds one output file from the keep intervals of a source
pub struct SegmentAssembler {
    tool: Arc<dyn SegmentToolPort>,
    jobs: usize,
    work_dir: Option<PathBuf>,
}

impl SegmentAssembler {
    pub fn new(tool: Arc<dyn SegmentToolPort>, jobs: usize) -> Self {
        Self {
            tool,
            jobs: jobs.max(1),
            work_dir: None,
        }
    }

    /// Put the scratch workspace under `work_dir` instead of beside the output
    pub fn with_work_dir(mut self, work_dir: Option<PathBuf>) -> Self {
        self.work_dir = work_dir;
        self
    }

    /// Extract every interval of `source`, concatenate them in order and move
    /// the result to `dest`.
    ///
    /// `dest` is only touched by the final move. The workspace holding the
    /// segments and manifest is removed on every return path.
    pub async fn assemble(
        &self,
        source: &Path,
        keep: &[Interval],
        dest: &Path,
    ) -> QuietCutResult<AssemblyReport> {
        if keep.is_empty() {
            return Err(QuietCutError::NothingToKeep);
        }

        let workspace = self.create_workspace(dest).await.map_err(assembly_error)?;
        debug!("Assembling in {}", workspace.path().display());

        let result = self.assemble_in(&workspace, source, keep, dest).await;

        let workspace_path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(
                "Failed to remove workspace {}: {}",
                workspace_path.display(),
                e
            );
        }
        result
    }

    async fn assemble_in(
        &self,
        workspace: &TempDir,
        source: &Path,
        keep: &[Interval],
        dest: &Path,
    ) -> QuietCutResult<AssemblyReport> {
        let extension = container_extension(source);
        let names: Vec<String> = (0..keep.len())
            .map(|index| segment_file_name(index, &extension))
            .collect();

        let extracted = self
            .extract_all(source, keep, workspace.path(), &names)
            .await?;

        let joined: Vec<&str> = names
            .iter()
            .zip(&extracted)
            .filter(|(_, ok)| **ok)
            .map(|(name, _)| name.as_str())
            .collect();
        let report = AssemblyReport {
            segments_joined: joined.len(),
            segments_skipped: keep.len() - joined.len(),
        };
        if joined.is_empty() {
            return Err(assembly_error(ToolError::failed(
                "ffmpeg",
                "no segment could be extracted",
                None,
                None,
            )));
        }

        let manifest = workspace.path().join(MANIFEST_NAME);
        tokio::fs::write(&manifest, build_manifest(&joined))
            .await
            .map_err(|e| assembly_error(e.into()))?;

        let staged = workspace.path().join(format!("joined.{}", extension));
        info!("Concatenating {} segment(s)", report.segments_joined);
        self.tool
            .concat(&manifest, &staged)
            .await
            .map_err(assembly_error)?;

        move_file(&staged, dest)
            .await
            .map_err(|e| assembly_error(e.into()))?;
        info!("Wrote {}", dest.display());

        Ok(report)
    }

    /// Run extractions with at most `jobs` in flight. Returns per-index
    /// success; a recoverable failure leaves `false`, anything else aborts.
    async fn extract_all(
        &self,
        source: &Path,
        keep: &[Interval],
        dir: &Path,
        names: &[String],
    ) -> QuietCutResult<Vec<bool>> {
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut tasks = JoinSet::new();
        let total = keep.len();

        for (index, (interval, name)) in keep.iter().copied().zip(names).enumerate() {
            let tool = Arc::clone(&self.tool);
            let semaphore = Arc::clone(&semaphore);
            let source = source.to_path_buf();
            let dest = dir.join(name);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return (index, interval, Err(ToolError::Io(io::Error::other(e)))),
                };
                info!(
                    "Extracting segment {}/{}: {} ({}ms)",
                    index + 1,
                    total,
                    interval,
                    interval.duration_ms()
                );
                let result = tool
                    .extract_segment(&source, interval.start_ms, interval.duration_ms(), &dest)
                    .await;
                (index, interval, result)
            });
        }

        let mut extracted = vec![false; total];
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| assembly_error(ToolError::Io(io::Error::other(e))));
            let (index, interval, result) = match outcome {
                Ok(done) => done,
                Err(e) => {
                    abort_and_drain(&mut tasks).await;
                    return Err(e);
                }
            };
            match result {
                Ok(()) => extracted[index] = true,
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping segment {} ({}): {}", index + 1, interval, e);
                }
                Err(e) => {
                    abort_and_drain(&mut tasks).await;
                    return Err(assembly_error(e));
                }
            }
        }

        Ok(extracted)
    }

    async fn create_workspace(&self, dest: &Path) -> Result<TempDir, ToolError> {
        let base = match &self.work_dir {
            Some(dir) => dir.clone(),
            None => match dest.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };
        tokio::fs::create_dir_all(&base).await?;
        Ok(tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&base)?)
    }
}

/// Cancel pending extractions and wait until their processes are gone
async fn abort_and_drain(tasks: &mut JoinSet<(usize, Interval, Result<(), ToolError>)>) {
    tasks.abort_all();
    while tasks.join_next().await.is_some() {}
}

fn assembly_error(source: ToolError) -> QuietCutError {
    QuietCutError::in_phase(EditPhase::Assembly, source)
}

/// `segment_0007.mp4`
pub fn segment_file_name(index: usize, extension: &str) -> String {
    format!("segment_{:04}.{}", index, extension)
}

/// Concat demuxer manifest. Entries are relative to the manifest's own
/// directory.
pub fn build_manifest<S: AsRef<str>>(files: &[S]) -> String {
    files
        .iter()
        .map(|file| format!("file '{}'\n", escape_manifest_path(file.as_ref())))
        .collect()
}

/// Quote for the concat demuxer: `'` closes the quote, emits an escaped
/// quote and reopens.
pub fn escape_manifest_path(path: &str) -> String {
    path.replace('\'', r"'\''")
}
