// Batch interactor - Edits every video under a directory

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::app::edit_interactor::{result_path_for, save_result, EditInteractor};
use crate::domain::model::*;
use crate::utils::path::{is_editable_video, unique_path};

/// Per-file failure in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<EditResult>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Interactor for directory-wide edits
pub struct BatchInteractor {
    editor: Arc<EditInteractor>,
    max_depth: usize,
    write_results: bool,
}

impl BatchInteractor {
    pub fn new(editor: Arc<EditInteractor>) -> Self {
        Self {
            editor,
            max_depth: usize::MAX,
            write_results: true,
        }
    }

    /// Limit recursion; 1 means only the directory's own entries
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth.unwrap_or(usize::MAX);
        self
    }

    pub fn with_result_files(mut self, write_results: bool) -> Self {
        self.write_results = write_results;
        self
    }

    /// Video files under `dir`, sorted, excluding previous outputs
    pub fn discover(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_editable_video(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Edit each discovered file in turn, continuing past failures.
    ///
    /// Inputs sharing a stem in different subdirectories get distinct
    /// outputs; a name already planned in this run or present on disk gets a
    /// `_<n>` suffix.
    pub async fn run(&self, dir: &Path, settings: &EditSettings) -> BatchReport {
        let inputs = self.discover(dir);
        info!("Found {} video(s) in {}", inputs.len(), dir.display());

        let mut report = BatchReport::default();
        let mut planned: HashSet<PathBuf> = HashSet::new();
        for (index, input) in inputs.into_iter().enumerate() {
            info!("[{}] Editing {}", index + 1, input.display());
            let output = unique_path(self.editor.auto_output_path(&input), |path| {
                planned.contains(path) || path.exists()
            });
            planned.insert(output.clone());
            let request = EditRequest::new(input.clone(), settings.clone()).with_output(output);
            let outcome = match self.editor.edit(request).await {
                Ok(result) if self.write_results => save_result(&result, &result_path_for(&result))
                    .await
                    .map(|_| result),
                other => other,
            };
            match outcome {
                Ok(result) => report.succeeded.push(result),
                Err(e) => {
                    error!("Failed to edit {}: {}", input.display(), e);
                    report.failed.push(BatchFailure {
                        input,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::app::edit_interactor::EditOptions;
    use crate::error::{ToolError, ToolResult};
    use crate::ports::*;

    struct Probe;

    #[async_trait]
    impl ProbePort for Probe {
        async fn probe_duration(&self, path: &Path) -> ToolResult<MediaDuration> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("broken") {
                return Err(ToolError::invalid_output("ffprobe", "no duration reported"));
            }
            Ok(MediaDuration::from_ms(5000))
        }
    }

    struct Audio;

    #[async_trait]
    impl AudioExtractPort for Audio {
        async fn extract_audio(&self, _: &Path) -> ToolResult<Waveform> {
            Ok(Waveform::new(16_000, vec![]).unwrap())
        }
    }

    struct NoSilence;

    impl SilenceDetectPort for NoSilence {
        fn detect(&self, _: &Waveform, _: f64, _: u64) -> ToolResult<Vec<Interval>> {
            Ok(vec![])
        }
    }

    struct Segments;

    #[async_trait]
    impl SegmentToolPort for Segments {
        async fn extract_segment(&self, _: &Path, _: u64, _: u64, dest: &Path) -> ToolResult<()> {
            tokio::fs::write(dest, b"s").await?;
            Ok(())
        }

        async fn concat(&self, _: &Path, dest: &Path) -> ToolResult<()> {
            tokio::fs::write(dest, b"joined").await?;
            Ok(())
        }
    }

    fn batch(output_dir: PathBuf) -> BatchInteractor {
        let editor = EditInteractor::new(
            Arc::new(Probe),
            Arc::new(Audio),
            Arc::new(NoSilence),
            Arc::new(Segments),
            EditOptions {
                output_dir,
                jobs: 1,
                work_dir: None,
            },
        );
        BatchInteractor::new(Arc::new(editor))
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"video").unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.MOV"));
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("edited_a_20240101_000000.mp4"));
        touch(&dir.path().join("day2/c.mkv"));

        let found = batch(dir.path().join("out")).discover(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("a.mp4"),
                dir.path().join("b.MOV"),
                dir.path().join("day2/c.mkv"),
            ]
        );

        let shallow = batch(dir.path().join("out"))
            .with_max_depth(Some(1))
            .discover(dir.path());
        assert_eq!(shallow.len(), 2);
    }

    #[tokio::test]
    async fn test_run_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        touch(&input.join("a.mp4"));
        touch(&input.join("broken.mp4"));
        touch(&input.join("c.webm"));
        let output = dir.path().join("out");

        let report = batch(output.clone())
            .run(&input, &EditSettings::default())
            .await;

        assert!(!report.is_success());
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].input, input.join("broken.mp4"));
        assert!(report.failed[0].error.contains("duration probe failed"));
        for result in &report.succeeded {
            assert!(result.output_path.starts_with(&output));
            assert!(result_path_for(result).exists());
        }
    }

    #[tokio::test]
    async fn test_same_stem_in_subdirectories_gets_distinct_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        touch(&input.join("day1/talk.mp4"));
        touch(&input.join("day2/talk.mp4"));
        let output = dir.path().join("out");

        let report = batch(output.clone())
            .run(&input, &EditSettings::default())
            .await;

        assert!(report.is_success());
        assert_eq!(report.succeeded.len(), 2);
        let first = &report.succeeded[0].output_path;
        let second = &report.succeeded[1].output_path;
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());

        let videos = std::fs::read_dir(&output)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().map(|e| e == "mp4").unwrap_or(false))
            .count();
        assert_eq!(videos, 2);
    }

    #[tokio::test]
    async fn test_result_files_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        touch(&input.join("a.mp4"));

        let report = batch(dir.path().join("out"))
            .with_result_files(false)
            .run(&input, &EditSettings::default())
            .await;

        assert!(report.is_success());
        assert!(!result_path_for(&report.succeeded[0]).exists());
    }
}
