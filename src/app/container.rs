use std::sync::Arc;

use crate::adapters::toml_config::ToolsSection;
use crate::adapters::{FfmpegAdapter, FfprobeAdapter, RmsSilenceDetector, ToolTimeouts};
use crate::app::batch_interactor::BatchInteractor;
use crate::app::edit_interactor::{EditInteractor, EditOptions};
use crate::ports::{AudioExtractPort, ProbePort, SegmentToolPort, SilenceDetectPort};

pub trait AppContainer: Send + Sync {
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn batch_interactor(&self) -> BatchInteractor;
}

/// Wires the ffmpeg-backed adapters into the interactors
pub struct DefaultAppContainer {
    edit_interactor: Arc<EditInteractor>,
}

impl DefaultAppContainer {
    pub fn new(timeouts: ToolTimeouts, tools: &ToolsSection, options: EditOptions) -> Self {
        let probe_port = Arc::new(FfprobeAdapter::new(timeouts.probe).with_program(&tools.ffprobe));
        let ffmpeg = Arc::new(FfmpegAdapter::new(timeouts).with_program(&tools.ffmpeg));
        let detect_port = Arc::new(RmsSilenceDetector::new());

        let edit_interactor = Arc::new(EditInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            Arc::clone(&ffmpeg) as Arc<dyn AudioExtractPort>,
            detect_port as Arc<dyn SilenceDetectPort>,
            ffmpeg as Arc<dyn SegmentToolPort>,
            options,
        ));

        Self { edit_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn batch_interactor(&self) -> BatchInteractor {
        BatchInteractor::new(Arc::clone(&self.edit_interactor))
    }
}
