// Application layer - Use case interactors

pub mod assembler;
pub mod batch_interactor;
pub mod container;
pub mod edit_interactor;

// Re-export interactors
pub use assembler::{AssemblyReport, SegmentAssembler};
pub use batch_interactor::{BatchInteractor, BatchReport};
pub use edit_interactor::{EditInteractor, EditOptions};
