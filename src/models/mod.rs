pub mod job;
pub mod loaders;
pub mod paper;
pub mod review;

pub use job::{FailureKind, JobDescriptor, JobFailure, JobOutcome};
pub use loaders::{discover_jobs, load_paper};
pub use paper::PaperData;
pub use review::ReviewResult;
