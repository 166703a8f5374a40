pub mod paper_reviewer;
pub mod prompt;
pub mod report_writer;
pub mod reviewer;

pub use paper_reviewer::AgentReviewer;
pub use report_writer::{render_report, write_report};
pub use reviewer::Reviewer;
