pub mod json_loader;

pub use json_loader::{discover_jobs, load_paper};
