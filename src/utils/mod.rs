pub mod fs;
pub mod logging;

pub use fs::write_atomic;
