//! CLI command handlers, one per file.

mod download;
mod normalize;
mod scan;

pub use download::run_download;
pub use normalize::run_normalize;
pub use scan::run_scan;
