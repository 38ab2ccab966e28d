pub mod config;
pub mod logging;

pub mod download;
pub mod extract;
pub mod normalize;
pub mod page;
pub mod session;

pub use extract::{extract_links, scan, ExtractOptions, LinkItem, ScanErrorKind, ScanResponse};
pub use normalize::{classify, normalize, Classification, FileKind, Normalizer};
pub use page::{AnchorRecord, PageSnapshot, PageSource};
pub use session::{ScanSession, ScanStatus};
