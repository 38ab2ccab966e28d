//! User-facing status lines for each step of a scan/download round.

use std::fmt;

use crate::extract::ScanErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Found(usize),
    NoneFound,
    NotTargetPage,
    Unknown,
    NothingSelected,
    Downloading(usize),
}

impl From<ScanErrorKind> for ScanStatus {
    fn from(kind: ScanErrorKind) -> Self {
        match kind {
            ScanErrorKind::NotTargetPage => ScanStatus::NotTargetPage,
            ScanErrorKind::Unknown => ScanStatus::Unknown,
        }
    }
}

impl ScanStatus {
    /// True when the caller should stop instead of offering a selection.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ScanStatus::Found(_) | ScanStatus::Downloading(_))
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Found(n) => write!(f, "Found {n} Drive link(s)."),
            ScanStatus::NoneFound => write!(f, "No Drive links found on this page."),
            ScanStatus::NotTargetPage => write!(
                f,
                "This is not a Google Classroom page. Open a Classroom course page and scan again."
            ),
            ScanStatus::Unknown => write!(
                f,
                "Could not read the page. Reload it and try scanning again."
            ),
            ScanStatus::NothingSelected => {
                write!(f, "Nothing selected. At least pretend to choose one.")
            }
            ScanStatus::Downloading(n) => write!(f, "Downloading {n} file(s)..."),
        }
    }
}
