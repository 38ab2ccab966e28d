//! File-type labels shown next to each item. Display only; never affects the download URL.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Ppt,
    Doc,
    Pdf,
    Xls,
    Jpg,
    Png,
    File,
}

const SUFFIXES: &[(&str, FileKind)] = &[
    (".ppt", FileKind::Ppt),
    (".pptx", FileKind::Ppt),
    (".doc", FileKind::Doc),
    (".docx", FileKind::Doc),
    (".pdf", FileKind::Pdf),
    (".xls", FileKind::Xls),
    (".xlsx", FileKind::Xls),
    (".jpg", FileKind::Jpg),
    (".jpeg", FileKind::Jpg),
    (".png", FileKind::Png),
];

impl FileKind {
    /// Guesses the kind from a title or URL by its extension (case-insensitive).
    /// Query strings and fragments are ignored.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let stem = lower.split(['?', '#']).next().unwrap_or_default();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| stem.ends_with(suffix))
            .map(|(_, kind)| *kind)
            .unwrap_or(FileKind::File)
    }

    /// Title first, then URL.
    pub fn guess(title: &str, url: &str) -> Self {
        match Self::from_name(title) {
            FileKind::File => Self::from_name(url),
            kind => kind,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Ppt => "PPT",
            FileKind::Doc => "DOC",
            FileKind::Pdf => "PDF",
            FileKind::Xls => "XLS",
            FileKind::Jpg => "JPG",
            FileKind::Png => "PNG",
            FileKind::File => "FILE",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
