//! Download URL normalizer: view links to direct download / export links.
//!
//! Rules are tried in a fixed order and the first match wins:
//!
//! 1. `/file/d/<ID>/` in the path
//! 2. an `id` query parameter
//! 3. `/document/d/<ID>` (exported as PDF)
//! 4. `/spreadsheets/d/<ID>` (exported as XLSX)
//! 5. `/presentation/d/<ID>` (exported as PDF)
//!
//! Anything else passes through unchanged. Normalization never fails.

mod file_kind;

pub use file_kind::FileKind;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::download::filename::percent_decode;

/// Session slot used in direct-content URLs when none is configured.
pub const DEFAULT_USER_INDEX: u32 = 1;

const USERCONTENT_BASE: &str = "https://drive.usercontent.google.com";
const DOCS_BASE: &str = "https://docs.google.com";

static FILE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/file/d/([^/]+)/").expect("valid regex"));
static DOCUMENT_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/document/d/([^/]+)").expect("valid regex"));
static SPREADSHEET_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([^/]+)").expect("valid regex"));
static PRESENTATION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/presentation/d/([^/]+)").expect("valid regex"));

/// What kind of link a URL is, with the file identifier pulled out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    FileDirect(String),
    LegacyIdParam(String),
    Document(String),
    Spreadsheet(String),
    Presentation(String),
    /// Carries the original input.
    Unrecognized(String),
}

fn path_id(re: &Regex, path: &str) -> Option<String> {
    re.captures(path).map(|c| c[1].to_string())
}

/// Classifies `url` by shape. Unparseable input is [`Classification::Unrecognized`].
pub fn classify(url: &str) -> Classification {
    let Ok(parsed) = Url::parse(url) else {
        return Classification::Unrecognized(url.to_string());
    };
    let path = parsed.path();

    // Path captures are still escaped; the id param below comes back decoded.
    if let Some(id) = path_id(&FILE_PATH, path) {
        return Classification::FileDirect(percent_decode(&id));
    }
    if let Some((_, id)) = parsed
        .query_pairs()
        .find(|(k, v)| k == "id" && !v.is_empty())
    {
        return Classification::LegacyIdParam(id.into_owned());
    }
    if let Some(id) = path_id(&DOCUMENT_PATH, path) {
        return Classification::Document(id);
    }
    if let Some(id) = path_id(&SPREADSHEET_PATH, path) {
        return Classification::Spreadsheet(id);
    }
    if let Some(id) = path_id(&PRESENTATION_PATH, path) {
        return Classification::Presentation(id);
    }
    Classification::Unrecognized(url.to_string())
}

/// Builds download URLs. Stateless apart from the session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    user_index: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_user_index(DEFAULT_USER_INDEX)
    }
}

impl Normalizer {
    pub fn with_user_index(user_index: u32) -> Self {
        Self { user_index }
    }

    pub fn user_index(&self) -> u32 {
        self.user_index
    }

    fn direct_content(&self, id: &str) -> String {
        let id: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!(
            "{USERCONTENT_BASE}/u/{}/uc?id={id}&export=download",
            self.user_index
        )
    }

    /// Download URL for an already classified link.
    pub fn download_url(&self, class: &Classification) -> String {
        match class {
            Classification::FileDirect(id) | Classification::LegacyIdParam(id) => {
                self.direct_content(id)
            }
            Classification::Document(id) => {
                format!("{DOCS_BASE}/document/d/{id}/export?format=pdf")
            }
            Classification::Spreadsheet(id) => {
                format!("{DOCS_BASE}/spreadsheets/d/{id}/export?format=xlsx")
            }
            Classification::Presentation(id) => {
                format!("{DOCS_BASE}/presentation/d/{id}/export/pdf")
            }
            Classification::Unrecognized(url) => url.clone(),
        }
    }

    pub fn normalize(&self, url: &str) -> String {
        let class = classify(url);
        let out = self.download_url(&class);
        tracing::trace!(input = url, output = %out, ?class, "normalized");
        out
    }
}

/// [`Normalizer::normalize`] with the default session slot.
pub fn normalize(url: &str) -> String {
    Normalizer::default().normalize(url)
}
