//! Link extractor: Drive/Docs links on a course page, deduplicated, in document order.
//!
//! Only runs against pages whose location starts with the configured target prefix;
//! anything else is refused with [`ScanErrorKind::NotTargetPage`].

mod host;

pub use host::{is_menu_item_role, is_recognized_origin, resolve_canonical, RECOGNIZED_HOSTS};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::page::{AnchorRecord, PageError, PageSource};

/// Location prefix of the pages the scanner agrees to read.
pub const DEFAULT_TARGET_PREFIX: &str = "https://classroom.google.com/";

/// A downloadable candidate found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    /// Absolute, fragment-stripped URL.
    pub url: String,
    /// Anchor text, else aria-label, else the URL. Never empty.
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanErrorKind {
    NotTargetPage,
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("page {location} is not a target page")]
    NotTargetPage { location: String },
    #[error("could not read the page: {0}")]
    Unknown(#[from] PageError),
}

impl ScanError {
    pub fn kind(&self) -> ScanErrorKind {
        match self {
            ScanError::NotTargetPage { .. } => ScanErrorKind::NotTargetPage,
            ScanError::Unknown(_) => ScanErrorKind::Unknown,
        }
    }
}

/// Reply to a scan request: `items` is empty whenever `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub error: Option<ScanErrorKind>,
    pub items: Vec<LinkItem>,
}

impl ScanResponse {
    pub fn ok(items: Vec<LinkItem>) -> Self {
        Self { error: None, items }
    }

    pub fn failed(kind: ScanErrorKind) -> Self {
        Self {
            error: Some(kind),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub target_prefix: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
        }
    }
}

fn title_for(anchor: &AnchorRecord, canonical: &str) -> String {
    let text = anchor.text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    anchor
        .aria_label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(canonical)
        .to_string()
}

/// Extracts recognized cloud-document links from `page`.
///
/// Menu-item anchors are skipped, URLs are fragment-stripped and deduplicated
/// (first occurrence keeps its title), and document order is preserved.
pub fn extract_links<P: PageSource + ?Sized>(
    page: &P,
    opts: &ExtractOptions,
) -> Result<Vec<LinkItem>, ScanError> {
    let location = page.location();
    if !location.starts_with(&opts.target_prefix) {
        return Err(ScanError::NotTargetPage {
            location: location.to_string(),
        });
    }

    let anchors = page.anchors()?;
    let base = Url::parse(page.base_url()).ok();

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for anchor in &anchors {
        if anchor.href.trim().is_empty() || is_menu_item_role(anchor.role.as_deref()) {
            continue;
        }
        let Some(canonical) = resolve_canonical(base.as_ref(), &anchor.href) else {
            continue;
        };
        if !is_recognized_origin(&canonical) || seen.contains(&canonical) {
            continue;
        }
        let title = title_for(anchor, &canonical);
        seen.insert(canonical.clone());
        items.push(LinkItem {
            url: canonical,
            title,
        });
    }

    tracing::debug!(
        anchors = anchors.len(),
        items = items.len(),
        "extracted drive links"
    );
    Ok(items)
}

/// [`extract_links`] folded into the wire shape; failures become an empty item list.
pub fn scan<P: PageSource + ?Sized>(page: &P, opts: &ExtractOptions) -> ScanResponse {
    match extract_links(page, opts) {
        Ok(items) => ScanResponse::ok(items),
        Err(e) => {
            tracing::warn!("scan failed: {}", e);
            ScanResponse::failed(e.kind())
        }
    }
}
