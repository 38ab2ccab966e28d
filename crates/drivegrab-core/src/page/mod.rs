//! Page snapshots: the anchor records of a course page, in document order.
//!
//! The extractor never touches a live DOM. It reads a [`PageSource`], which a
//! saved HTML file or a JSON snapshot can both provide.

mod html;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One `<a href>` element as seen on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRecord {
    /// Raw `href` attribute value (may be relative).
    pub href: String,
    /// Visible text with whitespace runs collapsed.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AnchorRecord {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Failure reading anchors from a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page is not readable: {0}")]
    Unreadable(String),
    #[error("invalid page snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything the extractor can scan: a current location plus anchors in document order.
pub trait PageSource {
    /// Current page URL, checked against the target prefix before scanning.
    fn location(&self) -> &str;

    /// Base URL relative hrefs resolve against. Defaults to the location.
    fn base_url(&self) -> &str {
        self.location()
    }

    fn anchors(&self) -> std::result::Result<Vec<AnchorRecord>, PageError>;
}

/// Serializable snapshot of a page's anchors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub location: String,
    /// Resolved `<base href>`, when the document declares one.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub anchors: Vec<AnchorRecord>,
}

impl PageSnapshot {
    pub fn new(location: impl Into<String>, anchors: Vec<AnchorRecord>) -> Self {
        Self {
            location: location.into(),
            base: None,
            anchors,
        }
    }

    /// Build a snapshot from saved HTML. `location` is the URL the page was saved from.
    pub fn from_html(html: &str, location: &str) -> std::result::Result<Self, PageError> {
        html::snapshot_from_html(html, location)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, PageError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PageSource for PageSnapshot {
    fn location(&self) -> &str {
        &self.location
    }

    fn base_url(&self) -> &str {
        self.base.as_deref().unwrap_or(&self.location)
    }

    fn anchors(&self) -> std::result::Result<Vec<AnchorRecord>, PageError> {
        Ok(self.anchors.clone())
    }
}

/// Load a page from disk. `.json` files are snapshots; anything else is parsed as HTML
/// and needs `location` (the URL the page was saved from).
///
/// A `location` passed for a JSON snapshot overrides the one stored in it.
pub fn load_page(path: &Path, location: Option<&str>) -> Result<PageSnapshot> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read page file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let mut snapshot = PageSnapshot::from_json(&data)
            .with_context(|| format!("parse page snapshot: {}", path.display()))?;
        if let Some(loc) = location {
            snapshot.location = loc.to_string();
        }
        return Ok(snapshot);
    }

    let location = location.context("--location is required when scanning an HTML file")?;
    let snapshot = PageSnapshot::from_html(&data, location)
        .with_context(|| format!("parse page HTML: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        anchors = snapshot.anchors.len(),
        "loaded page"
    );
    Ok(snapshot)
}
