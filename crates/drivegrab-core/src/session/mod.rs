//! Scan session: the items of the last scan and which of them are selected.
//!
//! Owned by whoever drives the UI and passed into each handler; a new scan
//! replaces the session wholesale.

mod status;

pub use status::ScanStatus;

use crate::download::DownloadRequest;
use crate::extract::{LinkItem, ScanResponse};
use crate::normalize::{FileKind, Normalizer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("nothing selected")]
    NothingSelected,
    #[error("item {index} does not exist (session has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    items: Vec<LinkItem>,
    selected: Vec<bool>,
}

impl ScanSession {
    /// Starts a session from a scan reply. Every item starts selected.
    pub fn from_response(resp: ScanResponse) -> (Self, ScanStatus) {
        if let Some(kind) = resp.error {
            return (Self::default(), kind.into());
        }
        let session = Self::from_items(resp.items);
        let status = if session.is_empty() {
            ScanStatus::NoneFound
        } else {
            ScanStatus::Found(session.len())
        };
        (session, status)
    }

    pub fn from_items(items: Vec<LinkItem>) -> Self {
        let selected = vec![true; items.len()];
        Self { items, selected }
    }

    pub fn items(&self) -> &[LinkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    fn check(&self, index: usize) -> Result<(), SelectionError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(SelectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    pub fn set_selected(&mut self, index: usize, on: bool) -> Result<(), SelectionError> {
        self.check(index)?;
        self.selected[index] = on;
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<(), SelectionError> {
        self.check(index)?;
        self.selected[index] = !self.selected[index];
        Ok(())
    }

    pub fn select_all(&mut self, on: bool) {
        self.selected.iter_mut().for_each(|s| *s = on);
    }

    /// Selects exactly `indices` (zero-based). Leaves the selection untouched on error.
    pub fn select_only(&mut self, indices: &[usize]) -> Result<(), SelectionError> {
        for &i in indices {
            self.check(i)?;
        }
        self.select_all(false);
        for &i in indices {
            self.selected[i] = true;
        }
        Ok(())
    }

    pub fn selected_items(&self) -> impl Iterator<Item = &LinkItem> + '_ {
        self.items
            .iter()
            .zip(&self.selected)
            .filter(|(_, on)| **on)
            .map(|(item, _)| item)
    }

    /// Display label for each item, in item order.
    pub fn kinds(&self) -> impl Iterator<Item = FileKind> + '_ {
        self.items.iter().map(|i| FileKind::guess(&i.title, &i.url))
    }

    /// Normalized download URL for every selected item, in item order.
    pub fn download_urls(&self, normalizer: &Normalizer) -> Result<Vec<String>, SelectionError> {
        let urls: Vec<String> = self
            .selected_items()
            .map(|item| normalizer.normalize(&item.url))
            .collect();
        if urls.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        Ok(urls)
    }

    /// Like [`ScanSession::download_urls`], carrying each title along as a filename hint.
    pub fn download_requests(
        &self,
        normalizer: &Normalizer,
    ) -> Result<Vec<DownloadRequest>, SelectionError> {
        let requests: Vec<DownloadRequest> = self
            .selected_items()
            .map(|item| {
                let req = DownloadRequest::new(normalizer.normalize(&item.url));
                // A title equal to the URL is the extractor's fallback, not a name.
                if item.title == item.url {
                    req
                } else {
                    req.with_title(&item.title)
                }
            })
            .collect();
        if requests.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ScanErrorKind;

    fn item(url: &str, title: &str) -> LinkItem {
        LinkItem {
            url: url.into(),
            title: title.into(),
        }
    }

    fn session() -> ScanSession {
        ScanSession::from_items(vec![
            item("https://drive.google.com/file/d/A/view", "slides.pptx"),
            item("https://docs.google.com/document/d/B/edit", "Essay"),
            item("https://docs.google.com/spreadsheets/d/C/edit", "grades.xlsx"),
        ])
    }

    #[test]
    fn from_response_statuses() {
        let (s, status) =
            ScanSession::from_response(ScanResponse::failed(ScanErrorKind::NotTargetPage));
        assert!(s.is_empty());
        assert_eq!(status, ScanStatus::NotTargetPage);

        let (_, status) = ScanSession::from_response(ScanResponse::ok(vec![]));
        assert_eq!(status, ScanStatus::NoneFound);

        let (s, status) = ScanSession::from_response(ScanResponse::ok(vec![item("u", "t")]));
        assert_eq!(status, ScanStatus::Found(1));
        assert!(s.is_selected(0));
    }

    #[test]
    fn all_selected_by_default() {
        let s = session();
        let urls = s.download_urls(&Normalizer::default()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://drive.usercontent.google.com/u/1/uc?id=A&export=download",
                "https://docs.google.com/document/d/B/export?format=pdf",
                "https://docs.google.com/spreadsheets/d/C/export?format=xlsx",
            ]
        );
    }

    #[test]
    fn select_only_and_toggle() {
        let mut s = session();
        s.select_only(&[2]).unwrap();
        assert_eq!(s.selected_items().count(), 1);
        s.toggle(0).unwrap();
        let titles: Vec<_> = s.selected_items().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["slides.pptx", "grades.xlsx"]);
    }

    #[test]
    fn bad_index_leaves_selection() {
        let mut s = session();
        assert_eq!(
            s.select_only(&[0, 7]),
            Err(SelectionError::IndexOutOfRange { index: 7, len: 3 })
        );
        assert_eq!(s.selected_items().count(), 3);
        assert!(s.set_selected(3, true).is_err());
    }

    #[test]
    fn nothing_selected() {
        let mut s = session();
        s.select_all(false);
        assert_eq!(
            s.download_urls(&Normalizer::default()),
            Err(SelectionError::NothingSelected)
        );
    }

    #[test]
    fn requests_carry_titles() {
        let mut s = session();
        s.select_only(&[1]).unwrap();
        let reqs = s.download_requests(&Normalizer::with_user_index(2)).unwrap();
        assert_eq!(
            reqs,
            vec![DownloadRequest::new("https://docs.google.com/document/d/B/export?format=pdf")
                .with_title("Essay")]
        );
    }

    #[test]
    fn url_fallback_title_is_not_a_filename_hint() {
        let s = ScanSession::from_items(vec![item(
            "https://drive.google.com/file/d/B/view",
            "https://drive.google.com/file/d/B/view",
        )]);
        let reqs = s.download_requests(&Normalizer::default()).unwrap();
        assert_eq!(reqs[0].title, None);
        assert_eq!(
            reqs[0].url,
            "https://drive.usercontent.google.com/u/1/uc?id=B&export=download"
        );
    }

    #[test]
    fn kinds_follow_titles() {
        let labels: Vec<_> = session().kinds().map(FileKind::label).collect();
        assert_eq!(labels, vec!["PPT", "FILE", "XLS"]);
    }
}
