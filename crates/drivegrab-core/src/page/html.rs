//! Saved HTML to [`PageSnapshot`] via `scraper`.

use scraper::{ElementRef, Html, Selector};

use super::{AnchorRecord, PageError, PageSnapshot};

fn selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|e| PageError::Unreadable(format!("selector {css}: {e:?}")))
}

/// Elements whose text never renders.
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Text content with whitespace runs collapsed to single spaces, roughly what `innerText` yields.
fn visible_text(el: &ElementRef<'_>) -> String {
    el.descendants()
        .filter(|n| {
            !n.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_TEXT_PARENTS.contains(&e.name()))
            })
        })
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn snapshot_from_html(html: &str, location: &str) -> Result<PageSnapshot, PageError> {
    let doc = Html::parse_document(html);
    let anchor_sel = selector("a[href]")?;
    let base_sel = selector("base[href]")?;

    let base = doc
        .select(&base_sel)
        .next()
        .and_then(|b| b.value().attr("href"))
        .and_then(|href| {
            let href = href.trim();
            url::Url::parse(location)
                .and_then(|loc| loc.join(href))
                .or_else(|_| url::Url::parse(href))
                .ok()
        })
        .map(|u| u.to_string());

    let anchors = doc
        .select(&anchor_sel)
        .map(|el| {
            let attrs = el.value();
            AnchorRecord {
                href: attrs.attr("href").unwrap_or_default().to_string(),
                text: visible_text(&el),
                aria_label: attrs.attr("aria-label").map(str::to_string),
                role: attrs.attr("role").map(str::to_string),
            }
        })
        .collect();

    Ok(PageSnapshot {
        location: location.to_string(),
        base,
        anchors,
    })
}
