//! Origin checks and canonicalization for candidate links.

use url::Url;

/// Hosts whose links are cloud documents worth offering for download.
pub const RECOGNIZED_HOSTS: [&str; 2] = ["drive.google.com", "docs.google.com"];

/// Resolves `href` against `base` and returns the canonical (fragment-stripped) URL,
/// or `None` if it cannot be resolved.
pub fn resolve_canonical(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    let resolved = match Url::parse(href) {
        Ok(u) => u,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };
    let full = resolved.as_str();
    let canonical = match full.find('#') {
        Some(i) => &full[..i],
        None => full,
    };
    Some(canonical.to_string())
}

/// True when the URL's scheme is http(s) and its host is exactly one of [`RECOGNIZED_HOSTS`].
///
/// The match is on the origin only: `https://evil.example/?u=https://drive.google.com/` is rejected.
pub fn is_recognized_origin(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "https" | "http") {
        return false;
    }
    match parsed.host_str() {
        Some(host) => RECOGNIZED_HOSTS
            .iter()
            .any(|h| host.eq_ignore_ascii_case(h)),
        None => false,
    }
}

/// True for ARIA menu roles (`menuitem`, `menuitemcheckbox`, `menuitemradio`).
pub fn is_menu_item_role(role: Option<&str>) -> bool {
    role.map(|r| {
        r.split_whitespace()
            .any(|token| token.to_ascii_lowercase().starts_with("menuitem"))
    })
    .unwrap_or(false)
}
