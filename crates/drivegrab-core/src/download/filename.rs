//! Local filename for a finished download.
//!
//! Preference: `Content-Disposition` (export endpoints always send one), then the
//! item title, then the last URL path segment. Result is safe on Linux.

use std::path::{Path, PathBuf};

/// Used when nothing else yields a usable name.
pub const FALLBACK_FILENAME: &str = "download.bin";

const NAME_MAX: usize = 255;

/// Picks and sanitizes the filename for a download.
pub fn derive_filename(
    content_disposition: Option<&str>,
    title: Option<&str>,
    url: &str,
) -> String {
    let candidates = [
        content_disposition.and_then(content_disposition_filename),
        title.map(str::to_string),
        last_path_segment(url),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(|c| sanitize(&c))
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// `name`, or `name (1)`, `name (2)`, ... with the extension kept at the end.
/// The stem is shortened so the result still fits in NAME_MAX bytes.
pub fn numbered(dir: &Path, name: &str, n: usize) -> PathBuf {
    if n == 0 {
        return dir.join(name);
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let suffix = format!(" ({n})");
    let room = NAME_MAX.saturating_sub(suffix.len() + ext.len());
    dir.join(format!("{}{suffix}{ext}", truncate_to(stem, room)))
}

fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// `filename*=UTF-8''…` wins over `filename=…`.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                if let Some((charset, rest)) = raw.split_once("''") {
                    let decoded = percent_decode(rest);
                    if charset.eq_ignore_ascii_case("utf-8") && !decoded.is_empty() {
                        return Some(decoded);
                    }
                }
            }
            "filename" => {
                let unquoted = raw
                    .strip_prefix('"')
                    .and_then(|r| r.strip_suffix('"'))
                    .map(|r| r.replace("\\\"", "\"").replace("\\\\", "\\"))
                    .unwrap_or_else(|| raw.to_string());
                if !unquoted.is_empty() {
                    plain = Some(unquoted);
                }
            }
            _ => {}
        }
    }
    plain
}

/// Decodes `%XX` escapes; malformed escapes are kept literally.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(b) = hex {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Replaces path separators and control characters, collapses `_` runs,
/// trims dots/spaces and caps the length at NAME_MAX bytes.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c == '/' || c == '\\' || c.is_control() { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches(|c: char| c == '.' || c == '_' || c.is_whitespace());
    truncate_to(trimmed, NAME_MAX).to_string()
}
