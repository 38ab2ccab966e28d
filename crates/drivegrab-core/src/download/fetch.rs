//! Single blocking GET streamed into a temp file, then moved to its final name.

use curl::easy::Easy;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::Path;
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::filename::{derive_filename, numbered};
use super::{DownloadError, DownloadRequest, DownloadedFile};
use crate::config::HttpConfig;

/// Gives up on ` (n)` suffixes after this many collisions.
const MAX_NAME_SUFFIX: usize = 999;

/// Value of the last `Content-Disposition` header, reset on each new response
/// so that redirect hops don't leak their headers into the final one.
fn track_disposition(line: &[u8], disposition: &mut Option<String>) {
    let Ok(line) = str::from_utf8(line) else {
        return;
    };
    let line = line.trim_end();
    if line.starts_with("HTTP/") {
        *disposition = None;
    } else if let Some((name, value)) = line.split_once(':') {
        if name.trim().eq_ignore_ascii_case("content-disposition") {
            *disposition = Some(value.trim().to_string());
        }
    }
}

/// Downloads `req` into `dir`. Runs on the current thread; `abort` is polled from
/// curl's progress and write callbacks.
pub(super) fn fetch_to_dir(
    req: &DownloadRequest,
    dir: &Path,
    http: &HttpConfig,
    abort: &AtomicBool,
) -> Result<DownloadedFile, DownloadError> {
    let mut part = tempfile::Builder::new()
        .prefix(".drivegrab-")
        .suffix(".part")
        .tempfile_in(dir)?;

    let mut hasher = Sha256::new();
    let mut bytes = 0u64;
    let mut write_err: Option<io::Error> = None;
    let mut disposition: Option<String> = None;

    let mut easy = Easy::new();
    easy.url(&req.url)?;
    easy.follow_location(true)?;
    easy.max_redirections(http.max_redirects)?;
    easy.connect_timeout(Duration::from_secs(http.connect_timeout_secs))?;
    easy.low_speed_limit(http.low_speed_limit_bytes)?;
    easy.low_speed_time(Duration::from_secs(http.low_speed_time_secs))?;
    easy.progress(true)?;

    let outcome = {
        let file = part.as_file_mut();
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            track_disposition(line, &mut disposition);
            true
        })?;
        transfer.write_function(|data| {
            if abort.load(Ordering::Relaxed) {
                return Ok(0);
            }
            match file.write_all(data) {
                Ok(()) => {
                    hasher.update(data);
                    bytes += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        transfer.perform()
    };

    if let Err(e) = outcome {
        if abort.load(Ordering::Relaxed) || e.is_aborted_by_callback() {
            return Err(DownloadError::Aborted);
        }
        if let Some(io_err) = write_err {
            return Err(DownloadError::Storage(io_err));
        }
        return Err(DownloadError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Http(code));
    }

    let sha256 = hex::encode(hasher.finalize());
    let name = derive_filename(disposition.as_deref(), req.title.as_deref(), &req.url);
    let mut n = 0;
    loop {
        let target = numbered(dir, &name, n);
        match part.persist_noclobber(&target) {
            Ok(_) => {
                return Ok(DownloadedFile {
                    path: target,
                    bytes,
                    sha256,
                })
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists && n < MAX_NAME_SUFFIX => {
                part = e.file;
                n += 1;
            }
            Err(e) => return Err(DownloadError::Storage(e.error)),
        }
    }
}
