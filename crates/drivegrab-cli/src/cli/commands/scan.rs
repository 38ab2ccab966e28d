//! `drivegrab scan <page>` – list the links a download would offer.

use anyhow::Result;
use drivegrab_core::config::DrivegrabConfig;
use drivegrab_core::page::load_page;
use drivegrab_core::{scan, ScanSession};
use std::path::Path;

/// Numbered listing; numbers are what `download --select` takes.
pub(super) fn print_items(session: &ScanSession) {
    for (i, (item, kind)) in session.items().iter().zip(session.kinds()).enumerate() {
        println!("{:>4}  {:<4}  {}", i + 1, kind, item.title);
        println!("{:>4}  {:<4}  {}", "", "", item.url);
    }
}

pub fn run_scan(
    cfg: &DrivegrabConfig,
    page: &Path,
    location: Option<&str>,
    json: bool,
) -> Result<()> {
    let snapshot = load_page(page, location)?;
    let resp = scan(&snapshot, &cfg.extract_options());
    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }
    let (session, status) = ScanSession::from_response(resp);
    println!("{status}");
    print_items(&session);
    Ok(())
}
