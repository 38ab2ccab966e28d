//! `drivegrab download <page>` – scan, select, normalize, download.

use anyhow::{Context, Result};
use drivegrab_core::config::DrivegrabConfig;
use drivegrab_core::download::{spawn_batch, DownloadOptions};
use drivegrab_core::page::load_page;
use drivegrab_core::session::SelectionError;
use drivegrab_core::{scan, ScanSession, ScanStatus};
use std::path::Path;

use super::scan::print_items;

/// `--select` numbers are 1-based as printed by `scan`.
fn zero_based(select: &[usize]) -> Result<Vec<usize>> {
    select
        .iter()
        .map(|&n| n.checked_sub(1).context("item numbers start at 1"))
        .collect()
}

pub async fn run_download(
    cfg: &DrivegrabConfig,
    page: &Path,
    location: Option<&str>,
    select: &[usize],
    dir: &Path,
) -> Result<()> {
    let snapshot = load_page(page, location)?;
    let resp = scan(&snapshot, &cfg.extract_options());
    let (mut session, status) = ScanSession::from_response(resp);
    println!("{status}");
    if status.is_terminal() {
        return Ok(());
    }

    if !select.is_empty() {
        session.select_only(&zero_based(select)?)?;
    }
    print_items(&session);

    let requests = match session.download_requests(&cfg.normalizer()) {
        Ok(r) => r,
        Err(SelectionError::NothingSelected) => {
            println!("{}", ScanStatus::NothingSelected);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("create download dir: {}", dir.display()))?;
    println!("{}", ScanStatus::Downloading(requests.len()));

    let opts = DownloadOptions {
        dir: dir.to_path_buf(),
        http: cfg.http_or_default(),
    };
    let reports = spawn_batch(requests, &opts).join_all().await;

    let mut failed = 0usize;
    for r in &reports {
        match &r.result {
            Ok(file) => println!(
                "  ok    {}  ({} bytes, sha256 {})",
                file.path.display(),
                file.bytes,
                file.sha256
            ),
            Err(e) => {
                failed += 1;
                println!("  fail  {}  {}", r.url, e);
            }
        }
    }
    if failed > 0 {
        println!("{failed} of {} download(s) failed.", reports.len());
    } else {
        tracing::info!("downloaded {} file(s) into {}", reports.len(), dir.display());
    }
    Ok(())
}
