//! Integration test: batch downloads against a local HTTP server.
//!
//! Each item runs as its own task; failures and cancellations stay local to the item.

mod common;

use common::file_server::{self, Route};
use drivegrab_core::config::HttpConfig;
use drivegrab_core::download::{spawn_batch, DownloadError, DownloadOptions, DownloadRequest};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tempfile::tempdir;

fn options(dir: &std::path::Path) -> DownloadOptions {
    DownloadOptions {
        dir: dir.to_path_buf(),
        http: HttpConfig {
            connect_timeout_secs: 5,
            ..HttpConfig::default()
        },
    }
}

fn leftover_parts(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .count()
}

#[tokio::test]
async fn failed_item_does_not_stop_siblings() {
    let essay: Vec<u8> = b"%PDF-1.4 essay".to_vec();
    let base = file_server::start(vec![
        ("/export/essay", Route::attachment("Essay.pdf", &essay)),
        ("/files/notes.txt", Route::ok(b"plain notes")),
    ]);
    let dir = tempdir().unwrap();

    let batch = spawn_batch(
        vec![
            DownloadRequest::new(format!("{base}/export/essay?format=pdf")).with_title("Essay"),
            DownloadRequest::new(format!("{base}/missing")),
            DownloadRequest::new(format!("{base}/files/notes.txt")),
        ],
        &options(dir.path()),
    );
    assert_eq!(batch.len(), 3);
    let reports = batch.join_all().await;

    let first = reports[0].result.as_ref().expect("essay downloads");
    assert_eq!(first.path, dir.path().join("Essay.pdf"));
    assert_eq!(std::fs::read(&first.path).unwrap(), essay);
    assert_eq!(first.bytes, essay.len() as u64);
    assert_eq!(first.sha256, hex::encode(Sha256::digest(&essay)));

    assert!(matches!(reports[1].result, Err(DownloadError::Http(404))));

    let third = reports[2].result.as_ref().expect("notes download");
    assert_eq!(third.path, dir.path().join("notes.txt"));
    assert_eq!(std::fs::read(&third.path).unwrap(), b"plain notes");

    assert_eq!(leftover_parts(dir.path()), 0);
}

#[tokio::test]
async fn same_name_is_never_overwritten() {
    let base = file_server::start(vec![
        ("/a", Route::attachment("Week 1.pdf", b"first")),
        ("/b", Route::attachment("Week 1.pdf", b"second")),
    ]);
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Week 1.pdf"), b"already here").unwrap();

    let reports = spawn_batch(
        vec![
            DownloadRequest::new(format!("{base}/a")),
            DownloadRequest::new(format!("{base}/b")),
        ],
        &options(dir.path()),
    )
    .join_all()
    .await;

    let mut names: Vec<String> = reports
        .iter()
        .map(|r| {
            let file = r.result.as_ref().expect("download ok");
            file.path.file_name().unwrap().to_string_lossy().into_owned()
        })
        .collect();
    names.sort();
    assert_eq!(names, vec!["Week 1 (1).pdf", "Week 1 (2).pdf"]);
    assert_eq!(
        std::fs::read(dir.path().join("Week 1.pdf")).unwrap(),
        b"already here"
    );
}

#[tokio::test]
async fn redirect_uses_final_response_headers() {
    let base = file_server::start(vec![
        ("/start", Route::redirect("/final")),
        ("/final", Route::attachment("Report.pdf", b"report")),
    ]);
    let dir = tempdir().unwrap();

    let reports = spawn_batch(
        vec![DownloadRequest::new(format!("{base}/start"))],
        &options(dir.path()),
    )
    .join_all()
    .await;

    let file = reports[0].result.as_ref().expect("redirect followed");
    assert_eq!(file.path, dir.path().join("Report.pdf"));
    assert_eq!(std::fs::read(&file.path).unwrap(), b"report");
}

#[tokio::test]
async fn cancel_stops_only_that_task() {
    let base = file_server::start(vec![
        ("/slow", Route::stalled()),
        ("/fast", Route::attachment("fast.bin", b"fast")),
    ]);
    let dir = tempdir().unwrap();

    let batch = spawn_batch(
        vec![
            DownloadRequest::new(format!("{base}/slow")),
            DownloadRequest::new(format!("{base}/fast")),
        ],
        &options(dir.path()),
    );
    let (slow, fast) = (&batch.tasks()[0], &batch.tasks()[1]);
    assert_eq!((slow.id(), fast.id()), (0, 1));

    let waited = tokio::time::timeout(Duration::from_secs(10), async {
        while !fast.is_finished() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "fast sibling finishes while the slow one stalls");
    assert!(!slow.is_finished());
    slow.cancel();

    let reports = tokio::time::timeout(Duration::from_secs(20), batch.join_all())
        .await
        .expect("cancelled task finishes");
    assert!(matches!(reports[0].result, Err(DownloadError::Aborted)));
    let fast = reports[1].result.as_ref().expect("sibling unaffected");
    assert_eq!(fast.path, dir.path().join("fast.bin"));
    assert_eq!(leftover_parts(dir.path()), 0);
}
