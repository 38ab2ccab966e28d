//! `drivegrab normalize <url>...` – print direct download URLs.

use drivegrab_core::config::DrivegrabConfig;

pub fn run_normalize(cfg: &DrivegrabConfig, urls: &[String]) {
    let normalizer = cfg.normalizer();
    for url in urls {
        println!("{}", normalizer.normalize(url));
    }
}
