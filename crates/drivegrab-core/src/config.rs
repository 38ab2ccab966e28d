use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::extract::{ExtractOptions, DEFAULT_TARGET_PREFIX};
use crate::normalize::{Normalizer, DEFAULT_USER_INDEX};

/// HTTP transfer limits for each download (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Transfers slower than this many bytes/sec for `low_speed_time_secs` are dropped.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Redirect hops followed before giving up (export endpoints redirect once or twice).
    pub max_redirects: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirects: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/drivegrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrivegrabConfig {
    /// Pages whose location does not start with this prefix are refused by the scanner.
    pub target_prefix: String,
    /// Authenticated session slot used in direct-content download URLs (`/u/<n>/`).
    pub user_index: u32,
    /// Where downloads land; current directory when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for DrivegrabConfig {
    fn default() -> Self {
        Self {
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            user_index: DEFAULT_USER_INDEX,
            download_dir: None,
            http: None,
        }
    }
}

impl DrivegrabConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            target_prefix: self.target_prefix.clone(),
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_user_index(self.user_index)
    }

    pub fn http_or_default(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("drivegrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DrivegrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DrivegrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DrivegrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = DrivegrabConfig::default();
        assert_eq!(cfg.target_prefix, "https://classroom.google.com/");
        assert_eq!(cfg.user_index, 1);
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.http_or_default().max_redirects, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = DrivegrabConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: DrivegrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.target_prefix, cfg.target_prefix);
        assert_eq!(parsed.user_index, cfg.user_index);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            target_prefix = "https://lms.example.edu/"
            user_index = 0
            download_dir = "/tmp/course"

            [http]
            connect_timeout_secs = 5
            low_speed_limit_bytes = 10
            low_speed_time_secs = 20
            max_redirects = 3
        "#;
        let cfg: DrivegrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.target_prefix, "https://lms.example.edu/");
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/tmp/course")));
        let http = cfg.http.as_ref().unwrap();
        assert_eq!(http.connect_timeout_secs, 5);
        assert_eq!(http.max_redirects, 3);
        assert_eq!(
            cfg.normalizer().normalize("https://drive.google.com/file/d/A/view"),
            "https://drive.usercontent.google.com/u/0/uc?id=A&export=download"
        );
        assert_eq!(cfg.extract_options().target_prefix, "https://lms.example.edu/");
    }
}
