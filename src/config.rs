// ⚙️ Configuration - artifact paths and server address
// Defaults are the fixed constants; a JSON file may override any of them.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CERTIFICATE_FILE: &str = "hasil_perkembangan.pdf";
pub const QR_IMAGE_FILE: &str = "qr_temp.png";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Certificate written by the interactive front ends, overwritten each run
    pub certificate_path: PathBuf,

    /// QR raster written next to the certificate, never cleaned up
    pub qr_image_path: PathBuf,

    /// Bind address for the web server
    pub server_addr: String,

    /// Where the web server puts its per-request artifacts
    pub artifact_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            certificate_path: PathBuf::from(CERTIFICATE_FILE),
            qr_image_path: PathBuf::from(QR_IMAGE_FILE),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            artifact_dir: std::env::temp_dir(),
        }
    }
}

impl AppConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// `--config <path>` anywhere in the argument list, defaults otherwise
    pub fn from_args(args: &[String]) -> Result<Self> {
        match args.iter().position(|a| a == "--config") {
            Some(i) => {
                let path = args
                    .get(i + 1)
                    .context("--config requires a path argument")?;
                AppConfig::from_file(path)
            }
            None => Ok(AppConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_fixed_paths() {
        let config = AppConfig::default();
        assert_eq!(config.certificate_path, PathBuf::from("hasil_perkembangan.pdf"));
        assert_eq!(config.qr_image_path, PathBuf::from("qr_temp.png"));
        assert_eq!(config.server_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server_addr": "127.0.0.1:8080"}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.certificate_path, PathBuf::from(CERTIFICATE_FILE));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AppConfig::from_file("/nonexistent/child-growth.json").is_err());
    }

    #[test]
    fn test_from_args() {
        let none: Vec<String> = vec!["child-growth".into()];
        assert_eq!(AppConfig::from_args(&none).unwrap(), AppConfig::default());

        let dangling: Vec<String> = vec!["child-growth".into(), "--config".into()];
        assert!(AppConfig::from_args(&dangling).is_err());
    }
}
