use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::ChartVariant;

/// Environment variable overriding the presign endpoint
pub const ENV_PRESIGN_URL: &str = "SPENDVIEW_PRESIGN_URL";
/// Environment variable overriding the summary endpoint
pub const ENV_SUMMARY_URL: &str = "SPENDVIEW_SUMMARY_URL";
/// Environment variable overriding the settle delay (milliseconds)
pub const ENV_SETTLE_DELAY_MS: &str = "SPENDVIEW_SETTLE_DELAY_MS";

/// Application settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Backend endpoints
    #[serde(default)]
    pub endpoints: EndpointSettings,

    /// Upload pipeline settings
    #[serde(default)]
    pub upload: UploadSettings,

    /// Chart presentation settings
    #[serde(default)]
    pub chart: ChartSettings,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Endpoint issuing presigned POST credentials
    #[serde(default = "default_presign_url")]
    pub presign_url: String,

    /// Endpoint returning aggregated category totals
    #[serde(default = "default_summary_url")]
    pub summary_url: String,
}

fn default_presign_url() -> String {
    "http://localhost:3000/presign".to_string()
}

fn default_summary_url() -> String {
    "http://localhost:3000/summary".to_string()
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            presign_url: default_presign_url(),
            summary_url: default_summary_url(),
        }
    }
}

/// Upload pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Wait after a successful transfer before querying the summary (milliseconds)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Treat a non-2xx storage response as a failed transfer.
    /// When false only transport errors count as failures.
    #[serde(default)]
    pub strict_transfer: bool,

    /// Largest file accepted for upload (the presign policy caps at 10MB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_settle_delay() -> u64 {
    3000
}

fn default_max_file_bytes() -> u64 {
    10_485_760
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            strict_transfer: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl UploadSettings {
    /// Settle delay as a `Duration`
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Chart presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Symbol prefixed to every formatted amount
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Variant selected before the user picks one
    #[serde(default)]
    pub default_variant: ChartVariant,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            default_variant: ChartVariant::default(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds. Unset means requests may hang forever.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Values supplied on the command line; `None` leaves the setting untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub presign_url: Option<String>,
    pub summary_url: Option<String>,
    pub strict_transfer: bool,
    pub settle_delay_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: EndpointSettings::default(),
            upload: UploadSettings::default(),
            chart: ChartSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read_file(p);
            }
            bail!("Config file not found: {:?}", p);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("spendview/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/spendview/config.toml")),
            dirs::home_dir().map(|p| p.join(".spendview.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `SPENDVIEW_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_PRESIGN_URL) {
            self.endpoints.presign_url = url;
        }
        if let Ok(url) = std::env::var(ENV_SUMMARY_URL) {
            self.endpoints.summary_url = url;
        }
        if let Ok(delay) = std::env::var(ENV_SETTLE_DELAY_MS) {
            self.upload.settle_delay_ms = delay
                .trim()
                .parse()
                .with_context(|| format!("{} must be milliseconds, got {:?}", ENV_SETTLE_DELAY_MS, delay))?;
        }
        Ok(())
    }

    /// Merge CLI values into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &SettingsOverrides) {
        if let Some(ref url) = cli.presign_url {
            self.endpoints.presign_url = url.clone();
        }
        if let Some(ref url) = cli.summary_url {
            self.endpoints.summary_url = url.clone();
        }
        if let Some(delay) = cli.settle_delay_ms {
            self.upload.settle_delay_ms = delay;
        }
        if cli.strict_transfer {
            self.upload.strict_transfer = true;
        }
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("presign_url", &self.endpoints.presign_url),
            ("summary_url", &self.endpoints.summary_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("endpoints.{} must be an http(s) URL, got {:?}", name, url);
            }
        }
        if self.upload.max_file_bytes == 0 {
            bail!("upload.max_file_bytes must be greater than zero");
        }
        Ok(())
    }

    /// Request timeout as a `Duration`, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.http.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.upload.settle_delay_ms, 3000);
        assert!(!settings.upload.strict_transfer);
        assert_eq!(settings.upload.max_file_bytes, 10_485_760);
        assert_eq!(settings.chart.currency_symbol, "₹");
        assert_eq!(settings.chart.default_variant, ChartVariant::Radar);
        assert!(settings.request_timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [endpoints]
            presign_url = "https://api.example/presign"

            [upload]
            strict_transfer = true

            [chart]
            currency_symbol = "$"
            default_variant = "pie"
        "#;

        let settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        assert_eq!(settings.endpoints.presign_url, "https://api.example/presign");
        assert_eq!(settings.endpoints.summary_url, default_summary_url());
        assert!(settings.upload.strict_transfer);
        assert_eq!(settings.upload.settle_delay_ms, 3000);
        assert_eq!(settings.chart.currency_symbol, "$");
        assert_eq!(settings.chart.default_variant, ChartVariant::Pie);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nrequest_timeout_secs = 15").unwrap();

        let path = file.path().to_path_buf();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_apply_env_overrides() {
        temp_env::with_vars(
            [
                (ENV_SUMMARY_URL, Some("https://api.example/summary")),
                (ENV_SETTLE_DELAY_MS, Some("250")),
            ],
            || {
                let mut settings = Settings::default();
                settings.apply_env().unwrap();
                assert_eq!(settings.endpoints.summary_url, "https://api.example/summary");
                assert_eq!(settings.upload.settle_delay_ms, 250);
            },
        );
    }

    #[test]
    fn test_apply_env_rejects_bad_delay() {
        temp_env::with_var(ENV_SETTLE_DELAY_MS, Some("soon"), || {
            let mut settings = Settings::default();
            assert!(settings.apply_env().is_err());
        });
    }

    #[test]
    fn test_merge_cli_takes_precedence() {
        let mut settings = Settings::default();
        settings.merge_cli(&SettingsOverrides {
            presign_url: Some("https://cli.example/presign".to_string()),
            summary_url: None,
            strict_transfer: true,
            settle_delay_ms: Some(0),
        });
        assert_eq!(settings.endpoints.presign_url, "https://cli.example/presign");
        assert_eq!(settings.endpoints.summary_url, default_summary_url());
        assert!(settings.upload.strict_transfer);
        assert_eq!(settings.upload.settle_delay_ms, 0);
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let mut settings = Settings::default();
        settings.endpoints.summary_url = "ftp://example/summary".to_string();
        assert!(settings.validate().is_err());
    }
}
