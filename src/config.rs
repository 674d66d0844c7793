use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub analysis: AnalysisConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Bundled CSV shown until the user uploads their own export
    pub sample_path: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Initial spike sensitivity, in percentage points of negative share
    pub spike_threshold: u32,
    pub threshold_min: u32,
    pub threshold_max: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl AnalysisConfig {
    pub fn clamp_threshold(&self, requested: u32) -> u32 {
        requested.clamp(self.threshold_min, self.threshold_max)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var("MONITOR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let config_text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path))?;
        let mut config = Self::from_toml(&config_text)
            .with_context(|| format!("Failed to parse {}", path))?;

        if let Ok(host) = std::env::var("MONITOR_HOST") {
            config.web.host = host;
        }
        if let Ok(port) = std::env::var("MONITOR_PORT") {
            config.web.port = port.parse().context("MONITOR_PORT must be a port number")?;
        }

        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;

        let analysis = &config.analysis;
        if analysis.threshold_min > analysis.threshold_max {
            anyhow::bail!(
                "analysis.threshold_min ({}) exceeds analysis.threshold_max ({})",
                analysis.threshold_min,
                analysis.threshold_max
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../config.toml");

    #[test]
    fn test_bundled_config_parses() {
        let config = AppConfig::from_toml(BUNDLED).unwrap();
        assert_eq!(config.analysis.spike_threshold, 5);
        assert_eq!(config.analysis.threshold_min, 1);
        assert_eq!(config.analysis.threshold_max, 20);
        assert_eq!(config.dataset.sample_path, PathBuf::from("sample_comments.csv"));
    }

    #[test]
    fn test_max_upload_defaults_when_missing() {
        let text = r#"
[dataset]
sample_path = "x.csv"

[analysis]
spike_threshold = 3
threshold_min = 1
threshold_max = 20

[web]
host = "0.0.0.0"
port = 9000
"#;
        let config = AppConfig::from_toml(text).unwrap();
        assert_eq!(config.dataset.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_inverted_threshold_range_rejected() {
        let text = BUNDLED.replace("threshold_min = 1", "threshold_min = 30");
        assert!(AppConfig::from_toml(&text).is_err());
    }

    #[test]
    fn test_clamp_threshold() {
        let config = AppConfig::from_toml(BUNDLED).unwrap();
        assert_eq!(config.analysis.clamp_threshold(0), 1);
        assert_eq!(config.analysis.clamp_threshold(7), 7);
        assert_eq!(config.analysis.clamp_threshold(99), 20);
    }
}
