use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use relay_core::{TopicId, DEFAULT_CALLS_PER_MINUTE, DEFAULT_MARQUEE_LEN};
use relay_engine::HttpSettings;
use serde::Deserialize;

/// Settings file shared by all jobs. Each job reads only the sections it needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub discourse: Option<DiscourseSection>,
    pub news: Option<NewsSection>,
    pub ticker: Option<TickerSection>,
    pub status: Option<StatusSection>,
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscourseSection {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_api_username")]
    pub api_username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsSection {
    pub category_slug: String,
    pub category_id: String,
    pub gemini_api_key: String,
    pub gemini_endpoint: String,
    pub webhook_url: String,
    #[serde(default = "default_calls_per_minute")]
    pub max_calls_per_minute: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerSection {
    pub topics: Vec<TopicId>,
    pub component_id: String,
    #[serde(default = "default_setting_name")]
    pub setting_name: String,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusSection {
    pub webhook_url: String,
    /// Only needed by the `status` job.
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_status_title")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        let defaults = HttpSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            max_bytes: defaults.max_bytes,
        }
    }
}

fn default_api_username() -> String {
    "system".to_string()
}

fn default_calls_per_minute() -> usize {
    DEFAULT_CALLS_PER_MINUTE
}

fn default_setting_name() -> String {
    "marquee_list".to_string()
}

fn default_max_items() -> usize {
    DEFAULT_MARQUEE_LEN
}

fn default_interval_secs() -> u64 {
    60
}

fn default_status_title() -> String {
    "Server Status".to_string()
}

impl RelayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Missing config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn discourse(&self) -> Result<&DiscourseSection> {
        self.discourse
            .as_ref()
            .context("config section `discourse` is required for this job")
    }

    pub fn news(&self) -> Result<&NewsSection> {
        self.news
            .as_ref()
            .context("config section `news` is required for this job")
    }

    pub fn ticker(&self) -> Result<&TickerSection> {
        self.ticker
            .as_ref()
            .context("config section `ticker` is required for this job")
    }

    pub fn status(&self) -> Result<&StatusSection> {
        self.status
            .as_ref()
            .context("config section `status` is required for this job")
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.http.request_timeout_secs),
            max_bytes: self.http.max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_only_config_fills_defaults() {
        let config = RelayConfig::parse(
            r#"{
                "discourse": { "base_url": "https://forum.example.com", "api_key": "k" },
                "ticker": { "topics": [42, 43], "component_id": "12" }
            }"#,
        )
        .unwrap();

        let discourse = config.discourse().unwrap();
        assert_eq!(discourse.api_username, "system");
        let ticker = config.ticker().unwrap();
        assert_eq!(ticker.topics, vec![42, 43]);
        assert_eq!(ticker.setting_name, "marquee_list");
        assert_eq!(ticker.max_items, 7);
        assert_eq!(config.http_settings().request_timeout, Duration::from_secs(20));
    }

    #[test]
    fn missing_section_names_itself() {
        let config = RelayConfig::parse("{}").unwrap();
        let err = config.news().unwrap_err();
        assert!(err.to_string().contains("`news`"));
    }

    #[test]
    fn status_section_defaults() {
        let config = RelayConfig::parse(
            r#"{ "status": { "webhook_url": "https://discord.com/api/webhooks/1/t" } }"#,
        )
        .unwrap();
        let status = config.status().unwrap();
        assert_eq!(status.interval_secs, 60);
        assert_eq!(status.title, "Server Status");
        assert!(status.status_url.is_none());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(RelayConfig::parse(r#"{ "tickr": {} }"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = RelayConfig::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("Missing config"));
    }
}
