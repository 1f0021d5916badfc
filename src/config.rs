use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reference timezone as minutes east of UTC; the daily refresh
    /// boundary is computed in this zone.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    /// Pause between successive section fetches, in milliseconds.
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Minutes between background staleness checks.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

fn default_port() -> u16 {
    3000
}

// IST (+05:30)
fn default_utc_offset_minutes() -> i32 {
    330
}

fn default_fetch_delay_ms() -> u64 {
    800
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_sections() -> Vec<SectionConfig> {
    let sections = [
        (
            "india",
            "https://news.google.com/rss?hl=en-IN&gl=IN&ceid=IN:en",
        ),
        (
            "karnataka",
            "https://news.google.com/rss/search?q=Karnataka+OR+Bengaluru&hl=en-IN&gl=IN&ceid=IN:en",
        ),
        (
            "world",
            "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en",
        ),
        (
            "cricket",
            "https://news.google.com/rss/search?q=Cricket&hl=en-IN&gl=IN&ceid=IN:en",
        ),
        (
            "football",
            "https://news.google.com/rss/search?q=Football+Soccer&hl=en-IN&gl=IN&ceid=IN:en",
        ),
    ];

    sections
        .into_iter()
        .map(|(name, url)| SectionConfig {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
}

/// A named news category mapped to one upstream feed URL. Sections are
/// fetched in the order they appear in the configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SectionConfig {
    pub name: String,
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            utc_offset_minutes: default_utc_offset_minutes(),
            fetch_delay_ms: default_fetch_delay_ms(),
            refresh_interval: default_refresh_interval(),
            sections: default_sections(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to the built-in defaults when
    /// it does not exist. A file that exists but fails to parse is
    /// still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn timezone(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )
        })
    }

    pub fn fetch_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.fetch_delay_ms)
    }
}
