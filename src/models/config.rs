//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CardSelectors, CodeScheme, FilterMode, WatchSet};

/// Upper bound on `source.retries`.
const MAX_RETRIES: u32 = 5;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listen address and diagnostics
    #[serde(default)]
    pub server: ServerConfig,

    /// Origin page and HTTP client behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Fetch cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Markup signatures used by the extractor
    #[serde(default)]
    pub selectors: CardSelectors,

    /// Relevance filter defaults
    #[serde(default)]
    pub filter: FilterConfig,

    /// Compact response settings
    #[serde(default)]
    pub compact: CompactConfig,

    /// `/debug` excerpt settings
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.url)?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.source.retries > MAX_RETRIES {
            return Err(AppError::validation(format!(
                "source.retries must be <= {MAX_RETRIES}"
            )));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        for (key, value) in self.selectors.selector_fields() {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("selectors.{key} is empty")));
            }
        }
        if self.selectors.series_path.trim().is_empty() {
            return Err(AppError::validation("selectors.series_path is empty"));
        }
        if self.selectors.chapter_marker.trim().is_empty() {
            return Err(AppError::validation("selectors.chapter_marker is empty"));
        }
        if self.filter.max_age_hours.is_nan() || self.filter.max_age_hours < 0.0 {
            return Err(AppError::validation("filter.max_age_hours must be >= 0"));
        }
        if self.compact.limit == 0 {
            return Err(AppError::validation("compact.limit must be > 0"));
        }
        if self.compact.title_len == 0 || self.compact.chapter_len == 0 {
            return Err(AppError::validation(
                "compact.title_len and compact.chapter_len must be > 0",
            ));
        }
        Ok(())
    }

    /// The configured default watch-set.
    pub fn default_watch(&self) -> WatchSet {
        WatchSet::prefixes(&self.filter.default_watch)
    }
}

/// Listen address and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Expose the `/debug` markup excerpt endpoint; each hit fetches the origin
    #[serde(default)]
    pub debug_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            debug_enabled: false,
        }
    }
}

/// Origin page and HTTP client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page holding the latest-updates cards
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Additional attempts after a transient failure
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Backoff before the first retry, doubled for each later one
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Force HTTP/1.1; the origin's edge rejects some HTTP/2 client fingerprints
    #[serde(default = "defaults::enabled")]
    pub http1_only: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            retries: defaults::retries(),
            retry_backoff_ms: defaults::retry_backoff(),
            http1_only: defaults::enabled(),
        }
    }
}

/// Fetch cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched batch is served without touching the origin
    #[serde(default = "defaults::ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::ttl(),
        }
    }
}

/// Relevance filter defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Slug prefixes used when a request omits `watch`
    #[serde(default = "defaults::watch")]
    pub default_watch: Vec<String>,

    /// Filter mode used when a request omits `mode`
    #[serde(default)]
    pub default_mode: FilterMode,

    /// Released chapters older than this are not relevant
    #[serde(default = "defaults::max_age_hours")]
    pub max_age_hours: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_watch: defaults::watch(),
            default_mode: FilterMode::default(),
            max_age_hours: defaults::max_age_hours(),
        }
    }
}

/// Compact response settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactConfig {
    /// Maximum number of items in a compact response
    #[serde(default = "defaults::compact_limit")]
    pub limit: usize,

    #[serde(default = "defaults::title_len")]
    pub title_len: usize,

    #[serde(default = "defaults::chapter_len")]
    pub chapter_len: usize,

    /// Upcoming-flag encoding used when a request omits `code`
    #[serde(default)]
    pub default_code: CodeScheme,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            limit: defaults::compact_limit(),
            title_len: defaults::title_len(),
            chapter_len: defaults::chapter_len(),
            default_code: CodeScheme::default(),
        }
    }
}

/// `/debug` excerpt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Substrings to show raw markup around
    #[serde(default = "defaults::markers")]
    pub markers: Vec<String>,

    /// Bytes of context on each side of a hit
    #[serde(default = "defaults::context_chars")]
    pub context_chars: usize,

    #[serde(default = "defaults::max_hits")]
    pub max_hits_per_marker: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            markers: defaults::markers(),
            context_chars: defaults::context_chars(),
            max_hits_per_marker: defaults::max_hits(),
        }
    }
}

mod defaults {
    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        3000
    }
    pub fn enabled() -> bool {
        true
    }

    // Source defaults
    pub fn url() -> String {
        "https://asuracomic.net/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn retries() -> u32 {
        2
    }
    pub fn retry_backoff() -> u64 {
        500
    }

    // Cache defaults
    pub fn ttl() -> u64 {
        300
    }

    // Filter defaults
    pub fn watch() -> Vec<String> {
        vec![
            "nano-machine".into(),
            "solo-max-level-newbie".into(),
            "the-greatest-estate-developer".into(),
            "omniscient-readers-viewpoint".into(),
            "return-of-the-mount-hua-sect".into(),
        ]
    }
    pub fn max_age_hours() -> f64 {
        24.0
    }

    // Compact defaults
    pub fn compact_limit() -> usize {
        21
    }
    pub fn title_len() -> usize {
        22
    }
    pub fn chapter_len() -> usize {
        20
    }

    // Debug defaults
    pub fn markers() -> Vec<String> {
        vec![
            "grid-cols-12".into(),
            "/chapter/".into(),
            "Public in".into(),
        ]
    }
    pub fn context_chars() -> usize {
        400
    }
    pub fn max_hits() -> usize {
        3
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.source.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_url_and_zero_ttl() {
        let mut config = Config::default();
        config.source.url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_retries() {
        let mut config = Config::default();
        config.source.retries = MAX_RETRIES;
        assert!(config.validate().is_ok());

        config.source.retries = MAX_RETRIES + 1;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn debug_endpoint_is_off_by_default() {
        assert!(!Config::default().server.debug_enabled);
        let config: Config = toml::from_str("[server]\nport = 8080").unwrap();
        assert!(!config.server.debug_enabled);
    }

    #[test]
    fn validate_rejects_nan_age() {
        let mut config = Config::default();
        config.filter.max_age_hours = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[compact]\nlimit = 8\ndefault_code = \"tristate\"\n\n[filter]\ndefault_mode = \"watchlist\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.compact.limit, 8);
        assert_eq!(config.compact.default_code, CodeScheme::Tristate);
        assert_eq!(config.filter.default_mode, FilterMode::Watchlist);
        assert_eq!(config.compact.title_len, 22);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn validate_rejects_blank_selector() {
        let mut config = Config::default();
        config.selectors.time_selector = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn shipped_config_file_is_valid() {
        let config: Config = toml::from_str(include_str!("../../config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.compact.limit, 21);
        assert!(!config.server.debug_enabled);
        assert_eq!(config.selectors.card_selector, CardSelectors::default().card_selector);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn default_watch_is_normalized() {
        let mut config = Config::default();
        config.filter.default_watch = vec![" Nano-Machine ".into()];
        assert_eq!(
            config.default_watch(),
            WatchSet::Prefixes(vec!["nano-machine".into()])
        );
    }
}
