use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Royin-Harvest
///
/// Every section is optional; missing keys fall back to the values the dictionary
/// sync has always used against the live service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub words: WordsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote lookup API description
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the dictionary service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the paginated lookup endpoint, relative to the base URL
    pub endpoint: String,

    /// Number of headwords the service returns per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dictionary.orst.go.th".to_string(),
            endpoint: "Lookup/lookupDomain.php".to_string(),
            page_size: 10,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the pages of a single symbol are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// One page at a time, results in page order
    #[default]
    Sequential,

    /// Up to `max-concurrent` pages at once, results in completion order
    Concurrent,
}

/// Fetcher behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Minimum spacing between two network requests (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Additional attempts after a retryable failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff
    #[serde(rename = "backoff-base")]
    pub backoff_base: f64,

    /// Length of one backoff unit (milliseconds); `base^attempt` units are waited
    #[serde(rename = "backoff-unit-ms")]
    pub backoff_unit_ms: u64,

    /// Maximum number of in-flight page requests across the whole crawl
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: u32,

    pub strategy: FetchStrategy,

    /// Whether page responses are cached on disk
    #[serde(rename = "cache-enabled")]
    pub cache_enabled: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            max_retries: 3,
            backoff_base: 2.0,
            backoff_unit_ms: 1000,
            max_concurrent: 5,
            strategy: FetchStrategy::Sequential,
            cache_enabled: true,
        }
    }
}

impl FetcherConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Royin-Harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/SyafiqHadzir/Hunspell-TH".to_string(),
            contact_email: "inquiry@syafiqhadzir.dev".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Word list post-processing switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WordsConfig {
    /// Keep multi-word entries (containing spaces or hyphens)
    #[serde(rename = "allow-compounds")]
    pub allow_compounds: bool,

    /// Reject words containing characters outside the Thai script
    #[serde(rename = "strict-script-only")]
    pub strict_script_only: bool,

    /// Apply Unicode NFC composition before filtering
    #[serde(rename = "apply-normalization")]
    pub apply_normalization: bool,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            allow_compounds: true,
            strict_script_only: true,
            apply_normalization: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding one JSON file per fetched page
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Path of the resumable progress document
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Hunspell dictionary that is compared against and replaced
    #[serde(rename = "dictionary-path")]
    pub dictionary_path: String,

    /// Directory for the audit report and added/ghost word lists
    #[serde(rename = "report-dir")]
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: "data/cache".to_string(),
            checkpoint_path: "data/scraper_progress.json".to_string(),
            dictionary_path: "th_TH-royin.dic".to_string(),
            report_dir: "reports".to_string(),
        }
    }
}
