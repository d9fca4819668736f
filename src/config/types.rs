use serde::{Deserialize, Deserializer};

/// Default user agent sent to both providers
pub const DEFAULT_USER_AGENT: &str = concat!("boinc-ingest/", env!("CARGO_PKG_VERSION"));

/// Default World Community Grid API root
pub const DEFAULT_WCG_API_URL: &str = "https://www.worldcommunitygrid.org";

/// Main configuration structure for boinc-ingest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    pub influxdb: InfluxConfig,
    #[serde(default)]
    pub wcg: Option<WcgConfig>,
    #[serde(default)]
    pub einstein: Option<EinsteinConfig>,
}

/// HTTP client behaviour shared by both providers
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of Einstein@Home hosts crawled at the same time
    #[serde(rename = "max-concurrent-hosts", default = "default_max_concurrent_hosts")]
    pub max_concurrent_hosts: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_hosts: default_max_concurrent_hosts(),
        }
    }
}

/// InfluxDB v2 connection parameters
#[derive(Debug, Clone, Deserialize)]
pub struct InfluxConfig {
    /// Host name, or a full `http(s)://host` origin
    pub host: String,

    pub port: u16,

    pub org: String,

    pub token: String,

    pub bucket: String,

    /// Points buffered before a write request is sent
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,
}

/// World Community Grid account
#[derive(Debug, Clone, Deserialize)]
pub struct WcgConfig {
    pub username: String,

    /// Verification code from the member profile page
    #[serde(rename = "api-code")]
    pub api_code: String,

    /// API root, without the `/api/...` path
    #[serde(rename = "api-url", default = "default_wcg_api_url")]
    pub api_url: String,
}

/// Einstein@Home hosts
#[derive(Debug, Clone, Deserialize)]
pub struct EinsteinConfig {
    /// Host page prefix; `<url><id>/tasks/0/0` is the task list of a host
    pub url: String,

    #[serde(default)]
    pub hosts: Vec<HostEntry>,
}

/// One Einstein@Home host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEntry {
    /// Numeric host id on the project site
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Name written to the `DeviceName` tag
    pub name: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_hosts() -> u32 {
    1
}

fn default_batch_size() -> usize {
    500
}

fn default_wcg_api_url() -> String {
    DEFAULT_WCG_API_URL.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
