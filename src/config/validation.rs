use crate::config::types::{Config, EinsteinConfig, HttpConfig, InfluxConfig, WcgConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_influx_config(&config.influxdb)?;

    if config.wcg.is_none() && config.einstein.is_none() {
        return Err(ConfigError::Validation(
            "at least one provider ([wcg] or [einstein]) must be configured".to_string(),
        ));
    }

    if let Some(wcg) = &config.wcg {
        validate_wcg_config(wcg)?;
    }
    if let Some(einstein) = &config.einstein {
        validate_einstein_config(einstein)?;
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_concurrent_hosts < 1 || config.max_concurrent_hosts > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-hosts must be between 1 and 32, got {}",
            config.max_concurrent_hosts
        )));
    }

    Ok(())
}

/// Validates InfluxDB connection parameters
fn validate_influx_config(config: &InfluxConfig) -> Result<(), ConfigError> {
    require_non_empty("influxdb.host", &config.host)?;
    require_non_empty("influxdb.org", &config.org)?;
    require_non_empty("influxdb.token", &config.token)?;
    require_non_empty("influxdb.bucket", &config.bucket)?;

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "influxdb.port cannot be 0".to_string(),
        ));
    }

    if config.batch_size < 1 || config.batch_size > 5000 {
        return Err(ConfigError::Validation(format!(
            "influxdb.batch-size must be between 1 and 5000, got {}",
            config.batch_size
        )));
    }

    Ok(())
}

/// Validates the World Community Grid account
fn validate_wcg_config(config: &WcgConfig) -> Result<(), ConfigError> {
    require_non_empty("wcg.username", &config.username)?;
    require_non_empty("wcg.api-code", &config.api_code)?;
    validate_http_url("wcg.api-url", &config.api_url)?;
    Ok(())
}

/// Validates the Einstein@Home host list
fn validate_einstein_config(config: &EinsteinConfig) -> Result<(), ConfigError> {
    validate_http_url("einstein.url", &config.url)?;

    if config.hosts.is_empty() {
        return Err(ConfigError::Validation(
            "einstein.hosts must list at least one host".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for host in &config.hosts {
        require_non_empty("einstein.hosts.id", &host.id)?;
        require_non_empty("einstein.hosts.name", &host.name)?;

        if host.id.contains('/') || host.id.contains('?') {
            return Err(ConfigError::Validation(format!(
                "Host id '{}' must not contain '/' or '?'",
                host.id
            )));
        }

        if !seen.insert(host.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Host id '{}' is listed more than once",
                host.id
            )));
        }
    }

    Ok(())
}

fn require_non_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}
