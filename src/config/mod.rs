//! Configuration module for boinc-ingest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use boinc_ingest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Writing to bucket: {}", config.influxdb.bucket);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EinsteinConfig, HostEntry, HttpConfig, InfluxConfig, WcgConfig, DEFAULT_USER_AGENT,
    DEFAULT_WCG_API_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
