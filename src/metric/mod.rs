//! Metric point model shared by every provider
//!
//! All task results, whatever provider they come from, are stored under a
//! single measurement with the same tag and field keys so they can be queried
//! uniformly.

mod line_protocol;

pub use line_protocol::{encode_batch, to_line_protocol};

use std::collections::BTreeMap;
use std::fmt;

/// Measurement name used for every point
pub const MEASUREMENT: &str = "boinc_results";

/// Tag keys
pub const TAG_PROJECT: &str = "Project";
pub const TAG_DEVICE_NAME: &str = "DeviceName";
pub const TAG_APP_NAME: &str = "AppName";
pub const TAG_NAME: &str = "Name";

/// Field keys
pub const FIELD_CLAIMED_CREDIT: &str = "ClaimedCredit";
pub const FIELD_CPU_TIME: &str = "CpuTime";
pub const FIELD_GRANTED_CREDIT: &str = "GrantedCredit";

/// The volunteer-computing project a result was reported by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// World Community Grid, read through its JSON results API
    WorldCommunityGrid,
    /// Einstein@Home, scraped from its paginated per-host task pages
    EinsteinAtHome,
}

impl Provider {
    /// Value written to the `Project` tag
    pub fn tag_value(&self) -> &'static str {
        match self {
            Self::WorldCommunityGrid => "World Community Grid",
            Self::EinsteinAtHome => "EinsteinAtHome",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_value())
    }
}

/// Identity of one task result: everything that ends up in the tag set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIdentity<'a> {
    pub provider: Provider,
    pub device_name: &'a str,
    pub app_name: &'a str,
    pub name: &'a str,
}

/// Numeric values of one task result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskValues {
    pub claimed_credit: f64,
    /// CPU time in seconds
    pub cpu_time: f64,
    pub granted_credit: f64,
}

/// A normalized, timestamped metric point ready for the sink
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
    /// Unix timestamp in seconds
    pub time: i64,
}

impl MetricPoint {
    /// Builds a point with the full tag and field set
    ///
    /// Every tag key is always present; an unknown task name is kept as an
    /// empty string rather than dropped.
    pub fn new(identity: TaskIdentity<'_>, values: TaskValues, time: i64) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(
            TAG_PROJECT.to_string(),
            identity.provider.tag_value().to_string(),
        );
        tags.insert(
            TAG_DEVICE_NAME.to_string(),
            identity.device_name.to_string(),
        );
        tags.insert(TAG_APP_NAME.to_string(), identity.app_name.to_string());
        tags.insert(TAG_NAME.to_string(), identity.name.to_string());

        let mut fields = BTreeMap::new();
        fields.insert(FIELD_CLAIMED_CREDIT.to_string(), values.claimed_credit);
        fields.insert(FIELD_CPU_TIME.to_string(), values.cpu_time);
        fields.insert(FIELD_GRANTED_CREDIT.to_string(), values.granted_credit);

        Self {
            measurement: MEASUREMENT.to_string(),
            tags,
            fields,
            time,
        }
    }

    /// Returns a tag value by key
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Returns a field value by key
    pub fn field(&self, key: &str) -> Option<f64> {
        self.fields.get(key).copied()
    }
}
