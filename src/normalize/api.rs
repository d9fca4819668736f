//! World Community Grid results API records

use crate::metric::{MetricPoint, Provider, TaskIdentity, TaskValues};
use crate::normalize::values::{parse_float, parse_timestamp};
use crate::normalize::UNKNOWN_TIME;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Seconds per hour; the API reports CPU time in hours
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Top-level body of a results API response
///
/// Missing containers deserialize as an empty result list, which the crawler
/// reads as the end of the listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "ResultsStatus", default)]
    pub results_status: ResultsStatus,
}

/// The `ResultsStatus` object of a results API response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsStatus {
    #[serde(rename = "Results", default, deserialize_with = "null_as_empty")]
    pub results: Vec<RawApiRecord>,
}

impl ApiResponse {
    /// Consumes the response, returning its records
    pub fn into_records(self) -> Vec<RawApiRecord> {
        self.results_status.results
    }
}

/// One task result object as returned by the API
///
/// Numeric members are accepted as JSON numbers or numeric strings; text
/// members tolerate `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawApiRecord {
    #[serde(rename = "AppName", default, deserialize_with = "lenient_string")]
    pub app_name: String,

    #[serde(rename = "DeviceName", default, deserialize_with = "lenient_string")]
    pub device_name: String,

    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(rename = "ClaimedCredit", default, deserialize_with = "lenient_f64")]
    pub claimed_credit: f64,

    /// CPU time in hours
    #[serde(rename = "CpuTime", default, deserialize_with = "lenient_f64")]
    pub cpu_time: f64,

    #[serde(rename = "GrantedCredit", default, deserialize_with = "lenient_f64")]
    pub granted_credit: f64,

    #[serde(rename = "ReceivedTime", default, deserialize_with = "lenient_string")]
    pub received_time: String,
}

/// Maps an API record onto the common metric schema
///
/// Records whose granted credit is not strictly positive are still pending or
/// were invalidated; they yield `None`. CPU time is converted from hours to
/// seconds. An unreadable `ReceivedTime` yields [`UNKNOWN_TIME`].
///
/// # Example
///
/// ```
/// use boinc_ingest::normalize::{normalize_api_record, RawApiRecord};
///
/// let record = RawApiRecord {
///     name: "MCM1_0201_1234_0".to_string(),
///     cpu_time: 1.5,
///     granted_credit: 80.0,
///     received_time: "2024-01-01T00:00:00".to_string(),
///     ..Default::default()
/// };
///
/// let point = normalize_api_record(&record).unwrap();
/// assert_eq!(point.field("CpuTime"), Some(5400.0));
/// ```
pub fn normalize_api_record(record: &RawApiRecord) -> Option<MetricPoint> {
    // Also rejects NaN
    if !(record.granted_credit > 0.0) {
        return None;
    }

    let time = parse_timestamp(&record.received_time).unwrap_or(UNKNOWN_TIME);

    Some(MetricPoint::new(
        TaskIdentity {
            provider: Provider::WorldCommunityGrid,
            device_name: &record.device_name,
            app_name: &record.app_name,
            name: &record.name,
        },
        TaskValues {
            claimed_credit: record.claimed_credit,
            cpu_time: record.cpu_time * SECONDS_PER_HOUR,
            granted_credit: record.granted_credit,
        },
        time,
    ))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float(&s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawApiRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawApiRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
