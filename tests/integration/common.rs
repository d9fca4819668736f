//! Shared fixtures for the integration tests

use async_trait::async_trait;
use boinc_ingest::config::{Config, EinsteinConfig, HostEntry, HttpConfig, InfluxConfig, WcgConfig};
use boinc_ingest::sink::SinkResult;
use boinc_ingest::{MetricPoint, MetricSink, SinkError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

pub fn influx_config() -> InfluxConfig {
    InfluxConfig {
        host: "localhost".to_string(),
        port: 8086,
        org: "home".to_string(),
        token: "influx-token".to_string(),
        bucket: "boinc".to_string(),
        batch_size: 100,
    }
}

pub fn base_config() -> Config {
    Config {
        http: HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        },
        influxdb: influx_config(),
        wcg: None,
        einstein: None,
    }
}

pub fn wcg_config(api_url: String) -> Config {
    Config {
        wcg: Some(WcgConfig {
            username: "alice".to_string(),
            api_code: "CODE123".to_string(),
            api_url,
        }),
        ..base_config()
    }
}

pub fn einstein_config(url: String, hosts: &[(&str, &str)]) -> Config {
    Config {
        einstein: Some(EinsteinConfig {
            url,
            hosts: hosts
                .iter()
                .map(|(id, name)| HostEntry {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }),
        ..base_config()
    }
}

/// One results API record
pub fn api_record(name: &str, granted: f64) -> Value {
    json!({
        "AppName": "mcm1",
        "ClaimedCredit": 70.5,
        "CpuTime": 1.25,
        "ElapsedTime": 1.3,
        "ExitStatus": 0,
        "GrantedCredit": granted,
        "DeviceId": 2424242,
        "DeviceName": "crunchbox",
        "ModTime": 1704100000,
        "WorkunitId": 900001,
        "ResultId": 900002,
        "Name": name,
        "Outcome": 1,
        "ReceivedTime": "2024-01-01T10:00:00",
        "ReportDeadline": "2024-01-08T00:00:00",
        "SentTime": "2023-12-31T00:00:00",
        "ServerState": 5,
        "ValidateState": 1,
        "FileDeleteState": 0
    })
}

pub fn api_page(records: Vec<Value>) -> Value {
    json!({
        "ResultsStatus": {
            "ResultsAvailable": records.len(),
            "ResultsReturned": records.len(),
            "Offset": 0,
            "Results": records
        }
    })
}

/// One task row in the Einstein@Home column layout
pub fn task_row(name: &str, status: &str, cpu: &str, credit: &str) -> String {
    format!(
        "<tr>\
           <td><a href=\"/task/{0}\">{0}</a></td>\
           <td><a href=\"/workunit/1\">1</a></td>\
           <td>1 Jan 2024 10:00:00 UTC</td>\
           <td>2 Jan 2024 10:00:00 UTC</td>\
           <td>{1}</td>\
           <td>{2}</td>\
           <td>{2}</td>\
           <td>{3}</td>\
           <td>Gamma-ray pulsar binary search #1 v1.22 ()</td>\
         </tr>",
        name, status, cpu, credit
    )
}

pub fn task_page(rows: &[String], pager: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body><div id=\"content\">\
         <table class=\"views-table cols-9 sticky-enabled\">\
         <thead><tr><th>Task ID</th><th>Work unit ID</th><th>Sent</th><th>Time reported</th>\
         <th>Status</th><th>Run time</th><th>CPU time</th><th>Credit</th><th>Application</th></tr></thead>\
         <tbody>{}</tbody></table>{}</div></body></html>",
        rows.join(""),
        pager
    )
}

pub fn pager(queries: &[&str]) -> String {
    let items: String = queries
        .iter()
        .enumerate()
        .map(|(i, q)| format!("<li class=\"pager-item\"><a href=\"{}\">{}</a></li>", q, i + 2))
        .collect();
    format!(
        "<ul class=\"pager\"><li class=\"pager-current first\">1</li>{}</ul>",
        items
    )
}

/// Sink that accepts a fixed number of points, then fails every write
pub struct FailingSink {
    accept: u64,
    accepted: AtomicU64,
}

impl FailingSink {
    pub fn new(accept: u64) -> Self {
        Self {
            accept,
            accepted: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl MetricSink for FailingSink {
    async fn append(&self, _point: MetricPoint) -> SinkResult<()> {
        if self.accepted.load(Ordering::SeqCst) >= self.accept {
            return Err(SinkError::Rejected {
                status: 500,
                message: "disk full".to_string(),
            });
        }
        self.accepted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn count(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }

    async fn close(&self) -> SinkResult<()> {
        Ok(())
    }
}
