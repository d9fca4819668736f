//! Crawl reports and the end-of-run summary

use std::ops::AddAssign;

/// Counters for one crawl (one account or one host)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Pages whose fetch or decode failed
    pub pages_failed: u64,

    /// Raw records or rows found, before filtering
    pub records_seen: u64,

    /// Points handed to the sink
    pub points_emitted: u64,

    /// Emitted points whose provider time could not be parsed
    pub undated_points: u64,
}

impl AddAssign for CrawlReport {
    fn add_assign(&mut self, other: Self) {
        self.pages_fetched += other.pages_fetched;
        self.pages_failed += other.pages_failed;
        self.records_seen += other.records_seen;
        self.points_emitted += other.points_emitted;
        self.undated_points += other.undated_points;
    }
}

/// Report for one Einstein@Home host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub host_name: String,
    pub report: CrawlReport,
}

/// Outcome of a full ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// World Community Grid crawl, if configured
    pub wcg: Option<CrawlReport>,

    /// Einstein@Home crawls in configuration order
    pub hosts: Vec<HostReport>,

    /// Points accepted by the sink over the whole run
    pub total_persisted: u64,
}

impl RunSummary {
    /// Sum of every crawl report in the run
    pub fn totals(&self) -> CrawlReport {
        let mut totals = self.wcg.unwrap_or_default();
        for host in &self.hosts {
            totals += host.report;
        }
        totals
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Ingestion Summary ===\n");

    if let Some(report) = &summary.wcg {
        println!("World Community Grid:");
        print_report(report);
        println!();
    }

    if !summary.hosts.is_empty() {
        println!("Einstein@Home ({} hosts):", summary.hosts.len());
        for host in &summary.hosts {
            println!("  {}:", host.host_name);
            print_report(&host.report);
        }
        println!();
    }

    let totals = summary.totals();
    if totals.pages_failed > 0 {
        println!("Failed pages: {}", totals.pages_failed);
    }
    if totals.undated_points > 0 {
        println!(
            "Points with unparseable time (stored at epoch): {}",
            totals.undated_points
        );
    }

    println!("Total points persisted: {}", summary.total_persisted);
}

fn print_report(report: &CrawlReport) {
    println!(
        "    pages: {} fetched, {} failed",
        report.pages_fetched, report.pages_failed
    );
    println!(
        "    records: {} seen, {} emitted",
        report.records_seen, report.points_emitted
    );
}
