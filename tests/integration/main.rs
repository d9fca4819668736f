//! Integration tests for boinc-ingest
//!
//! These tests use wiremock to stand in for both providers and the
//! InfluxDB write API, and drive full ingestion runs end-to-end.

mod common;
mod einstein_tests;
mod wcg_tests;
