#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/irkun/irkun/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! EDINET API v2 client.
//!
//! This crate provides access to EDINET disclosures including:
//!
//! - Document lists by filing date
//! - Annual securities report search over a date range
//! - XBRL archive download and primary instance extraction
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use irkun_core::{FilingSource, SecurityCode};
//! use irkun_edinet::EdinetClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdinetClient::new("your_subscription_key")?;
//!
//!     let code = SecurityCode::new("7366")?;
//!     let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//!     for report in client.search_reports_in_range(start, end, &code).await? {
//!         if let Some(xbrl) = client.fetch_xbrl(&report.doc_id).await? {
//!             println!("{}: {} bytes", report.fiscal_year_label(), xbrl.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Wire types of the EDINET API v2.
pub mod api;
/// Extraction of the primary XBRL instance from an EDINET archive.
pub mod archive;
mod client;
mod rate_limit;
/// Bounded retry with exponential backoff.
pub mod retry;

pub use archive::{extract_xbrl, select_instance};
pub use client::{DEFAULT_BASE_URL, DEFAULT_REQUEST_DELAY, DOWNLOAD_TIMEOUT, EdinetClient, LIST_TIMEOUT};
pub use retry::RetryPolicy;
