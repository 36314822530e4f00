#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/irkun/irkun/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Annual-report financials from EDINET XBRL filings.
//!
//! This crate re-exports the core types, the XBRL resolver, the EDINET
//! client and the stores, and provides the [`FinancialsPipeline`] that ties
//! them together for a list of companies.
//!
//! # Example
//!
//! ```no_run
//! use irkun::{CompanyOutcome, FinancialsPipeline, FinancialsStore, Settings, default_companies};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> irkun::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let pipeline = FinancialsPipeline::new(Arc::new(settings.edinet_client()?)).with_years(3);
//!
//!     let companies = default_companies();
//!     let litalico = irkun::find_company(&companies, "litalico")?;
//!     if let CompanyOutcome::Updated(financials) = pipeline.process_company(litalico).await? {
//!         settings.store().upsert(&[financials]).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use irkun_core::*;

// XBRL resolution
pub use irkun_xbrl::{TagName, TagResolver, TagTable, XbrlDocument, extract_financials};

// EDINET client
pub use irkun_edinet::{EdinetClient, RetryPolicy, extract_xbrl};

// Stores
pub use irkun_store::{InMemoryStore, JsonFileStore};

mod companies;
mod config;
mod pipeline;

pub use companies::{default_companies, find_company};
pub use config::{
    API_BASE_VAR, API_KEY_VAR, DATA_DIR_VAR, DEFAULT_DATA_DIR, DEFAULT_YEARS, FILING_SEARCH_MONTHS,
    Settings,
};
pub use pipeline::{
    CompanyOutcome, FilingWindows, FinancialsPipeline, SkipReason, filing_windows,
    record_from_instance,
};
