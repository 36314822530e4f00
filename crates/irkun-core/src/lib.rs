#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/irkun/irkun/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for EDINET financial data.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`FilingSource`](provider::FilingSource) - Discovery and download of disclosures
//! - [`FinancialsStore`](store::FinancialsStore) - Persistence of normalized financials
//! - [`normalize`](normalize::normalize) - Yen figures to million-yen records with ratios

/// Error types for data operations.
pub mod error;
/// Financial metrics and XBRL context classification.
pub mod metric;
/// Conversion of raw figures into fiscal year records.
pub mod normalize;
/// Provider trait for disclosure discovery and download.
pub mod provider;
/// Store trait for normalized financials.
pub mod store;
/// Core data types (FilingDocument, FiscalYearRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use metric::{ContextKind, Metric, PeriodKind};
pub use normalize::{normalize, to_million};
pub use provider::FilingSource;
pub use store::FinancialsStore;
pub use types::{
    Company, CompanyFinancials, CompanyId, FilingDocument, FinancialFigures, FiscalYearRecord,
    RawFinancialFigure, SecurityCode,
};
