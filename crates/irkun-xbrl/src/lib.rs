#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/irkun/irkun/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! XBRL financial tag resolution for EDINET filings.
//!
//! # Example
//!
//! ```
//! use irkun_core::Metric;
//! use irkun_xbrl::{TagResolver, XbrlDocument};
//!
//! let xml = r#"<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
//!     xmlns:jppfs_cor="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2024-11-01/jppfs_cor">
//!   <jppfs_cor:NetSales contextRef="CurrentYearDuration_NonConsolidatedMember">900</jppfs_cor:NetSales>
//!   <jppfs_cor:NetSales contextRef="CurrentYearDuration">1,200</jppfs_cor:NetSales>
//! </xbrli:xbrl>"#;
//!
//! let doc = XbrlDocument::parse(xml).unwrap();
//! let revenue = TagResolver::default().resolve(&doc, Metric::Revenue).unwrap();
//! assert_eq!(revenue.value, 1200.0);
//! ```

/// Classification of EDINET context ids.
pub mod context;
/// Parsed XBRL instances.
pub mod document;
/// Selection of one fact per metric.
pub mod resolve;
/// Metric to candidate-tag priority tables.
pub mod tags;

pub use context::classify_context;
pub use document::{XbrlDocument, XbrlFact, parse_value};
pub use resolve::TagResolver;
pub use tags::{TagName, TagTable};

use irkun_core::{FinancialFigures, Result};

/// Parses an instance and selects every metric with `resolver`.
pub fn extract_financials(xml: &str, resolver: &TagResolver) -> Result<FinancialFigures> {
    let doc = XbrlDocument::parse(xml)?;
    Ok(resolver.resolve_all(&doc))
}
