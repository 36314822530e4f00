#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/irkun/irkun/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Store implementations for normalized financials.
//!
//! This crate provides implementations of the [`FinancialsStore`] trait from `irkun-core`:
//!
//! - [`JsonFileStore`] - `financials.json` / `companies.json` flat files
//! - [`InMemoryStore`] - In-memory store for testing

/// JSON flat-file store.
pub mod json;
/// In-memory store implementation.
pub mod memory;

// Re-export the trait for convenience
pub use irkun_core::FinancialsStore;

pub use json::JsonFileStore;
pub use memory::InMemoryStore;
