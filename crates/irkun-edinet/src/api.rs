//! Wire types of the EDINET API v2.

use irkun_core::FilingDocument;
use serde::Deserialize;

/// Status reported by EDINET in `metadata.status` on success.
pub const STATUS_OK: &str = "200";

/// Response of `GET /documents.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListResponse {
    /// Request outcome as reported by EDINET.
    pub metadata: Option<Metadata>,
    /// Filings of the requested day; only present with `type=2`.
    #[serde(default)]
    pub results: Vec<FilingDocument>,
}

/// The `metadata` object of a document list.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Status code as a string, `"200"` on success.
    pub status: String,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
}

/// Error body EDINET returns instead of an archive (e.g. unknown docID).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Request outcome.
    pub metadata: Metadata,
}
