//! Provider trait for disclosure discovery and download.
//!
//! [`FilingSource`] is implemented by the EDINET client. Its two required
//! methods map to the two upstream endpoints; the search helpers are default
//! methods built on top of them so that every source filters and walks date
//! ranges the same way.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::{DataError, Result},
    types::{FilingDocument, SecurityCode},
};

/// Default number of days [`FilingSource::resolve_edinet_code`] looks back.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// A source of disclosure documents.
#[async_trait]
pub trait FilingSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "EDINET").
    fn name(&self) -> &str;

    /// Fetches every disclosure filed on a single calendar date.
    async fn get_documents(&self, date: NaiveDate) -> Result<Vec<FilingDocument>>;

    /// Downloads the archive of a document.
    async fn download_archive(&self, doc_id: &str) -> Result<Vec<u8>>;

    /// Returns the annual securities reports filed on `date` by the holder of `code`.
    async fn find_annual_reports(
        &self,
        date: NaiveDate,
        code: &SecurityCode,
    ) -> Result<Vec<FilingDocument>> {
        let documents = self.get_documents(date).await?;
        Ok(documents
            .into_iter()
            .filter(|doc| doc.is_annual_securities_report() && doc.is_filed_by(code))
            .collect())
    }

    /// Searches every day from `start` to `end` inclusive for annual reports of `code`.
    ///
    /// One request is issued per day. A day that fails is logged and skipped;
    /// the matches of the other days are still returned.
    async fn search_reports_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        code: &SecurityCode,
    ) -> Result<Vec<FilingDocument>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let mut reports = Vec::new();
        for day in start.iter_days().take_while(|d| *d <= end) {
            match self.find_annual_reports(day, code).await {
                Ok(found) => {
                    if !found.is_empty() {
                        debug!(source = self.name(), %day, count = found.len(), "Found annual reports");
                    }
                    reports.extend(found);
                }
                Err(e) => {
                    warn!(source = self.name(), %day, error = %e, "Skipping day");
                }
            }
        }

        Ok(reports)
    }

    /// Resolves the EDINET code of the holder of `code`.
    ///
    /// Walks back one day at a time from `from`, for at most `lookback_days`
    /// days, and returns the EDINET code of the first document whose filer
    /// matches. Days that fail are skipped.
    async fn resolve_edinet_code(
        &self,
        code: &SecurityCode,
        from: NaiveDate,
        lookback_days: u32,
    ) -> Option<String> {
        let mut day = from;
        for _ in 0..lookback_days {
            match self.get_documents(day).await {
                Ok(documents) => {
                    let found = documents
                        .into_iter()
                        .find(|doc| doc.is_filed_by(code))
                        .and_then(|doc| doc.edinet_code);
                    if found.is_some() {
                        return found;
                    }
                }
                Err(e) => {
                    debug!(source = self.name(), %day, error = %e, "Lookup failed, continuing");
                }
            }
            day = day.checked_sub_days(Days::new(1))?;
        }
        None
    }
}
