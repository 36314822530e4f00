//! Per-company collection of annual-report financials.
//!
//! One pipeline run for one company is strictly sequential: search the
//! filing seasons, then for each report download, extract, resolve and
//! normalize. Any single report that fails is logged and skipped.

use chrono::{Datelike, Days, Local, NaiveDate};
use futures::stream::{self, Stream, StreamExt};
use irkun_core::{
    Company, CompanyFinancials, DataError, FilingDocument, FilingSource, FiscalYearRecord, Result,
    SecurityCode, normalize,
};
use irkun_edinet::extract_xbrl;
use irkun_xbrl::{TagResolver, extract_financials};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::{DEFAULT_YEARS, FILING_SEARCH_MONTHS};

/// Why a company produced no fiscal years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No annual securities report was found in the searched windows.
    NoReports,
    /// Reports were found but none yielded a fiscal year with revenue.
    NoFinancialData,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReports => f.write_str("No annual reports found"),
            Self::NoFinancialData => f.write_str("No valid financial data extracted"),
        }
    }
}

/// Result of processing one company.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyOutcome {
    /// Fiscal years were collected.
    Updated(CompanyFinancials),
    /// Nothing to store.
    Skipped(SkipReason),
}

/// Day ranges searched for one year offset, in order.
pub type FilingWindows = Vec<(NaiveDate, NaiveDate)>;

/// Returns the search windows for each year offset `0..=years`.
///
/// Each window is one calendar month of the filing season, clipped to
/// `today`; months that start after `today` are left out.
#[must_use]
pub fn filing_windows(today: NaiveDate, years: u32, months: &[u32]) -> Vec<FilingWindows> {
    (0..=years)
        .map(|offset| {
            let year = today.year() - offset as i32;
            months
                .iter()
                .filter_map(|&month| {
                    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                    let end = month_end(start)?;
                    (start <= today).then(|| (start, end.min(today)))
                })
                .collect()
        })
        .collect()
}

fn month_end(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_sub_days(Days::new(1))
}

/// Selects and normalizes the figures of one XBRL instance.
///
/// Returns `Ok(None)` if the instance reports neither revenue nor operating
/// profit.
///
/// # Errors
/// Returns [`DataError::Xml`] if the instance is not well-formed.
pub fn record_from_instance(
    xml: &str,
    resolver: &TagResolver,
    year_label: &str,
) -> Result<Option<FiscalYearRecord>> {
    let figures = extract_financials(xml, resolver)?;
    if !figures.has_income_statement() {
        return Ok(None);
    }
    Ok(Some(normalize(&figures, year_label)))
}

/// Collects the financials of companies from a [`FilingSource`].
#[derive(Debug, Clone)]
pub struct FinancialsPipeline {
    source: Arc<dyn FilingSource>,
    resolver: TagResolver,
    years: u32,
    months: Vec<u32>,
    today: NaiveDate,
}

impl FinancialsPipeline {
    /// Creates a pipeline over `source` with the default tags, history and season.
    #[must_use]
    pub fn new(source: Arc<dyn FilingSource>) -> Self {
        Self {
            source,
            resolver: TagResolver::default(),
            years: DEFAULT_YEARS,
            months: FILING_SEARCH_MONTHS.to_vec(),
            today: Local::now().date_naive(),
        }
    }

    /// Uses another tag resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: TagResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Collects `years` past years.
    #[must_use]
    pub const fn with_years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    /// Searches other months of the year.
    #[must_use]
    pub fn with_months(mut self, months: Vec<u32>) -> Self {
        self.months = months;
        self
    }

    /// Treats `today` as the current date.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Returns the number of past years collected.
    #[must_use]
    pub const fn years(&self) -> u32 {
        self.years
    }

    /// Finds the annual reports of `code` over the filing seasons.
    ///
    /// Searching stops after the first year offset at which at least `years`
    /// distinct reports have been collected.
    #[instrument(skip(self, code), fields(code = code.as_str()))]
    pub async fn search_annual_reports(&self, code: &SecurityCode) -> Vec<FilingDocument> {
        let mut seen = HashSet::new();
        let mut reports = Vec::new();

        for windows in filing_windows(self.today, self.years, &self.months) {
            for (start, end) in windows {
                debug!(%start, %end, "Searching");
                match self.source.search_reports_in_range(start, end, code).await {
                    Ok(found) => {
                        for doc in found {
                            if seen.insert(doc.doc_id.clone()) {
                                reports.push(doc);
                            }
                        }
                    }
                    Err(e) => warn!(%start, %end, error = %e, "Search failed"),
                }
            }
            if reports.len() >= self.years as usize {
                break;
            }
        }

        reports
    }

    /// Collects the fiscal years of one company.
    ///
    /// Fiscal years are ordered oldest first by period end; when two reports
    /// carry the same label, the first one found is kept.
    ///
    /// # Errors
    /// Returns [`DataError::RateLimited`] if EDINET throttles a download;
    /// other per-report failures are logged and skipped.
    #[instrument(skip(self, company), fields(company = %company.id))]
    pub async fn process_company(&self, company: &Company) -> Result<CompanyOutcome> {
        info!(name = %company.name, code = company.security_code.as_str(), years = self.years, "Searching annual reports");
        let reports = self.search_annual_reports(&company.security_code).await;
        if reports.is_empty() {
            return Ok(CompanyOutcome::Skipped(SkipReason::NoReports));
        }
        info!(count = reports.len(), "Found reports");

        let mut labels = HashSet::new();
        let mut years: Vec<(Option<NaiveDate>, FiscalYearRecord)> = Vec::new();
        for doc in &reports {
            let Some(record) = self.process_report(doc).await? else {
                continue;
            };
            if record.revenue.is_none() {
                info!(year = %record.year, "No revenue, skipping year");
                continue;
            }
            if !labels.insert(record.year.clone()) {
                debug!(year = %record.year, doc_id = %doc.doc_id, "Duplicate year, keeping first");
                continue;
            }
            info!(
                year = %record.year,
                revenue = ?record.revenue,
                operating_profit = ?record.operating_profit,
                "Extracted fiscal year"
            );
            years.push((doc.period_end, record));
        }

        if years.is_empty() {
            return Ok(CompanyOutcome::Skipped(SkipReason::NoFinancialData));
        }

        years.sort_by_key(|(end, _)| (end.is_none(), *end));
        let records = years.into_iter().map(|(_, record)| record).collect();
        Ok(CompanyOutcome::Updated(CompanyFinancials::new(
            company.id.clone(),
            records,
        )))
    }

    /// Downloads one report and turns it into a record, or `None` if it has no data.
    async fn process_report(&self, doc: &FilingDocument) -> Result<Option<FiscalYearRecord>> {
        let doc_id = doc.doc_id.as_str();
        debug!(%doc_id, description = ?doc.doc_description, "Processing report");

        let bytes = match self.source.download_archive(doc_id).await {
            Ok(bytes) => bytes,
            Err(e @ DataError::RateLimited { .. }) => return Err(e),
            Err(e) => {
                warn!(%doc_id, error = %e, "Download failed");
                return Ok(None);
            }
        };

        let Some(xml) = extract_xbrl(&bytes) else {
            warn!(%doc_id, "No XBRL instance in archive");
            return Ok(None);
        };

        match record_from_instance(&xml, &self.resolver, &doc.fiscal_year_label()) {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                warn!(%doc_id, "Could not extract financial data");
                Ok(None)
            }
            Err(e) => {
                warn!(%doc_id, error = %e, "Unreadable XBRL instance");
                Ok(None)
            }
        }
    }

    /// Processes companies with at most `jobs` in flight, yielding each as it completes.
    pub fn process_all<'a>(
        &'a self,
        companies: &'a [Company],
        jobs: usize,
    ) -> impl Stream<Item = (&'a Company, Result<CompanyOutcome>)> + 'a {
        stream::iter(companies)
            .map(move |company| async move { (company, self.process_company(company).await) })
            .buffer_unordered(jobs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_windows_clip_to_today() {
        let windows = filing_windows(date(2025, 7, 15), 1, &FILING_SEARCH_MONTHS);
        assert_eq!(windows.len(), 2);
        assert_eq!(
            windows[0],
            vec![
                (date(2025, 6, 1), date(2025, 6, 30)),
                (date(2025, 7, 1), date(2025, 7, 15)),
            ]
        );
        assert_eq!(
            windows[1],
            vec![
                (date(2024, 6, 1), date(2024, 6, 30)),
                (date(2024, 7, 1), date(2024, 7, 31)),
                (date(2024, 8, 1), date(2024, 8, 31)),
                (date(2024, 9, 1), date(2024, 9, 30)),
            ]
        );
    }

    #[rstest]
    #[case(date(2025, 1, 10), 0)]
    #[case(date(2025, 6, 1), 1)]
    #[case(date(2025, 10, 1), 4)]
    fn test_windows_in_current_year(#[case] today: NaiveDate, #[case] expected: usize) {
        let windows = filing_windows(today, 0, &FILING_SEARCH_MONTHS);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].len(), expected);
    }

    #[test]
    fn test_windows_december_and_invalid_months() {
        let windows = filing_windows(date(2025, 12, 31), 0, &[12, 13, 0]);
        assert_eq!(windows[0], vec![(date(2025, 12, 1), date(2025, 12, 31))]);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NoReports.to_string(), "No annual reports found");
    }
}
