//! Core data types for EDINET financial data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`SecurityCode`] - Listing code of a company on a Japanese exchange
//! - [`Company`] - A tracked company and its listing code
//! - [`FilingDocument`] - Metadata of one disclosure on EDINET
//! - [`RawFinancialFigure`] - A single fact selected from an XBRL instance
//! - [`FinancialFigures`] - The facts selected for one filing, per metric
//! - [`FiscalYearRecord`] - Normalized figures for one reporting period
//! - [`CompanyFinancials`] - All fiscal years of one company, as persisted

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;
use crate::metric::{ContextKind, Metric};

/// Ordinance code of the Cabinet Office Ordinance on Disclosure of Corporate Affairs.
pub const ANNUAL_REPORT_ORDINANCE_CODE: &str = "010";

/// Form code of an annual securities report (有価証券報告書).
pub const ANNUAL_REPORT_FORM_CODE: &str = "030000";

/// Label used when a filing carries neither a period end nor a description.
pub const UNKNOWN_PERIOD_LABEL: &str = "不明";

/// A listing code on a Japanese stock exchange.
///
/// Codes are four characters, digits or upper-case letters (e.g. `7366`,
/// `130A`), and are upper-cased on creation. EDINET files codes with a
/// trailing check digit, so matching against a filed code is by prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecurityCode(String);

impl SecurityCode {
    /// Creates a security code, validating its shape.
    pub fn new(code: impl Into<String>) -> Result<Self, DataError> {
        let code = code.into().trim().to_uppercase();
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DataError::InvalidParameter(format!(
                "security code must be 4 alphanumeric characters, got {code:?}"
            )));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if a code as filed on EDINET belongs to this company.
    #[must_use]
    pub fn matches(&self, filed: &str) -> bool {
        filed.starts_with(self.0.as_str())
    }
}

impl fmt::Display for SecurityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SecurityCode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SecurityCode {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SecurityCode> for String {
    fn from(code: SecurityCode) -> Self {
        code.0
    }
}

/// Identifier of a company in the product (e.g. `litalico`).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a company id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A company whose annual reports are tracked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Product identifier.
    pub id: CompanyId,
    /// Listing code used to find filings.
    pub security_code: SecurityCode,
    /// Display name.
    pub name: String,
}

impl Company {
    /// Creates a company entry.
    #[must_use]
    pub fn new(id: impl Into<CompanyId>, security_code: SecurityCode, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            security_code,
            name: name.into(),
        }
    }
}

/// Metadata of one disclosure, as listed by the EDINET documents API.
///
/// Immutable once retrieved. Fields EDINET may send as `null` are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingDocument {
    /// EDINET document id (e.g. `S100TXYZ`).
    #[serde(rename = "docID")]
    pub doc_id: String,
    /// EDINET code of the filer.
    #[serde(default)]
    pub edinet_code: Option<String>,
    /// Security code of the filer, usually with a check digit.
    #[serde(default)]
    pub sec_code: Option<String>,
    /// Filer name.
    #[serde(default)]
    pub filer_name: Option<String>,
    /// Ordinance code.
    #[serde(default)]
    pub ordinance_code: Option<String>,
    /// Form code.
    #[serde(default)]
    pub form_code: Option<String>,
    /// Document type code.
    #[serde(default)]
    pub doc_type_code: Option<String>,
    /// Start of the reporting period.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// End of the reporting period.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// Submission timestamp as sent by EDINET (`YYYY-MM-DD hh:mm`).
    #[serde(default)]
    pub submit_date_time: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub doc_description: Option<String>,
}

impl FilingDocument {
    /// Creates a document with only its id set.
    #[must_use]
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            ..Default::default()
        }
    }

    /// Returns true if the ordinance and form codes identify an annual securities report.
    #[must_use]
    pub fn is_annual_securities_report(&self) -> bool {
        self.ordinance_code.as_deref() == Some(ANNUAL_REPORT_ORDINANCE_CODE)
            && self.form_code.as_deref() == Some(ANNUAL_REPORT_FORM_CODE)
    }

    /// Returns true if the filer's security code matches `code`.
    ///
    /// Documents without a security code never match.
    #[must_use]
    pub fn is_filed_by(&self, code: &SecurityCode) -> bool {
        self.sec_code
            .as_deref()
            .is_some_and(|filed| !filed.is_empty() && code.matches(filed))
    }

    /// Returns the fiscal year label, e.g. `2025年3月期` for a period ending 2025-03-31.
    #[must_use]
    pub fn fiscal_year_label(&self) -> String {
        if let Some(end) = self.period_end {
            return format!("{}年{}月期", end.year(), end.month());
        }
        match self.doc_description.as_deref() {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => UNKNOWN_PERIOD_LABEL.to_string(),
        }
    }
}

/// A single numeric fact selected from an XBRL instance, in yen (or persons).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawFinancialFigure {
    /// The metric the fact was selected for.
    pub metric: Metric,
    /// Tag the fact was reported under, e.g. `jppfs_cor:NetSales`.
    pub tag: String,
    /// Bucket of the fact's context.
    pub context: ContextKind,
    /// Reported value.
    pub value: f64,
}

impl RawFinancialFigure {
    /// Creates a figure.
    #[must_use]
    pub fn new(metric: Metric, tag: impl Into<String>, context: ContextKind, value: f64) -> Self {
        Self {
            metric,
            tag: tag.into(),
            context,
            value,
        }
    }
}

/// The figures selected from one filing, at most one per metric.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFigures {
    /// Revenue.
    pub revenue: Option<RawFinancialFigure>,
    /// Operating profit.
    pub operating_profit: Option<RawFinancialFigure>,
    /// Ordinary profit.
    pub ordinary_profit: Option<RawFinancialFigure>,
    /// Net income.
    pub net_income: Option<RawFinancialFigure>,
    /// Net assets.
    pub net_assets: Option<RawFinancialFigure>,
    /// Employee count.
    pub employees: Option<RawFinancialFigure>,
}

impl FinancialFigures {
    /// Returns the figure selected for a metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<&RawFinancialFigure> {
        match metric {
            Metric::Revenue => self.revenue.as_ref(),
            Metric::OperatingProfit => self.operating_profit.as_ref(),
            Metric::OrdinaryProfit => self.ordinary_profit.as_ref(),
            Metric::NetIncome => self.net_income.as_ref(),
            Metric::NetAssets => self.net_assets.as_ref(),
            Metric::Employees => self.employees.as_ref(),
        }
    }

    /// Returns the value selected for a metric.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.get(metric).map(|f| f.value)
    }

    /// Stores a figure in the slot of its metric, replacing any previous one.
    pub fn set(&mut self, figure: RawFinancialFigure) {
        let slot = match figure.metric {
            Metric::Revenue => &mut self.revenue,
            Metric::OperatingProfit => &mut self.operating_profit,
            Metric::OrdinaryProfit => &mut self.ordinary_profit,
            Metric::NetIncome => &mut self.net_income,
            Metric::NetAssets => &mut self.net_assets,
            Metric::Employees => &mut self.employees,
        };
        *slot = Some(figure);
    }

    /// Returns true if the filing yielded revenue or operating profit.
    #[must_use]
    pub const fn has_income_statement(&self) -> bool {
        self.revenue.is_some() || self.operating_profit.is_some()
    }

    /// Returns true if no metric was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Normalized figures for one company and reporting period, in million yen.
///
/// Fields that could not be determined are `None` and omitted from the JSON;
/// "unknown" is never written as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalYearRecord {
    /// Period label, e.g. `2025年3月期`.
    pub year: String,
    /// Revenue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,
    /// Operating profit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_profit: Option<i64>,
    /// Ordinary profit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinary_profit: Option<i64>,
    /// Net income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<i64>,
    /// Net assets at period end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_assets: Option<i64>,
    /// Operating margin in percent, one decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_margin: Option<f64>,
    /// Return on equity in percent, one decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roe: Option<f64>,
    /// Number of employees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
    /// Revenue per employee in million yen, one decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_per_employee: Option<f64>,
}

impl FiscalYearRecord {
    /// Creates an empty record for a period label.
    #[must_use]
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            ..Default::default()
        }
    }
}

/// All normalized fiscal years of one company, as persisted in `financials.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFinancials {
    /// Company the figures belong to.
    pub company_id: CompanyId,
    /// Currency of monetary figures.
    pub currency: String,
    /// Unit of monetary figures.
    pub unit: String,
    /// Fiscal years, oldest first.
    pub fiscal_years: Vec<FiscalYearRecord>,
}

impl CompanyFinancials {
    /// Creates an entry in million yen.
    #[must_use]
    pub fn new(company_id: CompanyId, fiscal_years: Vec<FiscalYearRecord>) -> Self {
        Self {
            company_id,
            currency: "JPY".to_string(),
            unit: "million".to_string(),
            fiscal_years,
        }
    }

    /// Returns the period labels, in stored order.
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.fiscal_years.iter().map(|fy| fy.year.as_str())
    }
}
