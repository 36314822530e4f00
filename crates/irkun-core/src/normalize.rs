//! Conversion of raw figures into fiscal year records.
//!
//! Monetary figures are converted from yen to million yen with
//! round-half-to-even. Ratios are computed from the converted figures and
//! rounded to one decimal; a ratio whose inputs are missing, or whose
//! denominator is not positive, is left out of the record.

use crate::metric::Metric;
use crate::types::{FinancialFigures, FiscalYearRecord};

const YEN_PER_MILLION: f64 = 1_000_000.0;

/// Converts a yen amount to million yen, rounding half to even.
#[must_use]
pub fn to_million(yen: f64) -> i64 {
    (yen / YEN_PER_MILLION).round_ties_even() as i64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `numerator / denominator * scale`, only when both are known and the denominator is positive.
fn ratio(numerator: Option<f64>, denominator: Option<f64>, scale: f64) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0.0 => Some(round1(n / d * scale)),
        _ => None,
    }
}

/// Builds the record for one reporting period from the figures selected in its filing.
///
/// The result depends only on its inputs, so re-running it on the same
/// figures yields an identical record.
#[must_use]
pub fn normalize(figures: &FinancialFigures, year_label: impl Into<String>) -> FiscalYearRecord {
    let million = |metric| figures.value(metric).map(to_million);

    let revenue = million(Metric::Revenue);
    let operating_profit = million(Metric::OperatingProfit);
    let ordinary_profit = million(Metric::OrdinaryProfit);
    let net_income = million(Metric::NetIncome);
    let net_assets = million(Metric::NetAssets);

    // A headcount of zero means "not reported".
    let employees = figures
        .value(Metric::Employees)
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.trunc() as u32);

    let as_f64 = |v: Option<i64>| v.map(|v| v as f64);

    FiscalYearRecord {
        year: year_label.into(),
        revenue,
        operating_profit,
        ordinary_profit,
        net_income,
        net_assets,
        operating_margin: ratio(as_f64(operating_profit), as_f64(revenue), 100.0),
        roe: ratio(as_f64(net_income), as_f64(net_assets), 100.0),
        employees,
        revenue_per_employee: ratio(as_f64(revenue), employees.map(f64::from), 1.0),
    }
}
