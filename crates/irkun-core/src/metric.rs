//! Financial metrics and XBRL context classification.
//!
//! This module defines [`Metric`] for the figures extracted from an annual
//! report, [`PeriodKind`] for whether a metric is a flow or a balance, and
//! [`ContextKind`] for the selection buckets a fact can fall into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A financial figure extracted from an annual securities report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Net sales / revenue.
    Revenue,
    /// Operating profit.
    OperatingProfit,
    /// Ordinary profit.
    OrdinaryProfit,
    /// Profit attributable for the year.
    NetIncome,
    /// Net assets at period end.
    NetAssets,
    /// Number of employees.
    Employees,
}

impl Metric {
    /// All metrics, in the order they appear in a record.
    pub const ALL: [Self; 6] = [
        Self::Revenue,
        Self::OperatingProfit,
        Self::OrdinaryProfit,
        Self::NetIncome,
        Self::NetAssets,
        Self::Employees,
    ];

    /// Returns how the metric is reported over time.
    ///
    /// Employees are selected like a flow so that the instant contexts they
    /// are usually filed under are reached through the instant fallbacks.
    #[must_use]
    pub const fn period_kind(&self) -> PeriodKind {
        match self {
            Self::NetAssets => PeriodKind::Instant,
            _ => PeriodKind::Duration,
        }
    }

    /// Returns the snake_case key used in tag tables.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::OperatingProfit => "operating_profit",
            Self::OrdinaryProfit => "ordinary_profit",
            Self::NetIncome => "net_income",
            Self::NetAssets => "net_assets",
            Self::Employees => "employees",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a metric is a flow over the fiscal year or a balance at its end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Reported for the fiscal year (revenue, profits).
    Duration,
    /// Reported at period end (net assets).
    Instant,
}

/// Selection bucket of a fact, derived from its context.
///
/// Variants are declared in preference order, so the derived `Ord` ranks a
/// better bucket lower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContextKind {
    /// Consolidated figure for the current fiscal year.
    ConsolidatedCurrentYear,
    /// Parent-only figure for the current fiscal year.
    NonConsolidatedCurrentYear,
    /// Consolidated balance at the current period end.
    ConsolidatedInstant,
    /// Any other balance at the current period end.
    OtherInstant,
}

impl ContextKind {
    /// Returns true for period-end contexts.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        matches!(self, Self::ConsolidatedInstant | Self::OtherInstant)
    }

    /// Returns true for consolidated contexts.
    #[must_use]
    pub const fn is_consolidated(&self) -> bool {
        matches!(
            self,
            Self::ConsolidatedCurrentYear | Self::ConsolidatedInstant
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_kind() {
        assert_eq!(Metric::Revenue.period_kind(), PeriodKind::Duration);
        assert_eq!(Metric::Employees.period_kind(), PeriodKind::Duration);
        assert_eq!(Metric::NetAssets.period_kind(), PeriodKind::Instant);
    }

    #[test]
    fn test_context_preference_order() {
        let mut kinds = vec![
            ContextKind::OtherInstant,
            ContextKind::ConsolidatedInstant,
            ContextKind::NonConsolidatedCurrentYear,
            ContextKind::ConsolidatedCurrentYear,
        ];
        kinds.sort();
        assert_eq!(kinds[0], ContextKind::ConsolidatedCurrentYear);
        assert_eq!(kinds[3], ContextKind::OtherInstant);
    }

    #[test]
    fn test_metric_serde_key() {
        let json = serde_json::to_string(&Metric::OperatingProfit).unwrap();
        assert_eq!(json, "\"operating_profit\"");
        assert_eq!(Metric::OperatingProfit.to_string(), "operating_profit");
    }
}
