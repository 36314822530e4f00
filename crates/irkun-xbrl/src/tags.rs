//! Metric to candidate-tag priority tables.
//!
//! Filers use different tags for the same concept, so each [`Metric`] maps to
//! an ordered list of acceptable [`TagName`]s, first-listed preferred. The
//! table is data: it can be loaded from JSON and extended with new filer
//! variants without touching the resolver.

use irkun_core::{DataError, Metric, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::document::XbrlFact;

/// A qualified tag name such as `jppfs_cor:NetSales`.
///
/// Matching uses the local name and the taxonomy family (`jppfs`, `jpcrp`,
/// ...), so the versioned namespace URIs of real filings
/// (`.../taxonomy/jppfs/2024-11-01/jppfs_cor`) and unversioned ones both match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName {
    prefix: String,
    local: String,
    namespace_segment: String,
}

impl TagName {
    /// Creates a tag name from a prefix (e.g. `jppfs_cor`) and a local name.
    pub fn new(prefix: &str, local: &str) -> Result<Self> {
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        };
        if !valid(prefix) || !valid(local) {
            return Err(DataError::InvalidParameter(format!(
                "invalid tag name {prefix}:{local}"
            )));
        }
        let family = prefix.strip_suffix("_cor").unwrap_or(prefix);
        Ok(Self {
            prefix: prefix.to_string(),
            local: local.to_string(),
            namespace_segment: format!("/{family}/"),
        })
    }

    /// Returns the local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Returns the prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `fact` is reported under this tag.
    #[must_use]
    pub fn matches(&self, fact: &XbrlFact) -> bool {
        fact.name == self.local
            && fact
                .namespace
                .as_deref()
                .is_some_and(|ns| ns.contains(&self.namespace_segment))
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

impl FromStr for TagName {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let (prefix, local) = s.split_once(':').ok_or_else(|| {
            DataError::InvalidParameter(format!("tag name must be prefix:local, got {s:?}"))
        })?;
        Self::new(prefix, local)
    }
}

impl TryFrom<String> for TagName {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TagName> for String {
    fn from(tag: TagName) -> Self {
        tag.to_string()
    }
}

/// Candidate tags per metric, in priority order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagTable {
    candidates: BTreeMap<Metric, Vec<TagName>>,
}

/// Built-in candidates, matching the tags seen in EDINET annual reports.
///
/// IFRS filers report under the `jpigp` taxonomy, not `jppfs`.
const DEFAULT_TAGS: &[(Metric, &[&str])] = &[
    (
        Metric::Revenue,
        &[
            "jppfs_cor:NetSales",
            "jppfs_cor:Revenue",
            "jppfs_cor:OperatingRevenue1",
            "jppfs_cor:OperatingRevenue",
            "jpigp_cor:RevenueIFRS",
        ],
    ),
    (
        Metric::OperatingProfit,
        &[
            "jppfs_cor:OperatingIncome",
            "jppfs_cor:OperatingProfit",
            "jpigp_cor:OperatingProfitLossIFRS",
        ],
    ),
    (
        Metric::OrdinaryProfit,
        &["jppfs_cor:OrdinaryIncome", "jppfs_cor:OrdinaryProfit"],
    ),
    (
        Metric::NetIncome,
        &[
            "jppfs_cor:ProfitLoss",
            "jppfs_cor:ProfitLossAttributableToOwnersOfParent",
            "jppfs_cor:NetIncome",
            "jpigp_cor:ProfitLossAttributableToOwnersOfParentIFRS",
        ],
    ),
    (
        Metric::NetAssets,
        &[
            "jppfs_cor:NetAssets",
            "jppfs_cor:EquityAttributableToOwnersOfParent",
            "jpigp_cor:EquityAttributableToOwnersOfParentIFRS",
        ],
    ),
    (Metric::Employees, &["jpcrp_cor:NumberOfEmployees"]),
];

impl Default for TagTable {
    fn default() -> Self {
        let candidates = DEFAULT_TAGS
            .iter()
            .map(|(metric, tags)| {
                let tags = tags
                    .iter()
                    .filter_map(|t| t.parse::<TagName>().ok())
                    .collect();
                (*metric, tags)
            })
            .collect();
        Self { candidates }
    }
}

impl TagTable {
    /// Creates a table with no candidates.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            candidates: BTreeMap::new(),
        }
    }

    /// Loads a table from JSON such as `{"revenue": ["jppfs_cor:NetSales"]}`.
    ///
    /// Metrics absent from the JSON keep their built-in candidates.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: BTreeMap<Metric, Vec<TagName>> = serde_json::from_str(json)?;
        let mut table = Self::default();
        table.candidates.extend(overrides);
        Ok(table)
    }

    /// Replaces the candidates of one metric.
    #[must_use]
    pub fn with_candidates(mut self, metric: Metric, tags: Vec<TagName>) -> Self {
        self.candidates.insert(metric, tags);
        self
    }

    /// Returns the candidates of a metric, first-listed preferred.
    #[must_use]
    pub fn candidates(&self, metric: Metric) -> &[TagName] {
        self.candidates
            .get(&metric)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
