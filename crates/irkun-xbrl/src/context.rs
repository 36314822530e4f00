//! Classification of EDINET context ids.
//!
//! EDINET names contexts `<period>[_<member>]`, e.g. `CurrentYearDuration`
//! or `CurrentYearInstant_NonConsolidatedMember`. The default member of the
//! consolidation axis is "consolidated", so a context without a member is
//! consolidated; a filer without subsidiaries reports under that default too.
//! Contexts qualified by any other member (segments, components of equity)
//! describe a slice of a figure and are never candidates, nor are prior-year
//! periods.

use irkun_core::ContextKind;

const CURRENT_YEAR_DURATION: &str = "CurrentYearDuration";
const INSTANT_PERIODS: [&str; 2] = ["CurrentYearInstant", "CurrentInstant"];

const CONSOLIDATED_MEMBER: &str = "_ConsolidatedMember";
const NON_CONSOLIDATED_MEMBER: &str = "_NonConsolidatedMember";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Consolidated,
    NonConsolidated,
}

fn scope(member_suffix: &str) -> Option<Scope> {
    match member_suffix {
        "" | CONSOLIDATED_MEMBER => Some(Scope::Consolidated),
        NON_CONSOLIDATED_MEMBER => Some(Scope::NonConsolidated),
        _ => None,
    }
}

/// Returns the selection bucket of a context id, or `None` if facts in that
/// context are never selected.
#[must_use]
pub fn classify_context(context_ref: &str) -> Option<ContextKind> {
    if let Some(rest) = context_ref.strip_prefix(CURRENT_YEAR_DURATION) {
        return Some(match scope(rest)? {
            Scope::Consolidated => ContextKind::ConsolidatedCurrentYear,
            Scope::NonConsolidated => ContextKind::NonConsolidatedCurrentYear,
        });
    }

    let rest = INSTANT_PERIODS
        .iter()
        .find_map(|period| context_ref.strip_prefix(*period))?;
    Some(match scope(rest)? {
        Scope::Consolidated => ContextKind::ConsolidatedInstant,
        Scope::NonConsolidated => ContextKind::OtherInstant,
    })
}
