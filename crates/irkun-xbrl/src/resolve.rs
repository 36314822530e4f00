//! Selection of one fact per metric.
//!
//! Flow metrics (revenue, profits) are chosen by context preference among the
//! facts of the first candidate tag that appears in the document at all:
//! consolidated current year, then non-consolidated current year, then
//! consolidated period end, then any other period end. Later tags are only
//! consulted when an earlier tag has no facts, not when its facts are
//! unparseable. Balance metrics (net assets) take the first period-end fact
//! found across the candidate tags.

use irkun_core::{FinancialFigures, Metric, PeriodKind, RawFinancialFigure};
use tracing::trace;

use crate::context::classify_context;
use crate::document::XbrlDocument;
use crate::tags::{TagName, TagTable};

/// Picks the most trustworthy value of each metric from an XBRL instance.
///
/// Resolution is a pure function of the document and the tag table.
#[derive(Debug, Clone, Default)]
pub struct TagResolver {
    table: TagTable,
}

impl TagResolver {
    /// Creates a resolver over a tag table.
    #[must_use]
    pub const fn new(table: TagTable) -> Self {
        Self { table }
    }

    /// Returns the tag table.
    #[must_use]
    pub const fn table(&self) -> &TagTable {
        &self.table
    }

    /// Selects the value of `metric`, or `None` if the document does not report it.
    #[must_use]
    pub fn resolve(&self, doc: &XbrlDocument, metric: Metric) -> Option<RawFinancialFigure> {
        let candidates = self.table.candidates(metric);
        let figure = match metric.period_kind() {
            PeriodKind::Duration => resolve_flow(doc, metric, candidates),
            PeriodKind::Instant => resolve_balance(doc, metric, candidates),
        };
        if let Some(f) = &figure {
            trace!(%metric, tag = %f.tag, context = ?f.context, value = f.value, "Resolved");
        }
        figure
    }

    /// Selects every metric.
    #[must_use]
    pub fn resolve_all(&self, doc: &XbrlDocument) -> FinancialFigures {
        let mut figures = FinancialFigures::default();
        for metric in Metric::ALL {
            if let Some(figure) = self.resolve(doc, metric) {
                figures.set(figure);
            }
        }
        figures
    }
}

fn resolve_flow(
    doc: &XbrlDocument,
    metric: Metric,
    candidates: &[TagName],
) -> Option<RawFinancialFigure> {
    for tag in candidates {
        let mut facts = doc.facts_for(tag).peekable();
        if facts.peek().is_none() {
            continue;
        }

        // min_by_key keeps the first of equal keys, so document order breaks ties.
        return facts
            .filter_map(|fact| Some((classify_context(&fact.context_ref)?, fact.value()?)))
            .min_by_key(|(context, _)| *context)
            .map(|(context, value)| RawFinancialFigure::new(metric, tag.to_string(), context, value));
    }
    None
}

fn resolve_balance(
    doc: &XbrlDocument,
    metric: Metric,
    candidates: &[TagName],
) -> Option<RawFinancialFigure> {
    candidates.iter().find_map(|tag| {
        doc.facts_for(tag).find_map(|fact| {
            let context = classify_context(&fact.context_ref).filter(|c| c.is_instant())?;
            let value = fact.value()?;
            Some(RawFinancialFigure::new(metric, tag.to_string(), context, value))
        })
    })
}
