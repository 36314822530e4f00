//! Store trait for normalized financials.
//!
//! This module defines the [`FinancialsStore`] trait that persists
//! [`CompanyFinancials`] keyed by company id. Writes replace a company's
//! entry wholesale; there is no partial update and no history.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{CompanyFinancials, CompanyId},
};

/// Trait for persisting normalized financials.
#[async_trait]
pub trait FinancialsStore: Send + Sync {
    /// Returns every stored entry, in stored order.
    async fn load(&self) -> Result<Vec<CompanyFinancials>>;

    /// Returns the stored entry of one company.
    async fn get(&self, company_id: &CompanyId) -> Result<Option<CompanyFinancials>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|entry| &entry.company_id == company_id))
    }

    /// Replaces the entries of the given companies and appends new ones.
    ///
    /// Returns the total number of entries stored afterwards.
    async fn upsert(&self, entries: &[CompanyFinancials]) -> Result<usize>;

    /// Flags the given companies as having full financial data.
    ///
    /// Returns the number of flags that changed.
    async fn mark_full_data(&self, company_ids: &[CompanyId]) -> Result<usize>;
}
