//! In-memory store implementation.

use async_trait::async_trait;
use irkun_core::{CompanyFinancials, CompanyId, FinancialsStore, Result};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory store for testing and dry runs.
///
/// Entries are kept in insertion order and lost when the store is dropped.
/// Only companies registered with [`InMemoryStore::with_companies`] can be
/// flagged as having full data, mirroring a `companies.json` that lists them.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    financials: RwLock<Vec<CompanyFinancials>>,
    full_data: RwLock<BTreeMap<CompanyId, bool>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers companies, none of them flagged yet.
    #[must_use]
    pub fn with_companies(self, ids: impl IntoIterator<Item = CompanyId>) -> Self {
        let full_data = ids.into_iter().map(|id| (id, false)).collect();
        Self {
            full_data: RwLock::new(full_data),
            ..self
        }
    }

    /// Returns true if the company has been flagged as having full data.
    pub async fn has_full_data(&self, company_id: &CompanyId) -> bool {
        self.full_data
            .read()
            .await
            .get(company_id)
            .copied()
            .unwrap_or(false)
    }
}

#[async_trait]
impl FinancialsStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<CompanyFinancials>> {
        Ok(self.financials.read().await.clone())
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn upsert(&self, entries: &[CompanyFinancials]) -> Result<usize> {
        let mut stored = self.financials.write().await;
        for entry in entries {
            match stored.iter_mut().find(|e| e.company_id == entry.company_id) {
                Some(existing) => *existing = entry.clone(),
                None => stored.push(entry.clone()),
            }
        }
        debug!(total = stored.len(), "Stored financials");
        Ok(stored.len())
    }

    #[instrument(skip(self, company_ids), fields(count = company_ids.len()))]
    async fn mark_full_data(&self, company_ids: &[CompanyId]) -> Result<usize> {
        let mut flags = self.full_data.write().await;
        let mut changed = 0;
        for id in company_ids {
            if let Some(flag) = flags.get_mut(id) {
                if !*flag {
                    *flag = true;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irkun_core::FiscalYearRecord;

    fn entry(id: &str, years: &[&str]) -> CompanyFinancials {
        CompanyFinancials::new(
            CompanyId::new(id),
            years.iter().map(|y| FiscalYearRecord::new(*y)).collect(),
        )
    }

    #[tokio::test]
    async fn test_memory_store_upsert_replaces_wholesale() {
        let store = InMemoryStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let total = store
            .upsert(&[entry("litalico", &["2024年3月期", "2025年3月期"]), entry("welbe", &["2025年3月期"])])
            .await
            .unwrap();
        assert_eq!(total, 2);

        let total = store.upsert(&[entry("litalico", &["2025年3月期"])]).await.unwrap();
        assert_eq!(total, 2);

        let litalico = store.get(&CompanyId::new("litalico")).await.unwrap().unwrap();
        assert_eq!(litalico.years().collect::<Vec<_>>(), vec!["2025年3月期"]);

        let order: Vec<_> = store
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.company_id.to_string())
            .collect();
        assert_eq!(order, vec!["litalico", "welbe"]);
    }

    #[tokio::test]
    async fn test_memory_store_mark_full_data() {
        let store = InMemoryStore::new().with_companies([CompanyId::new("sms"), CompanyId::new("spool")]);
        let ids = [CompanyId::new("sms"), CompanyId::new("unknown")];

        assert_eq!(store.mark_full_data(&ids).await.unwrap(), 1);
        assert_eq!(store.mark_full_data(&ids).await.unwrap(), 0);
        assert!(store.has_full_data(&CompanyId::new("sms")).await);
        assert!(!store.has_full_data(&CompanyId::new("spool")).await);
        assert!(!store.has_full_data(&CompanyId::new("unknown")).await);
    }
}
