//! JSON flat-file store.
//!
//! `financials.json` is an array of [`CompanyFinancials`] objects keyed by
//! `companyId`. `companies.json` is the product's company list; only the
//! `hasFullData` flag of its entries is touched, every other field is kept as
//! read. Entries are handled as raw JSON values so that fields this crate does
//! not model survive a rewrite.

use async_trait::async_trait;
use irkun_core::{CompanyFinancials, CompanyId, DataError, FinancialsStore, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// File name of the financials array.
pub const FINANCIALS_FILE: &str = "financials.json";
/// File name of the company list.
pub const COMPANIES_FILE: &str = "companies.json";

const COMPANY_ID_FIELD: &str = "companyId";
const ID_FIELD: &str = "id";
const FULL_DATA_FIELD: &str = "hasFullData";

/// Store backed by `financials.json` and `companies.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    financials_path: PathBuf,
    companies_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over explicit file paths.
    #[must_use]
    pub fn new(financials_path: impl Into<PathBuf>, companies_path: impl Into<PathBuf>) -> Self {
        Self {
            financials_path: financials_path.into(),
            companies_path: companies_path.into(),
        }
    }

    /// Creates a store over `financials.json` and `companies.json` in `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(FINANCIALS_FILE), dir.join(COMPANIES_FILE))
    }

    /// Path of `financials.json`.
    #[must_use]
    pub fn financials_path(&self) -> &Path {
        &self.financials_path
    }

    /// Path of `companies.json`.
    #[must_use]
    pub fn companies_path(&self) -> &Path {
        &self.companies_path
    }
}

/// Reads a JSON array, or `None` if the file does not exist.
async fn read_array(path: &Path) -> Result<Option<Vec<Value>>> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let values = serde_json::from_str(&text).map_err(|e| {
        DataError::Parse(format!("{} is not a JSON array: {e}", path.display()))
    })?;
    Ok(Some(values))
}

/// Writes pretty-printed JSON to a sibling temp file, then renames it over `path`.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, text).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn has_id(value: &Value, field: &str, id: &CompanyId) -> bool {
    value.get(field).and_then(Value::as_str) == Some(id.as_str())
}

#[async_trait]
impl FinancialsStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.financials_path.display()))]
    async fn load(&self) -> Result<Vec<CompanyFinancials>> {
        let values = read_array(&self.financials_path).await?.unwrap_or_default();
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(DataError::from))
            .collect()
    }

    #[instrument(skip(self, entries), fields(path = %self.financials_path.display(), count = entries.len()))]
    async fn upsert(&self, entries: &[CompanyFinancials]) -> Result<usize> {
        let mut stored = read_array(&self.financials_path).await?.unwrap_or_default();
        if entries.is_empty() {
            debug!("Nothing to store");
            return Ok(stored.len());
        }

        for entry in entries {
            let value = serde_json::to_value(entry)?;
            match stored
                .iter_mut()
                .find(|v| has_id(v, COMPANY_ID_FIELD, &entry.company_id))
            {
                Some(existing) => *existing = value,
                None => stored.push(value),
            }
        }

        write_json(&self.financials_path, &stored).await?;
        info!(total = stored.len(), "Updated financials");
        Ok(stored.len())
    }

    #[instrument(skip(self, company_ids), fields(path = %self.companies_path.display()))]
    async fn mark_full_data(&self, company_ids: &[CompanyId]) -> Result<usize> {
        let Some(mut companies) = read_array(&self.companies_path).await? else {
            debug!("No company list, skipping flags");
            return Ok(0);
        };

        let mut changed = 0;
        for company in &mut companies {
            if !company_ids.iter().any(|id| has_id(company, ID_FIELD, id)) {
                continue;
            }
            if company.get(FULL_DATA_FIELD).and_then(Value::as_bool) == Some(true) {
                continue;
            }
            if let Some(object) = company.as_object_mut() {
                object.insert(FULL_DATA_FIELD.to_string(), Value::Bool(true));
                changed += 1;
            }
        }

        if changed > 0 {
            write_json(&self.companies_path, &companies).await?;
            info!(changed, "Updated hasFullData flags");
        }
        Ok(changed)
    }
}
