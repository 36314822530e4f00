//! Settings read from the environment.

use irkun_core::{DataError, Result};
use irkun_edinet::{DEFAULT_BASE_URL, EdinetClient};
use irkun_store::JsonFileStore;
use std::path::PathBuf;

/// Variable holding the EDINET subscription key.
pub const API_KEY_VAR: &str = "EDINET_API_KEY";
/// Variable overriding the EDINET API base URL.
pub const API_BASE_VAR: &str = "EDINET_API_BASE";
/// Variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "IRKUN_DATA_DIR";

/// Default data directory, holding `financials.json` and `companies.json`.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default number of past years to collect.
pub const DEFAULT_YEARS: u32 = 5;

/// Months in which annual reports are searched. Companies closing their year
/// in March, the majority, file in June.
pub const FILING_SEARCH_MONTHS: [u32; 4] = [6, 7, 8, 9];

/// Runtime settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// EDINET subscription key.
    pub api_key: String,
    /// EDINET API base URL.
    pub api_base: String,
    /// Directory of the JSON files.
    pub data_dir: PathBuf,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if `EDINET_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the API key is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| {
            DataError::Config(format!(
                "{API_KEY_VAR} is not set; get a key at https://disclosure.edinet-fsa.go.jp/ \
                 and export it or put it in .env"
            ))
        })?;

        Ok(Self {
            api_key,
            api_base: non_empty(API_BASE_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            data_dir: non_empty(DATA_DIR_VAR).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
        })
    }

    /// Builds the EDINET client for these settings.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the client cannot be constructed.
    pub fn edinet_client(&self) -> Result<EdinetClient> {
        Ok(EdinetClient::new(self.api_key.as_str())?.with_base_url(self.api_base.as_str()))
    }

    /// Builds the JSON store over the data directory.
    #[must_use]
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::in_dir(&self.data_dir)
    }
}
