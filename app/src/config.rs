//! Connection settings for the hosted table.
//!
//! The endpoint URL and API key are the only configuration. Both come from
//! the environment and both are required.

use thiserror::Error;
use todolist_core::TodosTable;

pub const URL_VAR: &str = "TODOS_URL";
pub const API_KEY_VAR: &str = "TODOS_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        Ok(Self {
            url: required(URL_VAR)?,
            api_key: required(API_KEY_VAR)?,
        })
    }

    pub fn table(&self) -> TodosTable {
        TodosTable::new(&self.url, &self.api_key)
    }
}
