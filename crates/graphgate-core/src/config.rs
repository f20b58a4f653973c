//! Gateway configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file, then `GRAPHGATE__*` environment variables (a `.env` file is loaded
//! first when present). Nested keys use `__`, e.g.
//! `GRAPHGATE__PAGINATION__MAX_PAGE_SIZE`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::logging_facility::Profile;
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const ENV_PREFIX: &str = "GRAPHGATE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Graph store settings
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StoreConfig {
    /// Declare the native uniqueness constraints (user id, email and
    /// username; post id)
    pub unique_constraints: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
}

impl GatewayConfig {
    /// Load configuration, optionally reading `path` on top of the defaults
    ///
    /// # Errors
    ///
    /// `Load` when a source cannot be read or deserialized, `Invalid` when
    /// values are out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is normal outside development
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder()
            .set_default("store.unique_constraints", true)?
            .set_default("logging.profile", "development")?
            .set_default("pagination.default_page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .set_default("pagination.max_page_size", i64::from(MAX_PAGE_SIZE))?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let loaded: GatewayConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// # Errors
    ///
    /// `Invalid` describing the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pagination = &self.pagination;
        if pagination.max_page_size < 1 || pagination.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "pagination.max_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if pagination.default_page_size < 1
            || pagination.default_page_size > pagination.max_page_size
        {
            return Err(ConfigError::Invalid(
                "pagination.default_page_size must be between 1 and max_page_size".to_string(),
            ));
        }
        Ok(())
    }
}
