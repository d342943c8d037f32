//! Bootstrap context.
//!
//! Holds what the initialization steps produce (configuration, database
//! pool, cache client). Built empty in `main`, shared via `Arc`, each slot
//! written exactly once by its step and read everywhere afterwards. Nothing
//! here is a process global; whoever needs a handle is given the context.

use std::sync::OnceLock;

use thiserror::Error;

use crate::cache::Cache;
use crate::config::AppConfig;
use crate::database::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Read before the producing step completed.
    #[error("{0} has not been initialized")]
    NotInitialized(&'static str),

    /// A second write to a slot.
    #[error("{0} is already initialized")]
    AlreadyInitialized(&'static str),
}

#[derive(Debug, Default)]
pub struct AppContext {
    config: OnceLock<AppConfig>,
    database: OnceLock<Database>,
    cache: OnceLock<Cache>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&self, config: AppConfig) -> Result<(), ContextError> {
        publish(&self.config, config, "config")
    }

    pub fn set_database(&self, database: Database) -> Result<(), ContextError> {
        publish(&self.database, database, "database")
    }

    pub fn set_cache(&self, cache: Cache) -> Result<(), ContextError> {
        publish(&self.cache, cache, "cache")
    }

    pub fn config(&self) -> Result<&AppConfig, ContextError> {
        self.config.get().ok_or(ContextError::NotInitialized("config"))
    }

    pub fn database(&self) -> Result<&Database, ContextError> {
        self.database.get().ok_or(ContextError::NotInitialized("database"))
    }

    pub fn cache(&self) -> Result<&Cache, ContextError> {
        self.cache.get().ok_or(ContextError::NotInitialized("cache"))
    }

    /// Names of the populated slots, for diagnostics.
    pub fn components(&self) -> Vec<&'static str> {
        let mut components = Vec::new();
        if self.config.get().is_some() {
            components.push("config");
        }
        if self.database.get().is_some() {
            components.push("database");
        }
        if self.cache.get().is_some() {
            components.push("cache");
        }
        components
    }
}

fn publish<T>(slot: &OnceLock<T>, value: T, name: &'static str) -> Result<(), ContextError> {
    slot.set(value)
        .map_err(|_| ContextError::AlreadyInitialized(name))
}
