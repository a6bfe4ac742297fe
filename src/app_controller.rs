use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::collection::CollectionService;
use crate::database::{DatabaseConnection, DatabaseStats};
use crate::dictionary::{CombinationManager, EntryStore};
use crate::pagination::PageRequest;

// @module: Application controller wiring storage and services

/// Main application controller owning the configuration and services
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared database handle
    db: DatabaseConnection,

    // @field: Combination lifecycle
    combinations: CombinationManager,

    // @field: Collections and memberships
    collections: CollectionService,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    /// and an in-memory database
    pub fn new_for_test() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::with_database(Config::default(), db))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let db_path = match &config.database.path {
            Some(path) => PathBuf::from(path),
            None => DatabaseConnection::default_database_path()?,
        };

        let db = DatabaseConnection::new(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        info!("Using database {}", db_path.display());

        Ok(Self::with_database(config, db))
    }

    // @method: Wire services around an already opened database
    pub fn with_database(config: Config, db: DatabaseConnection) -> Self {
        let combinations = CombinationManager::new(db.clone());
        let collections = CollectionService::new(db.clone(), combinations.clone());
        debug!("Controller initialized");

        Self {
            config,
            db,
            combinations,
            collections,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn entries(&self) -> &EntryStore {
        self.combinations.entries()
    }

    pub fn combinations(&self) -> &CombinationManager {
        &self.combinations
    }

    pub fn collections(&self) -> &CollectionService {
        &self.collections
    }

    /// Build a page request from raw console input using configured bounds
    pub fn page(&self, page: Option<i64>, page_size: Option<i64>) -> PageRequest {
        PageRequest::from_params(page, page_size, &self.config.pagination)
    }

    /// Row counts and file size of the store
    pub fn stats(&self) -> Result<DatabaseStats> {
        self.db.stats()
    }
}
