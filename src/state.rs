//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor. The contest
//! service is constructed here with its storage dependencies injected,
//! so the rest of the application never touches a global database handle.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{PgContestStore, PgRosterResolver},
    services::ContestService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Contest administration service
    pub contests: ContestService,

    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let store = Arc::new(PgContestStore::new(db.clone()));
        let roster = Arc::new(PgRosterResolver::new(db.clone()));
        let contests = ContestService::new(store, roster);

        Self {
            inner: Arc::new(AppStateInner { contests, db, config }),
        }
    }

    /// Get a reference to the contest service
    pub fn contests(&self) -> &ContestService {
        &self.inner.contests
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
