//! Database module
//!
//! This module handles database connections, migrations, and the storage
//! seams the service layer depends on.

pub mod connection;
pub mod roster;
pub mod store;

use sqlx::PgPool;

pub use connection::*;
pub use roster::{PgRosterResolver, RosterResolver};
pub use store::{ContestStore, PgContestStore};

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
