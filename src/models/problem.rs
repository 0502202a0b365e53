//! Problem reference model
//!
//! Problems are owned by the platform's problem bank; this module only
//! ever reads them to resolve contest rosters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only reference to a problem, identified by unique slug
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProblemRef {
    pub id: Uuid,
    pub slug: String,
}
