//! User reference model
//!
//! Users are owned by the platform's account service; this module only
//! ever reads them to resolve contest rosters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only reference to a platform user, identified by unique email
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
}
