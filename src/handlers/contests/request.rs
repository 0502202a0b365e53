//! Contest request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_CONTEST_NAME_LENGTH;
use crate::models::ContestTimes;

/// Create contest request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    #[validate(length(min = 1, max = MAX_CONTEST_NAME_LENGTH))]
    pub name: String,

    /// Checkbox-style visibility flag ("on"/"true"/"1"; absent = unchecked)
    pub is_public: Option<String>,

    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,

    /// User emails to associate; unknown emails are dropped
    #[serde(default)]
    pub users: Vec<String>,

    /// Problem slugs to associate; unknown slugs are dropped
    #[serde(default)]
    pub problems: Vec<String>,
}

/// Update contest request.
///
/// Updates are wholesale: every field and both roster sets are replaced
/// with exactly what is submitted here, mirroring a full form resubmission.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContestRequest {
    #[validate(length(min = 1, max = MAX_CONTEST_NAME_LENGTH))]
    pub name: String,

    /// Checkbox-style visibility flag ("on"/"true"/"1"; absent = unchecked)
    pub is_public: Option<String>,

    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub users: Vec<String>,

    #[serde(default)]
    pub problems: Vec<String>,
}

impl CreateContestRequest {
    pub fn times(&self) -> ContestTimes {
        ContestTimes {
            activate_time: self.activate_time,
            start_time: self.start_time,
            freeze_time: self.freeze_time,
            end_time: self.end_time,
            deactivate_time: self.deactivate_time,
        }
    }
}

impl UpdateContestRequest {
    pub fn times(&self) -> ContestTimes {
        ContestTimes {
            activate_time: self.activate_time,
            start_time: self.start_time,
            freeze_time: self.freeze_time,
            end_time: self.end_time,
            deactivate_time: self.deactivate_time,
        }
    }
}
