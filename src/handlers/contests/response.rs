//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Contest, Phase, ProblemRef, UserRef};

/// Contest detail response, including the resolved roster
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
    pub users: Vec<String>,
    pub problems: Vec<String>,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContestResponse {
    pub fn from_parts(
        contest: Contest,
        users: Vec<UserRef>,
        problems: Vec<ProblemRef>,
        now: DateTime<Utc>,
    ) -> Self {
        let phase = contest.phase_at(now);
        Self {
            id: contest.id,
            name: contest.name,
            is_public: contest.is_public,
            activate_time: contest.activate_time,
            start_time: contest.start_time,
            freeze_time: contest.freeze_time,
            end_time: contest.end_time,
            deactivate_time: contest.deactivate_time,
            users: users.into_iter().map(|u| u.email).collect(),
            problems: problems.into_iter().map(|p| p.slug).collect(),
            phase,
            created_at: contest.created_at,
            updated_at: contest.updated_at,
        }
    }
}

/// Contest summary for list views
#[derive(Debug, Serialize)]
pub struct ContestSummary {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
    pub phase: Phase,
}

impl ContestSummary {
    pub fn from_contest(contest: Contest, now: DateTime<Utc>) -> Self {
        let phase = contest.phase_at(now);
        Self {
            id: contest.id,
            name: contest.name,
            is_public: contest.is_public,
            activate_time: contest.activate_time,
            start_time: contest.start_time,
            freeze_time: contest.freeze_time,
            end_time: contest.end_time,
            deactivate_time: contest.deactivate_time,
            phase,
        }
    }
}

/// Contest list response
#[derive(Debug, Serialize)]
pub struct ContestsListResponse {
    pub contests: Vec<ContestSummary>,
    pub total: usize,
}

/// Identifier listings for the contest add/edit form
#[derive(Debug, Serialize)]
pub struct RosterOptionsResponse {
    pub user_emails: Vec<String>,
    pub problem_slugs: Vec<String>,
}
