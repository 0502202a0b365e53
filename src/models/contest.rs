//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    /// Derive the lifecycle phase of this contest at the given instant.
    ///
    /// The phase is the highest-ordered milestone whose timestamp is set
    /// and not after `now`. An unset timestamp is treated as never reached,
    /// so a contest with only `end_time` in the past is `Ended` even though
    /// it never froze. With no qualifying milestone the contest is
    /// `Inactive`.
    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        [
            (self.activate_time, Phase::Activated),
            (self.start_time, Phase::Running),
            (self.freeze_time, Phase::Frozen),
            (self.end_time, Phase::Ended),
            (self.deactivate_time, Phase::Deactivated),
        ]
        .into_iter()
        .filter_map(|(milestone, phase)| milestone.filter(|t| *t <= now).map(|_| phase))
        .max()
        .unwrap_or(Phase::Inactive)
    }
}

/// Contest lifecycle phase, ordered by progression.
///
/// Derived from the schedule and wall-clock time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inactive,
    Activated,
    Running,
    Frozen,
    Ended,
    Deactivated,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Activated => write!(f, "activated"),
            Self::Running => write!(f, "running"),
            Self::Frozen => write!(f, "frozen"),
            Self::Ended => write!(f, "ended"),
            Self::Deactivated => write!(f, "deactivated"),
        }
    }
}

/// The five schedule milestones of a contest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestTimes {
    pub activate_time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
}

/// Validated contest fields, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContest {
    pub name: String,
    pub is_public: bool,
    pub times: ContestTimes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn contest_with(times: ContestTimes) -> Contest {
        Contest {
            id: Uuid::nil(),
            name: "Test Round".to_string(),
            is_public: true,
            activate_time: times.activate_time,
            start_time: times.start_time,
            freeze_time: times.freeze_time,
            end_time: times.end_time,
            deactivate_time: times.deactivate_time,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn full_schedule() -> ContestTimes {
        ContestTimes {
            activate_time: Some(at(1)),
            start_time: Some(at(2)),
            freeze_time: Some(at(3)),
            end_time: Some(at(4)),
            deactivate_time: Some(at(5)),
        }
    }

    #[test]
    fn test_no_milestones_is_inactive() {
        let contest = contest_with(ContestTimes::default());
        assert_eq!(contest.phase_at(at(12)), Phase::Inactive);
    }

    #[test]
    fn test_phase_follows_schedule() {
        let contest = contest_with(full_schedule());
        assert_eq!(contest.phase_at(at(0)), Phase::Inactive);
        assert_eq!(contest.phase_at(at(1)), Phase::Activated);
        assert_eq!(contest.phase_at(at(2)), Phase::Running);
        assert_eq!(contest.phase_at(at(3)), Phase::Frozen);
        assert_eq!(contest.phase_at(at(4)), Phase::Ended);
        assert_eq!(contest.phase_at(at(5)), Phase::Deactivated);
    }

    #[test]
    fn test_milestone_is_reached_at_exact_instant() {
        let contest = contest_with(full_schedule());
        // Boundary is inclusive
        assert_eq!(contest.phase_at(at(2)), Phase::Running);
    }

    #[test]
    fn test_unset_milestones_are_skipped() {
        // Never frozen: phase jumps from Running to Ended
        let contest = contest_with(ContestTimes {
            start_time: Some(at(2)),
            end_time: Some(at(4)),
            ..Default::default()
        });
        assert_eq!(contest.phase_at(at(3)), Phase::Running);
        assert_eq!(contest.phase_at(at(4)), Phase::Ended);
    }

    #[test]
    fn test_highest_milestone_wins() {
        // Only end_time set and in the past: the contest is Ended even
        // though it never activated or started
        let contest = contest_with(ContestTimes {
            end_time: Some(at(4)),
            ..Default::default()
        });
        assert_eq!(contest.phase_at(at(10)), Phase::Ended);
    }

    #[test]
    fn test_phase_is_monotonic_in_time() {
        let contest = contest_with(full_schedule());
        let phases: Vec<Phase> = (0..=6).map(|h| contest.phase_at(at(h))).collect();
        for pair in phases.windows(2) {
            assert!(pair[0] <= pair[1], "phase regressed: {:?}", pair);
        }
    }

    #[test]
    fn test_phase_ordering() {
        assert!(Phase::Inactive < Phase::Activated);
        assert!(Phase::Activated < Phase::Running);
        assert!(Phase::Running < Phase::Frozen);
        assert!(Phase::Frozen < Phase::Ended);
        assert!(Phase::Ended < Phase::Deactivated);
    }
}
