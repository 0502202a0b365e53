//! Contest service
//!
//! Orchestrates contest create/update/delete/list over the injected
//! [`ContestStore`] and [`RosterResolver`] seams. All mutations are
//! all-or-nothing: on any error path the store is left untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{ContestStore, RosterResolver},
    error::{AppError, AppResult},
    handlers::contests::{
        request::{CreateContestRequest, UpdateContestRequest},
        response::{ContestResponse, ContestSummary, RosterOptionsResponse},
    },
    models::{NewContest, ProblemRef, UserRef},
    utils::validation::{parse_checkbox, validate_contest_name},
};

/// Contest service for business logic
pub struct ContestService {
    store: Arc<dyn ContestStore>,
    roster: Arc<dyn RosterResolver>,
}

impl ContestService {
    /// Create a new contest service with injected storage dependencies
    pub fn new(store: Arc<dyn ContestStore>, roster: Arc<dyn RosterResolver>) -> Self {
        Self { store, roster }
    }

    /// List all contests with their phase at `now`
    pub async fn list(&self, now: DateTime<Utc>) -> AppResult<Vec<ContestSummary>> {
        let contests = self.store.list_all().await?;

        Ok(contests
            .into_iter()
            .map(|contest| ContestSummary::from_contest(contest, now))
            .collect())
    }

    /// Get a contest and its roster by ID
    pub async fn get(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<ContestResponse> {
        let contest = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contest {} not found", id)))?;

        let (users, problems) =
            futures::try_join!(self.store.users_of(id), self.store.problems_of(id))?;

        Ok(ContestResponse::from_parts(contest, users, problems, now))
    }

    /// Create a new contest.
    ///
    /// The name-uniqueness pre-check is a read before the insert; two
    /// concurrent creates with the same name can both pass it, in which
    /// case the store's unique constraint reports the loser as `Conflict`,
    /// presented to callers identically to `DuplicateName`.
    pub async fn create(
        &self,
        payload: CreateContestRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ContestResponse> {
        let is_public = validate_fields(&payload.name, payload.is_public.as_deref())?;

        if self.store.find_by_name(&payload.name).await?.is_some() {
            tracing::info!(name = %payload.name, "tried to add a duplicate contest");
            return Err(AppError::DuplicateName(payload.name));
        }

        let (users, problems) = self.resolve_roster(&payload.users, &payload.problems).await?;

        let times = payload.times();
        let new_contest = NewContest {
            name: payload.name,
            is_public,
            times,
        };

        let contest = self
            .store
            .insert(new_contest, users.clone(), problems.clone())
            .await?;

        tracing::info!(name = %contest.name, id = %contest.id, "created contest");

        Ok(ContestResponse::from_parts(contest, users, problems, now))
    }

    /// Update a contest, replacing every field and both roster sets.
    ///
    /// Name uniqueness is not re-checked on update; a rename that collides
    /// with another contest surfaces as `Conflict` from the store.
    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateContestRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ContestResponse> {
        if self.store.find_by_id(id).await?.is_none() {
            tracing::info!(%id, "tried to edit nonexistent contest");
            return Err(AppError::NotFound(format!("Contest {} not found", id)));
        }

        let is_public = validate_fields(&payload.name, payload.is_public.as_deref())?;

        let (users, problems) = self.resolve_roster(&payload.users, &payload.problems).await?;

        let times = payload.times();
        let changes = NewContest {
            name: payload.name,
            is_public,
            times,
        };

        let contest = self
            .store
            .update(id, changes, users.clone(), problems.clone())
            .await?;

        tracing::info!(name = %contest.name, id = %contest.id, "updated contest");

        Ok(ContestResponse::from_parts(contest, users, problems, now))
    }

    /// Delete a contest
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let contest = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                tracing::info!(%id, "tried to delete nonexistent contest");
                AppError::NotFound(format!("Contest {} not found", id))
            })?;

        match self.store.delete(id).await {
            Err(AppError::ReferentialIntegrity(_)) => {
                tracing::info!(name = %contest.name, "could not delete contest: still referenced");
                Err(AppError::ReferentialIntegrity(contest.name))
            }
            other => {
                if other.is_ok() {
                    tracing::info!(name = %contest.name, "deleted contest");
                }
                other
            }
        }
    }

    /// Every known user email and problem slug, for the add/edit form
    pub async fn roster_options(&self) -> AppResult<RosterOptionsResponse> {
        let (user_emails, problem_slugs) =
            futures::try_join!(self.roster.user_emails(), self.roster.problem_slugs())?;

        Ok(RosterOptionsResponse {
            user_emails,
            problem_slugs,
        })
    }

    /// Resolve both identifier lists, dropping unknown identifiers
    async fn resolve_roster(
        &self,
        emails: &[String],
        slugs: &[String],
    ) -> AppResult<(Vec<UserRef>, Vec<ProblemRef>)> {
        let (users, problems) = futures::try_join!(
            self.roster.resolve_users(emails),
            self.roster.resolve_problems(slugs)
        )?;

        if users.len() < emails.len() {
            tracing::debug!(
                submitted = emails.len(),
                resolved = users.len(),
                "some user emails did not resolve"
            );
        }
        if problems.len() < slugs.len() {
            tracing::debug!(
                submitted = slugs.len(),
                resolved = problems.len(),
                "some problem slugs did not resolve"
            );
        }

        Ok((users, problems))
    }
}

/// Validate the submitted name and checkbox-encoded visibility flag
fn validate_fields(name: &str, is_public: Option<&str>) -> AppResult<bool> {
    validate_contest_name(name).map_err(|e| AppError::Validation(e.to_string()))?;

    parse_checkbox(is_public).ok_or_else(|| {
        tracing::info!(?is_public, "invalid contest is_public value");
        AppError::Validation(format!(
            "Unrecognized is_public value: {}",
            is_public.unwrap_or_default()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::db::roster::MockRosterResolver;
    use crate::db::store::MockContestStore;
    use crate::models::{Contest, Phase};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    fn contest(name: &str) -> Contest {
        Contest {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_public: true,
            activate_time: None,
            start_time: None,
            freeze_time: None,
            end_time: None,
            deactivate_time: None,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn persisted(id: Uuid, new: NewContest) -> Contest {
        Contest {
            id,
            name: new.name,
            is_public: new.is_public,
            activate_time: new.times.activate_time,
            start_time: new.times.start_time,
            freeze_time: new.times.freeze_time,
            end_time: new.times.end_time,
            deactivate_time: new.times.deactivate_time,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn user(email: &str) -> UserRef {
        UserRef {
            id: Uuid::new_v4(),
            email: email.to_string(),
        }
    }

    fn problem(slug: &str) -> ProblemRef {
        ProblemRef {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
        }
    }

    fn create_payload(name: &str) -> CreateContestRequest {
        CreateContestRequest {
            name: name.to_string(),
            is_public: Some("on".to_string()),
            activate_time: None,
            start_time: Some(t0()),
            freeze_time: None,
            end_time: None,
            deactivate_time: None,
            users: vec!["a@x.com".to_string(), "missing@x.com".to_string()],
            problems: vec!["p1".to_string()],
        }
    }

    fn service(store: MockContestStore, roster: MockRosterResolver) -> ContestService {
        ContestService::new(Arc::new(store), Arc::new(roster))
    }

    #[tokio::test]
    async fn create_persists_resolved_roster() {
        let mut store = MockContestStore::new();
        store
            .expect_find_by_name()
            .withf(|name| name == "Spring2024")
            .returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|new, users, problems| {
                new.name == "Spring2024"
                    && new.is_public
                    && new.times.start_time == Some(t0())
                    && users.len() == 1
                    && problems.len() == 1
            })
            .returning(|new, _, _| Ok(persisted(Uuid::new_v4(), new)));

        let mut roster = MockRosterResolver::new();
        roster
            .expect_resolve_users()
            .withf(|emails| emails == ["a@x.com", "missing@x.com"])
            .returning(|_| Ok(vec![user("a@x.com")]));
        roster
            .expect_resolve_problems()
            .withf(|slugs| slugs == ["p1"])
            .returning(|_| Ok(vec![problem("p1")]));

        let response = service(store, roster)
            .create(create_payload("Spring2024"), t0())
            .await
            .unwrap();

        assert_eq!(response.name, "Spring2024");
        assert!(response.is_public);
        // The unknown email was dropped, not reported
        assert_eq!(response.users, vec!["a@x.com"]);
        assert_eq!(response.problems, vec!["p1"]);
        assert_eq!(response.phase, Phase::Running);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() {
        let mut store = MockContestStore::new();
        store
            .expect_find_by_name()
            .withf(|name| name == "Spring2024")
            .returning(|_| Ok(Some(contest("Spring2024"))));
        // No insert expectation: reaching the store would panic the test

        let err = service(store, MockRosterResolver::new())
            .create(create_payload("Spring2024"), t0())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateName(name) if name == "Spring2024"));
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let err = service(MockContestStore::new(), MockRosterResolver::new())
            .create(create_payload("   "), t0())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_unrecognized_visibility_flag() {
        let mut payload = create_payload("Spring2024");
        payload.is_public = Some("banana".to_string());

        let err = service(MockContestStore::new(), MockRosterResolver::new())
            .create(payload, t0())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_treats_absent_flag_as_private() {
        let mut payload = create_payload("Quiet Round");
        payload.is_public = None;
        payload.users = vec![];
        payload.problems = vec![];

        let mut store = MockContestStore::new();
        store.expect_find_by_name().returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|new, _, _| !new.is_public)
            .returning(|new, _, _| Ok(persisted(Uuid::new_v4(), new)));

        let mut roster = MockRosterResolver::new();
        roster.expect_resolve_users().returning(|_| Ok(vec![]));
        roster.expect_resolve_problems().returning(|_| Ok(vec![]));

        let response = service(store, roster).create(payload, t0()).await.unwrap();

        assert!(!response.is_public);
        assert!(response.users.is_empty());
    }

    #[tokio::test]
    async fn update_missing_contest_is_not_found() {
        let mut store = MockContestStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let payload = UpdateContestRequest {
            name: "Spring2024".to_string(),
            is_public: None,
            activate_time: None,
            start_time: None,
            freeze_time: None,
            end_time: None,
            deactivate_time: None,
            users: vec![],
            problems: vec![],
        };

        let err = service(store, MockRosterResolver::new())
            .update(Uuid::new_v4(), payload, t0())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_roster_wholesale() {
        let id = Uuid::new_v4();
        let end = t0() + chrono::Duration::seconds(3600);

        let mut store = MockContestStore::new();
        store
            .expect_find_by_id()
            .withf(move |got| *got == id)
            .returning(|_| Ok(Some(contest("Spring2024"))));
        store
            .expect_update()
            .withf(move |got, changes, users, problems| {
                *got == id
                    && changes.name == "Spring2024"
                    && !changes.is_public
                    && users.is_empty()
                    && problems.len() == 2
            })
            .returning(|got, changes, _, _| Ok(persisted(got, changes)));

        let mut roster = MockRosterResolver::new();
        roster
            .expect_resolve_users()
            .withf(|emails| emails.is_empty())
            .returning(|_| Ok(vec![]));
        roster
            .expect_resolve_problems()
            .withf(|slugs| slugs == ["p1", "p2"])
            .returning(|_| Ok(vec![problem("p1"), problem("p2")]));

        let payload = UpdateContestRequest {
            name: "Spring2024".to_string(),
            is_public: None,
            activate_time: None,
            start_time: Some(t0()),
            freeze_time: None,
            end_time: Some(end),
            deactivate_time: None,
            users: vec![],
            problems: vec!["p1".to_string(), "p2".to_string()],
        };

        let response = service(store, roster).update(id, payload, t0()).await.unwrap();

        assert!(!response.is_public);
        assert!(response.users.is_empty());
        assert_eq!(response.problems, vec!["p1", "p2"]);
        assert_eq!(response.end_time, Some(end));
    }

    #[tokio::test]
    async fn delete_missing_contest_is_not_found() {
        let mut store = MockContestStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let err = service(store, MockRosterResolver::new())
            .delete(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_referential_integrity() {
        let mut store = MockContestStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Ok(Some(contest("Referenced Round"))));
        store
            .expect_delete()
            .returning(|_| Err(AppError::ReferentialIntegrity("contests".to_string())));

        let err = service(store, MockRosterResolver::new())
            .delete(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReferentialIntegrity(name) if name == "Referenced Round"));
    }

    #[tokio::test]
    async fn delete_removes_unreferenced_contest() {
        let mut store = MockContestStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Ok(Some(contest("Old Round"))));
        store.expect_delete().returning(|_| Ok(()));

        service(store, MockRosterResolver::new())
            .delete(Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_derives_phase_for_each_contest() {
        let mut running = contest("Running Round");
        running.start_time = Some(t0() - chrono::Duration::seconds(60));

        let mut store = MockContestStore::new();
        store
            .expect_list_all()
            .returning(move || Ok(vec![contest("Idle Round"), running.clone()]));

        let summaries = service(store, MockRosterResolver::new())
            .list(t0())
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].phase, Phase::Inactive);
        assert_eq!(summaries[1].phase, Phase::Running);
    }

    #[tokio::test]
    async fn roster_options_lists_all_identifiers() {
        let mut roster = MockRosterResolver::new();
        roster
            .expect_user_emails()
            .returning(|| Ok(vec!["a@x.com".to_string(), "b@x.com".to_string()]));
        roster
            .expect_problem_slugs()
            .returning(|| Ok(vec!["p1".to_string()]));

        let options = service(MockContestStore::new(), roster)
            .roster_options()
            .await
            .unwrap();

        assert_eq!(options.user_emails.len(), 2);
        assert_eq!(options.problem_slugs, vec!["p1"]);
    }
}
