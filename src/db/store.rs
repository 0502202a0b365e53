//! Contest store
//!
//! Persistence seam for contests and their rosters. The service layer talks
//! to the [`ContestStore`] trait; [`PgContestStore`] is the PostgreSQL
//! implementation. Every mutation runs in a single transaction, so a failed
//! statement leaves no partial state.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contest, NewContest, ProblemRef, UserRef},
};

/// Storage operations for contests and their user/problem rosters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestStore: Send + Sync {
    /// Find a contest by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contest>>;

    /// Find a contest by its unique name (case-sensitive)
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Contest>>;

    /// List all contests in storage order
    async fn list_all(&self) -> AppResult<Vec<Contest>>;

    /// Insert a contest together with its roster.
    ///
    /// A name collision at insert time surfaces as [`crate::AppError::Conflict`].
    async fn insert(
        &self,
        contest: NewContest,
        users: Vec<UserRef>,
        problems: Vec<ProblemRef>,
    ) -> AppResult<Contest>;

    /// Replace every field and both roster sets of an existing contest.
    async fn update(
        &self,
        id: Uuid,
        contest: NewContest,
        users: Vec<UserRef>,
        problems: Vec<ProblemRef>,
    ) -> AppResult<Contest>;

    /// Delete a contest.
    ///
    /// A foreign-key rejection surfaces as
    /// [`crate::AppError::ReferentialIntegrity`]; the contest is left intact.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Users associated with a contest
    async fn users_of(&self, contest_id: Uuid) -> AppResult<Vec<UserRef>>;

    /// Problems associated with a contest
    async fn problems_of(&self, contest_id: Uuid) -> AppResult<Vec<ProblemRef>>;
}

/// PostgreSQL-backed contest store
pub struct PgContestStore {
    pool: PgPool,
}

impl PgContestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace both roster tables for a contest within the given transaction.
    async fn replace_roster(
        tx: &mut Transaction<'_, Postgres>,
        contest_id: Uuid,
        users: &[UserRef],
        problems: &[ProblemRef],
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM contest_users WHERE contest_id = $1"#)
            .bind(contest_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(r#"DELETE FROM contest_problems WHERE contest_id = $1"#)
            .bind(contest_id)
            .execute(&mut **tx)
            .await?;

        let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        sqlx::query(
            r#"
            INSERT INTO contest_users (contest_id, user_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(contest_id)
        .bind(&user_ids)
        .execute(&mut **tx)
        .await?;

        let problem_ids: Vec<Uuid> = problems.iter().map(|p| p.id).collect();
        sqlx::query(
            r#"
            INSERT INTO contest_problems (contest_id, problem_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(contest_id)
        .bind(&problem_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ContestStore for PgContestStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contest)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE name = $1"#)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contest)
    }

    async fn list_all(&self) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests"#)
            .fetch_all(&self.pool)
            .await?;

        Ok(contests)
    }

    async fn insert(
        &self,
        contest: NewContest,
        users: Vec<UserRef>,
        problems: Vec<ProblemRef>,
    ) -> AppResult<Contest> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (
                name, is_public, activate_time, start_time, freeze_time,
                end_time, deactivate_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&contest.name)
        .bind(contest.is_public)
        .bind(contest.times.activate_time)
        .bind(contest.times.start_time)
        .bind(contest.times.freeze_time)
        .bind(contest.times.end_time)
        .bind(contest.times.deactivate_time)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_roster(&mut tx, created.id, &users, &problems).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        contest: NewContest,
        users: Vec<UserRef>,
        problems: Vec<ProblemRef>,
    ) -> AppResult<Contest> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET
                name = $2,
                is_public = $3,
                activate_time = $4,
                start_time = $5,
                freeze_time = $6,
                end_time = $7,
                deactivate_time = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&contest.name)
        .bind(contest.is_public)
        .bind(contest.times.activate_time)
        .bind(contest.times.start_time)
        .bind(contest.times.freeze_time)
        .bind(contest.times.end_time)
        .bind(contest.times.deactivate_time)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_roster(&mut tx, id, &users, &problems).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Join-table rows cascade; a submission or other platform record
        // pointing at the contest raises a foreign-key violation, which the
        // error layer converts to ReferentialIntegrity.
        sqlx::query(r#"DELETE FROM contests WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn users_of(&self, contest_id: Uuid) -> AppResult<Vec<UserRef>> {
        let users = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT u.id, u.email
            FROM contest_users cu
            JOIN users u ON cu.user_id = u.id
            WHERE cu.contest_id = $1
            ORDER BY u.email
            "#,
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn problems_of(&self, contest_id: Uuid) -> AppResult<Vec<ProblemRef>> {
        let problems = sqlx::query_as::<_, ProblemRef>(
            r#"
            SELECT p.id, p.slug
            FROM contest_problems cp
            JOIN problems p ON cp.problem_id = p.id
            WHERE cp.contest_id = $1
            ORDER BY p.slug
            "#,
        )
        .bind(contest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(problems)
    }
}
