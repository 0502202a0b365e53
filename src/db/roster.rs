//! Roster resolution
//!
//! Translates the identifier lists an operator submits (user emails,
//! problem slugs) into validated entity references. Resolution is
//! best-effort: identifiers with no matching row are dropped from the
//! result, not reported as errors, and duplicates collapse.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{ProblemRef, UserRef},
};

/// Lookup seam for the user and problem tables
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterResolver: Send + Sync {
    /// Resolve user emails to references, dropping unknown emails
    async fn resolve_users(&self, emails: &[String]) -> AppResult<Vec<UserRef>>;

    /// Resolve problem slugs to references, dropping unknown slugs
    async fn resolve_problems(&self, slugs: &[String]) -> AppResult<Vec<ProblemRef>>;

    /// Every known user email, for the admin roster form
    async fn user_emails(&self) -> AppResult<Vec<String>>;

    /// Every known problem slug, for the admin roster form
    async fn problem_slugs(&self) -> AppResult<Vec<String>>;
}

/// PostgreSQL-backed roster resolver
pub struct PgRosterResolver {
    pool: PgPool,
}

impl PgRosterResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterResolver for PgRosterResolver {
    async fn resolve_users(&self, emails: &[String]) -> AppResult<Vec<UserRef>> {
        // ANY($1) drops unknown emails and collapses duplicates in one
        // round-trip
        let users = sqlx::query_as::<_, UserRef>(
            r#"SELECT id, email FROM users WHERE email = ANY($1) ORDER BY email"#,
        )
        .bind(emails)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn resolve_problems(&self, slugs: &[String]) -> AppResult<Vec<ProblemRef>> {
        let problems = sqlx::query_as::<_, ProblemRef>(
            r#"SELECT id, slug FROM problems WHERE slug = ANY($1) ORDER BY slug"#,
        )
        .bind(slugs)
        .fetch_all(&self.pool)
        .await?;

        Ok(problems)
    }

    async fn user_emails(&self) -> AppResult<Vec<String>> {
        let emails: Vec<String> =
            sqlx::query_scalar(r#"SELECT email FROM users ORDER BY email"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(emails)
    }

    async fn problem_slugs(&self) -> AppResult<Vec<String>> {
        let slugs: Vec<String> =
            sqlx::query_scalar(r#"SELECT slug FROM problems ORDER BY slug"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(slugs)
    }
}
