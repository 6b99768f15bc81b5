use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{TeamPage, TeamStore};
use crate::domain::team::{Team, TeamStatus};

/// PostgreSQL implementation of the team store
///
/// The aggregate is persisted as a JSONB document alongside the columns the
/// store queries on (owner, share link, status, recency). Queries use the
/// runtime API so the crate builds without a live database.
pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rehydrate(doc: serde_json::Value) -> Result<Team, String> {
        serde_json::from_value(doc).map_err(|e| format!("Corrupt team document: {e}"))
    }
}

#[async_trait]
impl TeamStore for PostgresTeamStore {
    async fn save(&self, team: &Team) -> Result<(), String> {
        let doc = serde_json::to_value(team).map_err(|e| format!("Failed to encode team: {e}"))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, client_id, status, share_link_id, updated_at, doc)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                share_link_id = EXCLUDED.share_link_id,
                updated_at = EXCLUDED.updated_at,
                doc = EXCLUDED.doc
            "#,
        )
        .bind(team.id())
        .bind(team.client())
        .bind(team.status().to_string())
        .bind(team.share_link_id())
        .bind(team.updated_at())
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save team: {e}"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, String> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM teams WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| format!("Failed to find team by id: {e}"))?;

        doc.map(Self::rehydrate).transpose()
    }

    async fn find_by_share_link(&self, share_link_id: &str) -> Result<Option<Team>, String> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM teams WHERE share_link_id = $1")
                .bind(share_link_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| format!("Failed to find team by share link: {e}"))?;

        doc.map(Self::rehydrate).transpose()
    }

    async fn find_by_client(
        &self,
        client: Uuid,
        status: Option<TeamStatus>,
        skip: usize,
        limit: usize,
    ) -> Result<TeamPage, String> {
        let status = status.map(|s| s.to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM teams WHERE client_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(client)
        .bind(&status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| format!("Failed to count teams: {e}"))?;

        let docs: Vec<serde_json::Value> = sqlx::query_scalar(
            r#"
            SELECT doc FROM teams
            WHERE client_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY updated_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(client)
        .bind(&status)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list teams: {e}"))?;

        let teams = docs
            .into_iter()
            .map(Self::rehydrate)
            .collect::<Result<Vec<Team>, String>>()?;

        Ok(TeamPage {
            teams,
            total: total as u64,
        })
    }

    async fn count_by_client(&self, client: Uuid) -> Result<u64, String> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE client_id = $1")
            .bind(client)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count teams: {e}"))?;
        Ok(count as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete team: {e}"))?;

        Ok(result.rows_affected() > 0)
    }
}
